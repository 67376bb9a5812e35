//! Integration test: many concurrent transfers through the handle registry.

mod common;

use std::collections::HashMap;

use telesend_core::transfer::TransferOptions;
use telesend_core::{HandleRegistry, RegistryError};

#[test]
fn concurrent_sends_pair_with_their_own_results() {
    let base = common::post_server::start();
    let reg = HandleRegistry::new(TransferOptions::default());

    let ids: Vec<_> = (0..16u64)
        .map(|k| {
            let id = reg.send(&format!("{base}/id/{k}"), HashMap::new()).unwrap();
            (k, id)
        })
        .collect();
    assert_eq!(reg.len(), 16);

    // Join in reverse dispatch order; completion order differs again.
    for (k, id) in ids.into_iter().rev() {
        let result = reg.wait(Some(id)).unwrap().unwrap();
        assert_eq!(result.http_code(), 200);
        assert_eq!(result.body(), Some(format!("id-{k}").as_bytes()));
    }
    assert!(reg.is_empty());
}

#[test]
fn concurrent_senders_on_many_threads() {
    let base = common::post_server::start();
    let reg = HandleRegistry::default();

    std::thread::scope(|s| {
        for k in 0..8u64 {
            let reg = &reg;
            let base = &base;
            s.spawn(move || {
                let id = reg.send(&format!("{base}/id/{k}"), HashMap::new()).unwrap();
                let result = reg.wait(Some(id)).unwrap().unwrap();
                assert_eq!(result.body(), Some(format!("id-{k}").as_bytes()));
            });
        }
    });
    assert!(reg.is_empty());
}

#[test]
fn joined_id_cannot_be_waited_again() {
    let base = common::post_server::start();
    let reg = HandleRegistry::default();
    let id = reg.send(&format!("{base}/ok"), HashMap::new()).unwrap();

    let (body, status, code) = reg.wait(Some(id)).unwrap().unwrap().into_parts();
    assert_eq!(body.as_deref(), Some(&b"ok"[..]));
    assert_eq!(status, "OK");
    assert_eq!(code, 200);

    assert_eq!(reg.wait(Some(id)), Err(RegistryError::UnknownHandle(id)));
}

#[test]
fn join_all_collects_unwaited_transfers() {
    let base = common::post_server::start();
    let reg = HandleRegistry::default();
    reg.send(&format!("{base}/ok"), HashMap::new()).unwrap();
    reg.send(&format!("{base}/status/404"), HashMap::new()).unwrap();

    let results = reg.join_all();
    assert_eq!(results.len(), 2);
    let mut codes: Vec<u32> = results.iter().map(|(_, r)| r.http_code()).collect();
    codes.sort_unstable();
    assert_eq!(codes, vec![200, 404]);
    assert!(reg.is_empty());
}
