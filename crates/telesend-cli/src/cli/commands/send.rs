//! `telesend send <url>...` – dispatch every POST at once, then join each.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use telesend_core::config::TelesendConfig;
use telesend_core::transfer::TransferOptions;
use telesend_core::{CompletionResult, HandleId, HandleRegistry};

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct Report<'a> {
    url: &'a str,
    ok: bool,
    http_code: u32,
    status: &'a str,
    body: Option<String>,
    /// `utf8` or `hex`; absent when there is no body.
    body_encoding: Option<&'static str>,
}

impl<'a> Report<'a> {
    fn new(url: &'a str, result: &'a CompletionResult) -> Self {
        let (body, body_encoding) = match result.body().map(encode_body) {
            Some((text, encoding)) => (Some(text), Some(encoding)),
            None => (None, None),
        };
        Self {
            url,
            ok: result.is_success(),
            http_code: result.http_code(),
            status: result.status_text().trim_end(),
            body,
            body_encoding,
        }
    }
}

/// Body as text when it is valid UTF-8, otherwise lowercase hex.
fn encode_body(body: &[u8]) -> (String, &'static str) {
    match std::str::from_utf8(body) {
        Ok(text) => (text.to_string(), "utf8"),
        Err(_) => (hex::encode(body), "hex"),
    }
}

pub async fn run_send(
    cfg: &TelesendConfig,
    urls: &[String],
    headers: &[(String, String)],
    json: bool,
) -> Result<()> {
    let registry = Arc::new(HandleRegistry::new(TransferOptions::from(cfg)));
    let headers: HashMap<String, String> = headers.iter().cloned().collect();

    let mut failed = 0usize;
    let mut pending: Vec<(&str, HandleId)> = Vec::with_capacity(urls.len());
    for url in urls {
        match registry.send(url, headers.clone()) {
            Ok(id) => {
                tracing::info!(%id, "dispatched");
                pending.push((url.as_str(), id));
            }
            Err(e) => {
                eprintln!("{url}: {e}");
                failed += 1;
            }
        }
    }

    failed += join_dispatched(&registry, pending, json).await;

    if failed > 0 {
        anyhow::bail!("{} of {} transfers failed", failed, urls.len());
    }
    Ok(())
}

/// Joins every dispatched transfer and prints its result. Returns the number
/// of failures. A join that errors is reported and counted; the remaining
/// transfers are still joined.
async fn join_dispatched(
    registry: &Arc<HandleRegistry>,
    pending: Vec<(&str, HandleId)>,
    json: bool,
) -> usize {
    let mut failed = 0usize;
    for (url, id) in pending {
        let outcome = match join_one(registry, id).await {
            Ok(result) => print_result(url, &result, json).map(|()| result.is_success()),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(true) => {}
            Ok(false) => failed += 1,
            Err(e) => {
                eprintln!("{url}: {e:#}");
                failed += 1;
            }
        }
    }

    // Anything a failed join task left behind.
    let leftover = registry.join_all();
    if !leftover.is_empty() {
        tracing::warn!(count = leftover.len(), "joined transfers left after join errors");
        failed += leftover.iter().filter(|(_, r)| !r.is_success()).count();
    }
    failed
}

async fn join_one(registry: &Arc<HandleRegistry>, id: HandleId) -> Result<CompletionResult> {
    let reg = Arc::clone(registry);
    tokio::task::spawn_blocking(move || reg.wait(Some(id)))
        .await
        .context("join task")??
        .with_context(|| format!("no result for handle {id}"))
}

fn print_result(url: &str, result: &CompletionResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&Report::new(url, result))?);
        return Ok(());
    }

    println!(
        "{url}: {} {}",
        result.http_code(),
        result.status_text().trim_end().replace('\n', " | ")
    );
    if let Some((body, encoding)) = result.body().map(encode_body) {
        if encoding != "utf8" {
            println!("[{encoding}]");
        }
        println!("{body}");
    }
    Ok(())
}
