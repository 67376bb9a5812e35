//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes (any method; the response is chosen by path only):
//! - `/ok`              200, body `ok`
//! - `/method`          200, body is the request method
//! - `/header/<name>`   200, body is the value of request header `<name>`
//! - `/has-header/<name>` 200, body `present` or `absent`
//! - `/status/<code>`   `<code>`, body `status <code>`
//! - `/id/<k>`          200, body `id-<k>`, after a short k-dependent delay
//! - `/large/<n>`       200, `<n>` patterned bytes (see [`large_body`])
//! - `/truncated`       promises 100 bytes, sends 10, closes
//! - anything else      404

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// Body served by `/large/<n>`.
pub fn large_body(n: usize) -> Vec<u8> {
    (0u8..251).cycle().take(n).collect()
}

struct Request {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
}

fn handle(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let path = request.path.as_str();
    if path == "/truncated" {
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n0123456789",
        );
        return;
    }

    let (status, body): (String, Vec<u8>) = if path == "/ok" {
        ("200 OK".into(), b"ok".to_vec())
    } else if path == "/method" {
        ("200 OK".into(), request.method.clone().into_bytes())
    } else if let Some(name) = path.strip_prefix("/header/") {
        let value = request
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        ("200 OK".into(), value.into_bytes())
    } else if let Some(name) = path.strip_prefix("/has-header/") {
        let present = request.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name));
        let body: &[u8] = if present { b"present" } else { b"absent" };
        ("200 OK".into(), body.to_vec())
    } else if let Some(code) = path.strip_prefix("/status/") {
        let code: u16 = code.parse().unwrap_or(500);
        (format!("{} Status", code), format!("status {}", code).into_bytes())
    } else if let Some(k) = path.strip_prefix("/id/") {
        let k: u64 = k.parse().unwrap_or(0);
        thread::sleep(Duration::from_millis((k % 4) * 15));
        ("200 OK".into(), format!("id-{}", k).into_bytes())
    } else if let Some(n) = path.strip_prefix("/large/") {
        ("200 OK".into(), large_body(n.parse().unwrap_or(0)))
    } else {
        ("404 Not Found".into(), b"not found".to_vec())
    };

    let head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

/// Reads the request head plus any `Content-Length` body.
fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buf[..head_end]).ok()?;
    let mut lines = head.split("\r\n");
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut have = buf.len() - (head_end + 4);
    while have < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        have += n;
    }

    Some(Request {
        method,
        path,
        headers,
    })
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
