//! Bulk push against a throwaway local HTTP server.

use photodex::bulk::push;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

struct Received {
    request_line: String,
    content_type: Option<String>,
    body: Vec<u8>,
}

/// Serve `requests` connections, answering each with `status`, and return what was received.
fn serve(status: u16, requests: usize) -> (String, JoinHandle<Vec<Received>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut received = Vec::new();
        for _ in 0..requests {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            let mut content_type = None;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    match name.to_ascii_lowercase().as_str() {
                        "content-length" => content_length = value.trim().parse().unwrap(),
                        "content-type" => content_type = Some(value.trim().to_string()),
                        _ => {}
                    }
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}",
                status
            );
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            received.push(Received {
                request_line: request_line.trim_end().to_string(),
                content_type,
                body,
            });
        }
        received
    });
    (base, handle)
}

const BODY: &[u8] = b"{\"index\":{}}\n{\"a\":1}\n{\"index\":{}}\n{\"a\":2}\n{\"index\":{}}\n{\"a\":3}\n";

#[test]
fn test_push_posts_ndjson_to_bulk_endpoint() {
    let (base, server) = serve(200, 1);
    push(&base, BODY, 0).unwrap();
    let received = server.join().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].request_line, "POST /_bulk HTTP/1.1");
    assert_eq!(
        received[0].content_type.as_deref(),
        Some("application/x-ndjson")
    );
    assert_eq!(received[0].body, BODY);
}

#[test]
fn test_push_non_2xx_is_error() {
    let (base, server) = serve(500, 1);
    let err = push(&base, BODY, 0).unwrap_err();
    assert!(err.to_string().contains("500"), "{err:#}");
    server.join().unwrap();
}

#[test]
fn test_push_chunks_by_bulk_size() {
    let (base, server) = serve(200, 2);
    push(&base, BODY, 2).unwrap();
    let received = server.join().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].body.iter().filter(|b| **b == b'\n').count(), 4);
    assert_eq!(received[1].body.iter().filter(|b| **b == b'\n').count(), 2);
}

#[test]
fn test_push_empty_body_sends_nothing() {
    // Nothing listens here; an attempted POST would fail.
    push("http://127.0.0.1:9", b"", 0).unwrap();
}

#[test]
fn test_push_unreachable_backend_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let err = push(&base, BODY, 0).unwrap_err();
    assert!(err.to_string().contains("pushing"), "{err:#}");
}
