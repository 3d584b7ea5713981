//! A throwaway content API on a loopback port, answering the two queries
//! the site makes: the full post list and the slug filter.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};

pub struct StubCms {
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl StubCms {
    /// Requests answered so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `records` (the `data` array) until the test process exits.
pub fn serve(records: Value) -> StubCms {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            counter.fetch_add(1, Ordering::SeqCst);
            respond(&mut stream, &records);
        }
    });

    StubCms {
        base: format!("http://{}", addr),
        hits,
    }
}

fn respond(stream: &mut TcpStream, records: &Value) {
    let Ok(clone) = stream.try_clone() else { return };
    let mut reader = BufReader::new(clone);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" => break,
            Ok(_) => {}
        }
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let (status, body) = if path == "/api/posts" {
        let slug = url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "filters[slug][$eq]")
            .map(|(_, v)| v.into_owned());
        let data: Vec<Value> = records
            .as_array()
            .into_iter()
            .flatten()
            .filter(|r| match slug {
                Some(ref s) => record_slug(r) == Some(s.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        ("200 OK", json!({ "data": data, "meta": {} }).to_string())
    } else {
        ("404 Not Found", json!({ "error": "not found" }).to_string())
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
         Connection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn record_slug(record: &Value) -> Option<&str> {
    record["slug"]
        .as_str()
        .or_else(|| record["attributes"]["slug"].as_str())
}

/// Two posts: a flat record with code and a nested one with an image.
pub fn sample_posts() -> Value {
    json!([
        {
            "id": 1,
            "title": "Hello World",
            "slug": "hello-world",
            "author": "Ethan",
            "publishDate": "2024-01-01",
            "content": "# Hello\n\n\
                        First post, see [the repo](https://github.com/frogtheastronaut).\n\n\
                        ```rust\nfn main() {}\n```\n"
        },
        {
            "id": 2,
            "attributes": {
                "title": "Moose OS <notes>",
                "slug": "moose-os",
                "author": "Ethan",
                "publishDate": "2024-03-15T10:00:00.000Z",
                "content": "Booting.\n\n![boot screen](/boot.png)\n"
            }
        }
    ])
}
