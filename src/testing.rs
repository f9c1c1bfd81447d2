//! Scripted local HTTP server for tests.
//!
//! Answers each incoming request with the next scripted [Reply] (one request per
//! connection), and hands back the recorded requests once every reply has been sent.
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;

use reqwest::{StatusCode, Url};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    /// Lowercased header names.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub enum Reply {
    Status(u16, String),
    /// Sent as is, for broken responses.
    Raw(Vec<u8>),
}

impl Reply {
    pub fn new(status: u16, body: &str) -> Self {
        Reply::Status(status, body.to_string())
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Reply::Status(status, body.to_string())
    }

    fn bytes(&self) -> Vec<u8> {
        match self {
            Reply::Status(status, body) => {
                let reason = StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown");
                format!(
                    "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                )
                .into_bytes()
            }
            Reply::Raw(raw) => raw.clone(),
        }
    }
}

pub struct Server {
    listener: TcpListener,
    url: Url,
}

impl Server {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        Self { listener, url }
    }

    /// Base url, ending with `/`.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Serve `replies` in order, in a background thread.
    pub fn serve(self, replies: Vec<Reply>) -> JoinHandle<Vec<Recorded>> {
        std::thread::spawn(move || {
            let mut recorded = Vec::with_capacity(replies.len());
            for reply in replies {
                let (mut stream, _) = self.listener.accept().unwrap();
                recorded.push(read_request(&mut stream));
                stream.write_all(&reply.bytes()).unwrap();
                stream.flush().unwrap();
            }
            recorded
        })
    }
}

fn read_request(stream: &mut TcpStream) -> Recorded {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();

    Recorded {
        method,
        path,
        headers,
        body,
    }
}
