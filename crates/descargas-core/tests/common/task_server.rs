//! Minimal HTTP/1.1 backend for integration tests.
//!
//! Answers `POST /descargas` with a fixed reply, `GET /tareas/{id}` with the
//! next scripted reply (404 once the script is exhausted), and any other GET
//! with a registered file body. Every request is recorded.

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string().into_bytes(),
            headers: vec![("Content-Type".into(), "application/json".into())],
        }
    }

    pub fn file(body: &[u8], disposition: Option<&str>) -> Self {
        let mut headers = vec![("Content-Type".into(), "application/octet-stream".into())];
        if let Some(d) = disposition {
            headers.push(("Content-Disposition".into(), d.into()));
        }
        Self {
            status: 200,
            body: body.to_vec(),
            headers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct Script {
    create: Option<Reply>,
    statuses: VecDeque<Reply>,
    files: HashMap<String, Reply>,
    log: Vec<Recorded>,
}

#[derive(Clone)]
pub struct TaskServer {
    pub base_url: String,
    script: Arc<Mutex<Script>>,
}

impl TaskServer {
    /// Starts the server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let script = Arc::new(Mutex::new(Script::default()));
        let shared = Arc::clone(&script);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let script = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &script));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}/", port),
            script,
        }
    }

    pub fn on_create(&self, reply: Reply) -> &Self {
        self.script.lock().unwrap().create = Some(reply);
        self
    }

    pub fn on_status(&self, reply: Reply) -> &Self {
        self.script.lock().unwrap().statuses.push_back(reply);
        self
    }

    pub fn serve_file(&self, path: &str, reply: Reply) -> &Self {
        self.script.lock().unwrap().files.insert(path.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.lock().unwrap().log.clone()
    }

    pub fn count(&self, method: &str, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .count()
    }
}

fn handle(mut stream: TcpStream, script: &Mutex<Script>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    let reply = {
        let mut script = script.lock().unwrap();
        script.log.push(request.clone());
        match (request.method.as_str(), request.path.as_str()) {
            ("POST", "/descargas") => script
                .create
                .clone()
                .unwrap_or_else(|| Reply::json(500, serde_json::json!({"detail": "no script"}))),
            ("GET", p) if p.starts_with("/tareas/") => script
                .statuses
                .pop_front()
                .unwrap_or_else(|| Reply::json(404, serde_json::json!({"detail": "unknown"}))),
            ("GET", p) => script
                .files
                .get(p)
                .cloned()
                .unwrap_or_else(|| Reply::json(404, serde_json::json!({"detail": "not found"}))),
            _ => Reply::json(405, serde_json::json!({})),
        }
    };

    let mut head = format!(
        "HTTP/1.1 {} X\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.body.len()
    );
    for (name, value) in &reply.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&buf[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();

    let mut content_length = 0usize;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Recorded {
        method,
        path,
        authorization,
        body,
    })
}
