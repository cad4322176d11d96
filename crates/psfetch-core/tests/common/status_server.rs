//! Minimal HTTP/1.1 server for integration tests.
//!
//! Each path has a script of (status, body) replies consumed one per GET; the
//! last reply repeats once the script is down to one entry. Unknown paths get
//! 404. Every connection serves one request and is closed.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

type Script = Vec<(u16, Vec<u8>)>;

#[derive(Default)]
struct State {
    scripts: HashMap<String, Script>,
    trickle: HashMap<String, Duration>,
    hits: HashMap<String, usize>,
}

#[derive(Clone)]
pub struct StatusServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl StatusServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&accept_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// Script text replies for `path` (e.g. "/data/moves.json").
    pub fn route(&self, path: &str, replies: &[(u16, &str)]) {
        let script = replies
            .iter()
            .map(|(s, b)| (*s, b.as_bytes().to_vec()))
            .collect();
        self.set_script(path, script);
    }

    /// Always answer `path` with `status` and a binary body.
    pub fn route_bytes(&self, path: &str, status: u16, body: &[u8]) {
        self.set_script(path, vec![(status, body.to_vec())]);
    }

    /// Answer `path` with 200 and `body`, sending one byte after each `delay`.
    pub fn route_trickle(&self, path: &str, body: &[u8], delay: Duration) {
        self.set_script(path, vec![(200, body.to_vec())]);
        self.state
            .lock()
            .unwrap()
            .trickle
            .insert(path.to_string(), delay);
    }

    fn set_script(&self, path: &str, script: Script) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(path.to_string(), script);
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(path)
            .copied()
            .unwrap_or(0)
    }
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/gone", port)
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let (status, body, trickle) = {
        let mut state = state.lock().unwrap();
        *state.hits.entry(path.clone()).or_insert(0) += 1;
        let trickle = state.trickle.get(&path).copied();
        let (status, body) = match state.scripts.get_mut(&path) {
            Some(script) if script.len() > 1 => script.remove(0),
            Some(script) if !script.is_empty() => script[0].clone(),
            _ => (404, b"not found".to_vec()),
        };
        (status, body, trickle)
    };

    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    match trickle {
        None => {
            let _ = stream.write_all(&body);
        }
        Some(delay) => {
            let _ = stream.flush();
            for byte in body {
                thread::sleep(delay);
                if stream.write_all(&[byte]).is_err() {
                    break;
                }
                let _ = stream.flush();
            }
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        410 => "Gone",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
