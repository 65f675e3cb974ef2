#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// One-shot HTTP server: answers a single request with a fixed status and
/// body, and reports the request line it received.
pub struct OneShotServer {
    pub endpoint: String,
    pub request_line: Receiver<String>,
    handle: JoinHandle<()>,
}

impl OneShotServer {
    pub fn start(status: u16, reason: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::channel();

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            loop {
                let mut header = String::new();
                let read = reader.read_line(&mut header).expect("read header");
                if read == 0 || header == "\r\n" {
                    break;
                }
            }

            stream.write_all(response.as_bytes()).expect("write response");
            stream.flush().unwrap();
            let _ = tx.send(request_line.trim_end().to_string());
        });

        Self {
            endpoint: format!("http://127.0.0.1:{}/api/q", port),
            request_line: rx,
            handle,
        }
    }

    pub fn join(self) -> String {
        let line = self.request_line.recv().expect("request line");
        self.handle.join().expect("server thread");
        line
    }
}

/// An endpoint on a port nothing is listening on
pub fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/q", port)
}
