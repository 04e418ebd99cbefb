use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};

/// One scripted exchange. `target` is the request path including its query string.
#[derive(Debug, Clone)]
pub struct ExpectedRequest {
    pub method: &'static str,
    pub target: String,
    pub response_status: u16,
    pub response_body: String,
}

impl ExpectedRequest {
    pub fn get_json(
        target: impl Into<String>,
        response_status: u16,
        response_body: impl Into<String>,
    ) -> Self {
        Self {
            method: "GET",
            target: target.into(),
            response_status,
            response_body: response_body.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

pub struct MockHttpServer {
    base_url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
    join: Option<JoinHandle<Result<()>>>,
}

impl MockHttpServer {
    pub fn start(expected: Vec<ExpectedRequest>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").context("bind mock server")?;
        listener
            .set_nonblocking(true)
            .context("set_nonblocking mock server")?;
        let addr = listener.local_addr().context("mock server local_addr")?;
        let base_url = format!("http://{addr}");

        let received = Arc::new(Mutex::new(Vec::new()));
        let received_for_thread = Arc::clone(&received);
        let mut queue = VecDeque::from(expected);

        let join = thread::spawn(move || -> Result<()> {
            let deadline = Instant::now() + Duration::from_secs(15);

            while let Some(expected_item) = queue.front().cloned() {
                if Instant::now() > deadline {
                    bail!("mock server timed out waiting for {}", expected_item.target);
                }

                let stream = match listener.accept() {
                    Ok((stream, _)) => stream,
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                };
                queue.pop_front();

                let (method, target, stream) = read_request_line(stream)?;
                if method != expected_item.method {
                    bail!(
                        "unexpected method: expected {}, got {method}",
                        expected_item.method
                    );
                }
                if target != expected_item.target {
                    bail!(
                        "unexpected target: expected {}, got {target}",
                        expected_item.target
                    );
                }

                let (path, query) = match target.split_once('?') {
                    Some((path, query)) => (path.to_string(), Some(query.to_string())),
                    None => (target.clone(), None),
                };
                received_for_thread
                    .lock()
                    .map_err(|_| anyhow::anyhow!("received list poisoned"))?
                    .push(ReceivedRequest {
                        method,
                        path,
                        query,
                    });

                write_json_response(
                    stream,
                    expected_item.response_status,
                    &expected_item.response_body,
                )?;
            }

            Ok(())
        });

        Ok(Self {
            base_url,
            received,
            join: Some(join),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn finish(mut self) -> Result<Vec<ReceivedRequest>> {
        let join = self
            .join
            .take()
            .ok_or_else(|| anyhow::anyhow!("mock server join handle missing"))?;
        join.join()
            .map_err(|_| anyhow::anyhow!("mock server panicked"))??;
        let received = self
            .received
            .lock()
            .map_err(|_| anyhow::anyhow!("received list poisoned"))?
            .clone();
        Ok(received)
    }
}

// GET requests only: read up to the end of the headers and keep the request line.
fn read_request_line(mut stream: TcpStream) -> Result<(String, String, TcpStream)> {
    stream
        .set_nonblocking(false)
        .context("set blocking on accepted stream")?;
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .context("set read timeout")?;

    let mut buffer = Vec::new();
    let mut temp = [0_u8; 1024];
    while find_subslice(&buffer, b"\r\n\r\n").is_none() {
        let read = stream.read(&mut temp).context("read request headers")?;
        if read == 0 {
            bail!("unexpected EOF while reading headers");
        }
        buffer.extend_from_slice(&temp[..read]);
    }

    let header_text = String::from_utf8_lossy(&buffer);
    let request_line = header_text
        .split("\r\n")
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing request line"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing request method"))?
        .to_string();
    let target = parts
        .next()
        .ok_or_else(|| anyhow::anyhow!("missing request target"))?
        .to_string();
    Ok((method, target, stream))
}

fn write_json_response(mut stream: TcpStream, status: u16, body: &str) -> Result<()> {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };

    let response = format!(
        "HTTP/1.1 {status} {status_text}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(response.as_bytes())
        .context("write response")?;
    stream.flush().context("flush response")?;
    Ok(())
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
