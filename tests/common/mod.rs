#![allow(dead_code)]

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::Duration;
use tempfile::{NamedTempFile, TempPath};

pub fn create_file(contents: &str) -> TempPath {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file.into_temp_path()
}

/// What the echo server saw for one request.
pub struct Captured {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub struct EchoServer {
    pub port: u16,
    requests: Receiver<Captured>,
}

impl EchoServer {
    /// Answers every request with its own body, adding `extra_headers`
    /// (full header lines such as `"Set-Cookie: sid=abc"`) to the response.
    pub fn start(extra_headers: &[&str]) -> EchoServer {
        Self::spawn(extra_headers, None)
    }

    /// Advertises `advertised` body bytes but sends only `sent` before
    /// closing the connection.
    pub fn truncated(advertised: usize, sent: &[u8]) -> EchoServer {
        Self::spawn(&[], Some((advertised, sent.to_vec())))
    }

    fn spawn(extra_headers: &[&str], truncated: Option<(usize, Vec<u8>)>) -> EchoServer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let extra_headers: Vec<String> = extra_headers.iter().map(|h| h.to_string()).collect();
        let (sender, requests) = channel();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(_) => break,
                };
                let captured = match serve(stream, &extra_headers, truncated.as_ref()) {
                    Ok(captured) => captured,
                    // the client went away mid-request, wait for the next one
                    Err(_) => continue,
                };
                if sender.send(captured).is_err() {
                    break;
                }
            }
        });

        EchoServer { port, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub fn next_request(&self) -> Captured {
        self.requests
            .recv_timeout(Duration::from_secs(5))
            .expect("echo server saw a request")
    }
}

fn serve(
    mut stream: TcpStream,
    extra_headers: &[String],
    truncated: Option<&(usize, Vec<u8>)>,
) -> io::Result<Captured> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut headers = vec![];
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body)?;

    let (advertised, payload) = match truncated {
        Some((advertised, sent)) => (*advertised, sent.as_slice()),
        None => (body.len(), body.as_slice()),
    };
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n",
        advertised
    );
    for header in extra_headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    stream.write_all(response.as_bytes())?;
    stream.write_all(payload)?;
    stream.flush()?;

    Ok(Captured {
        request_line: request_line.trim_end().to_string(),
        headers,
        body,
    })
}
