//! Mock HTTP endpoint for exercising gateway and origin failure scenarios
//!
//! The server can:
//! - Script a sequence of responses consumed one per request
//! - Match responses against request-body substrings (for concurrent sends)
//! - Drop connections without responding to simulate network failures
//! - Record every request body for verification

// Not every test uses every helper.
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    sync::Mutex,
    time::timeout,
};

/// Canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200, "")
    }

    /// The gateway's happy path: 202 plus a message id body.
    pub fn accepted(message_id: &str) -> Self {
        Self::new(202, format!(r#"{{"message_id": "{message_id}"}}"#))
    }

    fn to_bytes(&self) -> Vec<u8> {
        let reason = match self.status {
            200 => "OK",
            202 => "Accepted",
            400 => "Bad Request",
            401 => "Unauthorized",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Response",
        };
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            reason,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// What to do with one incoming request.
#[derive(Debug, Clone)]
pub enum Behaviour {
    Respond(MockResponse),
    /// Close the connection without writing anything.
    Drop,
}

struct Script {
    sequence: VecDeque<Behaviour>,
    rules: Vec<(String, Behaviour)>,
    fallback: Behaviour,
}

impl Script {
    fn next_for(&mut self, body: &str) -> Behaviour {
        if let Some(behaviour) = self.sequence.pop_front() {
            return behaviour;
        }
        for (needle, behaviour) in &self.rules {
            if body.contains(needle.as_str()) {
                return behaviour.clone();
            }
        }
        self.fallback.clone()
    }
}

/// Mock HTTP server for testing
pub struct MockHttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
    shutdown: Arc<AtomicBool>,
}

impl MockHttpServer {
    #[must_use]
    pub fn builder() -> MockHttpServerBuilder {
        MockHttpServerBuilder::new()
    }

    /// URL clients should post to.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of requests accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// All request bodies received, in arrival order.
    pub async fn bodies(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    async fn handle_client(
        mut stream: TcpStream,
        script: Arc<Mutex<Script>>,
        requests: Arc<Mutex<Vec<String>>>,
        hits: Arc<AtomicUsize>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (reader, mut writer) = stream.split();
        let mut reader = BufReader::new(reader);

        let mut line = String::new();
        let mut content_length = 0usize;

        // Request line plus headers, up to the blank separator.
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Ok(());
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            if let Some(value) = trimmed
                .to_ascii_lowercase()
                .strip_prefix("content-length:")
                .map(str::trim)
            {
                content_length = value.parse().unwrap_or(0);
            }
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;
        let body = String::from_utf8_lossy(&body).into_owned();

        hits.fetch_add(1, Ordering::Relaxed);
        let behaviour = script.lock().await.next_for(&body);
        requests.lock().await.push(body);

        match behaviour {
            Behaviour::Respond(response) => {
                writer.write_all(&response.to_bytes()).await?;
                writer.flush().await?;
            }
            Behaviour::Drop => {}
        }

        Ok(())
    }
}

/// Builder for configuring a `MockHttpServer`
pub struct MockHttpServerBuilder {
    script: Script,
}

impl MockHttpServerBuilder {
    fn new() -> Self {
        Self {
            script: Script {
                sequence: VecDeque::new(),
                rules: Vec::new(),
                fallback: Behaviour::Respond(MockResponse::ok()),
            },
        }
    }

    /// Script responses consumed one per request, in order. Once the
    /// sequence is exhausted the rules and fallback take over.
    #[must_use]
    pub fn with_sequence(mut self, behaviours: Vec<Behaviour>) -> Self {
        self.script.sequence = behaviours.into();
        self
    }

    /// Respond with `behaviour` whenever the request body contains `needle`.
    /// Rules are checked in insertion order; use for concurrent requests
    /// where arrival order is not deterministic.
    #[must_use]
    pub fn with_rule(mut self, needle: impl Into<String>, behaviour: Behaviour) -> Self {
        self.script.rules.push((needle.into(), behaviour));
        self
    }

    /// Response used when neither the sequence nor a rule applies.
    #[must_use]
    pub fn with_fallback(mut self, behaviour: Behaviour) -> Self {
        self.script.fallback = behaviour;
        self
    }

    /// Build and start the server on an ephemeral port.
    pub async fn build(self) -> Result<MockHttpServer, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let script = Arc::new(Mutex::new(self.script));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));

        let script_clone = Arc::clone(&script);
        let requests_clone = Arc::clone(&requests);
        let hits_clone = Arc::clone(&hits);
        let shutdown_clone = Arc::clone(&shutdown);

        tokio::spawn(async move {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }

                // Accept with a timeout so the shutdown flag gets checked.
                let accepted = timeout(Duration::from_millis(100), listener.accept()).await;

                if let Ok(Ok((stream, _peer))) = accepted {
                    let script = Arc::clone(&script_clone);
                    let requests = Arc::clone(&requests_clone);
                    let hits = Arc::clone(&hits_clone);

                    tokio::spawn(async move {
                        if let Err(e) =
                            MockHttpServer::handle_client(stream, script, requests, hits).await
                        {
                            tracing::debug!("mock server client error: {}", e);
                        }
                    });
                }
            }
        });

        Ok(MockHttpServer {
            addr,
            requests,
            hits,
            shutdown,
        })
    }
}
