//! Shared fakes for unit tests: a one-shot HTTP responder and scripted
//! implementations of the source and notifier traits.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, Notify};

use crate::error::MonitorError;
use crate::notify::{DispatchOutcome, Notifier, PushCredentials};
use crate::source::{SensorEndpoint, SensorSource};

/// A fixed HTTP response.
pub(crate) struct CannedResponse {
    status: u16,
    body: String,
}

impl CannedResponse {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

/// A server that answers exactly one request.
pub(crate) struct TestServer {
    addr: SocketAddr,
    request: oneshot::Receiver<String>,
}

impl TestServer {
    pub(crate) fn endpoint(&self) -> SensorEndpoint {
        SensorEndpoint::new("127.0.0.1", self.addr.port())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// The raw request the server received.
    pub(crate) async fn request(self) -> String {
        self.request.await.unwrap_or_default()
    }
}

pub(crate) async fn serve_once(response: CannedResponse) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };
        let request = read_request(&mut stream).await;

        let reason = if response.status == 200 { "OK" } else { "Error" };
        let reply = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response.status,
            reason,
            response.body.len(),
            response.body
        );
        let _ = stream.write_all(reply.as_bytes()).await;
        let _ = stream.shutdown().await;
        let _ = tx.send(request);
    });

    TestServer { addr, request: rx }
}

/// A server that accepts connections and never answers them.
pub(crate) async fn serve_silent() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    addr
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        if let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
            let content_length = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// A source that replays scripted results, then repeats `fallback`.
#[derive(Debug)]
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Result<Value, MonitorError>>>,
    fallback: Result<Value, MonitorError>,
    fetches: AtomicUsize,
    endpoints: Mutex<Vec<SensorEndpoint>>,
    /// When set, each fetch reports its start and waits to be released.
    gate: Option<(mpsc::UnboundedSender<usize>, Arc<Notify>)>,
}

impl ScriptedSource {
    pub(crate) fn new(fallback: Result<Value, MonitorError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            fetches: AtomicUsize::new(0),
            endpoints: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub(crate) fn then(self, result: Result<Value, MonitorError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub(crate) fn gated(mut self, started: mpsc::UnboundedSender<usize>, release: Arc<Notify>) -> Self {
        self.gate = Some((started, release));
        self
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn endpoints(&self) -> Vec<SensorEndpoint> {
        self.endpoints.lock().unwrap().clone()
    }
}

#[async_trait]
impl SensorSource for ScriptedSource {
    async fn fetch(&self, endpoint: &SensorEndpoint) -> Result<Value, MonitorError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        self.endpoints.lock().unwrap().push(endpoint.clone());

        if let Some((started, release)) = &self.gate {
            let _ = started.send(n);
            release.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    fn description(&self) -> &str {
        "scripted"
    }
}

/// A notifier that records every call and returns a fixed outcome.
#[derive(Debug)]
pub(crate) struct RecordingNotifier {
    outcome: DispatchOutcome,
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingNotifier {
    pub(crate) fn new(outcome: DispatchOutcome) -> Self {
        Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, _credentials: &PushCredentials, alerts: &[String]) -> DispatchOutcome {
        self.calls.lock().unwrap().push(alerts.to_vec());
        self.outcome.clone()
    }
}
