// @file: market_adapter/src/tests/mock_server.rs
// @description: Minimal in-process HTTP responder that records every request it receives.
// @author: LAS.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use crate::connectors::binance::binance_rest::{BinanceCredentials, BinanceHttpClient, BinanceHttpClientConfig};
use crate::core::interfaces::Clock;
use crate::utils::clock::TestClock;

//
// TYPE DEFINITIONS
//

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub raw_query: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

pub type Responder = Arc<dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync>;

pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}


impl MockServer {
    //
    // CONSTRUCTION
    //

    pub async fn start(responder: Responder) -> Self {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                handle_connection(stream, Arc::clone(&responder), Arc::clone(&recorded)).await;
            }
        });

        Self { base_url: format!("http://{}", addr), requests, handle }
    }

    /// Answers every request with the same status and body.
    pub async fn fixed(status: u16, body: &str) -> Self {
        let body: String = body.to_string();
        Self::start(Arc::new(move |_: &RecordedRequest| (status, body.clone()))).await
    }

    /// Answers with `responses` in order; the last one repeats once exhausted.
    pub async fn sequence(responses: Vec<(u16, String)>) -> Self {
        let counter: AtomicUsize = AtomicUsize::new(0);
        Self::start(Arc::new(move |_: &RecordedRequest| {
            let idx: usize = counter.fetch_add(1, Ordering::SeqCst).min(responses.len() - 1);
            responses[idx].clone()
        }))
        .await
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }


    //
    // CLIENT HELPERS
    //

    pub fn client(&self, credentials: Option<BinanceCredentials>) -> Arc<BinanceHttpClient> {
        self.client_with_clock(credentials, Arc::new(TestClock::new(1_700_000_000_000_000_000)))
    }

    pub fn client_with_clock(
        &self,
        credentials: Option<BinanceCredentials>,
        clock: Arc<dyn Clock>,
    ) -> Arc<BinanceHttpClient> {
        let mut config = BinanceHttpClientConfig::new(self.base_url.clone());
        config.credentials = credentials;
        Arc::new(BinanceHttpClient::new(config, clock).expect("mock client"))
    }
}

pub fn test_credentials() -> BinanceCredentials {
    BinanceCredentials::new("test-key", "test-secret")
}

async fn handle_connection(
    mut stream: TcpStream,
    responder: Responder,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    // #1. Read the request head (bodies are never sent by the client under test)
    let mut buffer: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n: usize = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buffer.extend_from_slice(&chunk[..n]);
        if buffer.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    // #2. Parse
    let head: String = String::from_utf8_lossy(&buffer).to_string();
    let mut lines = head.split("\r\n");
    let request_line: &str = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method: String = parts.next().unwrap_or_default().to_string();
    let target: &str = parts.next().unwrap_or_default();
    let (path, raw_query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), q.to_string()),
        None => (target.to_string(), String::new()),
    };

    let headers: HashMap<String, String> = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let request = RecordedRequest {
        method,
        path,
        query: url::form_urlencoded::parse(raw_query.as_bytes()).into_owned().collect(),
        raw_query,
        headers,
    };

    // #3. Respond
    let (status, body) = responder(&request);
    recorded.lock().await.push(request);

    let response: String = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
