//! Shared test helpers: a loopback HTTP stub standing in for the Gemini API.
//!
//! Each accepted connection gets one canned response and is then closed.
//! Requests are captured so tests can assert on path, headers and body.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use zeytin_ai_lib::config::AppConfig;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    // Held open for the silent stub so connects succeed but nothing answers.
    _listener: Option<TcpListener>,
}

impl StubServer {
    /// Answer every request with `status` and `body`.
    pub fn respond(status: u16, body: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/v1beta", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let captured = requests.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                if let Some(request) = read_request(&mut stream) {
                    captured.lock().unwrap().push(request);
                }
                let reply = format!(
                    "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(reply.as_bytes());
                let _ = stream.flush();
            }
        });

        Self { base_url, requests, _listener: None }
    }

    /// Answer with a Gemini `generateContent` envelope wrapping `model_text`.
    pub fn gemini_text(model_text: &str) -> Self {
        Self::respond(200, gemini_envelope(model_text))
    }

    /// Accept connections but never reply.
    pub fn silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}/v1beta", listener.local_addr().unwrap());
        Self {
            base_url,
            requests: Arc::new(Mutex::new(Vec::new())),
            _listener: Some(listener),
        }
    }

    /// A base URL on which nothing listens.
    pub fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/v1beta", addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn config(&self) -> AppConfig {
        config_for(&self.base_url)
    }
}

pub fn config_for(base_url: &str) -> AppConfig {
    AppConfig {
        api_key: Some("test-key".to_string()),
        api_base: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
        ..AppConfig::default()
    }
}

pub fn gemini_envelope(model_text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [ { "text": model_text } ] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 1290, "candidatesTokenCount": 84 }
    })
    .to_string()
}

pub const HEALTHY_JSON: &str = r#"{"isOlivePlant":true,"isHealthy":true,"diseaseName":"Healthy","confidenceScore":92,"description":"Clean, vivid green leaf without spots.","treatmentSuggestions":[]}"#;

pub const NOT_OLIVE_JSON: &str = r#"{"isOlivePlant":false,"isHealthy":false,"diseaseName":"Healthy","confidenceScore":5,"description":"The image shows a car, not an olive plant.","treatmentSuggestions":[]}"#;

fn read_request(stream: &mut TcpStream) -> Option<CapturedRequest> {
    stream.set_read_timeout(Some(Duration::from_secs(5))).ok()?;
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(header_end + content_length);
    Some(CapturedRequest {
        request_line,
        headers,
        body: String::from_utf8_lossy(&buf[header_end..body_end]).to_string(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
