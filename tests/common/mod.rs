//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::net::TcpListener;
use std::time::Duration;
use tts_smoke::SpeechClient;

pub const API_KEY: &str = "test-key";
pub const MODEL: &str = "index-tts2";
pub const SPEECH_PATH: &str = "/v1/audio/speech";
pub const MODELS_PATH: &str = "/v1/models";

/// Test fixture that manages a mock speech service
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub fn new() -> Self {
        let server = Server::new();
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server
    pub fn client(&self) -> SpeechClient {
        client_for(&self.base_url, Duration::from_secs(5))
    }

    /// Speech endpoint answering 200 with `audio` for a request whose body
    /// contains `input`
    pub fn mock_audio(&mut self, input: &str, audio: &[u8]) -> Mock {
        self.server
            .mock("POST", SPEECH_PATH)
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .match_body(Matcher::PartialJson(serde_json::json!({ "input": input })))
            .with_status(200)
            .with_header("content-type", "audio/wav")
            .with_body(audio)
            .create()
    }

    /// Speech endpoint answering `status` with a text body for `input`
    pub fn mock_speech_error(&mut self, input: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", SPEECH_PATH)
            .match_body(Matcher::PartialJson(serde_json::json!({ "input": input })))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create()
    }

    /// Model listing with the given ids
    pub fn mock_models(&mut self, ids: &[&str]) -> Mock {
        let data: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({ "id": id, "object": "model", "owned_by": "local" }))
            .collect();
        self.server
            .mock("GET", MODELS_PATH)
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "object": "list", "data": data }).to_string())
            .create()
    }
}

pub fn client_for(base_url: &str, timeout: Duration) -> SpeechClient {
    SpeechClient::builder()
        .base_url(base_url)
        .api_key(API_KEY)
        .model(MODEL)
        .timeout(timeout)
        .build()
        .expect("Failed to build client")
}

/// Base URL of a local port with nothing listening on it
pub fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

pub fn output_text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("report is utf-8")
}
