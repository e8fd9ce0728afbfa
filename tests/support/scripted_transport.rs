// ABOUTME: Transport double replaying a scripted sequence of HTTP responses.
// ABOUTME: Records every request so tests can assert on verbs, URIs, and bodies.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use gantry::management::{HttpResponse, Transport, TransportError};
use parking_lot::Mutex;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub uri: String,
    pub body: Option<String>,
}

enum ScriptedReply {
    Response(HttpResponse),
    ConnectionError(String),
}

/// Shared view of the requests a [`ScriptedTransport`] has served, usable
/// after the transport itself moves into the client under test.
#[derive(Clone)]
pub struct RequestLog(Arc<Mutex<Vec<RecordedRequest>>>);

impl RequestLog {
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn all(&self) -> Vec<RecordedRequest> {
        self.0.lock().clone()
    }
}

pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedReply>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        ScriptedTransport {
            script: Mutex::new(VecDeque::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, status: u16, body: &str, request_id: Option<&str>) -> Self {
        self.script
            .lock()
            .push_back(ScriptedReply::Response(HttpResponse {
                status,
                body: body.to_string(),
                request_id: request_id.map(str::to_string),
            }));
        self
    }

    pub fn with_connection_error(self, message: &str) -> Self {
        self.script
            .lock()
            .push_back(ScriptedReply::ConnectionError(message.to_string()));
        self
    }

    pub fn request_log(&self) -> RequestLog {
        RequestLog(Arc::clone(&self.requests))
    }

    fn reply(
        &self,
        method: &'static str,
        uri: &str,
        body: Option<&str>,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(RecordedRequest {
            method,
            uri: uri.to_string(),
            body: body.map(str::to_string),
        });

        let next = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply left for {method} {uri}"));
        match next {
            ScriptedReply::Response(response) => Ok(response),
            ScriptedReply::ConnectionError(message) => Err(TransportError::RequestFailed {
                uri: uri.to_string(),
                message,
            }),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, uri: &str) -> Result<HttpResponse, TransportError> {
        self.reply("GET", uri, None)
    }

    async fn post(&self, uri: &str, body: &str) -> Result<HttpResponse, TransportError> {
        self.reply("POST", uri, Some(body))
    }

    async fn delete(&self, uri: &str) -> Result<HttpResponse, TransportError> {
        self.reply("DELETE", uri, None)
    }
}
