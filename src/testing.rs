//! In-memory transport that replays canned responses and records what was sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;

use crate::config::{ConnectionSettings, Scheme};
use crate::models::Result;
use crate::session::Session;
use crate::transport::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next unanswered request.
    pub(crate) fn respond(&self, status: u16, body: &str) -> &Self {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.script.lock().unwrap().responses.push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub(crate) fn clear_requests(&self) {
        self.script.lock().unwrap().requests.clear();
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = {
            let mut script = self.script.lock().unwrap();
            let response = script.responses.pop_front().unwrap_or_else(|| {
                panic!("no scripted response for {} {}", request.method, request.url)
            });
            script.requests.push(request);
            response
        };
        Ok(response)
    }
}

pub(crate) fn settings() -> ConnectionSettings {
    ConnectionSettings {
        scheme: Scheme::Http,
        host: "db2.test".into(),
        rest_port: 50050,
        database: "SAMPLE".into(),
        username: "db2inst1".into(),
        password: "secret".into(),
        ..Default::default()
    }
}

/// A session holding token `tok`, with the auth exchange already cleared from the log.
pub(crate) async fn session(transport: &ScriptedTransport) -> Session<ScriptedTransport> {
    transport.respond(200, r#"{"token":"tok"}"#);
    let session = Session::authenticate_with(settings(), transport.clone())
        .await
        .expect("scripted authentication");
    transport.clear_requests();
    session
}
