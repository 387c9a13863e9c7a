//! Canned portal responses for unit tests.

use async_trait::async_trait;
use skas_core::{HttpRequest, HttpResponse, HttpTransport, TransportError, TransportResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Replies keyed by URL (query ignored). The last queued reply for a URL
/// repeats once the others are used up.
#[derive(Default)]
pub(crate) struct StubPortal {
    replies: Mutex<HashMap<String, VecDeque<String>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl StubPortal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, url: &str, body: &str) -> Arc<Self> {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(body.to_string());
        Arc::clone(self)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| strip_query(&r.url) == url)
            .collect()
    }
}

fn strip_query(url: &str) -> &str {
    url.split_once('?').map(|(u, _)| u).unwrap_or(url)
}

#[async_trait]
impl HttpTransport for StubPortal {
    async fn send(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let url = strip_query(&request.url).to_string();
        self.sent.lock().unwrap().push(request);

        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(&url).ok_or_else(|| TransportError::Request {
            url: url.clone(),
            reason: "connection refused".to_string(),
        })?;
        let body = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };
        Ok(HttpResponse::new(200, body))
    }
}
