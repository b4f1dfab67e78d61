//! In-memory transport used by unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Result, SmallcatError};
use crate::transport::{Response, Transport};

/// Serves canned responses keyed by URL and counts calls
///
/// Unknown URLs fail like a refused connection. A hanging transport never
/// completes any request.
#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: HashMap<String, Response>,
    hang: bool,
    gets: AtomicUsize,
    posts: AtomicUsize,
    bodies: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub(crate) fn page(self, url: &str, status: u16, body: &str) -> Self {
        self.raw_page(url, status, body.as_bytes().to_vec())
    }

    pub(crate) fn raw_page(mut self, url: &str, status: u16, body: Vec<u8>) -> Self {
        self.responses.insert(
            url.to_string(),
            Response {
                url: url.to_string(),
                status,
                location: None,
                body,
            },
        );
        self
    }

    pub(crate) fn redirect(mut self, url: &str, status: u16, location: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            Response {
                url: url.to_string(),
                status,
                location: Some(location.to_string()),
                body: Vec::new(),
            },
        );
        self
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub(crate) fn post_calls(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    pub(crate) fn posted_bodies(&self) -> Vec<String> {
        self.bodies.lock().map(|b| b.clone()).unwrap_or_default()
    }

    fn record(&self, body: String) {
        if let Ok(mut bodies) = self.bodies.lock() {
            bodies.push(body);
        }
    }

    async fn respond(&self, url: &str) -> Result<Response> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| SmallcatError::InvalidResponse(format!("connection refused: {}", url)))
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str) -> Result<Response> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.respond(url).await
    }

    async fn post_form(&self, url: &str, body: String) -> Result<Response> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        self.record(body);
        self.respond(url).await
    }
}
