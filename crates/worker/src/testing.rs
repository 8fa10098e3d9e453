//! Test doubles for the storage and network seams.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lantern_core::{CacheDb, CacheStorage, Error, Network, Request, Response};
use tokio::sync::Notify;
use url::Url;

pub const ORIGIN: &str = "http://localhost:8080";

pub fn url(path: &str) -> Url {
    Url::parse(&format!("{ORIGIN}{path}")).unwrap()
}

pub fn manifest(paths: &[&str]) -> Vec<Request> {
    paths.iter().map(|path| Request::get(url(path))).collect()
}

/// In-process network that answers from a route table and counts calls.
///
/// Unknown paths answer 404; paths registered with `with_failure` fail at the
/// transport level.
#[derive(Default)]
pub struct FakeNetwork {
    pages: HashMap<String, String>,
    failures: HashSet<String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, path: &str, body: &str) -> Self {
        self.pages.insert(url(path).to_string(), body.to_string());
        self
    }

    pub fn with_failure(mut self, path: &str) -> Self {
        self.failures.insert(url(path).to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = request.url.to_string();
        self.seen.lock().unwrap().push(key.clone());

        if self.failures.contains(&key) {
            return Err(Error::Network(format!("connection refused: {key}")));
        }

        let (status, status_text, body) = match self.pages.get(&key) {
            Some(body) => (200, "OK", body.clone()),
            None => (404, "Not Found", String::new()),
        };

        Ok(Response {
            url: key,
            status,
            status_text: status_text.to_string(),
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: body.into_bytes(),
        })
    }
}

/// `CacheDb` wrapper whose deletes, enumeration or lookups can be made to fail.
///
/// Deletes can also be held: each one signals `started` and then waits for
/// `release` before touching the database.
pub struct FlakyStorage {
    pub inner: CacheDb,
    failing_deletes: HashSet<String>,
    failing_keys: bool,
    failing_match: bool,
    held_deletes: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FlakyStorage {
    pub fn new(inner: CacheDb) -> Self {
        Self {
            inner,
            failing_deletes: HashSet::new(),
            failing_keys: false,
            failing_match: false,
            held_deletes: None,
        }
    }

    pub fn fail_delete(mut self, name: &str) -> Self {
        self.failing_deletes.insert(name.to_string());
        self
    }

    pub fn fail_keys(mut self) -> Self {
        self.failing_keys = true;
        self
    }

    pub fn fail_match(mut self) -> Self {
        self.failing_match = true;
        self
    }

    pub fn hold_deletes(mut self, started: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.held_deletes = Some((started, release));
        self
    }
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, name: &str) -> Result<bool, Error> {
        self.inner.open(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        if self.failing_keys {
            return Err(Error::InvalidState("storage unavailable".into()));
        }
        self.inner.keys().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        if let Some((started, release)) = &self.held_deletes {
            started.notify_one();
            release.notified().await;
        }
        if self.failing_deletes.contains(name) {
            return Err(Error::InvalidState(format!("{name} is locked")));
        }
        self.inner.delete(name).await
    }

    async fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), Error> {
        self.inner.put_all(name, entries).await
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        if self.failing_match {
            return Err(Error::InvalidState("storage unavailable".into()));
        }
        self.inner.match_request(request).await
    }

    async fn match_in(&self, name: &str, request: &Request) -> Result<Option<Response>, Error> {
        self.inner.match_in(name, request).await
    }

    async fn requests(&self, name: &str) -> Result<Vec<Request>, Error> {
        self.inner.requests(name).await
    }
}
