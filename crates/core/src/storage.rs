//! Durable storage seam.
//!
//! The cache agent never touches SQLite directly; it goes through
//! [`CacheStorage`] so tests and alternative hosts can supply their own.

use async_trait::async_trait;

use crate::{CacheDb, Error, Request, Response};

/// Named-bucket cache storage.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Open a bucket, creating it if absent. Returns true if it was created.
    async fn open(&self, name: &str) -> Result<bool, Error>;

    /// Every bucket name, in creation order.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a bucket and its entries. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    /// Store all entries atomically.
    async fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), Error>;

    /// First match for `request` across all buckets.
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error>;

    /// Match for `request` within one bucket.
    async fn match_in(&self, name: &str, request: &Request) -> Result<Option<Response>, Error>;

    /// Requests stored in one bucket.
    async fn requests(&self, name: &str) -> Result<Vec<Request>, Error>;
}

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open(&self, name: &str) -> Result<bool, Error> {
        self.open_bucket(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.bucket_names().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        self.delete_bucket(name).await
    }

    async fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), Error> {
        self.put_entries(name, entries).await
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        self.match_any(request).await
    }

    async fn match_in(&self, name: &str, request: &Request) -> Result<Option<Response>, Error> {
        self.match_in_bucket(name, request).await
    }

    async fn requests(&self, name: &str) -> Result<Vec<Request>, Error> {
        self.bucket_requests(name).await
    }
}
