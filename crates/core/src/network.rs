//! Network seam.

use async_trait::async_trait;

use crate::{Error, Request, Response};

/// Issues live requests on behalf of the cache agent.
///
/// Any HTTP status is a successful [`Response`]; only transport failures
/// are errors, reported as [`Error::Network`].
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}
