//! Fetch phase: cache-first interception with network fallback.
//!
//! The cache lookup always settles before any network attempt. A miss
//! issues exactly one live request and its result, error included, goes back
//! to the caller unchanged. Nothing is written back on a miss.

use lantern_core::{CacheStorage, Error, Network, Request, Response};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where an intercepted response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Network,
}

/// A response produced for an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub response: Response,
    pub source: ResponseSource,
}

impl Served {
    pub fn from_cache(response: Response) -> Self {
        Self { response, source: ResponseSource::Cache }
    }

    pub fn from_network(response: Response) -> Self {
        Self { response, source: ResponseSource::Network }
    }
}

/// Answer `request` from any bucket, or fall through to the network.
///
/// # Errors
///
/// A storage failure during lookup is returned as-is without touching the
/// network. A network failure after a miss is returned as-is.
pub async fn intercept<S, N>(storage: &S, network: &N, request: &Request) -> Result<Served, Error>
where
    S: CacheStorage + ?Sized,
    N: Network + ?Sized,
{
    tracing::debug!(method = %request.method, url = %request.url, "fetch request");

    if let Some(response) = storage.match_request(request).await? {
        tracing::debug!(url = %request.url, "responding with cache");
        return Ok(Served::from_cache(response));
    }

    tracing::debug!(url = %request.url, "not cached, fetching");
    network.fetch(request).await.map(Served::from_network)
}
