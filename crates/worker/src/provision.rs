//! Install phase: populate the active bucket from the manifest.

use futures_util::future::try_join_all;
use lantern_core::{CacheStorage, Error, Network, Request, Response};

/// Open (or create) `bucket` and store a response for every manifest request.
///
/// All requests are fetched concurrently. Any transport failure or non-2xx
/// status fails the whole operation and nothing is written. A bucket that
/// this call created is removed again on failure.
///
/// Returns the number of entries stored.
pub async fn provision<S, N>(storage: &S, network: &N, bucket: &str, manifest: &[Request]) -> Result<usize, Error>
where
    S: CacheStorage + ?Sized,
    N: Network + ?Sized,
{
    let created = storage.open(bucket).await?;
    tracing::info!(bucket, entries = manifest.len(), created, "installing cache");

    let result = fill(storage, network, bucket, manifest).await;

    if let Err(err) = &result {
        tracing::error!(bucket, error = %err, "install failed");
        if created {
            rollback(storage, bucket).await;
        }
    }

    result
}

async fn fill<S, N>(storage: &S, network: &N, bucket: &str, manifest: &[Request]) -> Result<usize, Error>
where
    S: CacheStorage + ?Sized,
    N: Network + ?Sized,
{
    let entries = try_join_all(manifest.iter().map(|request| fetch_entry(network, request))).await?;
    let stored = entries.len();

    storage
        .put_all(bucket, entries)
        .await
        .map_err(|e| Error::Provisioning { resource: bucket.to_string(), reason: e.to_string() })?;

    Ok(stored)
}

async fn fetch_entry<N>(network: &N, request: &Request) -> Result<(Request, Response), Error>
where
    N: Network + ?Sized,
{
    let response = network
        .fetch(request)
        .await
        .map_err(|e| Error::Provisioning { resource: request.url.to_string(), reason: e.to_string() })?;

    if !response.is_ok() {
        return Err(Error::Provisioning {
            resource: request.url.to_string(),
            reason: format!("status {} {}", response.status, response.status_text),
        });
    }

    Ok((request.clone(), response))
}

async fn rollback<S>(storage: &S, bucket: &str)
where
    S: CacheStorage + ?Sized,
{
    match storage.delete(bucket).await {
        Ok(_) => tracing::debug!(bucket, "removed incomplete bucket"),
        Err(e) => tracing::warn!(bucket, error = %e, "failed to remove incomplete bucket"),
    }
}
