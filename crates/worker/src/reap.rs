//! Activate phase: delete every bucket this application owns except the active one.
//!
//! A bucket is kept when its name lacks the application prefix (it belongs
//! to a co-hosted application) or equals the active bucket name. Everything
//! else carrying the prefix is a stale version and is deleted.

use futures_util::future::join_all;
use lantern_core::{CacheStorage, Error};
use schemars::JsonSchema;
use serde::Serialize;

/// A bucket that could not be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReapFailure {
    pub bucket: String,
    pub reason: String,
}

/// Outcome of one activation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReapReport {
    /// Buckets left in place.
    pub kept: Vec<String>,
    /// Buckets removed by this sweep.
    pub deleted: Vec<String>,
    /// Deletions that failed; activation still succeeds.
    pub failures: Vec<ReapFailure>,
}

impl ReapReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// True if `name` survives activation of `active` under `prefix`.
pub fn should_keep(name: &str, prefix: &str, active: &str) -> bool {
    !name.starts_with(prefix) || name == active
}

/// Delete every stale bucket and wait for all deletions to settle.
///
/// # Errors
///
/// Fails only if the bucket names cannot be enumerated. Individual deletion
/// failures are collected in [`ReapReport::failures`].
pub async fn reap<S>(storage: &S, prefix: &str, active: &str) -> Result<ReapReport, Error>
where
    S: CacheStorage + ?Sized,
{
    let names = storage.keys().await?;
    let (kept, doomed): (Vec<String>, Vec<String>) =
        names.into_iter().partition(|name| should_keep(name, prefix, active));

    let outcomes = join_all(doomed.into_iter().map(|name| async move {
        tracing::info!(bucket = %name, "deleting cache");
        let outcome = storage.delete(&name).await;
        (name, outcome)
    }))
    .await;

    let mut report = ReapReport { kept, ..Default::default() };
    for (name, outcome) in outcomes {
        match outcome {
            Ok(true) => report.deleted.push(name),
            Ok(false) => tracing::debug!(bucket = %name, "bucket already gone"),
            Err(e) => {
                tracing::warn!(bucket = %name, error = %e, "failed to delete cache");
                report.failures.push(ReapFailure { bucket: name, reason: e.to_string() });
            }
        }
    }

    Ok(report)
}
