//! Cache agent lifecycle.
//!
//! The host drives the agent through `install` → `activate`, then routes
//! every request through `handle_fetch`:
//!
//! ```text
//! Parsed ──install──▶ Installing ──ok──▶ Installed ──activate──▶ Activating ──▶ Activated
//!   ▲                     │
//!   └──── retry ◀── Redundant (install failed)
//! ```
//!
//! Activation holds the phase write lock for the whole sweep, so no request
//! is answered while stale buckets are being deleted. Until the agent is
//! activated it does not control requests and every fetch goes straight to
//! the network. The exception is `Redundant`: a failed install leaves any
//! earlier version's bucket in storage, and that bucket keeps serving.

use std::fmt;

use lantern_core::{AppConfig, CacheStorage, ConfigError, Error, Network, Request};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::intercept::{Served, intercept};
use crate::provision::provision;
use crate::reap::{ReapReport, reap};

/// Lifecycle phase of a [`CacheAgent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

/// What the agent provisions and how its buckets are named.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub prefix: String,
    pub version: String,
    pub manifest: Vec<Request>,
}

impl AgentSettings {
    /// Name of the active bucket.
    pub fn bucket_name(&self) -> String {
        format!("{}{}", self.prefix, self.version)
    }
}

impl TryFrom<&AppConfig> for AgentSettings {
    type Error = ConfigError;

    fn try_from(config: &AppConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            prefix: config.app_prefix.clone(),
            version: config.version.clone(),
            manifest: config.manifest_requests()?,
        })
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct InstallReport {
    pub bucket: String,
    pub stored: usize,
}

/// Result of running the whole lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct StartReport {
    pub install: InstallReport,
    pub activate: ReapReport,
}

/// The offline cache agent.
pub struct CacheAgent<S, N> {
    storage: S,
    network: N,
    settings: AgentSettings,
    phase: RwLock<Phase>,
}

impl<S, N> CacheAgent<S, N>
where
    S: CacheStorage,
    N: Network,
{
    pub fn new(storage: S, network: N, settings: AgentSettings) -> Self {
        Self { storage, network, settings, phase: RwLock::new(Phase::Parsed) }
    }

    pub async fn phase(&self) -> Phase {
        *self.phase.read().await
    }

    pub fn bucket_name(&self) -> String {
        self.settings.bucket_name()
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Provision the active bucket.
    ///
    /// Allowed from `Parsed`, or from `Redundant` to retry a failed install.
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` from any other phase; the provisioning error if
    /// any manifest entry fails, after which the agent is `Redundant`.
    pub async fn install(&self) -> Result<InstallReport, Error> {
        {
            let mut phase = self.phase.write().await;
            match *phase {
                Phase::Parsed | Phase::Redundant => *phase = Phase::Installing,
                other => return Err(Error::InvalidState(format!("cannot install while {other}"))),
            }
        }

        let bucket = self.bucket_name();
        let result = provision(&self.storage, &self.network, &bucket, &self.settings.manifest).await;

        let mut phase = self.phase.write().await;
        match result {
            Ok(stored) => {
                *phase = Phase::Installed;
                tracing::info!(bucket = %bucket, stored, "installed");
                Ok(InstallReport { bucket, stored })
            }
            Err(e) => {
                *phase = Phase::Redundant;
                Err(e)
            }
        }
    }

    /// Delete stale buckets and start controlling requests.
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` unless the agent is `Installed`. If bucket names
    /// cannot be enumerated the agent stays `Installed` and the error is
    /// returned; individual deletion failures are only reported.
    pub async fn activate(&self) -> Result<ReapReport, Error> {
        let mut phase = self.phase.write().await;
        if *phase != Phase::Installed {
            return Err(Error::InvalidState(format!("cannot activate while {}", *phase)));
        }
        *phase = Phase::Activating;

        let active = self.bucket_name();
        match reap(&self.storage, &self.settings.prefix, &active).await {
            Ok(report) => {
                *phase = Phase::Activated;
                tracing::info!(
                    bucket = %active,
                    deleted = report.deleted.len(),
                    failures = report.failures.len(),
                    "activated"
                );
                Ok(report)
            }
            Err(e) => {
                *phase = Phase::Installed;
                tracing::error!(error = %e, "activation failed");
                Err(e)
            }
        }
    }

    /// Install then activate.
    pub async fn start(&self) -> Result<StartReport, Error> {
        let install = self.install().await?;
        let activate = self.activate().await?;
        Ok(StartReport { install, activate })
    }

    /// Produce the response for an outgoing request.
    ///
    /// While activated this is cache-first interception. After a failed
    /// install the agent stays cache-first as long as a bucket carrying the
    /// prefix survives from an earlier install. In any other phase the
    /// request goes to the network without a cache lookup.
    pub async fn handle_fetch(&self, request: &Request) -> Result<Served, Error> {
        let phase = self.phase.read().await;
        let controlling = match *phase {
            Phase::Activated => true,
            Phase::Redundant => self.has_previous_version().await?,
            _ => false,
        };
        if controlling {
            return intercept(&self.storage, &self.network, request).await;
        }
        let current = *phase;
        drop(phase);

        tracing::debug!(phase = %current, url = %request.url, "not controlling, passing through");
        self.network.fetch(request).await.map(Served::from_network)
    }

    /// True if storage holds a bucket owned by this application.
    ///
    /// Provisioning is all-or-nothing and rolls back buckets it created, so
    /// any such bucket is a complete earlier install.
    async fn has_previous_version(&self) -> Result<bool, Error> {
        let names = self.storage.keys().await?;
        Ok(names.iter().any(|name| name.starts_with(&self.settings.prefix)))
    }
}
