//! Agent construction from configuration.

use lantern_client::{HttpNetwork, NetworkConfig};
use lantern_core::{AppConfig, CacheDb};
use lantern_worker::{AgentSettings, CacheAgent};

use crate::error::HostError;

/// The agent as the host runs it: SQLite buckets, live HTTP.
pub type Agent = CacheAgent<CacheDb, HttpNetwork>;

/// Open storage, build the transport and assemble an agent in the `Parsed` phase.
pub async fn build(config: &AppConfig) -> Result<Agent, HostError> {
    let settings = AgentSettings::try_from(config)?;
    let storage = CacheDb::open(&config.db_path).await?;
    let network = HttpNetwork::new(NetworkConfig::from(config))?;

    tracing::info!(
        bucket = %settings.bucket_name(),
        manifest = settings.manifest.len(),
        db_path = %config.db_path.display(),
        "cache agent ready"
    );

    Ok(CacheAgent::new(storage, network, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_worker::Phase;

    #[tokio::test]
    async fn test_build_from_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig { db_path: dir.path().join("cache.sqlite"), ..Default::default() };

        let agent = build(&config).await.unwrap();
        assert_eq!(agent.phase().await, Phase::Parsed);
        assert_eq!(agent.bucket_name(), "FoodFest-version_01");
        assert_eq!(agent.settings().manifest.len(), 11);
        assert!(dir.path().join("cache.sqlite").exists());
    }

    #[tokio::test]
    async fn test_build_rejects_bad_manifest() {
        let config = AppConfig { origin: "ftp://example.com/".into(), ..Default::default() };
        assert!(matches!(build(&config).await, Err(HostError::Config(_))));
    }
}
