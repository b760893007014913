//! Global configuration store
//!
//! Holds the process-wide [`GlobalConfig`] as an immutable snapshot. Each
//! request takes one snapshot when it starts, so a concurrent `configure`
//! never changes a request that is already running.

use std::sync::Arc;

use courier_domain::{ConfigError, GlobalConfig};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

static GLOBAL_STORE: Lazy<Arc<ConfigStore>> = Lazy::new(|| Arc::new(ConfigStore::default()));

/// Swappable holder for the active [`GlobalConfig`].
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Arc<GlobalConfig>>,
}

impl ConfigStore {
    pub fn new(config: GlobalConfig) -> Self {
        Self { current: RwLock::new(Arc::new(config)) }
    }

    /// The process-wide store used by [`crate::Client::new`].
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_STORE)
    }

    /// Replace the whole configuration.
    pub fn configure(&self, config: GlobalConfig) {
        info!(
            base_url = config.base_url.as_deref().unwrap_or("<none>"),
            headers = config.headers.len(),
            retry = config.retry.is_some(),
            timeout_ms = config.timeout_ms,
            "Global configuration replaced"
        );
        *self.current.write() = Arc::new(config);
    }

    /// Validate, then replace the whole configuration.
    pub fn try_configure(&self, config: GlobalConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.configure(config);
        Ok(())
    }

    /// Copy the current configuration, apply `change`, and install the
    /// result.
    pub fn update(&self, change: impl FnOnce(&mut GlobalConfig)) {
        let mut guard = self.current.write();
        let mut next = GlobalConfig::clone(&guard);
        change(&mut next);
        *guard = Arc::new(next);
        debug!("Global configuration updated");
    }

    pub fn snapshot(&self) -> Arc<GlobalConfig> {
        Arc::clone(&self.current.read())
    }

    /// Restore the defaults.
    pub fn reset(&self) {
        self.configure(GlobalConfig::default());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use courier_domain::RetryPolicy;

    use super::*;

    #[test]
    fn configure_replaces_wholesale() {
        let store = ConfigStore::new(
            GlobalConfig::new().with_base_url("https://a.test").with_timeout(Duration::from_secs(1)),
        );
        store.configure(GlobalConfig::new().with_header("X-Only", "1").unwrap());

        let snapshot = store.snapshot();
        assert!(snapshot.base_url.is_none());
        assert!(snapshot.timeout_ms.is_none());
        assert_eq!(snapshot.headers.get("x-only"), Some("1"));
    }

    #[test]
    fn snapshots_are_isolated_from_later_changes() {
        let store = ConfigStore::new(GlobalConfig::new().with_base_url("https://before.test"));
        let before = store.snapshot();

        store.configure(GlobalConfig::new().with_base_url("https://after.test"));

        assert_eq!(before.base_url.as_deref(), Some("https://before.test"));
        assert_eq!(store.snapshot().base_url.as_deref(), Some("https://after.test"));
    }

    #[test]
    fn update_keeps_other_fields() {
        let store = ConfigStore::new(GlobalConfig::new().with_base_url("https://a.test"));
        store.update(|config| config.retry = Some(RetryPolicy::new(4)));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.base_url.as_deref(), Some("https://a.test"));
        assert_eq!(snapshot.retry.as_ref().map(|retry| retry.attempts), Some(4));
    }

    #[test]
    fn reset_restores_defaults() {
        let store = ConfigStore::new(GlobalConfig::new().with_base_url("https://a.test"));
        store.reset();
        assert!(store.snapshot().base_url.is_none());
    }

    #[test]
    fn try_configure_rejects_invalid_config() {
        let store = ConfigStore::default();
        let invalid = GlobalConfig::new().with_retry(RetryPolicy { attempts: 0, ..RetryPolicy::default() });

        assert!(store.try_configure(invalid).is_err());
        assert!(store.snapshot().retry.is_none());
    }

    #[test]
    fn global_store_is_shared() {
        assert!(Arc::ptr_eq(&ConfigStore::global(), &ConfigStore::global()));
    }
}
