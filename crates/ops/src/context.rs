//! Operations context for dependency injection

use std::time::Duration;

use yedctl_config::Config;
use yedctl_errors::Error;
use yedctl_events::{EventEmitter, EventSender};
use yedctl_net::{NetClient, NetConfig};
use yedctl_store::BinaryCache;

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Network client
    pub net: NetClient,
    /// Versioned binary cache
    pub cache: BinaryCache,
    /// System configuration
    pub config: Config,
    /// Event sender for progress reporting
    pub tx: EventSender,
}

impl OpsCtx {
    /// Build a context from loaded configuration.
    ///
    /// The cache root comes from the config override when present, falling
    /// back to the per-user data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized or no cache
    /// root can be determined.
    pub fn new(config: Config, tx: EventSender) -> Result<Self, Error> {
        let net_config = NetConfig {
            timeout: Duration::from_secs(config.network.timeout),
            connect_timeout: Duration::from_secs(config.network.connect_timeout),
            ..NetConfig::default()
        };
        let net = NetClient::new(&net_config)?;

        let cache = match &config.binary.cache_dir {
            Some(root) => BinaryCache::new(root.clone()),
            None => BinaryCache::with_default_root()?,
        };

        Ok(Self {
            net,
            cache,
            config,
            tx,
        })
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}
