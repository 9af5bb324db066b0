//! Shared application state for the bot host.

use std::path::PathBuf;
use std::sync::Arc;

use tiergate_core::Result;

use crate::config::{BotConfig, PrefixSetting};
use crate::dispatch::Dispatcher;
use crate::obs::BotMetrics;
use crate::services::{CargoService, ModerationService, SetupService};
use crate::store::{ConfigStore, FileConfigStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: BotConfig,
    prefix: PrefixSetting,
    store: Arc<dyn ConfigStore>,
    dispatcher: Dispatcher,
    metrics: BotMetrics,
}

impl AppState {
    /// Build state over an explicit store and register the built-in commands.
    /// The prefix lives in memory only.
    pub fn new(cfg: BotConfig, store: Arc<dyn ConfigStore>) -> Self {
        let prefix = PrefixSetting::new(&cfg.bot.prefix);
        Self::with_prefix(cfg, store, prefix)
    }

    fn with_prefix(cfg: BotConfig, store: Arc<dyn ConfigStore>, prefix: PrefixSetting) -> Self {
        let dispatcher = Dispatcher::new();
        dispatcher.register(Arc::new(SetupService::new()));
        dispatcher.register(Arc::new(CargoService::new()));
        dispatcher.register(Arc::new(ModerationService::new()));
        tracing::debug!(commands = ?dispatcher.registered_commands(), "commands registered");

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                prefix,
                store,
                dispatcher,
                metrics: BotMetrics::default(),
            }),
        }
    }

    /// Build state backed by `FileConfigStore` at `bot.config_dir`, picking up
    /// a prefix saved to `bot.prefix_file` by an earlier run.
    pub async fn from_config(cfg: BotConfig) -> Result<Self> {
        let store = FileConfigStore::open(&cfg.bot.config_dir).await?;
        let prefix = match &cfg.bot.prefix_file {
            Some(file) => PrefixSetting::load(&cfg.bot.prefix, PathBuf::from(file)).await,
            None => PrefixSetting::new(&cfg.bot.prefix),
        };
        Ok(Self::with_prefix(cfg, Arc::new(store), prefix))
    }

    pub fn cfg(&self) -> &BotConfig {
        &self.inner.cfg
    }

    pub fn prefix(&self) -> &PrefixSetting {
        &self.inner.prefix
    }

    pub fn store(&self) -> &dyn ConfigStore {
        self.inner.store.as_ref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn metrics(&self) -> &BotMetrics {
        &self.inner.metrics
    }

    pub fn reply_ttl_ms(&self) -> u64 {
        self.inner.cfg.bot.response_time_ms
    }
}
