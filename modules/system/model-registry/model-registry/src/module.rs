//! Module declaration for the Model Registry module.

use std::sync::Arc;

use anyhow::Context as _;
use arc_swap::ArcSwapOption;
use figment::Figment;
use model_registry_sdk::{CapabilityMatcher, ModelRegistryApi, ModelRegistryError};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ModelRegistryConfig;
use crate::domain::service::ModelRegistryService;
use crate::domain::sweeper::run_sweep_task;
use crate::local_client::ModelRegistryLocalClient;

struct SweepTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Model Registry module.
///
/// Owns the registry service and the background consistency sweep.
/// Lifecycle: `init` once, then `start` and `stop`; `stop` clears all state.
#[derive(Default)]
pub struct ModelRegistryModule {
    service: ArcSwapOption<ModelRegistryService>,
    sweep: Mutex<Option<SweepTask>>,
}

impl ModelRegistryModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry service.
    ///
    /// # Errors
    ///
    /// Fails if the sweep is enabled with a zero interval.
    pub fn init(
        &self,
        config: ModelRegistryConfig,
        matcher: Arc<dyn CapabilityMatcher>,
    ) -> anyhow::Result<()> {
        info!("Initializing model_registry module");

        anyhow::ensure!(
            !config.sweep_enabled || !config.sweep_interval.is_zero(),
            "sweep_interval must be greater than zero when the sweep is enabled"
        );
        debug!(
            sweep_enabled = config.sweep_enabled,
            sweep_interval = %humantime::format_duration(config.sweep_interval),
            cache_max_entries = config.cache_max_entries,
            max_hierarchy_depth = config.max_hierarchy_depth,
            "Loaded model_registry config"
        );

        let service = Arc::new(ModelRegistryService::new(config, matcher));
        self.service.store(Some(service));

        info!("Model registry module initialized");
        Ok(())
    }

    /// Builds the registry service from the `model_registry` config section.
    ///
    /// # Errors
    ///
    /// Fails if the section is invalid.
    pub fn init_from_figment(
        &self,
        figment: &Figment,
        matcher: Arc<dyn CapabilityMatcher>,
    ) -> anyhow::Result<()> {
        let config = ModelRegistryConfig::from_figment(figment)
            .context("Failed to load model_registry config")?;
        self.init(config, matcher)
    }

    /// The registry service.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before `init`.
    pub fn service(&self) -> Result<Arc<ModelRegistryService>, ModelRegistryError> {
        self.service
            .load_full()
            .ok_or(ModelRegistryError::NotInitialized)
    }

    /// Client handle for other modules.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before `init`.
    pub fn client(&self) -> Result<Arc<dyn ModelRegistryApi>, ModelRegistryError> {
        let service = self.service()?;
        Ok(Arc::new(ModelRegistryLocalClient::new(service)))
    }

    /// Starts the periodic consistency sweep, if enabled.
    ///
    /// The sweep also stops when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Fails before `init` or when already started.
    pub async fn start(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        let service = self.service()?;
        let config = service.config();
        if !config.sweep_enabled {
            info!("Model registry consistency sweep disabled");
            return Ok(());
        }

        let mut sweep = self.sweep.lock();
        anyhow::ensure!(sweep.is_none(), "Model registry sweep task already running");

        let every = config.sweep_interval;
        let cancel = cancel.child_token();
        let handle = tokio::spawn(run_sweep_task(Arc::clone(&service), every, cancel.clone()));
        *sweep = Some(SweepTask { cancel, handle });

        info!(interval = %humantime::format_duration(every), "Model registry sweep task started");
        Ok(())
    }

    /// Stops the sweep task and clears all registry state.
    ///
    /// Waiting for the task gives up early when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Fails if the sweep task panicked.
    pub async fn stop(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        let task = self.sweep.lock().take();
        if let Some(SweepTask { cancel: sweep_cancel, handle }) = task {
            sweep_cancel.cancel();
            tokio::select! {
                joined = handle => joined.context("Model registry sweep task failed")?,
                () = cancel.cancelled() => {
                    warn!("Stop cancelled before the sweep task finished");
                }
            }
        }

        if let Some(service) = self.service.load_full() {
            service.shutdown();
        }
        info!("Model registry module stopped");
        Ok(())
    }
}
