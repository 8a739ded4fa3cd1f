//! High-level runtime orchestrator.
//!
//! The runtime owns the arena worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive the arena.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use arena_content::{ContentFactory, LoadResult};
use arena_core::ArenaConfig;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::oracle::CatalogOracleImpl;
use crate::state::ArenaState;
use crate::workers::{ArenaWorker, Command};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub arena: ArenaConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that orchestrates the arena.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Shutdown the runtime gracefully.
    ///
    /// The worker stops once every handle clone has been dropped; outstanding
    /// clones held elsewhere keep it alive until they go away.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<ArenaState>,
    catalog: Option<Arc<CatalogOracleImpl>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            catalog: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the arena rules
    pub fn arena_config(mut self, arena: ArenaConfig) -> Self {
        self.config.arena = arena;
        self
    }

    /// Provide initial arena state (defaults to empty)
    pub fn initial_state(mut self, state: ArenaState) -> Self {
        self.state = Some(state);
        self
    }

    /// Share an existing catalog (defaults to an empty one)
    pub fn catalog(mut self, catalog: Arc<CatalogOracleImpl>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Load arena rules and catalog content from a content directory.
    pub fn content(mut self, factory: &ContentFactory) -> LoadResult<Self> {
        self.config.arena = factory.load_config()?;
        self.catalog = Some(Arc::new(CatalogOracleImpl::from_content(
            factory.load_catalog()?,
        )));
        Ok(self)
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let catalog = self.catalog.unwrap_or_default();
        let state = self.state.unwrap_or_default();

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone(), Arc::clone(&catalog));

        let worker = ArenaWorker::new(state, catalog, self.config.arena, command_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
