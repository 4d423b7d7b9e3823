//! High-level runtime orchestrator.
//!
//! The runtime owns the tick dispatcher, wires the stores, repository and
//! event bus together, and exposes a builder-based API. Clients drive combat
//! through [`CombatService`] and receive events per character.

use std::sync::Arc;

use combat_content::ContentBundle;
use combat_core::CharacterId;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{CombatService, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::context::{CharacterLocks, CombatContext};
use crate::events::{CombatEvent, EventBus};
use crate::handlers::SessionJanitor;
use crate::oracle::OracleManager;
use crate::repository::{CharacterRepository, InMemoryCharacterRepo};
use crate::scheduler::{SchedulerConfig, TokioScheduler};
use crate::store::{
    AutoCombatSessions, CombatRateLimiter, InMemoryKeyValueStore, InMemoryRateLimitStore,
    KeyValueStore, RateLimitStore,
};
use crate::workers::AutoCombatWorker;

/// Running combat engine.
///
/// Design: the runtime owns the dispatcher task; [`CombatService`] is the
/// shareable façade for request handlers.
pub struct CombatRuntime {
    service: Arc<CombatService>,
    janitor: SessionJanitor,
    events: EventBus,
    characters: Arc<dyn CharacterRepository>,
    config: RuntimeConfig,
    dispatcher: JoinHandle<()>,
}

impl CombatRuntime {
    /// Create a new runtime builder
    pub fn builder() -> CombatRuntimeBuilder {
        CombatRuntimeBuilder::new()
    }

    pub fn service(&self) -> Arc<CombatService> {
        Arc::clone(&self.service)
    }

    pub fn janitor(&self) -> &SessionJanitor {
        &self.janitor
    }

    pub fn characters(&self) -> Arc<dyn CharacterRepository> {
        Arc::clone(&self.characters)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Subscribe to one character's combat events.
    pub fn subscribe(&self, character: CharacterId) -> broadcast::Receiver<CombatEvent> {
        self.events.subscribe(character)
    }

    /// Client for `character` disconnected: end its session and drop the
    /// event channel once nobody listens.
    pub async fn disconnect(&self, character: CharacterId) -> Result<()> {
        self.janitor.on_disconnect(character).await?;
        self.events.prune(character);
        Ok(())
    }

    /// Stops the dispatcher. Ticks still running get one tick timeout to
    /// finish before they are aborted.
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            service,
            mut dispatcher,
            config,
            ..
        } = self;
        drop(service);

        match tokio::time::timeout(config.tick_timeout, &mut dispatcher).await {
            Ok(joined) => joined.map_err(RuntimeError::WorkerJoin)?,
            Err(_) => {
                warn!(target: "combat::scheduler", "dispatcher still busy, aborting");
                dispatcher.abort();
                if let Err(err) = dispatcher.await
                    && !err.is_cancelled()
                {
                    return Err(RuntimeError::WorkerJoin(err));
                }
            }
        }
        info!(target: "combat::scheduler", "combat runtime shut down");
        Ok(())
    }
}

/// Builder for [`CombatRuntime`] with flexible configuration.
///
/// Stores and the repository default to their in-memory implementations.
pub struct CombatRuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    characters: Option<Arc<dyn CharacterRepository>>,
    kv_store: Option<Arc<dyn KeyValueStore>>,
    rate_store: Option<Arc<dyn RateLimitStore>>,
}

impl CombatRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            characters: None,
            kv_store: None,
            rate_store: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Use loaded content; its balance config replaces `config.combat`.
    pub fn content(mut self, bundle: ContentBundle) -> Self {
        self.config.combat = bundle.config.clone();
        self.oracles = Some(OracleManager::from_bundle(bundle));
        self
    }

    pub fn characters(mut self, repo: Arc<dyn CharacterRepository>) -> Self {
        self.characters = Some(repo);
        self
    }

    pub fn kv_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.kv_store = Some(store);
        self
    }

    pub fn rate_limit_store(mut self, store: Arc<dyn RateLimitStore>) -> Self {
        self.rate_store = Some(store);
        self
    }

    /// Build the runtime and spawn the dispatcher on the current tokio
    /// runtime.
    pub async fn build(self) -> Result<CombatRuntime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let config = self.config;

        let characters = self
            .characters
            .unwrap_or_else(|| Arc::new(InMemoryCharacterRepo::new()));
        let kv_store = self
            .kv_store
            .unwrap_or_else(|| Arc::new(InMemoryKeyValueStore::new()));
        let rate_store = self
            .rate_store
            .unwrap_or_else(|| Arc::new(InMemoryRateLimitStore::new()));

        let events = EventBus::with_capacity(config.event_buffer_size);
        let ctx = CombatContext {
            characters: Arc::clone(&characters),
            sessions: AutoCombatSessions::new(kv_store),
            oracles,
            broadcaster: Arc::new(events.clone()),
            locks: CharacterLocks::default(),
        };

        let janitor = SessionJanitor::new(ctx.clone());
        let worker = AutoCombatWorker::new(
            ctx.clone(),
            janitor.clone(),
            config.continue_after_victory,
        );
        let (scheduler, dispatcher) = TokioScheduler::spawn(
            Arc::new(worker),
            Arc::new(janitor.clone()),
            SchedulerConfig {
                tick_delay: config.tick_delay,
                tick_timeout: config.tick_timeout,
                queue_size: config.scheduler_queue_size,
            },
        );

        let limiter = CombatRateLimiter::new(rate_store, config.manual_window);
        let service = Arc::new(CombatService::new(ctx, limiter, Arc::new(scheduler)));

        info!(
            target: "combat::scheduler",
            tick_delay_ms = config.tick_delay.as_millis() as u64,
            tick_timeout_ms = config.tick_timeout.as_millis() as u64,
            "combat runtime started"
        );

        Ok(CombatRuntime {
            service,
            janitor,
            events,
            characters,
            config,
            dispatcher,
        })
    }
}
