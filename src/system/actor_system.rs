//! The actor registry and pool owner (spec §3, §4.2).

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use super::config::SystemConfig;
use super::errors::SystemError;
use crate::action::ActionDispatch;
use crate::actor::{Actor, ActorHandle, ActorRegistry};
use crate::pool::{ManagedPool, OwnerPool, WorkerPool};

/// Keyed registry of live actors plus the pools they dispatch work through
/// (spec §3 "ActorSystem").
///
/// Every system owns exactly one [`ManagedPool`], used as the default target
/// for `ExecutionMode::Pool` action dispatch (spec §4.6 step 2d, "the
/// actor's managed pool-submit"). Additional pools — e.g. a
/// [`crate::pool::StealingPool`] for unordered CPU-bound work — can be
/// attached with [`ActorSystem::add_pool`].
pub struct ActorSystem {
    name: String,
    actors: DashMap<String, Arc<dyn ActorHandle>>,
    pools: Mutex<Vec<Arc<dyn WorkerPool>>>,
    managed_pool: Arc<ManagedPool>,
    shutdown_grace: std::time::Duration,
}

impl ActorSystem {
    /// Build a new system from `config`, already owning its managed pool.
    pub fn new(name: impl Into<String>, config: SystemConfig) -> Result<Arc<Self>, SystemError> {
        config.validate().map_err(SystemError::InvalidConfig)?;
        let managed_pool = Arc::new(ManagedPool::new(config.pool_size));
        let pools: Vec<Arc<dyn WorkerPool>> = vec![Arc::clone(&managed_pool) as Arc<dyn WorkerPool>];
        Ok(Arc::new(Self {
            name: name.into(),
            actors: DashMap::new(),
            pools: Mutex::new(pools),
            managed_pool,
            shutdown_grace: config.shutdown_grace,
        }))
    }

    /// This system's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create, register, and return a new actor owned by this system (spec
    /// §4.2 `actor_of`). The actor's `ExecutionMode::Pool` dispatch and any
    /// `create_child` calls route through this system's managed pool and
    /// registry.
    pub fn actor_of<T>(self: &Arc<Self>, name: impl Into<String>, payload: T) -> Result<Arc<Actor<T>>, SystemError>
    where
        T: ActionDispatch + Send + 'static,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(SystemError::EmptyActorName);
        }
        if self.actors.contains_key(&name) {
            return Err(SystemError::DuplicateActorName(name));
        }
        let registry: Arc<dyn ActorRegistry> = Arc::clone(self) as Arc<dyn ActorRegistry>;
        let pool: Arc<dyn OwnerPool> = Arc::clone(&self.managed_pool) as Arc<dyn OwnerPool>;
        let actor = Actor::with_options(name.clone(), payload, None, None, Some(registry), Some(pool));
        self.actors.insert(name, Arc::clone(&actor) as Arc<dyn ActorHandle>);
        Ok(actor)
    }

    /// Register an externally constructed actor under its own name (spec
    /// §4.2 `add_actor`).
    pub fn add_actor<T>(&self, actor: Arc<Actor<T>>) -> Result<(), SystemError>
    where
        T: ActionDispatch + Send + 'static,
    {
        let name = actor.name().to_string();
        if name.is_empty() {
            return Err(SystemError::EmptyActorName);
        }
        if self.actors.contains_key(&name) {
            return Err(SystemError::DuplicateActorName(name));
        }
        self.actors.insert(name, actor);
        Ok(())
    }

    /// `true` iff an actor named `name` is currently registered.
    pub fn has(&self, name: &str) -> bool {
        self.actors.contains_key(name)
    }

    /// Look up a registered actor by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ActorHandle>> {
        self.actors.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove and return a registered actor without closing it.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn ActorHandle>> {
        self.actors.remove(name).map(|(_, handle)| handle)
    }

    /// All currently registered actor names, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.actors.iter().map(|entry| entry.key().clone()).collect()
    }

    /// This system's managed pool, the default target for pool-mode action
    /// dispatch.
    pub fn managed_pool(&self) -> Arc<ManagedPool> {
        Arc::clone(&self.managed_pool)
    }

    /// Attach an additional pool this system should shut down on
    /// [`ActorSystem::terminate`].
    pub fn add_pool(&self, pool: Arc<dyn WorkerPool>) {
        self.pools.lock().push(pool);
    }

    /// `false` iff any owned pool is in shutdown (spec §4.2).
    pub fn is_alive(&self) -> bool {
        !self.pools.lock().iter().any(|pool| pool.is_shut_down())
    }

    /// Close every registered actor, then shut every pool down, waiting up
    /// to this system's configured grace window. An overrun is logged, not
    /// raised (spec §4.2).
    pub async fn terminate(&self) {
        for name in self.list() {
            if let Some(actor) = self.remove(&name) {
                actor.close().await;
            }
        }
        let pools = self.pools.lock().clone();
        for pool in &pools {
            pool.shutdown().await;
        }
        for pool in &pools {
            if !pool.await_termination(self.shutdown_grace).await {
                tracing::warn!(system = %self.name, "pool did not terminate within grace window");
            }
        }
    }
}

impl ActorRegistry for ActorSystem {
    fn register(&self, handle: Arc<dyn ActorHandle>) {
        self.actors.insert(handle.name().to_string(), handle);
    }

    fn deregister(&self, name: &str) {
        self.actors.remove(name);
    }
}
