use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::EntityStore;
use crate::clock::Clock;
use crate::error::StoreError;
use crate::models::{Entity, EntityId, InsertPosition};

struct State<E> {
    items: Vec<E>,
    /// Never reused, so ids stay unique after deletions.
    next_id: EntityId,
}

/// In-memory store used in mock mode.
pub struct MemoryStore<E: Entity> {
    state: RwLock<State<E>>,
    clock: Arc<dyn Clock>,
}

impl<E: Entity> MemoryStore<E> {
    pub fn new(items: Vec<E>, clock: Arc<dyn Clock>) -> Self {
        let next_id = items.iter().map(Entity::id).max().unwrap_or(0) + 1;
        Self {
            state: RwLock::new(State { items, next_id }),
            clock,
        }
    }

    pub fn empty(clock: Arc<dyn Clock>) -> Self {
        Self::new(Vec::new(), clock)
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    async fn list(&self) -> Vec<E> {
        self.state.read().await.items.clone()
    }

    async fn get(&self, id: EntityId) -> Option<E> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    #[instrument(skip(self, new), fields(kind = E::KIND))]
    async fn add(&self, new: E::New) -> Result<E, StoreError> {
        E::validate(&new)?;

        let today = self.clock.today();
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let entity = E::create(id, new, today);
        match E::INSERT {
            InsertPosition::Front => state.items.insert(0, entity.clone()),
            InsertPosition::Back => state.items.push(entity.clone()),
        }
        debug!(id, "added");
        Ok(entity)
    }

    #[instrument(skip(self, patch), fields(kind = E::KIND))]
    async fn update(&self, id: EntityId, patch: E::Patch) -> Result<Option<E>, StoreError> {
        let mut state = self.state.write().await;
        let Some(entity) = state.items.iter_mut().find(|e| e.id() == id) else {
            debug!(id, "update skipped: not found");
            return Ok(None);
        };
        entity.apply(patch);
        Ok(Some(entity.clone()))
    }

    #[instrument(skip(self, patch, guard), fields(kind = E::KIND))]
    async fn update_if(
        &self,
        id: EntityId,
        patch: E::Patch,
        guard: for<'g> fn(&'g E) -> bool,
    ) -> Result<Option<E>, StoreError> {
        let mut state = self.state.write().await;
        let Some(entity) = state.items.iter_mut().find(|e| e.id() == id) else {
            return Ok(None);
        };
        if !guard(entity) {
            debug!(id, "update skipped: guard failed");
            return Ok(None);
        }
        entity.apply(patch);
        Ok(Some(entity.clone()))
    }

    #[instrument(skip(self), fields(kind = E::KIND))]
    async fn remove(&self, id: EntityId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|e| e.id() != id);
        Ok(state.items.len() != before)
    }
}
