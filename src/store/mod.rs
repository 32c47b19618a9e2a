//! Entity stores: the single owner of each entity list.
//!
//! Views read snapshots through `list` and change data only through the
//! mutation methods. Two implementations exist: `MemoryStore` (mock mode,
//! synchronous and infallible apart from validation) and `HttpUserStore`
//! (live mode, round-trips through the user API).

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::models::{Entity, EntityId, FollowUp, FollowUpPatch};

mod http;
mod memory;

pub use http::HttpUserStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Snapshot of the current list, in store order.
    async fn list(&self) -> Vec<E>;

    async fn get(&self, id: EntityId) -> Option<E> {
        self.list().await.into_iter().find(|e| e.id() == id)
    }

    /// Validate, assign identity and defaults, and insert.
    async fn add(&self, new: E::New) -> Result<E, StoreError>;

    /// Merge `patch` into the entity with `id`. `Ok(None)` when absent.
    async fn update(&self, id: EntityId, patch: E::Patch) -> Result<Option<E>, StoreError>;

    /// `update`, but only while `guard` holds for the stored entity.
    /// `Ok(None)` when absent or when the guard fails. Stores that can hold
    /// their lock across the check override this; the default is a read
    /// followed by a separate write.
    async fn update_if(
        &self,
        id: EntityId,
        patch: E::Patch,
        guard: for<'g> fn(&'g E) -> bool,
    ) -> Result<Option<E>, StoreError> {
        match self.get(id).await {
            Some(current) if guard(&current) => self.update(id, patch).await,
            _ => Ok(None),
        }
    }

    /// `Ok(false)` when absent.
    async fn remove(&self, id: EntityId) -> Result<bool, StoreError>;

    /// Reload from the authoritative source.
    async fn refresh(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Message from the last failed `refresh`, shown in place of rows.
    async fn last_error(&self) -> Option<String> {
        None
    }
}

/// Follow-up transitions, available on any follow-up store.
///
/// The closed-state check is repeated inside `update_if`, so in a
/// `MemoryStore` a transition that lost a race to another one is a no-op.
/// Other stores fall back to last-writer-wins.
#[async_trait]
pub trait FollowUpActions: EntityStore<FollowUp> {
    /// Complete a non-terminal follow-up, stamping `today`.
    /// `Ok(None)` when the id is absent or the follow-up is already closed.
    async fn mark_completed(
        &self,
        id: EntityId,
        today: NaiveDate,
    ) -> Result<Option<FollowUp>, StoreError> {
        let Some(mut current) = self.get(id).await else {
            return Ok(None);
        };
        if !current.complete(today) {
            return Ok(None);
        }
        self.update_if(id, transition(&current), is_open).await
    }

    /// Cancel a non-terminal follow-up. Same absent/terminal rule as `mark_completed`.
    async fn cancel(&self, id: EntityId) -> Result<Option<FollowUp>, StoreError> {
        let Some(mut current) = self.get(id).await else {
            return Ok(None);
        };
        if !current.cancel() {
            return Ok(None);
        }
        self.update_if(id, transition(&current), is_open).await
    }
}

fn is_open(follow_up: &FollowUp) -> bool {
    !follow_up.status.is_terminal()
}

fn transition(after: &FollowUp) -> FollowUpPatch {
    FollowUpPatch {
        status: Some(after.status),
        completed_date: after.completed_date,
        ..Default::default()
    }
}

impl<S: EntityStore<FollowUp> + ?Sized> FollowUpActions for S {}
