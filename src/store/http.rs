use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::EntityStore;
use crate::api::UserApi;
use crate::error::StoreError;
use crate::models::{Entity, EntityId, NewUser, User, UserPatch};

/// User store backed by the REST API.
///
/// The local list is a cache of what the server last returned. It only
/// changes after a successful round-trip, with the server's record taking
/// the place of whatever was sent.
pub struct HttpUserStore {
    api: UserApi,
    users: RwLock<Vec<User>>,
    last_error: RwLock<Option<String>>,
}

impl HttpUserStore {
    pub fn new(api: UserApi) -> Self {
        Self {
            api,
            users: RwLock::new(Vec::new()),
            last_error: RwLock::new(None),
        }
    }

    async fn contains(&self, id: EntityId) -> bool {
        self.users.read().await.iter().any(|u| u.id == id)
    }
}

#[async_trait]
impl EntityStore<User> for HttpUserStore {
    async fn list(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    #[instrument(skip(self, new), fields(name = %new.name))]
    async fn add(&self, new: NewUser) -> Result<User, StoreError> {
        User::validate(&new)?;
        let created = self.api.create(&new).await?;
        self.users.write().await.push(created.clone());
        debug!(id = created.id, "user added");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: EntityId, patch: UserPatch) -> Result<Option<User>, StoreError> {
        if !self.contains(id).await {
            debug!("update skipped: not loaded");
            return Ok(None);
        }

        let updated = self.api.update(id, &patch).await?;
        let mut users = self.users.write().await;
        // the list may have been refreshed while the request was out
        match users.iter_mut().find(|u| u.id == id) {
            Some(slot) => {
                *slot = updated.clone();
                Ok(Some(updated))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: EntityId) -> Result<bool, StoreError> {
        if !self.contains(id).await {
            return Ok(false);
        }

        self.api.delete(id).await?;
        let mut users = self.users.write().await;
        users.retain(|u| u.id != id);
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<(), StoreError> {
        match self.api.list().await {
            Ok(users) => {
                *self.users.write().await = users;
                *self.last_error.write().await = None;
                Ok(())
            }
            Err(e) => {
                warn!("keeping previously loaded users");
                *self.last_error.write().await = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }
}
