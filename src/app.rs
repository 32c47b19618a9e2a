//! The `Crm` handle: one store per entity plus the clock, built once and
//! passed to every view.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::UserApi;
use crate::clock::{Clock, SystemClock};
use crate::config::{AppConfig, StoreMode};
use crate::error::{ConfigError, StoreError};
use crate::metrics::DashboardSummary;
use crate::models::{
    Call, CallDirection, CallOutcome, EntityId, FollowUp, Lead, LeadPatch, NewCall, User,
};
use crate::seed;
use crate::store::{EntityStore, HttpUserStore, MemoryStore};

pub struct Crm {
    pub leads: Arc<dyn EntityStore<Lead>>,
    pub users: Arc<dyn EntityStore<User>>,
    pub follow_ups: Arc<dyn EntityStore<FollowUp>>,
    pub calls: Arc<dyn EntityStore<Call>>,
    clock: Arc<dyn Clock>,
    mode: StoreMode,
}

impl Crm {
    /// All four stores in memory, seeded with sample data.
    pub fn mock(clock: Arc<dyn Clock>) -> Self {
        Self {
            leads: Arc::new(MemoryStore::new(seed::leads(), clock.clone())),
            users: Arc::new(MemoryStore::new(seed::users(), clock.clone())),
            follow_ups: Arc::new(MemoryStore::new(seed::follow_ups(), clock.clone())),
            calls: Arc::new(MemoryStore::new(seed::calls(), clock.clone())),
            clock,
            mode: StoreMode::Mock,
        }
    }

    /// Live mode swaps the user store for the REST backend. The other
    /// entities have no backend routes and stay in memory.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        let mut crm = Self::mock(clock);
        if config.mode == StoreMode::Live {
            let api = UserApi::new(config.api_base())?;
            info!(base = %api.base_url(), "using live user store");
            crm.users = Arc::new(HttpUserStore::new(api));
            crm.mode = StoreMode::Live;
        }
        Ok(crm)
    }

    pub fn mode(&self) -> StoreMode {
        self.mode
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    /// Refresh every store from its source. Failures are recorded on the
    /// store (see `EntityStore::last_error`) and the first one is returned.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<(), StoreError> {
        let results = [
            self.leads.refresh().await,
            self.users.refresh().await,
            self.follow_ups.refresh().await,
            self.calls.refresh().await,
        ];
        match results.into_iter().find_map(Result::err) {
            Some(e) => {
                warn!(error = %e, "initial load incomplete");
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Record a call against a lead and stamp its last contact date.
    /// `Ok(None)` when the lead does not exist.
    #[instrument(skip(self, notes))]
    pub async fn call_lead(
        &self,
        lead_id: EntityId,
        outcome: CallOutcome,
        duration_minutes: u32,
        notes: &str,
    ) -> Result<Option<Call>, StoreError> {
        let Some(lead) = self.leads.get(lead_id).await else {
            return Ok(None);
        };

        let call = self
            .calls
            .add(NewCall {
                lead_id: Some(lead.id),
                lead_name: lead.company_name,
                caller: lead.assignee,
                direction: CallDirection::Outbound,
                outcome,
                duration_minutes,
                notes: notes.to_string(),
            })
            .await?;

        let patch = LeadPatch {
            last_contact: Some(self.today()),
            ..Default::default()
        };
        self.leads.update(lead_id, patch).await?;
        Ok(Some(call))
    }

    pub async fn dashboard(&self) -> DashboardSummary {
        DashboardSummary::compute(
            &self.leads.list().await,
            &self.users.list().await,
            &self.follow_ups.list().await,
            &self.calls.list().await,
            self.today(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ApiError;
    use chrono::NaiveDate;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
    }

    fn crm() -> Crm {
        Crm::mock(Arc::new(FixedClock::new(today())))
    }

    #[tokio::test]
    async fn test_call_lead_records_call_and_touches_lead() {
        let crm = crm();
        let call = crm
            .call_lead(4, CallOutcome::Voicemail, 0, "left a message")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(call.lead_id, Some(4));
        assert_eq!(call.lead_name, "Global Retail");
        assert_eq!(call.caller, "Sneha Singh");
        assert_eq!(call.call_date, today());
        assert_eq!(crm.calls.list().await.last(), Some(&call));
        assert_eq!(crm.leads.get(4).await.unwrap().last_contact, today());
    }

    #[tokio::test]
    async fn test_call_unknown_lead() {
        let crm = crm();
        let before = crm.calls.list().await;
        assert_eq!(
            crm.call_lead(99, CallOutcome::Busy, 0, "").await.unwrap(),
            None
        );
        assert_eq!(crm.calls.list().await, before);
    }

    #[tokio::test]
    async fn test_dashboard_over_seed_data() {
        let summary = crm().dashboard().await;
        assert_eq!(summary.total_leads, 5);
        assert_eq!(summary.new_leads, 1);
        assert_eq!(summary.calls_today, 2);
        assert_eq!(summary.team_conversion_rate, 31.1);
    }

    #[tokio::test]
    async fn test_live_mode_loads_users_from_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = AppConfig {
            mode: StoreMode::Live,
            api_url: server.uri(),
            ..Default::default()
        };
        let crm = Crm::with_clock(&config, Arc::new(FixedClock::new(today()))).unwrap();
        assert_eq!(crm.mode(), StoreMode::Live);

        let err = crm.load().await.unwrap_err();
        assert_eq!(err, StoreError::Api(ApiError::Fetch));
        assert!(crm.users.list().await.is_empty());
        assert_eq!(
            crm.users.last_error().await.as_deref(),
            Some("Failed to fetch users from the server.")
        );
        // the other entities are still served from memory
        assert_eq!(crm.leads.list().await.len(), 5);
    }
}
