//! Dashboard Controller
//!
//! Owns the profile snapshot taken at load time and runs the dashboard's user
//! actions against an injected view, risk API, store and navigator.
//!
//! # Request generations
//!
//! Every flow that passes validation takes the next generation number. After
//! each network await the flow checks that no newer flow has started; if one
//! has, its result is dropped instead of written to the view. Two overlapping
//! clicks therefore always leave the dashboard showing the most recently
//! started request, whatever order the responses arrive in.

use std::cell::Cell;

use crate::client::{ClientError, RiskApi};
use crate::payload::{RiskRequest, WearableReadings};
use crate::profile::{UserProfile, ValidatedProfile};
use crate::render;
use crate::response::RiskResponse;
use crate::session::{self, Navigator, SessionKeys};
use crate::store::{ClientStore, StoreResult};
use crate::view::{DashboardView, Element};

/// How a flow invocation ended
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// Response rendered onto the dashboard
    Rendered(RiskResponse),
    /// Profile failed validation; no request was sent
    ProfileIncomplete,
    /// A request failed; the error message is shown
    Failed(ClientError),
    /// A newer flow started before this one finished; nothing was written
    Superseded,
}

/// The dashboard page controller
pub struct DashboardController<S, V, A, N> {
    store: S,
    view: V,
    api: A,
    navigator: N,
    keys: SessionKeys,
    profile: UserProfile,
    generation: Cell<u64>,
}

impl<S, V, A, N> DashboardController<S, V, A, N>
where
    S: ClientStore,
    V: DashboardView,
    A: RiskApi,
    N: Navigator,
{
    /// Load the dashboard.
    ///
    /// Without a login marker this navigates to the entry page and returns
    /// `None`. Otherwise the cached profile is read once and kept for the
    /// controller's lifetime.
    pub fn load(
        store: S,
        keys: SessionKeys,
        view: V,
        api: A,
        navigator: N,
    ) -> StoreResult<Option<Self>> {
        if !session::is_logged_in(&store, &keys)? {
            tracing::info!(entry_page = %keys.entry_page, "No session marker, redirecting");
            navigator.navigate(&keys.entry_page);
            return Ok(None);
        }

        let raw_profile = store.get_item(&keys.profile_key)?;
        let profile = UserProfile::from_storage(raw_profile.as_deref());
        tracing::debug!(?profile, "Dashboard loaded");

        Ok(Some(Self {
            store,
            view,
            api,
            navigator,
            keys,
            profile,
            generation: Cell::new(0),
        }))
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Score the profile together with whatever the wearable inputs hold
    pub async fn calculate_risk(&self) -> FlowOutcome {
        let Some(profile) = self.validated_profile() else {
            return FlowOutcome::ProfileIncomplete;
        };

        let wearable = WearableReadings::from_inputs(
            self.view.input_value(Element::WearableHeartRateInput),
            self.view.input_value(Element::WearableSpo2Input),
            self.view.input_value(Element::WearableCoughInput),
        );
        let request = RiskRequest::new(&profile, wearable);

        render::show_status(&self.view, render::CALCULATING_MESSAGE);
        let generation = self.next_generation();
        tracing::debug!(generation, "Calculating risk");

        let result = self.api.assess(&request).await;
        self.finish(generation, result)
    }

    /// Ask the service for estimated wearable readings, fill them into the
    /// inputs, then score the profile with those readings
    pub async fn sync_wearable(&self) -> FlowOutcome {
        let Some(profile) = self.validated_profile() else {
            return FlowOutcome::ProfileIncomplete;
        };

        render::show_status(&self.view, render::SYNCING_MESSAGE);
        let generation = self.next_generation();
        tracing::debug!(generation, "Syncing wearable data");

        let result = self.estimate_then_score(&profile, generation).await;
        match result {
            Ok(Some(response)) => self.finish(generation, Ok(response)),
            Ok(None) => {
                tracing::warn!(generation, "Wearable sync superseded after estimate");
                FlowOutcome::Superseded
            }
            Err(err) => self.finish(generation, Err(err)),
        }
    }

    /// Clear the login marker and return to the entry page
    pub fn logout(&self) -> StoreResult<()> {
        self.store.remove_item(&self.keys.user_key)?;
        tracing::info!("Logged out");
        self.navigator.navigate(&self.keys.entry_page);
        Ok(())
    }

    async fn estimate_then_score(
        &self,
        profile: &ValidatedProfile,
        generation: u64,
    ) -> Result<Option<RiskResponse>, ClientError> {
        let estimate = self.api.assess(&RiskRequest::new(profile, None)).await?;
        if !self.is_current(generation) {
            return Ok(None);
        }

        for (element, field) in Element::WEARABLE_INPUTS
            .into_iter()
            .zip(["heart_rate", "spo2", "cough_count"])
        {
            self.view.set_input_value(element, &estimate.wearable_text(field));
        }

        let request = RiskRequest::new(profile, Some(estimate.wearable_readings()));
        self.api.assess(&request).await.map(Some)
    }

    fn validated_profile(&self) -> Option<ValidatedProfile> {
        match self.profile.validate() {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::debug!(error = %err, "Profile validation failed");
                render::show_error(&self.view, render::PROFILE_INCOMPLETE_MESSAGE);
                None
            }
        }
    }

    fn finish(&self, generation: u64, result: Result<RiskResponse, ClientError>) -> FlowOutcome {
        if !self.is_current(generation) {
            let latest = self.generation.get();
            match &result {
                Ok(_) => tracing::warn!(generation, latest, "Discarding stale risk response"),
                Err(err) => tracing::warn!(
                    generation,
                    latest,
                    error = %err,
                    "Discarding stale risk request failure"
                ),
            }
            return FlowOutcome::Superseded;
        }

        match result {
            Ok(response) => {
                render::render_risk(&self.view, &response);
                self.view.scroll_into_view(Element::RiskBadge);
                FlowOutcome::Rendered(response)
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to fetch health risk data");
                render::show_error(&self.view, render::FETCH_FAILED_MESSAGE);
                FlowOutcome::Failed(err)
            }
        }
    }

    fn next_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }
}
