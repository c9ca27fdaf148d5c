//! Latest-wins holder for the presentation state of repeated fetches.
//!
//! Every refresh takes a ticket from a monotonically increasing generation
//! counter. A result is only stored if its ticket is still the newest one
//! handed out, so a slow response can never replace a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{
    error::Result,
    model::{ForecastBundle, Query},
    provider::WeatherProvider,
    service::WeatherService,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready(ForecastBundle),
    /// Human-readable reason shown instead of data.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Whether a completed fetch made it into the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

#[derive(Debug, Default)]
pub struct ForecastSession {
    generation: AtomicU64,
    state: RwLock<FetchState>,
}

impl ForecastSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FetchState {
        self.state.read().clone()
    }

    /// Start a fetch cycle. Any ticket handed out earlier becomes stale.
    pub fn begin(&self) -> Ticket {
        let mut state = self.state.write();
        let ticket = Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        *state = FetchState::Loading;
        ticket
    }

    pub fn complete(&self, ticket: Ticket, result: Result<ForecastBundle>) -> Applied {
        let mut state = self.state.write();

        let latest = self.generation.load(Ordering::SeqCst);
        if ticket.0 != latest {
            debug!(ticket = ticket.0, latest, "discarding stale forecast result");
            return Applied::Stale;
        }

        *state = match result {
            Ok(bundle) => FetchState::Ready(bundle),
            Err(err) => {
                info!(error = %err, "forecast refresh failed");
                FetchState::Failed(err.user_message())
            }
        };
        Applied::Current
    }

    /// Run one fetch cycle through `service` and record its outcome.
    pub async fn refresh<P: WeatherProvider>(
        &self,
        service: &WeatherService<P>,
        query: &Query,
    ) -> Applied {
        let ticket = self.begin();
        let result = service.bundle(query).await;
        self.complete(ticket, result)
    }
}
