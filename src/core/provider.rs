//! Observable exchange rate state for one consumer.
//!
//! [`RateProvider`] owns the current base currency and the latest
//! [`FetchState`]. Every trigger (first selection, base change, refresh) takes
//! a fresh sequence number; a response is only published when its sequence
//! number is still the latest, so a slow response for an older request can
//! never overwrite newer state.

use super::currency::{CurrencyCode, RateSnapshot};
use super::rates::{EmptyBase, FetchError, RateSource};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<RateSnapshot>),
    Failed(FetchError),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn snapshot(&self) -> Option<&Arc<RateSnapshot>> {
        match self {
            FetchState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Request {
    seq: u64,
    base: Option<CurrencyCode>,
}

pub struct RateProvider<S: RateSource> {
    source: S,
    request: Mutex<Request>,
    state: watch::Sender<FetchState>,
}

impl<S: RateSource> RateProvider<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            source,
            request: Mutex::new(Request::default()),
            state,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver that observes every published state transition.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<RateSnapshot>> {
        self.state.borrow().snapshot().cloned()
    }

    pub async fn base(&self) -> Option<CurrencyCode> {
        self.request.lock().await.base.clone()
    }

    /// Makes `base` the current base currency and fetches its rates.
    ///
    /// Selecting the base that is already loading or loaded is a no-op. The
    /// returned state is the one visible once this request settles, which is
    /// not this request's outcome if a newer trigger superseded it.
    pub async fn select_base(&self, base: &str) -> Result<FetchState, EmptyBase> {
        let base = base.trim();
        if base.is_empty() {
            return Err(EmptyBase);
        }

        let seq = {
            let mut request = self.request.lock().await;
            let settled = matches!(
                *self.state.borrow(),
                FetchState::Loading | FetchState::Ready(_)
            );
            if settled && request.base.as_deref() == Some(base) {
                debug!(base, "Base currency unchanged, keeping current rates");
                return Ok(self.state());
            }
            self.begin(&mut request, base)
        };

        Ok(self.complete(seq, base).await)
    }

    /// Re-fetches rates for the current base. Stays idle when no base was selected.
    pub async fn refresh(&self) -> FetchState {
        let (seq, base) = {
            let mut request = self.request.lock().await;
            let Some(base) = request.base.clone() else {
                debug!("Refresh requested before any base currency was selected");
                return self.state();
            };
            (self.begin(&mut request, &base), base)
        };

        self.complete(seq, &base).await
    }

    fn begin(&self, request: &mut Request, base: &str) -> u64 {
        request.seq += 1;
        request.base = Some(base.to_string());
        // Rates of the previous request are dropped, not merged.
        self.state.send_replace(FetchState::Loading);
        debug!(base, seq = request.seq, "Loading exchange rates");
        request.seq
    }

    async fn complete(&self, seq: u64, base: &str) -> FetchState {
        let outcome = self.source.fetch_rates(base).await;

        let request = self.request.lock().await;
        if request.seq != seq {
            debug!(
                base,
                seq,
                latest = request.seq,
                "Discarding response for superseded request"
            );
            return self.state();
        }

        let next = match outcome {
            Ok(snapshot) => {
                debug!(base, rates = snapshot.table.len(), "Exchange rates ready");
                FetchState::Ready(Arc::new(snapshot))
            }
            Err(error) => {
                warn!(base, kind = %error.kind(), %error, "Exchange rate fetch failed");
                FetchState::Failed(error)
            }
        };
        self.state.send_replace(next.clone());
        next
    }
}
