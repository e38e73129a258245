//! Wires user actions to providers and the dashboard.
//!
//! Each action takes a new sequence number and cancels the request that was
//! in flight before it. Results are applied only while their sequence number
//! is still the latest, so a slow response can never overwrite a newer one.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::Local;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    dashboard::{Dashboard, DashboardView},
    demo::{DEMO_CITY_NAME, DEMO_LOCATION_NAME},
    error::{GeolocationError, StationError},
    location::{Locator, UnsupportedLocator},
    model::WeatherSnapshot,
    provider::Backend,
};

pub const CLOCK_PERIOD: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationState {
    #[default]
    Idle,
    Loading,
    Displaying,
    ErrorShown,
}

pub struct WeatherStation<D: Dashboard> {
    backend: Backend,
    locator: Arc<dyn Locator>,
    dashboard: Arc<Mutex<D>>,
    snapshot: Mutex<Option<Arc<WeatherSnapshot>>>,
    state: Mutex<StationState>,
    latest: Arc<AtomicU64>,
    inflight: Mutex<Option<(u64, CancellationToken)>>,
    shutdown: CancellationToken,
}

/// One in-flight user action.
struct Request<D: Dashboard> {
    seq: u64,
    token: CancellationToken,
    _loading: LoadingGuard<D>,
}

/// Hides the loading indicator when the request ends, however it ends,
/// unless a newer request has taken over the indicator.
struct LoadingGuard<D: Dashboard> {
    seq: u64,
    latest: Arc<AtomicU64>,
    dashboard: Arc<Mutex<D>>,
}

impl<D: Dashboard> Drop for LoadingGuard<D> {
    fn drop(&mut self) {
        // Same lock `begin` holds while bumping `latest`.
        let mut dashboard = self.dashboard.lock();
        if self.latest.load(Ordering::SeqCst) == self.seq {
            dashboard.hide_loading();
        }
    }
}

impl<D: Dashboard + 'static> WeatherStation<D> {
    pub fn new(backend: Backend, dashboard: D) -> Self {
        Self {
            backend,
            locator: Arc::new(UnsupportedLocator),
            dashboard: Arc::new(Mutex::new(dashboard)),
            snapshot: Mutex::new(None),
            state: Mutex::new(StationState::Idle),
            latest: Arc::new(AtomicU64::new(0)),
            inflight: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_locator(mut self, locator: Arc<dyn Locator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn state(&self) -> StationState {
        *self.state.lock()
    }

    /// Snapshot currently on display.
    pub fn snapshot(&self) -> Option<Arc<WeatherSnapshot>> {
        self.snapshot.lock().clone()
    }

    pub fn dashboard(&self) -> Arc<Mutex<D>> {
        Arc::clone(&self.dashboard)
    }

    /// Search by city name typed by the user.
    pub async fn search(&self, input: &str) -> Result<(), StationError> {
        let city = input.trim();
        if city.is_empty() {
            return self.reject(StationError::EmptyInput);
        }

        let request = self.begin();
        let outcome = self.run(&request, self.lookup_city(city)).await;
        self.finish(request, outcome)
    }

    /// Preset city button.
    pub async fn quick_pick(&self, city: &str) -> Result<(), StationError> {
        self.search(city).await
    }

    /// Weather for wherever the locator says we are.
    pub async fn locate(&self) -> Result<(), StationError> {
        if !self.locator.is_supported() {
            return self.reject(GeolocationError::Unsupported.into());
        }

        let request = self.begin();
        let outcome = self.run(&request, self.lookup_position()).await;
        self.finish(request, outcome)
    }

    /// Startup view. In demo mode this shows [`DEMO_CITY_NAME`] right away;
    /// a live station waits for the first user action.
    pub async fn open(&self) -> Result<(), StationError> {
        if !self.backend.is_demo() {
            return Ok(());
        }
        self.search(DEMO_CITY_NAME).await
    }

    /// Cancel whatever is in flight without starting anything new.
    pub fn cancel(&self) {
        if let Some((_, token)) = self.inflight.lock().take() {
            token.cancel();
        }
    }

    /// Stop the clock task and cancel any in-flight request.
    pub fn shutdown(&self) {
        self.cancel();
        self.shutdown.cancel();
    }

    /// Refresh the dashboard clock now and then every minute until shutdown.
    pub fn start_clock(&self) -> JoinHandle<()> {
        let dashboard = Arc::clone(&self.dashboard);
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(CLOCK_PERIOD);
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => dashboard.lock().show_clock(Local::now()),
                }
            }
        })
    }

    async fn lookup_city(&self, city: &str) -> Result<WeatherSnapshot, StationError> {
        match &self.backend {
            Backend::Demo(synth) => Ok(synth.generate(city).await),
            Backend::Live(provider) => {
                let resolved = provider.resolve_city(city).await?;
                let report = provider.fetch(resolved.coordinates).await?;
                Ok(WeatherSnapshot::new(city, report))
            }
        }
    }

    async fn lookup_position(&self) -> Result<WeatherSnapshot, StationError> {
        let coordinates = self.locator.current_position().await?;
        tracing::debug!(lat = coordinates.latitude, lon = coordinates.longitude, "located");

        match &self.backend {
            Backend::Demo(synth) => Ok(synth.generate(DEMO_LOCATION_NAME).await),
            Backend::Live(provider) => {
                let (name, report) =
                    tokio::join!(provider.resolve_name(coordinates), provider.fetch(coordinates));
                Ok(WeatherSnapshot::new(name, report?))
            }
        }
    }

    fn begin(&self) -> Request<D> {
        let token = CancellationToken::new();
        let seq = {
            let mut dashboard = self.dashboard.lock();
            let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((_, previous)) = self.inflight.lock().replace((seq, token.clone())) {
                previous.cancel();
            }
            dashboard.show_loading();
            *self.state.lock() = StationState::Loading;
            seq
        };
        tracing::debug!(seq, "request started");

        Request {
            seq,
            token,
            _loading: LoadingGuard {
                seq,
                latest: Arc::clone(&self.latest),
                dashboard: Arc::clone(&self.dashboard),
            },
        }
    }

    /// Action refused before any work starts. It still supersedes whatever
    /// was in flight, so that request can no longer render.
    fn reject(&self, err: StationError) -> Result<(), StationError> {
        let mut dashboard = self.dashboard.lock();
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((_, previous)) = self.inflight.lock().take() {
            previous.cancel();
        }
        dashboard.hide_loading();
        dashboard.show_error(&err.user_message());
        *self.state.lock() = StationState::ErrorShown;
        tracing::debug!(seq, "request rejected: {err}");
        Err(err)
    }

    async fn run<F>(&self, request: &Request<D>, work: F) -> Result<WeatherSnapshot, StationError>
    where
        F: Future<Output = Result<WeatherSnapshot, StationError>>,
    {
        tokio::select! {
            biased;
            _ = request.token.cancelled() => Err(StationError::Cancelled),
            _ = self.shutdown.cancelled() => Err(StationError::Cancelled),
            outcome = work => outcome,
        }
    }

    fn finish(
        &self,
        request: Request<D>,
        outcome: Result<WeatherSnapshot, StationError>,
    ) -> Result<(), StationError> {
        let result = {
            let mut dashboard = self.dashboard.lock();

            if self.latest.load(Ordering::SeqCst) != request.seq {
                tracing::debug!(seq = request.seq, "discarding superseded response");
                Err(StationError::Cancelled)
            } else {
                match outcome {
                    Ok(snapshot) => {
                        let view = DashboardView::build(&snapshot, &Local);
                        dashboard.render(&view);
                        dashboard.hide_error();
                        *self.snapshot.lock() = Some(Arc::new(snapshot));
                        *self.state.lock() = StationState::Displaying;
                        Ok(())
                    }
                    Err(StationError::Cancelled) => {
                        *self.state.lock() = StationState::Idle;
                        Err(StationError::Cancelled)
                    }
                    Err(err) => {
                        tracing::warn!("weather request failed: {err}");
                        dashboard.show_error(&err.user_message());
                        *self.state.lock() = StationState::ErrorShown;
                        Err(err)
                    }
                }
            }
        };

        {
            let mut inflight = self.inflight.lock();
            if inflight.as_ref().is_some_and(|(seq, _)| *seq == request.seq) {
                *inflight = None;
            }
        }

        drop(request);
        result
    }
}
