//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`livechat_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! A driver either stands alone (tests inject channel events directly) or is
//! attached to a [`SharedBackend`], in which case emitted events are encoded
//! and handed to the simulated backend and its frames are decoded back into
//! [`AppEvent`]s.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use livechat_app::{App, AppEvent, Driver};
use livechat_client::{CustomerId, Environment, SenderRole};
use livechat_proto::{Envelope, InboundEvent, OutboundEvent};

use crate::{
    ConnectionId, SharedBackend, SimBackend,
    invariants::{ClientSnapshot, InvariantRegistry, SystemSnapshot},
};

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("sim driver: {0}")]
pub struct SimDriverError(pub String);

/// Shared state for event injection and inspection.
///
/// This allows injection from outside async contexts.
#[derive(Default)]
struct SharedState {
    pending_events: VecDeque<AppEvent>,
    emitted: Vec<OutboundEvent>,
    details_requests: Vec<CustomerId>,
    renders: usize,
    connect_failure: Option<String>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`livechat_app::Runtime`]
/// orchestration code runs in both the terminal client and simulation tests.
pub struct SimDriver {
    id: u64,
    role: SenderRole,
    customer_id: Option<CustomerId>,
    state: Arc<Mutex<SharedState>>,
    backend: Option<SharedBackend>,
    connection: Option<ConnectionId>,
    invariants: Option<InvariantRegistry>,
}

impl SimDriver {
    /// Standalone driver for a client acting as `role`.
    pub fn new(role: SenderRole) -> Self {
        Self {
            id: 0,
            role,
            customer_id: None,
            state: Arc::new(Mutex::new(SharedState::default())),
            backend: None,
            connection: None,
            invariants: None,
        }
    }

    /// Visitor driver for `customer_id`, attached to `backend`.
    pub fn visitor(backend: SharedBackend, customer_id: CustomerId) -> Self {
        Self { customer_id: Some(customer_id), backend: Some(backend), ..Self::new(SenderRole::Visitor) }
    }

    /// Agent driver attached to `backend`.
    pub fn agent(backend: SharedBackend) -> Self {
        Self { backend: Some(backend), ..Self::new(SenderRole::Agent) }
    }

    /// Client id used in invariant snapshots.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Make the next `connect` fail with `reason`.
    pub fn fail_connect(&self, reason: &str) {
        self.lock().connect_failure = Some(reason.to_string());
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().pending_events.push_back(event);
    }

    /// Inject a channel event.
    pub fn inject_channel(&self, event: InboundEvent) {
        self.inject_event(AppEvent::Channel(event));
    }

    /// Inject a tick event.
    pub fn inject_tick(&self) {
        self.inject_event(AppEvent::Tick);
    }

    /// Take all events emitted on the channel so far.
    pub fn take_emitted(&self) -> Vec<OutboundEvent> {
        std::mem::take(&mut self.lock().emitted)
    }

    /// Customers whose details were requested.
    pub fn details_requests(&self) -> Vec<CustomerId> {
        self.lock().details_requests.clone()
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        self.lock().renders
    }

    /// True once the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Backend connection, once connected.
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.lock().pending_events.is_empty()
    }

    /// Create a snapshot from App state for invariant checking.
    pub fn snapshot_from_app<E: Environment>(&self, app: &App<E>) -> SystemSnapshot {
        SystemSnapshot::single(ClientSnapshot::from_app(self.id, app))
    }

    /// Check invariants against App state.
    pub fn check_invariants<E: Environment>(&self, app: &App<E>, context: &str) {
        if let Some(registry) = &self.invariants {
            registry.assert_all(&self.snapshot_from_app(app), context);
        }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_backend<T>(&self, f: impl FnOnce(&mut SimBackend) -> T) -> Option<T> {
        let backend = self.backend.as_ref()?;
        let mut guard = backend.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut guard))
    }

    /// Move frames the backend queued for this client into pending events.
    fn pull_frames(&self) {
        let Some(connection) = self.connection else {
            return;
        };
        let frames = self.with_backend(|b| b.take_frames(connection)).unwrap_or_default();

        let mut state = self.lock();
        for frame in frames {
            if let Some(event) = AppEvent::from_channel(Envelope::decode_inbound(&frame)) {
                state.pending_events.push_back(event);
            }
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        if !self.has_pending() {
            self.pull_frames();
        }
        Ok(self.lock().pending_events.pop_front())
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        if let Some(reason) = self.lock().connect_failure.take() {
            return Err(SimDriverError(reason));
        }

        let (role, customer_id) = (self.role, self.customer_id);
        let connection = self.with_backend(|b| match (role, customer_id) {
            (SenderRole::Visitor, Some(customer_id)) => Some(b.connect_visitor(customer_id)),
            (SenderRole::Agent, _) => Some(b.connect_agent()),
            _ => None,
        });

        match connection {
            Some(Some(connection)) => self.connection = Some(connection),
            Some(None) => return Err(SimDriverError("visitor without customer".into())),
            None => self.inject_channel(InboundEvent::Connect),
        }
        Ok(())
    }

    async fn emit(&mut self, event: OutboundEvent) -> Result<(), Self::Error> {
        self.lock().emitted.push(event.clone());

        let Some(connection) = self.connection else {
            return Ok(());
        };
        let text = Envelope::encode_outbound(&event, self.role)
            .map_err(|e| SimDriverError(e.to_string()))?;
        self.with_backend(|b| b.receive(connection, &text))
            .transpose()
            .map_err(|e| SimDriverError(e.to_string()))?;
        Ok(())
    }

    async fn request_customer_details(&mut self, customer_id: CustomerId) -> Result<(), Self::Error> {
        self.lock().details_requests.push(customer_id);

        let details = self.with_backend(|b| b.customer_details(customer_id).cloned());
        let event = match details {
            Some(Some(details)) => AppEvent::CustomerDetailsLoaded { customer_id, details },
            Some(None) => AppEvent::CustomerDetailsFailed { customer_id, reason: "404".into() },
            None => return Ok(()),
        };
        self.inject_event(event);
        Ok(())
    }

    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error> {
        self.lock().renders += 1;
        self.check_invariants(app, "after render");
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
        if let Some(connection) = self.connection.take() {
            self.with_backend(|b| b.disconnect(connection));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inject_event_queues_event() {
        let driver = SimDriver::new(SenderRole::Visitor);
        driver.inject_tick();

        assert!(driver.has_pending());
    }

    #[tokio::test]
    async fn standalone_connect_reports_connect() {
        let mut driver = SimDriver::new(SenderRole::Visitor);

        driver.connect().await.unwrap();

        assert_eq!(
            driver.poll_event().await.unwrap(),
            Some(AppEvent::Channel(InboundEvent::Connect))
        );
        assert_eq!(driver.poll_event().await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_connect_is_one_shot() {
        let mut driver = SimDriver::new(SenderRole::Agent);
        driver.fail_connect("refused");

        assert_eq!(driver.connect().await, Err(SimDriverError("refused".into())));
        assert!(driver.connect().await.is_ok());
    }

    #[tokio::test]
    async fn backend_frames_become_events() {
        let backend = SimBackend::default().shared();
        let mut driver = SimDriver::visitor(backend, 42);

        driver.connect().await.unwrap();

        assert_eq!(
            driver.poll_event().await.unwrap(),
            Some(AppEvent::Channel(InboundEvent::Connect))
        );
    }
}
