//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use livechat_client::{CustomerId, Environment};
use livechat_proto::OutboundEvent;

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal client and simulation.
///
/// # Implementations
///
/// - **Terminal**: crossterm keys, ratatui rendering, WebSocket channel, HTTP
///   customer directory
/// - **Simulation**: in-memory queues and a simulated backend
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next event: user input, a channel event, or a finished
    /// details fetch.
    ///
    /// Returns `None` if no event is ready.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Open the chat channel.
    ///
    /// On success the channel reports [`livechat_proto::InboundEvent::Connect`]
    /// through [`Driver::poll_event`].
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be established.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Emit an event on the chat channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be handed to the channel.
    fn emit(&mut self, event: OutboundEvent) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Start fetching a customer's details. The result arrives later as
    /// [`AppEvent::CustomerDetailsLoaded`] or
    /// [`AppEvent::CustomerDetailsFailed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be started.
    fn request_customer_details(
        &mut self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render<E: Environment>(&mut self, app: &App<E>) -> Result<(), Self::Error>;

    /// Stop the channel and clean up resources.
    fn stop(&mut self);
}
