//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Driver`]: Platform-specific I/O

use livechat_client::Environment;

use crate::{App, AppAction, AppEvent, Driver};

/// Outcome of one runtime step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The driver had no event ready.
    Idle,
    /// An event was processed.
    Progress,
    /// The app asked to quit.
    Quit,
}

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for local timestamps
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App<E>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime with the given driver and app.
    pub fn new(driver: D, app: App<E>) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop until the app quits.
    ///
    /// Intended for drivers whose `poll_event` waits for the next event.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        if self.start().await? != Step::Quit {
            while self.step().await? != Step::Quit {}
        }

        self.driver.stop();
        Ok(())
    }

    /// Render, apply the app's start-up actions and open the channel.
    ///
    /// A channel that cannot be opened is reported to the app, which shows
    /// it to the user; it is not retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn start(&mut self) -> Result<Step, D::Error> {
        self.driver.render(&self.app)?;

        let actions = self.app.start();
        if self.execute(actions).await? {
            return Ok(Step::Quit);
        }

        if let Err(e) = self.driver.connect().await {
            tracing::warn!(error = %e, "chat channel unavailable");
            let actions = self.app.handle(AppEvent::ChannelFailed { reason: e.to_string() });
            if self.execute(actions).await? {
                return Ok(Step::Quit);
            }
        }

        Ok(Step::Progress)
    }

    /// Process at most one event from the driver.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn step(&mut self) -> Result<Step, D::Error> {
        let Some(event) = self.driver.poll_event().await? else {
            return Ok(Step::Idle);
        };

        let actions = self.app.handle(event);
        if self.execute(actions).await? { Ok(Step::Quit) } else { Ok(Step::Progress) }
    }

    /// Process events until the driver has none ready or the app quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run_until_idle(&mut self) -> Result<Step, D::Error> {
        loop {
            match self.step().await? {
                Step::Progress => {},
                outcome => return Ok(outcome),
            }
        }
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if the app asked to quit.
    async fn execute(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Emit(event) => self.driver.emit(event).await?,
                AppAction::FetchCustomerDetails { customer_id } => {
                    self.driver.request_customer_details(customer_id).await?;
                },
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App<E> {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App<E> {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the Driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
