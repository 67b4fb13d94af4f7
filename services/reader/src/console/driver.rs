//! services/reader/src/console/driver.rs
//!
//! Runs the shell's state machine on the async runtime: every issued request
//! becomes a spawned fetch task tagged with its `RequestToken`, and results flow
//! back through a channel. Issuing a newer request cancels the previous task.

use crate::console::protocol::Command;
use maidat_core::{
    ContentError, DailyContent, DailyContentRequester, Day, DayError, RequestToken, Resolution,
    ShellState,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A finished fetch, reported by its task.
#[derive(Debug)]
struct FetchOutcome {
    token: RequestToken,
    result: Result<DailyContent, ContentError>,
}

/// What a command did to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A new fetch was issued.
    Fetching(RequestToken),
    /// No state change: a closed boundary, the current day, or retry outside
    /// the error state.
    Ignored,
    Rejected(DayError),
    Quit,
}

/// Owns the shell state and drives its fetches.
pub struct ShellDriver {
    state: ShellState,
    requester: Arc<DailyContentRequester>,
    results_tx: mpsc::UnboundedSender<FetchOutcome>,
    results_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    in_flight: Option<CancellationToken>,
}

impl ShellDriver {
    /// Mounts the shell on `start_day` and starts its first fetch.
    /// Must be called from within a Tokio runtime.
    pub fn mount(requester: Arc<DailyContentRequester>, start_day: Day) -> Self {
        let (state, token) = ShellState::mount(start_day);
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let mut driver = Self {
            state,
            requester,
            results_tx,
            results_rx,
            in_flight: None,
        };
        driver.dispatch(token);
        driver
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Applies one user command.
    pub fn handle(&mut self, command: Command) -> CommandOutcome {
        let issued = match command {
            Command::Next => self.state.next_day(),
            Command::Prev => self.state.prev_day(),
            Command::Retry => self.state.retry(),
            Command::Goto(day) => match self.state.select_day(day) {
                Ok(token) => token,
                Err(e) => return CommandOutcome::Rejected(e),
            },
            Command::Quit => {
                self.cancel_in_flight();
                return CommandOutcome::Quit;
            }
        };

        match issued {
            Some(token) => {
                self.dispatch(token);
                CommandOutcome::Fetching(token)
            }
            None => CommandOutcome::Ignored,
        }
    }

    /// Waits for the next finished fetch and feeds it to the state machine.
    pub async fn next_resolution(&mut self) -> Option<Resolution> {
        let outcome = self.results_rx.recv().await?;
        let resolution = self.state.resolve(outcome.token, outcome.result);
        if resolution == Resolution::Applied {
            self.in_flight = None;
        }
        Some(resolution)
    }

    fn cancel_in_flight(&mut self) {
        if let Some(cancel) = self.in_flight.take() {
            cancel.cancel();
        }
    }

    fn dispatch(&mut self, token: RequestToken) {
        self.cancel_in_flight();
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());

        let requester = self.requester.clone();
        let results_tx = self.results_tx.clone();
        info!(day = token.day.get(), generation = token.generation, "Fetching daily content");

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(day = token.day.get(), "Fetch cancelled by a newer request");
                }
                result = requester.fetch_day(token.day) => {
                    if results_tx.send(FetchOutcome { token, result }).is_err() {
                        warn!(day = token.day.get(), "Shell closed before the fetch finished");
                    }
                }
            }
        });
    }
}

impl Drop for ShellDriver {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
