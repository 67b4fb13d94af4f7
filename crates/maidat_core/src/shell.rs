//! crates/maidat_core/src/shell.rs
//!
//! The fetch/display state machine of the presentation shell.
//!
//! `ShellState` never performs I/O. Every transition that needs content hands
//! back a `RequestToken`; the caller runs the fetch and reports the outcome
//! through `resolve`, which ignores any token that is no longer current.

use crate::domain::{DailyContent, Day, DayError};
use crate::requester::ContentError;
use chrono::{DateTime, Utc};
use tracing::{error, warn};

/// The fixed, user-facing message shown for every failed fetch.
pub const LOAD_ERROR_MESSAGE: &str = "عذراً، حدث خطأ أثناء تحميل المحتوى. يرجى المحاولة مرة أخرى.";

/// Identifies one issued fetch. Only the most recently issued token resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub day: Day,
    pub generation: u64,
}

/// What the shell is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error(String),
    Ready {
        content: DailyContent,
        fetched_at: DateTime<Utc>,
    },
}

/// Outcome of feeding a fetch result back into the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The token was superseded; state is untouched.
    Stale,
}

/// The session state owned by one shell instance.
#[derive(Debug, Clone)]
pub struct ShellState {
    day: Day,
    view: ViewState,
    generation: u64,
}

impl ShellState {
    /// Initial state on mount: `Loading` for `start_day`.
    pub fn mount(start_day: Day) -> (Self, RequestToken) {
        let mut state = Self {
            day: start_day,
            view: ViewState::Loading,
            generation: 0,
        };
        let token = state.issue();
        (state, token)
    }

    fn issue(&mut self) -> RequestToken {
        self.generation += 1;
        self.view = ViewState::Loading;
        RequestToken {
            day: self.day,
            generation: self.generation,
        }
    }

    // --- Accessors ---

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.view {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&DailyContent> {
        match &self.view {
            ViewState::Ready { content, .. } => Some(content),
            _ => None,
        }
    }

    /// The token a pending fetch must carry to be applied.
    pub fn current_token(&self) -> RequestToken {
        RequestToken {
            day: self.day,
            generation: self.generation,
        }
    }

    pub fn can_go_next(&self) -> bool {
        self.day.next().is_some()
    }

    pub fn can_go_prev(&self) -> bool {
        self.day.prev().is_some()
    }

    // --- Transitions ---

    /// Switches to `day`. Selecting the current day is a no-op.
    pub fn select_day(&mut self, day: u32) -> Result<Option<RequestToken>, DayError> {
        let day = Day::new(day)?;
        if day == self.day {
            return Ok(None);
        }
        self.day = day;
        Ok(Some(self.issue()))
    }

    /// Moves forward one day; ignored on the last day.
    pub fn next_day(&mut self) -> Option<RequestToken> {
        let next = self.day.next()?;
        self.day = next;
        Some(self.issue())
    }

    /// Moves back one day; ignored on the first day.
    pub fn prev_day(&mut self) -> Option<RequestToken> {
        let prev = self.day.prev()?;
        self.day = prev;
        Some(self.issue())
    }

    /// Re-requests the current day. Only available from the error state.
    pub fn retry(&mut self) -> Option<RequestToken> {
        match self.view {
            ViewState::Error(_) => Some(self.issue()),
            _ => None,
        }
    }

    /// Applies a finished fetch if `token` is still current.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<DailyContent, ContentError>,
    ) -> Resolution {
        if token != self.current_token() {
            warn!(
                issued_for = token.day.get(),
                current = self.day.get(),
                "Discarding stale content response"
            );
            return Resolution::Stale;
        }

        self.view = match result {
            Ok(content) => ViewState::Ready {
                content,
                fetched_at: Utc::now(),
            },
            Err(e) => {
                error!(day = token.day.get(), "Failed to load daily content: {}", e);
                ViewState::Error(LOAD_ERROR_MESSAGE.to_string())
            }
        };
        Resolution::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tests::sample_content;
    use crate::ports::PortError;

    fn day(n: u32) -> Day {
        Day::new(n).unwrap()
    }

    fn mounted() -> (ShellState, RequestToken) {
        ShellState::mount(Day::FIRST)
    }

    #[test]
    fn mount_starts_loading_day_one() {
        let (state, token) = mounted();
        assert_eq!(state.day(), Day::FIRST);
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
        assert_eq!(state.content(), None);
        assert_eq!(token.day, Day::FIRST);
    }

    #[test]
    fn successful_fetch_becomes_ready_for_every_day() {
        for n in 1..=30 {
            let (mut state, _) = ShellState::mount(day(n));
            let token = state.current_token();
            assert_eq!(state.resolve(token, Ok(sample_content())), Resolution::Applied);

            let content = state.content().unwrap();
            assert_eq!(content, &sample_content());
            assert_eq!(content.first_empty_field(), None);
            assert!(!state.is_loading());
        }
    }

    #[test]
    fn failed_fetch_shows_fixed_message() {
        let (mut state, token) = mounted();
        state.resolve(token, Err(ContentError::Malformed("eof".to_string())));
        assert_eq!(state.error(), Some(LOAD_ERROR_MESSAGE));
        assert_eq!(state.content(), None);
    }

    #[test]
    fn transport_and_schema_failures_look_the_same() {
        let (mut a, ta) = mounted();
        let (mut b, tb) = mounted();
        a.resolve(ta, Err(ContentError::Provider(PortError::EmptyResponse)));
        b.resolve(tb, Err(ContentError::EmptyField("zad")));
        assert_eq!(a.view(), b.view());
    }

    #[test]
    fn boundaries_do_not_transition() {
        let (mut state, token) = mounted();
        state.resolve(token, Ok(sample_content()));
        let before = state.view().clone();

        assert_eq!(state.prev_day(), None);
        assert_eq!(state.day(), Day::FIRST);
        assert_eq!(state.view(), &before);

        let (mut state, token) = ShellState::mount(Day::LAST);
        state.resolve(token, Ok(sample_content()));
        assert_eq!(state.next_day(), None);
        assert_eq!(state.day(), Day::LAST);
        assert!(state.content().is_some());
    }

    #[test]
    fn twenty_nine_nexts_reach_the_last_day() {
        let (mut state, _) = mounted();
        for _ in 0..29 {
            assert!(state.next_day().is_some());
        }
        assert_eq!(state.day(), Day::LAST);
        assert!(!state.can_go_next());
        assert!(state.can_go_prev());
        assert_eq!(state.next_day(), None);
    }

    #[test]
    fn select_day_validates_and_ignores_current_day() {
        let (mut state, _) = mounted();
        assert_eq!(state.select_day(0), Err(DayError::OutOfRange(0)));
        assert_eq!(state.select_day(1), Ok(None));

        let token = state.select_day(12).unwrap().unwrap();
        assert_eq!(token.day, day(12));
        assert_eq!(state.day(), day(12));
        assert!(state.is_loading());
    }

    #[test]
    fn retry_reissues_the_same_day_from_error_only() {
        let (mut state, _) = mounted();
        let token = state.select_day(7).unwrap().unwrap();
        assert_eq!(state.retry(), None);

        state.resolve(token, Err(ContentError::Malformed("bad".to_string())));
        let retry = state.retry().unwrap();
        assert_eq!(retry.day, day(7));
        assert_ne!(retry, token);
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn stale_response_is_discarded() {
        let (mut state, first) = mounted();
        let second = state.select_day(5).unwrap().unwrap();

        assert_eq!(state.resolve(first, Ok(sample_content())), Resolution::Stale);
        assert!(state.is_loading());
        assert_eq!(state.day(), day(5));

        assert_eq!(state.resolve(second, Ok(sample_content())), Resolution::Applied);
        assert!(state.content().is_some());
    }

    #[test]
    fn superseded_fetch_for_the_same_day_is_discarded() {
        let (mut state, first) = mounted();
        state.next_day();
        let back = state.prev_day().unwrap();
        assert_eq!(first.day, back.day);

        assert_eq!(
            state.resolve(first, Err(ContentError::Malformed("late".to_string()))),
            Resolution::Stale
        );
        assert!(state.is_loading());
    }
}
