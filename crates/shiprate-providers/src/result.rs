//! Outcome of one distance calculation.

use shiprate_core::Distance;

use crate::dispatch::Dispatcher;

/// Success-or-failure of a calculation. A failed calculation has no
/// distance by construction.
#[derive(Debug, Clone)]
pub enum CalcOutcome {
    Success(Distance),
    Failure(String),
}

/// A calculation outcome plus the dispatcher that produced it, kept for
/// post-hoc diagnostics. Built only through the two factory constructors.
#[derive(Debug, Clone)]
pub struct CalcResult {
    outcome: CalcOutcome,
    dispatcher: Option<Dispatcher>,
}

impl CalcResult {
    #[must_use]
    pub fn success(distance: Distance, dispatcher: Dispatcher) -> Self {
        Self {
            outcome: CalcOutcome::Success(distance),
            dispatcher: Some(dispatcher),
        }
    }

    /// `dispatcher` is `None` only when the failure happened before any
    /// HTTP call could be attempted (e.g. missing credentials).
    #[must_use]
    pub fn failure(message: impl Into<String>, dispatcher: Option<Dispatcher>) -> Self {
        Self {
            outcome: CalcOutcome::Failure(message.into()),
            dispatcher,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, CalcOutcome::Failure(_))
    }

    #[must_use]
    pub fn outcome(&self) -> &CalcOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn distance(&self) -> Option<&Distance> {
        match &self.outcome {
            CalcOutcome::Success(distance) => Some(distance),
            CalcOutcome::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            CalcOutcome::Success(_) => None,
            CalcOutcome::Failure(message) => Some(message),
        }
    }

    #[must_use]
    pub fn dispatcher(&self) -> Option<&Dispatcher> {
        self.dispatcher.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_has_message_and_no_distance() {
        let result = CalcResult::failure("api key rejected", None);
        assert!(result.is_error());
        assert_eq!(result.error(), Some("api key rejected"));
        assert!(result.distance().is_none());
        assert!(result.dispatcher().is_none());
    }

    #[test]
    fn success_has_distance_and_no_message() {
        let distance = Distance::from_meters("12300").unwrap();
        let result = CalcResult {
            outcome: CalcOutcome::Success(distance),
            dispatcher: None,
        };
        assert!(!result.is_error());
        assert!(result.error().is_none());
        assert_eq!(result.distance().unwrap().in_meters(), "12300");
    }
}
