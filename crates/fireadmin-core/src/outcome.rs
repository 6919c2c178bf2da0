//! Tagged result of a single call to an external service.
//!
//! Callers pattern-match on the tag instead of inspecting error kinds, so
//! "the thing is absent" and "the call failed" are decided at the call site.

use crate::error::FireadminError;

#[derive(Debug)]
pub enum StepOutcome<T> {
    Ok(T),
    NotFound,
    Error(FireadminError),
}

impl<T> StepOutcome<T> {
    /// Classify a library result. `FireadminError::NotFound` becomes
    /// `StepOutcome::NotFound`; every other error is kept as `Error`.
    pub fn from_result(result: Result<T, FireadminError>) -> Self {
        match result {
            Ok(value) => StepOutcome::Ok(value),
            Err(e) if e.is_not_found() => StepOutcome::NotFound,
            Err(e) => StepOutcome::Error(e),
        }
    }

    /// Collapse back into a `Result`, treating absence as an error about `what`.
    pub fn into_result(self, what: impl Into<String>) -> Result<T, FireadminError> {
        match self {
            StepOutcome::Ok(value) => Ok(value),
            StepOutcome::NotFound => Err(FireadminError::NotFound(what.into())),
            StepOutcome::Error(e) => Err(e),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, StepOutcome::Ok(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StepOutcome::NotFound)
    }
}

impl<T> From<Result<T, FireadminError>> for StepOutcome<T> {
    fn from(result: Result<T, FireadminError>) -> Self {
        Self::from_result(result)
    }
}
