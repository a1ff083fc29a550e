//! Required vs. optional guard variants.
//!
//! Guards return `Result<T, GuardError>`. The mode decides what a failure means for the
//! request: `Required` turns it into the response, `Optional` drops it and the request
//! continues without that piece of context.
use crate::error::GuardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    Required,
    Optional,
}

impl GuardMode {
    pub fn settle<T>(self, outcome: Result<T, GuardError>) -> Result<Option<T>, GuardError> {
        match (self, outcome) {
            (_, Ok(value)) => Ok(Some(value)),
            (GuardMode::Required, Err(err)) => Err(err),
            (GuardMode::Optional, Err(err)) => {
                tracing::debug!(error = %err, "optional guard failed; continuing without context");
                Ok(None)
            }
        }
    }
}
