//! The failure policy shared by every parser, and the diagnostics collected
//! when records are skipped.

use crate::parsing::error::ParseError;
use log::warn;

/// How a parser reacts to a single malformed record (a grid entry, a point
/// entry, an XML point).
///
/// Batch-level failures such as unreadable XML always abort, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Skip the record, log a warning and keep it as a [`Diagnostic`].
    #[default]
    Lenient,
    /// Abort the whole batch with the record's error.
    Strict,
}

/// A record dropped under [`FailurePolicy::Lenient`].
#[derive(Debug)]
pub struct Diagnostic {
    /// Position of the record in the payload (entry index or XML point index).
    pub index: usize,
    pub error: ParseError,
}

/// Parser output together with the records that were skipped on the way.
#[derive(Debug)]
pub struct Parsed<T> {
    pub data: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            diagnostics: Vec::new(),
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Parsed<U>, E> {
        Ok(Parsed {
            data: f(self.data)?,
            diagnostics: self.diagnostics,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl FailurePolicy {
    /// Applies the policy to one record's outcome.
    ///
    /// Returns `Ok(Some(value))` for a good record, `Ok(None)` for a skipped one
    /// (pushed onto `diagnostics`), and `Err` when the policy is strict.
    pub(crate) fn handle<T>(
        &self,
        index: usize,
        outcome: Result<T, ParseError>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<T>, ParseError> {
        match outcome {
            Ok(value) => Ok(Some(value)),
            Err(error) => match self {
                FailurePolicy::Strict => Err(error),
                FailurePolicy::Lenient => {
                    warn!("Skipping record {}: {}", index, error);
                    diagnostics.push(Diagnostic { index, error });
                    Ok(None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_collects_diagnostic() {
        let mut diagnostics = Vec::new();
        let outcome: Result<f64, ParseError> = Err(ParseError::MissingField("utctime".into()));
        let handled = FailurePolicy::Lenient
            .handle(3, outcome, &mut diagnostics)
            .expect("lenient never fails");
        assert!(handled.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].index, 3);
    }

    #[test]
    fn test_strict_propagates() {
        let mut diagnostics = Vec::new();
        let outcome: Result<f64, ParseError> = Err(ParseError::MissingField("utctime".into()));
        let handled = FailurePolicy::Strict.handle(0, outcome, &mut diagnostics);
        assert!(matches!(handled, Err(ParseError::MissingField(_))));
        assert!(diagnostics.is_empty());
    }
}
