use error_stack::{Context, Report};
use tracing_error::SpanTrace;

use crate::types;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// An error about to leave the HTTP boundary.
///
/// Pairs the serializable [user-facing error](types::Error) with the report
/// and span trace that produced it, so handlers stay `?`-friendly while
/// responses stay structured.
pub struct Error {
    error_type: types::Error,
    report: Option<Report<Opaque>>,
    trace: SpanTrace,
}

// Reports of any context are chained onto this one so that `Error` does
// not need to be generic over what failed underneath.
#[derive(Debug, thiserror::Error)]
#[error("request could not be served")]
struct Opaque;

impl Error {
    #[must_use]
    pub fn new(error_type: types::Error) -> Self {
        Self {
            error_type,
            report: None,
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn from_context(error_type: types::Error, context: impl Context) -> Self {
        Self {
            error_type,
            report: Some(Report::new(context).change_context(Opaque)),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn from_report(error_type: types::Error, report: Report<impl Context>) -> Self {
        Self {
            error_type,
            report: Some(report.change_context(Opaque)),
            trace: SpanTrace::capture(),
        }
    }
}

impl Error {
    #[must_use]
    pub fn as_type(&self) -> &types::Error {
        &self.error_type
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("type", &self.error_type)
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error_type)?;
        if let Some(report) = &self.report {
            writeln!(f, ": {report:?}")?;
        }
        std::fmt::Display::fmt(&self.trace, f)
    }
}
