use thiserror::Error;

/// Reasons a formula cannot be resolved.
///
/// These never escape [`evaluate`](super::evaluate); they surface as the
/// `#ERROR` sentinel. [`try_evaluate`](super::try_evaluate) hands them to
/// callers that want to tell the user what went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Invalid cell reference: {0:?}")]
    InvalidReference(String),

    #[error("Missing range argument")]
    EmptyArgument,
}
