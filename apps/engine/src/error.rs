use thiserror::Error;

use crate::errors::validation::ValidationError;

/// Top-level error type for the engine.
///
/// `Validation` failures surface before any mutation and are safe to show
/// to the initiating client. Everything else is an execution-path failure:
/// the caller may assume state is unchanged (a failed transaction rolls
/// back its applied prefix before returning).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// A specific operation's forward action failed; prior operations in
    /// the same transaction have been rolled back.
    #[error("operation '{name}' failed: {source}")]
    Operation {
        name: String,
        #[source]
        source: Box<EngineError>,
    },
    /// A failure while undoing a previously applied operation. The execute
    /// path only logs this; the type exists so operator tooling can
    /// construct and alarm on it.
    #[error("rollback of operation '{name}' failed: {detail}")]
    Rollback { name: String, detail: String },
    #[error("unknown effect: {0}")]
    UnknownEffect(String),
    #[error("transaction already finished")]
    TransactionFinished,
    #[error("irreversible operation '{name}' must be the last operation in a transaction")]
    IrreversibleNotLast { name: String },
    #[error("cancelled")]
    Cancelled,
    #[error("repository error: {detail}")]
    Repo { detail: String },
    #[error("configuration error: {detail}")]
    Config { detail: String },
}

impl EngineError {
    pub fn operation(name: impl Into<String>, source: EngineError) -> Self {
        Self::Operation {
            name: name.into(),
            source: Box::new(source),
        }
    }

    pub fn rollback(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Rollback {
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn unknown_effect(effect_id: impl Into<String>) -> Self {
        Self::UnknownEffect(effect_id.into())
    }

    pub fn repo(detail: impl Into<String>) -> Self {
        Self::Repo {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    /// True when this error (or the operation failure wrapping it) is a
    /// cancellation, so callers can decide whether a retry makes sense.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Operation { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// The validation failure carried by this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(v) => Some(v),
            Self::Operation { source, .. } => source.as_validation(),
            _ => None,
        }
    }
}
