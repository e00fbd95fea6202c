use std::future::Future;

use futures::future::BoxFuture;

use crate::error::EngineError;

pub(crate) type StepFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), EngineError>> + Send>;

/// One named, reversible unit of work inside a transaction.
///
/// The forward and reverse closures capture whatever shared handles they
/// need (guarded components, repositories, an [`super::EventLog`]); each
/// runs at most once, and the transaction driver consumes the operation
/// to run it. For any operation that executed successfully, running the
/// reverse must restore the state the forward observed.
pub struct Operation {
    pub(crate) name: String,
    pub(crate) forward: StepFn,
    pub(crate) reverse: Option<StepFn>,
}

impl Operation {
    pub fn new<F, FFut, R, RFut>(name: impl Into<String>, forward: F, reverse: R) -> Self
    where
        F: FnOnce() -> FFut + Send + 'static,
        FFut: Future<Output = Result<(), EngineError>> + Send + 'static,
        R: FnOnce() -> RFut + Send + 'static,
        RFut: Future<Output = Result<(), EngineError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            forward: Box::new(move || Box::pin(forward())),
            reverse: Some(Box::new(move || Box::pin(reverse()))),
        }
    }

    /// An operation with no reverse action. Only legal as the final
    /// operation of a transaction, so a downstream failure can never
    /// require undoing it.
    pub fn irreversible<F, FFut>(name: impl Into<String>, forward: F) -> Self
    where
        F: FnOnce() -> FFut + Send + 'static,
        FFut: Future<Output = Result<(), EngineError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            forward: Box::new(move || Box::pin(forward())),
            reverse: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_irreversible(&self) -> bool {
        self.reverse.is_none()
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("irreversible", &self.is_irreversible())
            .finish()
    }
}
