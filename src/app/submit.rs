use std::{
    cell::{Cell, RefCell},
    fmt,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use crate::form::SubmitResult;

/// Future returned by a completion callback.
pub type SubmitFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>>>>;

type Callback = Rc<dyn Fn(SubmitResult) -> SubmitFuture>;

/// The single active completion callback, shared by a builder and every form
/// it mounted. Registering again replaces the previous callback everywhere.
#[derive(Clone, Default)]
pub(crate) struct CallbackSlot {
    current: Rc<RefCell<Option<Callback>>>,
}

impl CallbackSlot {
    pub(crate) fn set<F, Fut>(&self, callback: F)
    where
        F: Fn(SubmitResult) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        let callback: Callback =
            Rc::new(move |result: SubmitResult| -> SubmitFuture { Box::pin(callback(result)) });
        *self.current.borrow_mut() = Some(callback);
    }

    pub(crate) fn get(&self) -> Option<Callback> {
        self.current.borrow().clone()
    }
}

impl fmt::Debug for CallbackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered = self.current.borrow().is_some();
        f.debug_struct("CallbackSlot")
            .field("registered", &registered)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

/// What a single submit attempt did.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Every field passed and the callback (if any) settled successfully.
    Completed(SubmitResult),
    /// Names of the invalid fields in declaration order. Focus moved to the
    /// first of them; the callback was not invoked.
    Invalid { fields: Vec<String> },
    /// Another attempt was still in flight; nothing happened.
    Ignored,
    /// The callback returned an error. The form is usable again.
    Failed {
        result: SubmitResult,
        error: anyhow::Error,
    },
}

impl SubmitOutcome {
    pub fn result(&self) -> Option<&SubmitResult> {
        match self {
            SubmitOutcome::Completed(result) | SubmitOutcome::Failed { result, .. } => Some(result),
            SubmitOutcome::Invalid { .. } | SubmitOutcome::Ignored => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed(_))
    }
}

/// Idle/Submitting state of one mounted form.
#[derive(Debug)]
pub(crate) struct SubmitCoordinator {
    phase: Cell<SubmitPhase>,
}

impl Default for SubmitCoordinator {
    fn default() -> Self {
        Self {
            phase: Cell::new(SubmitPhase::Idle),
        }
    }
}

impl SubmitCoordinator {
    pub(crate) fn phase(&self) -> SubmitPhase {
        self.phase.get()
    }

    /// Idle -> Submitting. Returns `false` when an attempt is already running.
    pub(crate) fn try_begin(&self) -> bool {
        if self.phase.get() == SubmitPhase::Submitting {
            return false;
        }
        self.phase.set(SubmitPhase::Submitting);
        true
    }

    pub(crate) fn finish(&self) {
        self.phase.set(SubmitPhase::Idle);
    }
}
