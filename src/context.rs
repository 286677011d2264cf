//! Cancellation and deadline carrier passed to every container operation.
//!
//! The in-memory container ignores it. Backends that do I/O, and functions
//! handed to the adapters, can call [`Context::check`] before doing work.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{Error, Result};

/// Carries an optional deadline and a cancellation signal.
///
/// Cloning is cheap; clones observe the same cancellation. Contexts derived
/// with [`with_cancel`](Context::with_cancel), [`with_deadline`](Context::with_deadline)
/// or [`with_timeout`](Context::with_timeout) are cancelled whenever their
/// parent is, and never outlive the parent's deadline.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    parent: Option<Context>,
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl Context {
    /// An empty context: never cancelled and without a deadline.
    pub fn background() -> Context {
        Context {
            inner: Arc::new(Inner {
                parent: None,
                deadline: None,
                cancelled: None,
            }),
        }
    }

    /// Derive a context that can be cancelled through the returned handle.
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = self.derive(self.deadline(), Some(flag.clone()));
        (ctx, CancelHandle { flag })
    }

    /// Derive a context that expires at `deadline`, or at the parent's
    /// deadline if that one is earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Context {
        let deadline = match self.deadline() {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        self.derive(Some(deadline), None)
    }

    /// Derive a context that expires `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Context {
        self.with_deadline(Instant::now() + timeout)
    }

    fn derive(&self, deadline: Option<Instant>, cancelled: Option<Arc<AtomicBool>>) -> Context {
        Context {
            inner: Arc::new(Inner {
                parent: Some(self.clone()),
                deadline,
                cancelled,
            }),
        }
    }

    /// The effective deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Whether this context or one of its ancestors was cancelled.
    pub fn is_cancelled(&self) -> bool {
        let own = self
            .inner
            .cancelled
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Acquire));
        own || self
            .inner
            .parent
            .as_ref()
            .map_or(false, Context::is_cancelled)
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline()
            .map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// Whether work under this context should stop.
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }

    /// Returns `Err(Error::Cancelled)` or `Err(Error::DeadlineExceeded)`
    /// once the context is done. Cancellation wins when both hold.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else if self.is_expired() {
            Err(Error::DeadlineExceeded)
        } else {
            Ok(())
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.deadline())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Cancels the context it was created with, and everything derived from it.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel the context. Repeated calls have no further effect.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](CancelHandle::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
