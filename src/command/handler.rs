//! The Command Handler Capability
//!
//! Any type can react to a command's phases by implementing
//! [`CommandHandler`]. There is no base type to inherit from and no boxing:
//! [`Command::handle`](super::Command::handle) is generic over the handler,
//! so each registration gets its own monomorphized callback.
//!
//! Handler methods take `&self`. The host may re-enter a handler (a Begin
//! handler that triggers its own command, say), and shared access keeps that
//! sound. Handlers that carry state use `Cell` / `RefCell`.

use crate::bus::{raw_decision, Phase};
use std::ffi::c_int;
use std::fmt;

/// A handler's decision for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Allow the host to handle the command.
    Continue,
    /// Prevent the host from handling the command.
    Halt,
    /// Return this when running after the host. Behaves like `Continue`.
    Irrelevant,
}

impl Outcome {
    /// Whether the host's default handling may run.
    pub fn lets_host_proceed(self) -> bool {
        match self {
            Outcome::Continue | Outcome::Irrelevant => true,
            Outcome::Halt => false,
        }
    }

    /// The value the host expects back from a phase callback.
    pub fn as_raw(self) -> c_int {
        if self.lets_host_proceed() {
            raw_decision::PROCEED
        } else {
            raw_decision::SUPPRESS
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Continue => f.write_str("continue"),
            Outcome::Halt => f.write_str("halt"),
            Outcome::Irrelevant => f.write_str("irrelevant"),
        }
    }
}

/// Reacts to the phases of a command.
///
/// All three methods are required: every phase needs an explicit policy,
/// even if it is always [`Outcome::Continue`].
///
/// # Example
///
/// ```
/// use cmdbind::{CommandHandler, Outcome};
/// use std::cell::Cell;
///
/// #[derive(Default)]
/// struct LandingLight {
///     on: Cell<bool>,
/// }
///
/// impl CommandHandler for LandingLight {
///     fn on_begin(&self) -> Outcome {
///         self.on.set(!self.on.get());
///         Outcome::Halt
///     }
///     fn on_continue(&self) -> Outcome {
///         Outcome::Continue
///     }
///     fn on_end(&self) -> Outcome {
///         Outcome::Continue
///     }
/// }
/// ```
pub trait CommandHandler {
    /// The command has begun.
    fn on_begin(&self) -> Outcome;

    /// The command is still held down.
    fn on_continue(&self) -> Outcome;

    /// The command has been released.
    fn on_end(&self) -> Outcome;

    /// Routes a decoded phase to the matching method.
    fn on_phase(&self, phase: Phase) -> Outcome {
        match phase {
            Phase::Begin => self.on_begin(),
            Phase::Continue => self.on_continue(),
            Phase::End => self.on_end(),
        }
    }
}

/// Adapts a closure over [`Phase`] into a [`CommandHandler`].
///
/// ```
/// use cmdbind::{FnHandler, Outcome, Phase};
///
/// let gate = FnHandler::new(|phase| match phase {
///     Phase::Begin => Outcome::Halt,
///     _ => Outcome::Continue,
/// });
/// # let _ = gate;
/// ```
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(Phase) -> Outcome,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(Phase) -> Outcome,
{
    fn on_begin(&self) -> Outcome {
        (self.f)(Phase::Begin)
    }

    fn on_continue(&self) -> Outcome {
        (self.f)(Phase::Continue)
    }

    fn on_end(&self) -> Outcome {
        (self.f)(Phase::End)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}
