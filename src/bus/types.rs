//! Host Boundary Types
//!
//! This module defines the values that cross the boundary between this crate
//! and the host's command subsystem.
//!
//! ## Calling Convention
//!
//! The host knows nothing about Rust types. Every phase notification arrives
//! through a plain `extern "C"` function with this shape:
//!
//! ```text
//! int callback(void* command, int phase, void* context)
//! ```
//!
//! - `command` is the opaque token of the command whose phase changed
//! - `phase` is one of the raw tags in [`raw_phase`]
//! - `context` is whatever pointer was handed over at registration
//! - the return value is `1` to let the host's default handling proceed,
//!   `0` to suppress it
//!
//! The typed wrappers here ([`CommandRef`], [`Phase`], [`HandlerOrder`]) exist
//! so the rest of the crate never touches the raw integers directly.

use std::ffi::{c_int, c_void};
use std::fmt;
use std::num::NonZeroUsize;

/// Raw phase tags as the host delivers them.
pub mod raw_phase {
    use std::ffi::c_int;

    pub const BEGIN: c_int = 0;
    pub const CONTINUE: c_int = 1;
    pub const END: c_int = 2;
}

/// Raw host decisions returned from a phase callback.
pub mod raw_decision {
    use std::ffi::c_int;

    /// Let the host's default handling run.
    pub const PROCEED: c_int = 1;
    /// Stop the host's default handling for this phase.
    pub const SUPPRESS: c_int = 0;
}

/// The raw command token as it appears in the host's C signatures.
pub type RawCommandRef = *mut c_void;

/// The fixed signature of every phase callback handed to the host.
///
/// # Safety
///
/// Implementations receive an opaque context pointer and must only be called
/// with the context they were registered with.
pub type PhaseCallback =
    unsafe extern "C" fn(command: RawCommandRef, phase: c_int, context: *mut c_void) -> c_int;

/// An opaque command token issued by a [`CommandBus`](super::CommandBus).
///
/// Tokens are never zero. They stay valid for the lifetime of the bus that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CommandRef(NonZeroUsize);

impl CommandRef {
    /// Wraps a non-zero token value. Intended for bus implementations.
    pub const fn new(token: NonZeroUsize) -> Self {
        Self(token)
    }

    /// Converts a raw host pointer into a token, rejecting null.
    pub fn from_raw(raw: RawCommandRef) -> Option<Self> {
        NonZeroUsize::new(raw as usize).map(Self)
    }

    /// Returns the token as the host's raw pointer type.
    pub fn as_raw(self) -> RawCommandRef {
        self.0.get() as RawCommandRef
    }

    /// Returns the numeric token value.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for CommandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0.get())
    }
}

/// One stage of a command's activation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The command has begun (button pressed, key down).
    Begin,
    /// Sent periodically while the command is held.
    Continue,
    /// The command has been released.
    End,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Phase; 3] = [Phase::Begin, Phase::Continue, Phase::End];

    /// Decodes a raw host tag. Returns `None` for tags the host should never send.
    pub fn from_raw(raw: c_int) -> Option<Self> {
        match raw {
            raw_phase::BEGIN => Some(Phase::Begin),
            raw_phase::CONTINUE => Some(Phase::Continue),
            raw_phase::END => Some(Phase::End),
            _ => None,
        }
    }

    /// Encodes this phase as the host's raw tag.
    pub fn as_raw(self) -> c_int {
        match self {
            Phase::Begin => raw_phase::BEGIN,
            Phase::Continue => raw_phase::CONTINUE,
            Phase::End => raw_phase::END,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Begin => "begin",
            Phase::Continue => "continue",
            Phase::End => "end",
        };
        f.write_str(name)
    }
}

/// Whether a listener runs before or after the host's own handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerOrder {
    /// Runs ahead of the host's built-in behavior and may suppress it.
    BeforeHost,
    /// Runs once the host (and every `BeforeHost` listener) is done.
    AfterHost,
}

impl HandlerOrder {
    /// Returns the host's boolean flag for this ordering.
    pub fn is_before(self) -> bool {
        matches!(self, HandlerOrder::BeforeHost)
    }

    /// Builds an ordering from the host's boolean flag.
    pub fn from_before(before: bool) -> Self {
        if before {
            HandlerOrder::BeforeHost
        } else {
            HandlerOrder::AfterHost
        }
    }
}

impl fmt::Display for HandlerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerOrder::BeforeHost => f.write_str("before-host"),
            HandlerOrder::AfterHost => f.write_str("after-host"),
        }
    }
}
