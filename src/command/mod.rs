//! Command Module
//!
//! This module is the typed face of the host's command subsystem. It turns
//! opaque tokens and C callbacks into handles, handler objects and scope
//! guards whose lifetimes the compiler checks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐   find / create   ┌─────────────────┐
//! │   CommandBus    │<──────────────────│     Command     │
//! │                 │                   │  (handle, Copy) │
//! └────────▲────────┘                   └───┬─────────┬───┘
//!          │                        handle()│         │hold_down()
//!          │                                ▼         ▼
//!          │ register / unregister ┌──────────────┐ ┌─────────────┐
//!          ├───────────────────────│ Handler-     │ │ CommandHold │
//!          │                       │ Registration │ │ begin / end │
//!          │ phase callback        │   <H>        │ └──────┬──────┘
//!          └──────────────────────>│ trampoline   │        │
//!                                  │   → H        │        │
//!          ┌───────────────────────┴──────────────┘        │
//!          └────────────────────── begin / end ────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - A `Command` only ever wraps a token its bus issued.
//! - A registration registers exactly once and unregisters exactly once, with
//!   the same four values.
//! - A handler's storage outlives every call the host can make into it, even
//!   when the handler drops its own registration during that call.
//! - A hold sends exactly one Begin and exactly one End, on every exit path.
//! - Nothing unwinds across the host's C boundary.

pub mod error;
pub mod handle;
pub mod handler;
pub mod hold;
pub mod registration;

// Re-export the main types
pub use error::{CommandError, Result};
pub use handle::Command;
pub use handler::{CommandHandler, FnHandler, Outcome};
pub use hold::CommandHold;
pub use registration::HandlerRegistration;
