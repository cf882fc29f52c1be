//! # cmdbind - Typed Bindings for a Host Command Subsystem
//!
//! cmdbind wraps a host application's *command* API: named actions that can be
//! triggered or held down, and that any number of observers can react to as
//! they move through their Begin, Continue and End phases. Each observer
//! decides whether the host's own handling of a phase may go ahead.
//!
//! The host speaks C: opaque tokens, an `extern "C"` callback and a `void*`
//! context. cmdbind puts typed handlers behind that callback and ties every
//! registration to a Rust value, so a handler can never be left registered
//! after its storage is gone.
//!
//! ## Features
//!
//! - **Typed handlers**: any type implementing [`CommandHandler`], statically dispatched
//! - **RAII registrations**: dropping a [`HandlerRegistration`] unregisters it
//! - **RAII holds**: a [`CommandHold`] always sends its End, even on panic
//! - **Contained failures**: bad phase tags and handler panics never cross the C boundary
//! - **In-memory bus**: a complete [`InMemoryBus`] for tests and tooling
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              cmdbind                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────────────┐    ┌─────────────────┐      │
//! │  │  Command    │───>│ HandlerRegistration │───>│  your handler   │      │
//! │  │  (handle)   │    │  heap slot + tramp. │    │  impl Command-  │      │
//! │  └──────┬──────┘    └──────────┬──────────┘    │  Handler        │      │
//! │         │                      │ ▲             └─────────────────┘      │
//! │         │ hold_down()          │ │ phase callback                       │
//! │         ▼                      ▼ │                                      │
//! │  ┌─────────────┐    ┌──────────────────────────────────────────────┐    │
//! │  │ CommandHold │───>│            CommandBus (trait)                │    │
//! │  │ begin / end │    │   host FFI implementation  |  InMemoryBus    │    │
//! │  └─────────────┘    └──────────────────────────────────────────────┘    │
//! │                                               ▲                         │
//! │                                               │ tick()                  │
//! │                     ┌─────────────────────────┴───────────────────────┐ │
//! │                     │                 FrameLoop                       │ │
//! │                     │            (Tokio interval timer)               │ │
//! │                     └─────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use cmdbind::{Command, CommandHandler, HandlerOrder, InMemoryBus, Outcome, Phase};
//! use std::cell::Cell;
//!
//! #[derive(Default)]
//! struct ToggleLight {
//!     on: Cell<bool>,
//! }
//!
//! impl CommandHandler for ToggleLight {
//!     fn on_begin(&self) -> Outcome {
//!         self.on.set(!self.on.get());
//!         Outcome::Halt
//!     }
//!     fn on_continue(&self) -> Outcome {
//!         Outcome::Continue
//!     }
//!     fn on_end(&self) -> Outcome {
//!         Outcome::Continue
//!     }
//! }
//!
//! let bus = InMemoryBus::new();
//! let command = Command::create(&bus, "toggle_light", "Toggle the light").unwrap();
//! let light = command.handle(HandlerOrder::BeforeHost, ToggleLight::default());
//!
//! command.trigger_once();
//! assert!(light.handler().on.get());
//!
//! // The host's own handling was suppressed for Begin only.
//! assert_eq!(
//!     bus.phase_log(command.raw()),
//!     vec![(Phase::Begin, false), (Phase::Continue, true), (Phase::End, true)]
//! );
//!
//! // A second create with the same name is an error, not a silent reuse.
//! assert!(Command::create(&bus, "toggle_light", "again").is_err());
//! ```
//!
//! ## Module Overview
//!
//! - [`bus`]: the host service contract, its raw types, the in-memory bus and the frame loop
//! - [`command`]: command handles, the handler capability, registrations and holds
//!
//! ## Design Highlights
//!
//! ### Stable Handler Storage
//!
//! A registration moves its handler into a reference-counted heap slot and
//! hands only that slot's address to the host. The registration value can
//! move around freely; the slot cannot, and it is freed only after the host
//! has been told to forget it and no phase call into it is still running.
//!
//! ### Single-Threaded by Construction
//!
//! Registrations hold raw pointers and are therefore neither `Send` nor
//! `Sync`. The host delivers every phase event on one execution context, and
//! the types make it impossible to observe a handler from another thread.

pub mod bus;
pub mod command;

// Re-export commonly used types for convenience
pub use bus::{
    BusConfig, BusEvent, CommandBus, CommandRef, FrameConfig, FrameLoop, FrameStats,
    HandlerOrder, InMemoryBus, Phase,
};
pub use command::{
    Command, CommandError, CommandHandler, CommandHold, FnHandler, HandlerRegistration, Outcome,
};

/// Version of cmdbind
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
