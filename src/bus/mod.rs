//! Command Bus Module
//!
//! This module describes the host service the binding layer talks to, and
//! ships an in-process implementation of it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    command module                           │
//! │   Command ── HandlerRegistration ── CommandHold             │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │  CommandBus trait
//!                            ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  host's command registry        or        InMemoryBus       │
//! │  (plugin FFI implementation)          (tests, tools, demo)  │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │  tick()
//!              ┌─────────────┴─────────────┐
//!              │        FrameLoop          │
//!              │   (Tokio interval timer)  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use cmdbind::bus::{CommandBus, InMemoryBus, Phase};
//!
//! let bus = InMemoryBus::new();
//! let beacon = bus.create("sim/lights/beacon_toggle", "Toggle the beacon");
//!
//! bus.trigger_once(beacon);
//!
//! let phases: Vec<Phase> = bus.phase_log(beacon).into_iter().map(|(p, _)| p).collect();
//! assert_eq!(phases, vec![Phase::Begin, Phase::Continue, Phase::End]);
//! ```

pub mod frame;
pub mod memory;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use frame::{FrameConfig, FrameLoop, FrameStats};
pub use memory::{BusConfig, BusEvent, InMemoryBus};
pub use service::CommandBus;
pub use types::{
    raw_decision, raw_phase, CommandRef, HandlerOrder, Phase, PhaseCallback, RawCommandRef,
};
