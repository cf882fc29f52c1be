//! The Command Bus Contract
//!
//! [`CommandBus`] is the surface this crate consumes from the host. A plugin
//! running inside the real host implements it over the host's C functions;
//! [`InMemoryBus`](super::InMemoryBus) implements it in plain Rust for tests
//! and tooling.
//!
//! The trait is deliberately thin. It passes tokens, callbacks and context
//! pointers straight through and makes no attempt to interpret them. All of the
//! lifetime bookkeeping lives in [`crate::command`].

use super::types::{CommandRef, HandlerOrder, PhaseCallback};
use std::ffi::c_void;

/// A host service that owns command identity, triggering and phase listeners.
///
/// Every method is called from the host's single execution context. Phase
/// callbacks are invoked synchronously, and may call back into the bus.
///
/// # Safety
///
/// [`HandlerRegistration`](crate::HandlerRegistration) frees handler storage
/// as soon as [`unregister_phase_listener`](Self::unregister_phase_listener)
/// returns. Implementations must therefore guarantee that:
///
/// - a callback is only ever invoked with the context it was registered with,
///   and only while that listener is registered
/// - once `unregister_phase_listener` returns, the removed listener is never
///   invoked again, including by a dispatch that was already in progress
///
/// Because of this, an implementation has to be declared with `unsafe impl`:
///
/// ```compile_fail
/// use cmdbind::bus::{CommandBus, CommandRef, HandlerOrder, PhaseCallback};
/// use std::ffi::c_void;
///
/// struct Careless;
///
/// impl CommandBus for Careless {
///     fn lookup(&self, _: &str) -> Option<CommandRef> { None }
///     fn create(&self, _: &str, _: &str) -> CommandRef { unimplemented!() }
///     fn trigger_once(&self, _: CommandRef) {}
///     fn begin(&self, _: CommandRef) {}
///     fn end(&self, _: CommandRef) {}
///     unsafe fn register_phase_listener(
///         &self, _: CommandRef, _: PhaseCallback, _: HandlerOrder, _: *mut c_void,
///     ) {}
///     fn unregister_phase_listener(
///         &self, _: CommandRef, _: PhaseCallback, _: HandlerOrder, _: *mut c_void,
///     ) {}
/// }
/// ```
pub unsafe trait CommandBus {
    /// Looks up an existing command by its exact name.
    fn lookup(&self, name: &str) -> Option<CommandRef>;

    /// Creates a new command.
    ///
    /// Behavior when `name` already exists is host-defined. Callers are
    /// expected to check with [`lookup`](Self::lookup) first.
    fn create(&self, name: &str, description: &str) -> CommandRef;

    /// Runs one complete begin, continue, end sequence immediately.
    fn trigger_once(&self, command: CommandRef);

    /// Starts holding a command down.
    fn begin(&self, command: CommandRef);

    /// Releases a command previously started with [`begin`](Self::begin).
    fn end(&self, command: CommandRef);

    /// Adds a phase listener for `command`.
    ///
    /// # Safety
    ///
    /// The caller guarantees `callback` may be invoked with `context` for as
    /// long as the listener stays registered, and that it will later call
    /// [`unregister_phase_listener`](Self::unregister_phase_listener) with the
    /// identical arguments before `context` becomes invalid.
    unsafe fn register_phase_listener(
        &self,
        command: CommandRef,
        callback: PhaseCallback,
        order: HandlerOrder,
        context: *mut c_void,
    );

    /// Removes a listener added with the identical arguments.
    ///
    /// Once this returns, the bus never calls `callback` with `context` again.
    fn unregister_phase_listener(
        &self,
        command: CommandRef,
        callback: PhaseCallback,
        order: HandlerOrder,
        context: *mut c_void,
    );
}
