//! Handler Registration
//!
//! [`HandlerRegistration`] ties one typed handler to one command for as long
//! as the registration value lives.
//!
//! ## Lifecycle
//!
//! ```text
//! Command::handle(order, handler)
//!        │
//!        ▼
//! 1. handler moved into an `Rc` slot (stable address)
//!        │
//!        ▼
//! 2. bus.register_phase_listener(cmd, trampoline::<H>, order, slot)
//!        │
//!        ▼
//! 3. ┌──────────────────────────────────────────┐
//!    │ host calls trampoline::<H>(cmd, phase,   │
//!    │ slot) on every phase change              │  (any number of times,
//!    │   → &H → on_begin / on_continue / on_end │   possibly re-entrant)
//!    │   → Outcome → proceed / suppress         │
//!    └──────────────────────────────────────────┘
//!        │
//!        ▼
//! 4. registration dropped
//!        │
//!        ▼
//! 5. bus.unregister_phase_listener(same four values)
//!        │
//!        ▼
//! 6. registration's reference to the slot released
//! ```
//!
//! The registration value itself may be moved freely; only the slot is known
//! to the host, and it never moves. Step 5 strictly precedes step 6, so the
//! host can never reach freed storage.
//!
//! While a phase call is running, the trampoline holds a reference of its own
//! to the slot. A handler that drops its own registration mid-call therefore
//! keeps running on live storage; the slot is freed when that call returns.
//!
//! ## The Trampoline
//!
//! The host can only call a fixed `extern "C"` signature. `trampoline::<H>`
//! is instantiated once per handler type, turns the context pointer back into
//! `&H`, and maps the result onto the host's integer decision. It never lets
//! anything escape across the C boundary:
//!
//! - an unknown phase tag is logged and answered with "proceed"
//! - a null context is logged and answered with "proceed"
//! - a panicking handler is caught, logged and answered with "proceed"

use super::handle::Command;
use super::handler::{CommandHandler, Outcome};
use crate::bus::{raw_decision, CommandBus, HandlerOrder, Phase, PhaseCallback, RawCommandRef};
use std::ffi::{c_int, c_void};
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::ptr::NonNull;
use std::rc::Rc;
use tracing::{debug, error, trace};

/// A handler attached to a command.
///
/// Dropping the registration detaches the handler and frees it.
#[must_use = "dropping a registration detaches its handler immediately"]
pub struct HandlerRegistration<'b, H: CommandHandler, B: CommandBus + ?Sized> {
    command: Command<'b, B>,
    order: HandlerOrder,
    /// The exact callback handed to the bus, reused for unregistration.
    callback: PhaseCallback,
    /// One strong reference to the slot, from `Rc::into_raw`, released in `drop`.
    handler: NonNull<H>,
    _owns: PhantomData<Rc<H>>,
}

impl<'b, H: CommandHandler, B: CommandBus + ?Sized> HandlerRegistration<'b, H, B> {
    pub(crate) fn new(command: Command<'b, B>, order: HandlerOrder, handler: H) -> Self {
        let slot = Rc::into_raw(Rc::new(handler)).cast_mut();
        // SAFETY: `Rc::into_raw` never returns null.
        let handler = unsafe { NonNull::new_unchecked(slot) };
        let callback: PhaseCallback = trampoline::<H>;

        // SAFETY: the slot stays allocated and is only ever shared until `drop`,
        // which unregisters with these same values before releasing it.
        unsafe {
            command.bus().register_phase_listener(
                command.raw(),
                callback,
                order,
                handler.as_ptr().cast::<c_void>(),
            );
        }

        debug!(
            command = %command.raw(),
            %order,
            handler = std::any::type_name::<H>(),
            "registered command handler"
        );

        Self {
            command,
            order,
            callback,
            handler,
            _owns: PhantomData,
        }
    }

    /// The handler owned by this registration.
    pub fn handler(&self) -> &H {
        // SAFETY: `self` owns a strong reference, and only shared references
        // to the slot are ever created.
        unsafe { self.handler.as_ref() }
    }

    pub fn command(&self) -> &Command<'b, B> {
        &self.command
    }

    pub fn order(&self) -> HandlerOrder {
        self.order
    }

    /// Detaches the handler now. Equivalent to dropping the registration.
    pub fn unregister(self) {
        drop(self);
    }
}

impl<H: CommandHandler, B: CommandBus + ?Sized> Drop for HandlerRegistration<'_, H, B> {
    fn drop(&mut self) {
        self.command.bus().unregister_phase_listener(
            self.command.raw(),
            self.callback,
            self.order,
            self.handler.as_ptr().cast::<c_void>(),
        );

        debug!(
            command = %self.command.raw(),
            order = %self.order,
            "unregistered command handler"
        );

        // SAFETY: this releases the strong reference taken by `Rc::into_raw`
        // in `new`, exactly once. A trampoline call still on the stack holds
        // its own reference, so the handler outlives that call.
        drop(unsafe { Rc::from_raw(self.handler.as_ptr().cast_const()) });
    }
}

impl<H, B> fmt::Debug for HandlerRegistration<'_, H, B>
where
    H: CommandHandler + fmt::Debug,
    B: CommandBus + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistration")
            .field("command", &self.command)
            .field("order", &self.order)
            .field("handler", self.handler())
            .finish()
    }
}

/// The callback the host invokes for every handler of type `H`.
///
/// # Safety
///
/// `context` must be null or come from `Rc::<H>::into_raw` with at least one
/// strong reference alive, as arranged by [`HandlerRegistration::new`].
unsafe extern "C" fn trampoline<H: CommandHandler>(
    command: RawCommandRef,
    phase: c_int,
    context: *mut c_void,
) -> c_int {
    let slot = context.cast::<H>().cast_const();
    if slot.is_null() {
        error!(?command, phase, "command handler called without a context");
        return raw_decision::PROCEED;
    }

    // The pinned reference is released inside the guarded closure, so a
    // panicking `Drop` of the handler is contained as well.
    let call = || {
        // SAFETY: see the function contract. The extra strong reference keeps
        // the slot alive even if the handler drops its own registration.
        let handler = unsafe {
            Rc::increment_strong_count(slot);
            Rc::from_raw(slot)
        };
        dispatch(&*handler, phase)
    };

    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(outcome) => {
            trace!(?command, phase, %outcome, "command handler ran");
            outcome.as_raw()
        }
        Err(_) => {
            error!(
                ?command,
                phase,
                handler = std::any::type_name::<H>(),
                "command handler panicked; letting the host proceed"
            );
            raw_decision::PROCEED
        }
    }
}

/// Routes a raw phase tag to the handler.
///
/// Unknown tags are a host contract violation; they are logged and answered
/// with [`Outcome::Continue`].
fn dispatch<H: CommandHandler>(handler: &H, raw_phase: c_int) -> Outcome {
    match Phase::from_raw(raw_phase) {
        Some(phase) => handler.on_phase(phase),
        None => {
            error!(
                raw_phase,
                "host called a command handler with an invalid phase"
            );
            Outcome::Continue
        }
    }
}
