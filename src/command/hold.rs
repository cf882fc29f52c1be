//! Held-Down Commands
//!
//! [`CommandHold`] brackets a scope with a Begin and an End notification.
//! End is sent from `Drop`, so it also fires when the scope is left early or
//! unwound by a panic.
//!
//! The guard does not send Continue events. Whatever drives the frame loop
//! (the host, or [`FrameLoop`](crate::bus::FrameLoop)) is responsible for
//! those.

use super::handle::Command;
use crate::bus::CommandBus;
use std::fmt;
use tracing::trace;

/// Keeps a command held down until dropped.
#[must_use = "dropping a hold releases the command immediately"]
pub struct CommandHold<'a, 'b, B: CommandBus + ?Sized> {
    command: &'a Command<'b, B>,
}

impl<'a, 'b, B: CommandBus + ?Sized> CommandHold<'a, 'b, B> {
    pub(crate) fn new(command: &'a Command<'b, B>) -> Self {
        trace!(command = %command.raw(), "hold begin");
        command.bus().begin(command.raw());
        Self { command }
    }

    /// The command being held.
    pub fn command(&self) -> &Command<'b, B> {
        self.command
    }

    /// Releases the command now. Equivalent to dropping the guard.
    pub fn release(self) {
        drop(self);
    }
}

impl<B: CommandBus + ?Sized> Drop for CommandHold<'_, '_, B> {
    fn drop(&mut self) {
        trace!(command = %self.command.raw(), "hold end");
        self.command.bus().end(self.command.raw());
    }
}

impl<B: CommandBus + ?Sized> fmt::Debug for CommandHold<'_, '_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHold")
            .field("command", self.command)
            .finish()
    }
}
