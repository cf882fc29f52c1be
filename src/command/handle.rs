//! Command Handles
//!
//! A [`Command`] is a cheap, copyable handle to one command owned by a
//! [`CommandBus`]. It can only be obtained through [`Command::find`] or
//! [`Command::create`], so it always wraps a token the bus has actually
//! issued. Dropping a handle does nothing on the host side; the command
//! itself lives as long as the bus.

use super::error::{CommandError, Result};
use super::handler::CommandHandler;
use super::hold::CommandHold;
use super::registration::HandlerRegistration;
use crate::bus::{CommandBus, CommandRef, HandlerOrder};
use std::fmt;
use tracing::{debug, trace};

/// A handle to a command registered with a [`CommandBus`].
pub struct Command<'b, B: CommandBus + ?Sized> {
    bus: &'b B,
    command_ref: CommandRef,
}

impl<'b, B: CommandBus + ?Sized> Command<'b, B> {
    fn new(bus: &'b B, command_ref: CommandRef) -> Self {
        Self { bus, command_ref }
    }

    /// Looks up an existing command by its exact name.
    ///
    /// Returns `None` if no such command exists. This is not an error.
    pub fn find(bus: &'b B, name: &str) -> Option<Self> {
        if validate_name(name).is_err() {
            return None;
        }
        bus.lookup(name).map(|command_ref| Self::new(bus, command_ref))
    }

    /// Creates a new command.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::DuplicateCommand`] if `name` already resolves
    /// to a command. An existing command is never silently reused; call
    /// [`find`](Self::find) first to branch on existence.
    ///
    /// Returns [`CommandError::InvalidName`] or
    /// [`CommandError::InvalidDescription`] for text the host cannot accept.
    pub fn create(bus: &'b B, name: &str, description: &str) -> Result<Self> {
        validate_name(name)?;
        if description.contains('\0') {
            return Err(CommandError::InvalidDescription {
                name: name.to_string(),
            });
        }

        if Self::find(bus, name).is_some() {
            return Err(CommandError::DuplicateCommand {
                name: name.to_string(),
            });
        }

        let command_ref = bus.create(name, description);
        debug!(name, command = %command_ref, "created command");
        Ok(Self::new(bus, command_ref))
    }

    /// Attaches a handler to this command.
    ///
    /// The handler is moved into the returned registration. It stays attached
    /// until the registration is dropped.
    pub fn handle<H: CommandHandler>(
        &self,
        order: HandlerOrder,
        handler: H,
    ) -> HandlerRegistration<'b, H, B> {
        HandlerRegistration::new(*self, order, handler)
    }

    /// Runs one complete begin, continue, end sequence right now.
    ///
    /// Handlers registered on this command run before this returns.
    pub fn trigger_once(&self) {
        trace!(command = %self.command_ref, "trigger once");
        self.bus.trigger_once(self.command_ref);
    }

    /// Holds the command down until the returned guard is dropped.
    pub fn hold_down(&self) -> CommandHold<'_, 'b, B> {
        CommandHold::new(self)
    }

    /// The bus token behind this handle.
    pub fn raw(&self) -> CommandRef {
        self.command_ref
    }

    /// The bus this command belongs to.
    pub fn bus(&self) -> &'b B {
        self.bus
    }
}

/// Rejects names that could not cross the host's C string boundary.
fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(CommandError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

impl<B: CommandBus + ?Sized> Clone for Command<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: CommandBus + ?Sized> Copy for Command<'_, B> {}

impl<B: CommandBus + ?Sized> PartialEq for Command<'_, B> {
    fn eq(&self, other: &Self) -> bool {
        self.command_ref == other.command_ref
    }
}

impl<B: CommandBus + ?Sized> Eq for Command<'_, B> {}

impl<B: CommandBus + ?Sized> fmt::Debug for Command<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("command_ref", &self.command_ref)
            .finish_non_exhaustive()
    }
}
