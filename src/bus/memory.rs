//! In-Memory Command Bus
//!
//! A self-contained [`CommandBus`] that behaves the way the host's command
//! registry does, without the host. It is what the tests, the benchmarks and
//! the demo binary run against.
//!
//! ## Dispatch Order
//!
//! Every phase event runs through the same pipeline:
//!
//! ```text
//!   phase event
//!        │
//!        ▼
//! ┌──────────────────┐  suppress   ┌────────────────────────────┐
//! │ BeforeHost       │────────────>│ stop: no default, no after │
//! │ listeners (FIFO) │             └────────────────────────────┘
//! └────────┬─────────┘
//!          │ proceed
//!          ▼
//! ┌──────────────────┐
//! │ host default     │
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ AfterHost        │  (return value ignored)
//! │ listeners (FIFO) │
//! └──────────────────┘
//! ```
//!
//! ## Reentrancy
//!
//! No `RefCell` borrow is held while a listener runs, so listeners may call
//! back into the bus: trigger other commands, hold them, or drop their own
//! registrations. Each listener is re-checked against the live listener list
//! right before it is invoked, so a listener removed earlier in the same
//! dispatch is never called. The check goes by a per-registration id, so a
//! listener added mid-dispatch with the same callback, order and context as a
//! removed one does not inherit its place in the in-flight event.
//!
//! ## Journal
//!
//! The journal keeps the most recent [`BusConfig::journal_capacity`] events
//! and drops the oldest beyond that, so a bus ticked for hours stays bounded.

use super::service::CommandBus;
use super::types::{raw_decision, CommandRef, HandlerOrder, Phase, PhaseCallback};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::ffi::{c_int, c_void};
use std::fmt;
use std::num::NonZeroUsize;
use tracing::{debug, trace, warn};

/// Configuration for the in-memory bus.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Continue events emitted between Begin and End by `trigger_once` (default: 1)
    pub continue_per_trigger: usize,

    /// Whether bus activity is appended to the journal (default: true)
    pub record_journal: bool,

    /// Most recent events the journal retains, 0 for no limit (default: 4096)
    pub journal_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            continue_per_trigger: 1,
            record_journal: true,
            journal_capacity: 4096,
        }
    }
}

/// One entry in the bus journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// A command was created.
    Created { command: CommandRef, name: String },

    /// A phase listener was added.
    ListenerRegistered {
        command: CommandRef,
        order: HandlerOrder,
    },

    /// A phase listener was removed.
    ListenerUnregistered {
        command: CommandRef,
        order: HandlerOrder,
    },

    /// A phase event finished dispatching.
    ///
    /// `host_handled` is false when a `BeforeHost` listener suppressed the
    /// host's default handling.
    Phase {
        command: CommandRef,
        phase: Phase,
        host_handled: bool,
    },
}

#[derive(Clone, Copy)]
struct Listener {
    /// Unique per registration, never reused by the bus.
    id: u64,
    callback: PhaseCallback,
    order: HandlerOrder,
    context: *mut c_void,
}

impl Listener {
    fn matches(&self, callback: PhaseCallback, order: HandlerOrder, context: *mut c_void) -> bool {
        self.callback as usize == callback as usize
            && self.order == order
            && self.context == context
    }

    /// Calls the listener and reports whether the host may proceed.
    ///
    /// # Safety
    ///
    /// The listener must still be registered.
    unsafe fn invoke(&self, command: CommandRef, raw_phase: c_int) -> bool {
        // SAFETY: registration guarantees `context` stays valid for `callback`
        // until the listener is removed; the caller checked it is still present.
        let decision = unsafe { (self.callback)(command.as_raw(), raw_phase, self.context) };
        decision != raw_decision::SUPPRESS
    }
}

struct CommandEntry {
    name: String,
    description: String,
    listeners: Vec<Listener>,
    held: bool,
    host_runs: u64,
}

/// Tokens are 1-based indices into the command table.
fn token_for(index: usize) -> CommandRef {
    CommandRef::new(NonZeroUsize::MIN.saturating_add(index))
}

#[derive(Default)]
struct BusState {
    commands: Vec<CommandEntry>,
    by_name: HashMap<String, CommandRef>,
    journal: VecDeque<BusEvent>,
    next_listener_id: u64,
}

impl BusState {
    fn entry(&self, command: CommandRef) -> Option<&CommandEntry> {
        self.commands.get(command.get() - 1)
    }

    fn entry_mut(&mut self, command: CommandRef) -> Option<&mut CommandEntry> {
        self.commands.get_mut(command.get() - 1)
    }
}

/// A single-threaded command registry living entirely in process memory.
pub struct InMemoryBus {
    config: BusConfig,
    state: RefCell<BusState>,
}

impl InMemoryBus {
    /// Creates an empty bus with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates an empty bus with the given configuration.
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            config,
            state: RefCell::new(BusState::default()),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Emits one Continue event for every command currently held down.
    ///
    /// This is the per-frame repeat a host performs while a key or button
    /// stays pressed. Returns the number of commands that were ticked.
    pub fn tick(&self) -> usize {
        let held: Vec<CommandRef> = {
            let state = self.state.borrow();
            state
                .commands
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.held)
                .map(|(index, _)| token_for(index))
                .collect()
        };

        for command in &held {
            self.dispatch(*command, Phase::Continue);
        }

        held.len()
    }

    /// Delivers an arbitrary raw phase tag to every listener of `command`.
    ///
    /// A well-behaved host only ever sends the three tags in
    /// [`raw_phase`](super::types::raw_phase). This exists to exercise
    /// listeners against a misbehaving one. Nothing is journaled.
    pub fn deliver_raw_phase(&self, command: CommandRef, raw_phase: c_int) -> bool {
        self.run_listeners(command, raw_phase).unwrap_or(false)
    }

    /// Number of listeners currently registered on `command`.
    pub fn listener_count(&self, command: CommandRef) -> usize {
        self.state
            .borrow()
            .entry(command)
            .map_or(0, |entry| entry.listeners.len())
    }

    /// Whether `command` is between a `begin` and its `end`.
    pub fn is_held(&self, command: CommandRef) -> bool {
        self.state
            .borrow()
            .entry(command)
            .is_some_and(|entry| entry.held)
    }

    /// How many times the host's default handling has run for `command`.
    pub fn host_runs(&self, command: CommandRef) -> u64 {
        self.state
            .borrow()
            .entry(command)
            .map_or(0, |entry| entry.host_runs)
    }

    pub fn name_of(&self, command: CommandRef) -> Option<String> {
        self.state
            .borrow()
            .entry(command)
            .map(|entry| entry.name.clone())
    }

    pub fn description_of(&self, command: CommandRef) -> Option<String> {
        self.state
            .borrow()
            .entry(command)
            .map(|entry| entry.description.clone())
    }

    /// Number of commands known to the bus.
    pub fn command_count(&self) -> usize {
        self.state.borrow().commands.len()
    }

    /// Returns a copy of the journal.
    pub fn journal(&self) -> Vec<BusEvent> {
        self.state.borrow().journal.iter().cloned().collect()
    }

    /// Returns `(phase, host_handled)` for every phase event of `command`, in order.
    pub fn phase_log(&self, command: CommandRef) -> Vec<(Phase, bool)> {
        self.state
            .borrow()
            .journal
            .iter()
            .filter_map(|event| match event {
                BusEvent::Phase {
                    command: c,
                    phase,
                    host_handled,
                } if *c == command => Some((*phase, *host_handled)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_journal(&self) {
        self.state.borrow_mut().journal.clear();
    }

    fn record(&self, event: BusEvent) {
        if !self.config.record_journal {
            return;
        }

        let capacity = self.config.journal_capacity;
        let mut state = self.state.borrow_mut();
        if capacity > 0 && state.journal.len() >= capacity {
            state.journal.pop_front();
        }
        state.journal.push_back(event);
    }

    /// Dispatches one phase event and journals the result.
    fn dispatch(&self, command: CommandRef, phase: Phase) -> bool {
        trace!(%command, %phase, "dispatching phase");

        match self.run_listeners(command, phase.as_raw()) {
            Some(host_handled) => {
                self.record(BusEvent::Phase {
                    command,
                    phase,
                    host_handled,
                });
                host_handled
            }
            None => false,
        }
    }

    /// Runs the dispatch pipeline. Returns `None` for an unknown command.
    fn run_listeners(&self, command: CommandRef, raw_phase: c_int) -> Option<bool> {
        let snapshot = match self.state.borrow().entry(command) {
            Some(entry) => entry.listeners.clone(),
            None => {
                warn!(%command, "phase event for unknown command ignored");
                return None;
            }
        };

        for listener in snapshot.iter().filter(|l| l.order.is_before()) {
            if !self.still_registered(command, listener) {
                continue;
            }
            // SAFETY: presence was checked just above, with no callback in between.
            if !unsafe { listener.invoke(command, raw_phase) } {
                trace!(%command, raw_phase, "default handling suppressed");
                return Some(false);
            }
        }

        if let Some(entry) = self.state.borrow_mut().entry_mut(command) {
            entry.host_runs += 1;
        }

        for listener in snapshot.iter().filter(|l| !l.order.is_before()) {
            if !self.still_registered(command, listener) {
                continue;
            }
            // SAFETY: as above.
            unsafe { listener.invoke(command, raw_phase) };
        }

        Some(true)
    }

    fn still_registered(&self, command: CommandRef, listener: &Listener) -> bool {
        self.state
            .borrow()
            .entry(command)
            .is_some_and(|entry| entry.listeners.iter().any(|l| l.id == listener.id))
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("InMemoryBus")
            .field("config", &self.config)
            .field("commands", &state.commands.len())
            .field("journal_len", &state.journal.len())
            .finish()
    }
}

// SAFETY: `unregister_phase_listener` removes the listener from the live list
// before returning, and `run_listeners` re-checks that list by id right before
// every invocation, so a removed listener is never called again.
unsafe impl CommandBus for InMemoryBus {
    fn lookup(&self, name: &str) -> Option<CommandRef> {
        self.state.borrow().by_name.get(name).copied()
    }

    fn create(&self, name: &str, description: &str) -> CommandRef {
        if let Some(existing) = self.lookup(name) {
            warn!(name, "command already exists, returning the existing token");
            return existing;
        }

        let command = {
            let mut state = self.state.borrow_mut();
            state.commands.push(CommandEntry {
                name: name.to_string(),
                description: description.to_string(),
                listeners: Vec::new(),
                held: false,
                host_runs: 0,
            });
            let command = token_for(state.commands.len() - 1);
            state.by_name.insert(name.to_string(), command);
            command
        };

        debug!(%command, name, "command created");
        self.record(BusEvent::Created {
            command,
            name: name.to_string(),
        });
        command
    }

    fn trigger_once(&self, command: CommandRef) {
        self.dispatch(command, Phase::Begin);
        for _ in 0..self.config.continue_per_trigger {
            self.dispatch(command, Phase::Continue);
        }
        self.dispatch(command, Phase::End);
    }

    fn begin(&self, command: CommandRef) {
        if let Some(entry) = self.state.borrow_mut().entry_mut(command) {
            entry.held = true;
        }
        self.dispatch(command, Phase::Begin);
    }

    fn end(&self, command: CommandRef) {
        if let Some(entry) = self.state.borrow_mut().entry_mut(command) {
            entry.held = false;
        }
        self.dispatch(command, Phase::End);
    }

    unsafe fn register_phase_listener(
        &self,
        command: CommandRef,
        callback: PhaseCallback,
        order: HandlerOrder,
        context: *mut c_void,
    ) {
        let added = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener_id;
            let added = match state.entry_mut(command) {
                Some(entry) => {
                    entry.listeners.push(Listener {
                        id,
                        callback,
                        order,
                        context,
                    });
                    true
                }
                None => false,
            };
            if added {
                state.next_listener_id += 1;
            }
            added
        };

        if added {
            trace!(%command, %order, "phase listener registered");
            self.record(BusEvent::ListenerRegistered { command, order });
        } else {
            warn!(%command, "cannot register a listener on an unknown command");
        }
    }

    fn unregister_phase_listener(
        &self,
        command: CommandRef,
        callback: PhaseCallback,
        order: HandlerOrder,
        context: *mut c_void,
    ) {
        let removed = match self.state.borrow_mut().entry_mut(command) {
            Some(entry) => {
                match entry
                    .listeners
                    .iter()
                    .position(|l| l.matches(callback, order, context))
                {
                    Some(index) => {
                        entry.listeners.remove(index);
                        true
                    }
                    None => false,
                }
            }
            None => false,
        };

        if removed {
            trace!(%command, %order, "phase listener unregistered");
            self.record(BusEvent::ListenerUnregistered { command, order });
        } else {
            warn!(%command, %order, "no matching phase listener to unregister");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::types::raw_phase;
    use std::cell::{Cell, RefCell};

    /// Context for the raw test callbacks below.
    struct Tap {
        calls: RefCell<Vec<(&'static str, c_int)>>,
        label: &'static str,
        decision: Cell<c_int>,
    }

    impl Tap {
        fn new(label: &'static str, decision: c_int) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                label,
                decision: Cell::new(decision),
            }
        }
    }

    thread_local! {
        static ORDER: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    unsafe extern "C" fn tap_callback(
        _command: *mut c_void,
        phase: c_int,
        context: *mut c_void,
    ) -> c_int {
        let tap = unsafe { &*(context as *const Tap) };
        tap.calls.borrow_mut().push((tap.label, phase));
        ORDER.with(|order| order.borrow_mut().push(tap.label));
        tap.decision.get()
    }

    fn context(tap: &Tap) -> *mut c_void {
        tap as *const Tap as *mut c_void
    }

    fn take_order() -> Vec<&'static str> {
        ORDER.with(|order| std::mem::take(&mut *order.borrow_mut()))
    }

    #[test]
    fn test_create_and_lookup() {
        let bus = InMemoryBus::new();
        assert_eq!(bus.lookup("sim/lights/beacon"), None);

        let command = bus.create("sim/lights/beacon", "Toggle the beacon");
        assert_eq!(bus.lookup("sim/lights/beacon"), Some(command));
        assert_eq!(bus.name_of(command).as_deref(), Some("sim/lights/beacon"));
        assert_eq!(
            bus.description_of(command).as_deref(),
            Some("Toggle the beacon")
        );
        assert_eq!(bus.command_count(), 1);
    }

    #[test]
    fn test_create_existing_returns_same_token() {
        let bus = InMemoryBus::new();
        let first = bus.create("a", "first");
        let second = bus.create("a", "second");

        assert_eq!(first, second);
        assert_eq!(bus.command_count(), 1);
        assert_eq!(bus.description_of(first).as_deref(), Some("first"));
    }

    #[test]
    fn test_dispatch_order_before_host_after() {
        let bus = InMemoryBus::new();
        let command = bus.create("cmd", "");
        let after = Tap::new("after", raw_decision::PROCEED);
        let before = Tap::new("before", raw_decision::PROCEED);
        take_order();

        unsafe {
            bus.register_phase_listener(
                command,
                tap_callback,
                HandlerOrder::AfterHost,
                context(&after),
            );
            bus.register_phase_listener(
                command,
                tap_callback,
                HandlerOrder::BeforeHost,
                context(&before),
            );
        }

        bus.begin(command);
        assert_eq!(take_order(), vec!["before", "after"]);
        assert_eq!(bus.host_runs(command), 1);
        assert_eq!(bus.phase_log(command), vec![(Phase::Begin, true)]);

        bus.unregister_phase_listener(
            command,
            tap_callback,
            HandlerOrder::AfterHost,
            context(&after),
        );
        bus.unregister_phase_listener(
            command,
            tap_callback,
            HandlerOrder::BeforeHost,
            context(&before),
        );
        assert_eq!(bus.listener_count(command), 0);
    }

    #[test]
    fn test_suppress_stops_dispatch() {
        let bus = InMemoryBus::new();
        let command = bus.create("cmd", "");
        let blocker = Tap::new("blocker", raw_decision::SUPPRESS);
        let observer = Tap::new("observer", raw_decision::PROCEED);

        unsafe {
            bus.register_phase_listener(
                command,
                tap_callback,
                HandlerOrder::BeforeHost,
                context(&blocker),
            );
            bus.register_phase_listener(
                command,
                tap_callback,
                HandlerOrder::AfterHost,
                context(&observer),
            );
        }

        bus.trigger_once(command);

        assert_eq!(bus.host_runs(command), 0);
        assert!(observer.calls.borrow().is_empty());
        assert_eq!(
            *blocker.calls.borrow(),
            vec![
                ("blocker", raw_phase::BEGIN),
                ("blocker", raw_phase::CONTINUE),
                ("blocker", raw_phase::END),
            ]
        );

        bus.unregister_phase_listener(
            command,
            tap_callback,
            HandlerOrder::BeforeHost,
            context(&blocker),
        );
        bus.unregister_phase_listener(
            command,
            tap_callback,
            HandlerOrder::AfterHost,
            context(&observer),
        );
    }

    #[test]
    fn test_unregister_requires_exact_match() {
        let bus = InMemoryBus::new();
        let command = bus.create("cmd", "");
        let tap = Tap::new("tap", raw_decision::PROCEED);

        unsafe {
            bus.register_phase_listener(
                command,
                tap_callback,
                HandlerOrder::BeforeHost,
                context(&tap),
            );
        }

        // Wrong ordering flag: nothing is removed.
        bus.unregister_phase_listener(
            command,
            tap_callback,
            HandlerOrder::AfterHost,
            context(&tap),
        );
        assert_eq!(bus.listener_count(command), 1);

        bus.unregister_phase_listener(
            command,
            tap_callback,
            HandlerOrder::BeforeHost,
            context(&tap),
        );
        assert_eq!(bus.listener_count(command), 0);

        bus.trigger_once(command);
        assert!(tap.calls.borrow().is_empty());
    }

    #[test]
    fn test_tick_only_held_commands() {
        let bus = InMemoryBus::new();
        let held = bus.create("held", "");
        let idle = bus.create("idle", "");

        assert_eq!(bus.tick(), 0);

        bus.begin(held);
        assert!(bus.is_held(held));
        assert!(!bus.is_held(idle));
        assert_eq!(bus.tick(), 1);
        assert_eq!(bus.tick(), 1);
        bus.end(held);
        assert_eq!(bus.tick(), 0);

        assert_eq!(
            bus.phase_log(held),
            vec![
                (Phase::Begin, true),
                (Phase::Continue, true),
                (Phase::Continue, true),
                (Phase::End, true),
            ]
        );
        assert!(bus.phase_log(idle).is_empty());
    }

    #[test]
    fn test_continue_per_trigger() {
        let bus = InMemoryBus::with_config(BusConfig {
            continue_per_trigger: 3,
            ..Default::default()
        });
        let command = bus.create("cmd", "");
        bus.trigger_once(command);

        let phases: Vec<Phase> = bus.phase_log(command).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Begin,
                Phase::Continue,
                Phase::Continue,
                Phase::Continue,
                Phase::End
            ]
        );
    }

    #[test]
    fn test_journal_disabled() {
        let bus = InMemoryBus::with_config(BusConfig {
            record_journal: false,
            ..Default::default()
        });
        let command = bus.create("cmd", "");
        bus.trigger_once(command);

        assert!(bus.journal().is_empty());
        assert_eq!(bus.host_runs(command), 3);
    }

    #[test]
    fn test_journal_keeps_most_recent_events() {
        let bus = InMemoryBus::with_config(BusConfig {
            journal_capacity: 4,
            ..Default::default()
        });
        let command = bus.create("cmd", "");
        for _ in 0..3 {
            bus.trigger_once(command);
        }

        assert_eq!(bus.journal().len(), 4);
        assert_eq!(
            bus.phase_log(command),
            vec![
                (Phase::End, true),
                (Phase::Begin, true),
                (Phase::Continue, true),
                (Phase::End, true),
            ]
        );
        assert_eq!(bus.host_runs(command), 9);
    }

    #[test]
    fn test_journal_unbounded_with_zero_capacity() {
        let bus = InMemoryBus::with_config(BusConfig {
            journal_capacity: 0,
            ..Default::default()
        });
        let command = bus.create("cmd", "");
        for _ in 0..2000 {
            bus.trigger_once(command);
        }

        assert_eq!(bus.journal().len(), 1 + 6000);
    }

    /// Replaces `target`'s listener with an identical registration mid-dispatch.
    struct Reregister<'a> {
        bus: &'a InMemoryBus,
        command: CommandRef,
        target: *mut c_void,
    }

    unsafe extern "C" fn reregister_callback(
        _command: *mut c_void,
        phase: c_int,
        context: *mut c_void,
    ) -> c_int {
        let swap = unsafe { &*(context as *const Reregister<'_>) };
        if phase == raw_phase::BEGIN {
            swap.bus.unregister_phase_listener(
                swap.command,
                tap_callback,
                HandlerOrder::AfterHost,
                swap.target,
            );
            unsafe {
                swap.bus.register_phase_listener(
                    swap.command,
                    tap_callback,
                    HandlerOrder::AfterHost,
                    swap.target,
                );
            }
        }
        raw_decision::PROCEED
    }

    #[test]
    fn test_listener_added_mid_dispatch_skips_current_event() {
        let bus = InMemoryBus::new();
        let command = bus.create("cmd", "");
        let tap = Tap::new("after", raw_decision::PROCEED);
        let swap = Reregister {
            bus: &bus,
            command,
            target: context(&tap),
        };
        let swap_ctx = &swap as *const Reregister<'_> as *mut c_void;

        unsafe {
            bus.register_phase_listener(
                command,
                reregister_callback,
                HandlerOrder::BeforeHost,
                swap_ctx,
            );
            bus.register_phase_listener(
                command,
                tap_callback,
                HandlerOrder::AfterHost,
                context(&tap),
            );
        }

        bus.begin(command);
        // The removed registration is skipped; its identical replacement was
        // not part of this event.
        assert!(tap.calls.borrow().is_empty());
        assert_eq!(bus.listener_count(command), 2);

        bus.end(command);
        assert_eq!(*tap.calls.borrow(), vec![("after", raw_phase::END)]);

        bus.unregister_phase_listener(
            command,
            reregister_callback,
            HandlerOrder::BeforeHost,
            swap_ctx,
        );
        bus.unregister_phase_listener(
            command,
            tap_callback,
            HandlerOrder::AfterHost,
            context(&tap),
        );
        assert_eq!(bus.listener_count(command), 0);
    }

    struct Chain<'a> {
        bus: &'a InMemoryBus,
        target: CommandRef,
        fired: Cell<u32>,
    }

    unsafe extern "C" fn chain_callback(
        _command: *mut c_void,
        phase: c_int,
        context: *mut c_void,
    ) -> c_int {
        let chain = unsafe { &*(context as *const Chain<'_>) };
        if phase == raw_phase::BEGIN {
            chain.fired.set(chain.fired.get() + 1);
            chain.bus.trigger_once(chain.target);
        }
        raw_decision::PROCEED
    }

    #[test]
    fn test_listener_may_reenter_bus() {
        let bus = InMemoryBus::new();
        let outer = bus.create("outer", "");
        let inner = bus.create("inner", "");
        let chain = Chain {
            bus: &bus,
            target: inner,
            fired: Cell::new(0),
        };
        let ctx = &chain as *const Chain<'_> as *mut c_void;

        unsafe {
            bus.register_phase_listener(outer, chain_callback, HandlerOrder::BeforeHost, ctx);
        }
        bus.trigger_once(outer);
        bus.unregister_phase_listener(outer, chain_callback, HandlerOrder::BeforeHost, ctx);

        assert_eq!(chain.fired.get(), 1);
        assert_eq!(bus.host_runs(inner), 3);
        assert_eq!(bus.host_runs(outer), 3);
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let bus = InMemoryBus::new();
        let ghost = CommandRef::new(NonZeroUsize::new(42).unwrap());

        bus.trigger_once(ghost);
        assert!(!bus.deliver_raw_phase(ghost, raw_phase::BEGIN));
        assert_eq!(bus.listener_count(ghost), 0);
        assert!(bus.journal().is_empty());
    }
}
