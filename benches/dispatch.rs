//! Dispatch Benchmark for cmdbind
//!
//! This benchmark measures how quickly phase events travel from the bus,
//! through the trampoline, into typed handlers.

use cmdbind::{Command, CommandHandler, HandlerOrder, InMemoryBus, Outcome};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::cell::Cell;

#[derive(Default)]
struct Counter {
    hits: Cell<u64>,
}

impl CommandHandler for Counter {
    fn on_begin(&self) -> Outcome {
        self.hits.set(self.hits.get() + 1);
        Outcome::Continue
    }

    fn on_continue(&self) -> Outcome {
        self.hits.set(self.hits.get() + 1);
        Outcome::Continue
    }

    fn on_end(&self) -> Outcome {
        self.hits.set(self.hits.get() + 1);
        Outcome::Irrelevant
    }
}

/// Benchmark trigger_once with a growing number of handlers
fn bench_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigger_once");

    for handlers in [1usize, 8, 64] {
        let bus = InMemoryBus::new();
        let command = Command::create(&bus, "bench/trigger", "").unwrap();
        let registrations: Vec<_> = (0..handlers)
            .map(|i| {
                let order = if i % 2 == 0 {
                    HandlerOrder::BeforeHost
                } else {
                    HandlerOrder::AfterHost
                };
                command.handle(order, Counter::default())
            })
            .collect();
        bus.clear_journal();

        group.throughput(Throughput::Elements(3 * handlers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(handlers), &handlers, |b, _| {
            b.iter(|| {
                command.trigger_once();
                bus.clear_journal();
            });
        });

        black_box(registrations.iter().map(|r| r.handler().hits.get()).sum::<u64>());
    }

    group.finish();
}

/// Benchmark registering and dropping a handler
fn bench_register(c: &mut Criterion) {
    let bus = InMemoryBus::new();
    let command = Command::create(&bus, "bench/register", "").unwrap();

    let mut group = c.benchmark_group("registration");
    group.throughput(Throughput::Elements(1));

    group.bench_function("register_unregister", |b| {
        b.iter(|| {
            let registration = command.handle(HandlerOrder::BeforeHost, Counter::default());
            black_box(&registration);
            drop(registration);
            bus.clear_journal();
        });
    });

    group.finish();
}

/// Benchmark per-frame ticks of held commands
fn bench_tick(c: &mut Criterion) {
    let bus = InMemoryBus::new();
    let commands: Vec<_> = (0..16)
        .map(|i| Command::create(&bus, &format!("bench/held_{}", i), "").unwrap())
        .collect();
    let _registrations: Vec<_> = commands
        .iter()
        .map(|command| command.handle(HandlerOrder::BeforeHost, Counter::default()))
        .collect();
    let _holds: Vec<_> = commands.iter().map(|command| command.hold_down()).collect();

    let mut group = c.benchmark_group("tick");
    group.throughput(Throughput::Elements(commands.len() as u64));

    group.bench_function("tick_16_held", |b| {
        b.iter(|| {
            black_box(bus.tick());
            bus.clear_journal();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_trigger, bench_register, bench_tick);
criterion_main!(benches);
