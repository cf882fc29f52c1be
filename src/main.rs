//! cmdbind demo
//!
//! Runs a small cockpit scenario against the in-memory command bus: a light
//! switch that takes over its command's Begin phase, an observer that watches
//! after the host, and a flaps lever held down across a number of frames.

use anyhow::Context;
use cmdbind::{
    BusEvent, Command, CommandHandler, FrameConfig, FrameLoop, HandlerOrder, InMemoryBus, Outcome,
};
use std::cell::Cell;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Demo configuration
struct Config {
    /// Frames to hold the flaps lever down for
    frames: u64,
    /// Time between frames
    interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frames: 20,
            interval: FrameConfig::default().interval,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--frames" | "-f" => {
                    if i + 1 < args.len() {
                        config.frames = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid frame count");
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --frames requires a value");
                        std::process::exit(1);
                    }
                }
                "--interval-ms" | "-i" => {
                    if i + 1 < args.len() {
                        let ms: u64 = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid interval");
                            std::process::exit(1);
                        });
                        config.interval = Duration::from_millis(ms);
                        i += 2;
                    } else {
                        eprintln!("Error: --interval-ms requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("cmdbind version {}", cmdbind::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }
}

fn print_help() {
    println!(
        r#"
cmdbind - Typed bindings for a host command subsystem (demo)

USAGE:
    cmdbind [OPTIONS]

OPTIONS:
    -f, --frames <N>          Frames to hold the flaps lever for (default: 20)
    -i, --interval-ms <MS>    Milliseconds between frames (default: 50)
    -v, --version             Print version information
    -h, --help                Print this help message

LOGGING:
    Set RUST_LOG to change verbosity, e.g. RUST_LOG=cmdbind=trace
"#
    );
}

/// Takes over the light command: toggles on press, keeps the host out of it.
#[derive(Default)]
struct LightSwitch {
    on: Cell<bool>,
}

impl CommandHandler for LightSwitch {
    fn on_begin(&self) -> Outcome {
        self.on.set(!self.on.get());
        info!(on = self.on.get(), "light switched");
        Outcome::Halt
    }

    fn on_continue(&self) -> Outcome {
        Outcome::Continue
    }

    fn on_end(&self) -> Outcome {
        Outcome::Continue
    }
}

/// Watches a command after the host has handled it.
#[derive(Default)]
struct PhaseCounter {
    begins: Cell<u32>,
    continues: Cell<u32>,
    ends: Cell<u32>,
}

impl CommandHandler for PhaseCounter {
    fn on_begin(&self) -> Outcome {
        self.begins.set(self.begins.get() + 1);
        Outcome::Irrelevant
    }

    fn on_continue(&self) -> Outcome {
        self.continues.set(self.continues.get() + 1);
        Outcome::Irrelevant
    }

    fn on_end(&self) -> Outcome {
        self.ends.set(self.ends.get() + 1);
        Outcome::Irrelevant
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args();

    // Set up logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!("cmdbind v{} demo starting", cmdbind::VERSION);

    let bus = InMemoryBus::new();

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping demo...");
    };

    tokio::select! {
        result = run_demo(&bus, &config) => result?,
        _ = shutdown => {}
    }

    summarize(&bus);
    info!("Demo complete");
    Ok(())
}

async fn run_demo(bus: &InMemoryBus, config: &Config) -> anyhow::Result<()> {
    // A command we own: the light switch decides what Begin means.
    let light = Command::create(bus, "sim/lights/toggle_light", "Toggle the cabin light")
        .context("creating the light command")?;
    let switch = light.handle(HandlerOrder::BeforeHost, LightSwitch::default());
    let light_watch = light.handle(HandlerOrder::AfterHost, PhaseCounter::default());

    light.trigger_once();
    light.trigger_once();
    info!(
        on = switch.handler().on.get(),
        observed_begins = light_watch.handler().begins.get(),
        observed_ends = light_watch.handler().ends.get(),
        "light command triggered twice"
    );

    // Creating it again is a naming conflict, reported rather than reused.
    if let Err(e) = Command::create(bus, "sim/lights/toggle_light", "Duplicate") {
        warn!("{}", e);
    }

    // A command we hold down across frames.
    let flaps = Command::create(bus, "sim/flight_controls/flaps_down", "Flaps down")
        .context("creating the flaps command")?;
    let flaps_watch = flaps.handle(HandlerOrder::AfterHost, PhaseCounter::default());

    let frame_loop = FrameLoop::new(FrameConfig {
        interval: config.interval,
    });
    {
        let _hold = flaps.hold_down();
        let stats = frame_loop.run(bus, config.frames).await;
        info!(
            frames = stats.frames,
            continues = stats.continues,
            "flaps lever released"
        );
    }

    info!(
        begins = flaps_watch.handler().begins.get(),
        continues = flaps_watch.handler().continues.get(),
        ends = flaps_watch.handler().ends.get(),
        "flaps observer"
    );

    Ok(())
}

fn summarize(bus: &InMemoryBus) {
    let journal = bus.journal();
    let suppressed = journal
        .iter()
        .filter(|event| {
            matches!(
                event,
                BusEvent::Phase {
                    host_handled: false,
                    ..
                }
            )
        })
        .count();
    let phases = journal
        .iter()
        .filter(|event| matches!(event, BusEvent::Phase { .. }))
        .count();

    info!(
        commands = bus.command_count(),
        phases, suppressed, "bus summary"
    );
}
