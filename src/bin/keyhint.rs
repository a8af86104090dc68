// Keyhint CLI
// Captures keyboard and mouse input, logs it, and types suggestions on demand

#![cfg_attr(feature = "pure-rust", allow(dead_code))]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "pure-rust")]
use anyhow::Context;
#[cfg(feature = "pure-rust")]
use clap::Parser;

#[cfg(feature = "pure-rust")]
use keyhint_core::event::EventLoop;
#[cfg(feature = "pure-rust")]
use keyhint_core::output::VirtualDevice;
#[cfg(feature = "pure-rust")]
use keyhint_core::{special_key_label, Config, Control, LogOverlay, Session};

/// Global key-gesture capture and suggestion injector
#[derive(Parser, Debug)]
#[command(name = "keyhint")]
#[command(version)]
#[command(about = "Tap Ctrl to generate a suggestion, tap right Ctrl to type it", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to ~/.config/keyhint/config.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Event log file, overrides [log].file
    #[arg(short, long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Delay between injected key transitions in milliseconds
    #[arg(long, value_name = "MS")]
    key_delay: Option<u64>,

    /// Manually specify devices to capture (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// List available input devices
    #[arg(long)]
    list_devices: bool,

    /// Print a commented config file with the built-in defaults and exit
    #[arg(long)]
    print_config: bool,
}

/// Main application state
#[cfg(feature = "pure-rust")]
struct Application {
    config: Config,
    args: Args,
    /// Flag to signal event loop to stop
    running: Arc<AtomicBool>,
}

#[cfg(feature = "pure-rust")]
impl Application {
    fn new(args: Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Config::from_toml_path(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Config::load_default()?,
        };
        apply_overrides(&mut config, &args)?;

        Ok(Self {
            config,
            args,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    fn validate(&self) -> anyhow::Result<()> {
        println!("Configuration is valid");
        println!("  Log file: {}", self.config.log_file.display());
        println!("  Key delay: {}ms", self.config.key_delay_ms);
        println!("  Generator: {}", self.config.generator.command);
        Ok(())
    }

    fn list_devices() -> anyhow::Result<()> {
        let devices = EventLoop::list_devices()?;
        println!("Found {} input device(s):", devices.len());
        for device in &devices {
            match &device.path {
                Some(path) => println!(
                    "  {}: {} [{}] ({})",
                    device.index, device.name, device.kind, path
                ),
                None => println!("  {}: {} [{}]", device.index, device.name, device.kind),
            }
        }
        Ok(())
    }

    fn spawn_signal_handler(&self) {
        use signal_hook::iterator::Signals;
        let running = self.running.clone();

        std::thread::spawn(move || {
            if let Ok(mut signals) =
                Signals::new([signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM])
            {
                if signals.forever().next().is_some() {
                    println!("\nReceived signal, shutting down gracefully...");
                    running.store(false, Ordering::SeqCst);
                }
            }
        });
    }

    fn run(&self) -> anyhow::Result<()> {
        let config = &self.config;

        let mut event_loop = EventLoop::new_filtered(&config.device_filter)?
            .with_screen_size(config.screen_size.0, config.screen_size.1);
        log::info!("Capturing {} device(s)", event_loop.device_count());
        for name in event_loop.device_names() {
            log::debug!("  - {}", name);
        }

        let output_device = VirtualDevice::new().context("Failed to create uinput device")?;
        let mut session = Session::from_config(config, output_device, LogOverlay)?
            .with_caps_lock(event_loop.caps_lock_on());

        let labels: Vec<_> = session
            .special_keys()
            .special_keys()
            .map(special_key_label)
            .collect();
        println!("Monitoring special keys: {}", labels.join(", "));
        println!("Logging input events to {}", config.log_file.display());
        println!("keyhint is running. Press Escape or Ctrl+C to exit.");

        self.spawn_signal_handler();

        while self.running.load(Ordering::SeqCst) {
            let events = match event_loop.poll_input_events(100) {
                Ok(events) => events,
                Err(e) => {
                    log::error!("Failed to read input: {}", e);
                    break;
                }
            };

            if events
                .into_iter()
                .any(|event| session.process(event) == Control::Shutdown)
            {
                break;
            }
            session.poll();
        }

        session.shutdown();
        println!("\n{}", session.summary());
        Ok(())
    }
}

/// Apply command-line overrides on top of the loaded config
#[cfg(feature = "pure-rust")]
fn apply_overrides(config: &mut Config, args: &Args) -> anyhow::Result<()> {
    if let Some(path) = &args.log_file {
        config.log_file = path.clone();
    }
    if let Some(delay) = args.key_delay {
        anyhow::ensure!(
            delay <= keyhint_core::config::MAX_KEY_DELAY_MS,
            "--key-delay must be at most {}ms",
            keyhint_core::config::MAX_KEY_DELAY_MS
        );
        config.key_delay_ms = delay;
    }
    if !args.devices.is_empty() {
        config.device_filter = args.devices.clone();
    }
    Ok(())
}

#[cfg(feature = "pure-rust")]
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Handle list-devices flag (doesn't require config)
    if args.list_devices {
        return Application::list_devices();
    }

    if args.print_config {
        print!("{}", keyhint_core::config::default_config_content());
        return Ok(());
    }

    let app = Application::new(args)?;

    if app.args.check_config {
        return app.validate();
    }

    app.run()
}

// Stub for when pure-rust feature is not enabled
#[cfg(not(feature = "pure-rust"))]
fn main() {
    eprintln!("Error: keyhint binary requires the 'pure-rust' feature to be enabled.");
    eprintln!("Please build with: cargo build --release --features pure-rust --bin keyhint");
    std::process::exit(1);
}
