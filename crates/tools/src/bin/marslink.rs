//! MarsLink - noisy channel simulator
//!
//! Sends a text message bit by bit over a binary symmetric channel and
//! reports what arrived, the errors seen and the channel capacity.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::info;

use marslink_core::capacity::capacity;
use marslink_core::timing::{MARS_MEAN_DISTANCE_KM, SIMULATED_TRANSMISSION_TIME_S, SPEED_OF_LIGHT_KM_S};
use marslink_tools::common::{init_logging, print_bit};
use marslink_tools::{ConfigOverrides, GlobalConfig, ProgressReporter, Session, SessionState, SimConfig, TransmissionReport};

/// MarsLink noisy channel simulator
#[derive(Parser)]
#[command(name = "marslink")]
#[command(about = "Bit-by-bit transmission over a noisy binary channel")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transmit a message
    Send(SendArgs),
    /// Compute channel capacity
    Capacity(CapacityArgs),
    /// Write a configuration file
    Config(ConfigArgs),
    /// Show constants and correction schemes
    Info,
}

/// Transmission options
#[derive(Args, Clone)]
struct SendArgs {
    #[command(flatten)]
    overrides: ConfigOverrides,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print each bit as it arrives; flipped bits in red
    #[arg(long)]
    show_bits: bool,
}

/// Capacity options
#[derive(Args, Clone)]
struct CapacityArgs {
    /// Per-bit flip probability (0.0-1.0)
    #[arg(short = 'p', long, default_value = "0.05")]
    error_probability: f64,

    /// Coupling parameter lambda
    #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
    lambda: f64,

    /// Coupling parameter kappa
    #[arg(long, default_value = "0.15", allow_negative_numbers = true)]
    kappa: f64,

    /// Assume no error correction
    #[arg(long)]
    no_correction: bool,
}

/// Configuration file options
#[derive(Args, Clone)]
struct ConfigArgs {
    /// Output file (.toml or .json)
    #[arg(short, long, default_value = "marslink.toml")]
    output: PathBuf,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

fn load_base_config(global: &GlobalConfig) -> Result<SimConfig> {
    match &global.config {
        Some(path) => SimConfig::from_file(path),
        None => Ok(SimConfig::default()),
    }
}

fn send(global: &GlobalConfig, args: &SendArgs) -> Result<()> {
    let mut config = load_base_config(global)?;
    args.overrides.apply(&mut config)?;

    let mut session = Session::from_config(&config)?;
    info!("Message of {} characters, {} bits", config.message.chars().count(), session.bits().len());

    if !session.start_transmission()? {
        println!("Nothing to transmit");
        return Ok(());
    }

    let tick = Duration::from_millis(config.tick_ms);
    let mut progress = ProgressReporter::new(session.progress().total_bits(), global.verbose && !args.show_bits);

    while let Some(pair) = session.tick()? {
        if args.show_bits {
            print_bit(pair.delivered, pair.is_flipped())?;
        }
        progress.update(session.progress().delivered_bits());

        if session.state() == SessionState::Transmitting && !tick.is_zero() {
            thread::sleep(tick);
        }
    }
    if args.show_bits {
        println!();
    }
    progress.complete();

    let report = session.report().context("Transmission did not complete")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_report(report);
    }

    Ok(())
}

fn print_report(report: &TransmissionReport) {
    let status = if report.is_intact() { "✓" } else { "✗" };

    println!("{} Sent:     {:?}", status, report.message);
    println!("  Received: {:?}", report.decoded_text);
    println!("\n=== Channel ===");
    println!("  Correction:      {} ({})", report.scheme, if report.parameters.correction_enabled { "on" } else { "off" });
    println!("  Channel bits:    {}", report.channel_bits);
    println!("  Flipped bits:    {} (BER {:.4})", report.flipped_bits, report.bit_error_rate);
    println!("  Detected errors: {}", report.detected_errors);
    println!("  Corrected:       {}", report.error_count);
    println!("  Residual errors: {}", report.residual_errors);
    println!("\n=== Capacity ===");
    println!("  Theoretical: {:.4} bits/use", report.capacity.theoretical);
    println!("  Practical:   {:.4} bits/use", report.capacity.practical);
    println!("\n=== Timing ===");
    println!("  Distance:        {:.0} km", report.timing.distance_km);
    println!("  Light time:      {:.2} s", report.timing.propagation_time_s);
    println!("  Simulated time:  {} s", report.timing.simulated_time_s);
    println!("  Speedup:         {:.0}x", report.timing.speedup);
}

fn show_capacity(args: &CapacityArgs) -> Result<()> {
    let result = capacity(args.error_probability, args.lambda, args.kappa, !args.no_correction)?;

    println!("Error probability: {}", args.error_probability);
    println!("Theoretical:       {:.6}", result.theoretical);
    println!("Practical:         {:.6}", result.practical);
    Ok(())
}

fn write_config(global: &GlobalConfig, args: &ConfigArgs) -> Result<()> {
    let mut config = load_base_config(global)?;
    args.overrides.apply(&mut config)?;
    config.save_to_file(&args.output)?;

    println!("✓ Configuration written to {:?}", args.output);
    Ok(())
}

/// Show constants and schemes
fn show_info() {
    println!("\n=== MarsLink Channel Simulator ===");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    println!("\n=== Constants ===");
    println!("  Speed of light:        {} km/s", SPEED_OF_LIGHT_KM_S);
    println!("  Mean Mars distance:    {} km", MARS_MEAN_DISTANCE_KM);
    println!("  Simulated link time:   {} s", SIMULATED_TRANSMISSION_TIME_S);

    println!("\n=== Correction Schemes ===");
    println!("  • oracle      - repairs errors against the sent bits (idealized)");
    println!("  • repetition  - N copies per bit, majority vote (--repetition N)");

    println!("\n=== Example Usage ===");
    println!("  Send:     marslink send -t \"Hello Mars\" -p 0.1 --show-bits");
    println!("  Capacity: marslink capacity -p 0.11 --lambda 1.2 --kappa 0.1");
    println!("  Config:   marslink config -o marslink.toml --seed 42");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.global);

    match &cli.command {
        Commands::Send(args) => send(&cli.global, args)?,
        Commands::Capacity(args) => show_capacity(args)?,
        Commands::Config(args) => write_config(&cli.global, args)?,
        Commands::Info => show_info(),
    }

    Ok(())
}
