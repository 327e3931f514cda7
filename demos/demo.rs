//! Runnable demonstration of Dekker's algorithm.
//!
//! Two threads contend for a critical section guarded by nothing but
//! atomics; every protocol step is traced with a line number, and the
//! final counter is checked against 2 × iterations.
//!
//! ```console
//! $ cargo run --example demo -- --iterations 5
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use dekker_rs::harness::RunOptions;
use dekker_rs::protocol::Dekker;
use dekker_rs::trace::LogSink;
use dekker_rs::types::PartyId;

#[derive(Parser, Debug)]
#[command(about = "Dekker's algorithm demonstration: two threads, one critical section")]
struct Cli {
    /// Entry/exit cycles each party performs.
    #[arg(short, long, default_value_t = 5)]
    iterations: u64,

    /// Milliseconds of simulated work inside the critical section.
    #[arg(long, default_value_t = 10)]
    cs_delay_ms: u64,

    /// Milliseconds of non-critical work between iterations.
    #[arg(long, default_value_t = 5)]
    remainder_delay_ms: u64,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();
    let options = RunOptions {
        iterations: cli.iterations,
        cs_delay: Duration::from_millis(cli.cs_delay_ms),
        remainder_delay: Duration::from_millis(cli.remainder_delay_ms),
    };

    println!("==================================================");
    println!("         DEKKER'S ALGORITHM DEMONSTRATION");
    println!("==================================================");
    println!("Two threads competing for a shared critical section.");
    println!("Each party will enter {} times.", options.iterations);
    println!("Final counter should be {} if mutual exclusion holds.", options.iterations * 2);
    println!();

    let dekker = Dekker::with_trace(Arc::new(LogSink::new()));

    let snap = dekker.snapshot();
    println!("Initial state:");
    println!("  intent = [{}, {}]", snap.intent[0], snap.intent[1]);
    println!("  turn = {}", snap.turn);
    println!("  resource = {}", snap.resource);
    println!();
    println!("Starting party {} and party {}...", PartyId::ZERO, PartyId::ONE);
    println!("==================================================");

    let report = dekker.run(&options);

    println!("==================================================");
    println!("                     RESULTS");
    println!("==================================================");
    println!("{}", report);

    if !report.passed() {
        // The reference behavior always exited 0; mapping the failed
        // verdict to a distinct code makes the demo script-friendly.
        std::process::exit(1);
    }
    Ok(())
}
