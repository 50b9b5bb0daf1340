//! Combat balance simulator CLI.
//!
//! Run Monte Carlo simulations against the real combat resolver.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 1000 runs of 50 encounters
//!   cargo run --bin simulate -- -n 100 -e 20   # 100 runs of 20 encounters
//!   cargo run --bin simulate -- --seed 42      # Reproducible run

use skirmish::core::CombatConfig;
use skirmish::simulator::{run_simulation, SimConfig};
use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = parse_args(&args)?;

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              SKIRMISH BALANCE SIMULATOR                       ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Encounters:     {}", config.encounters_per_run);
    println!("  Use Skills:     {}", config.use_skills);
    println!("  Pet:            {}", config.with_pet);
    println!("  Boss Chance:    {:.1}%", config.boss_chance * 100.0);
    println!("  Elite Chance:   {:.1}%", config.elite_chance * 100.0);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config)?;

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, json)?;
        println!("JSON report saved to: {}", filename);
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<SimConfig, Box<dyn Error>> {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--runs" => {
                if i + 1 < args.len() {
                    config.num_runs = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "-e" | "--encounters" => {
                if i + 1 < args.len() {
                    config.encounters_per_run = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    let json = std::fs::read_to_string(&args[i + 1])?;
                    config.combat = CombatConfig::from_json(&json)?;
                    i += 1;
                }
            }
            "--pet" => {
                config.with_pet = true;
            }
            "--no-skills" => {
                config.use_skills = false;
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                config = SimConfig::quick();
            }
            "--boss-rush" => {
                config = SimConfig::boss_rush(config.num_runs);
            }
            _ => {}
        }
        i += 1;
    }

    Ok(config)
}

fn print_help() {
    println!("Skirmish Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>        Number of simulation runs (default: 1000)");
    println!("    -e, --encounters <E>  Encounters per run (default: 50)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    --config <FILE>       Load combat tuning from a JSON file");
    println!("    --pet                 Give the player a pet");
    println!("    --no-skills           Plain attacks only");
    println!("    -v, --verbose         Verbose output");
    println!("    --json                Save JSON report");
    println!("    --quick               Quick test (100 runs of 20 encounters)");
    println!("    --boss-rush           Every spawn is a boss");
    println!("    -h, --help            Show this help");
    println!();
    println!("Set RUST_LOG=debug for per-turn tracing on stderr.");
}
