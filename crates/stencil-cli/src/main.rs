use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stencil_pipeline::{DirectorySink, JsonProvider};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stencil", version, about = "Stencil CLI (forwarding-overload stub generation)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate forwarding-overload stubs from a descriptor file
    Generate(GenerateArgs),
    /// Validate a descriptor file without writing anything
    Check(CheckArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Path to a descriptor JSON file
    input: PathBuf,
    /// Directory the generated `.g.cs` files are written to
    #[arg(long)]
    out: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Path to a descriptor JSON file
    input: PathBuf,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Logging is off unless `STENCIL_LOG` asks for it (e.g. `STENCIL_LOG=debug`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("STENCIL_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Generate(args) => {
            let provider = JsonProvider::from_path(&args.input)?;
            let mut sink = DirectorySink::new(&args.out).with_context(|| {
                format!("failed to create output directory `{}`", args.out.display())
            })?;

            let report = stencil_pipeline::run(&provider, &mut sink);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for key in &report.generated {
                    println!("generated: {key}");
                }
                for skip in &report.skipped {
                    println!("skipped: {}: {}", skip.method, skip.reason);
                }
            }
            Ok(if report.clean() { 0 } else { 1 })
        }
        Command::Check(args) => {
            let provider = JsonProvider::from_path(&args.input)?;

            let report = stencil_pipeline::check(&provider);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for method in &report.methods {
                    match (&method.overloads, &method.error) {
                        (Some(count), _) => println!("ok: {}: {count} overloads", method.method),
                        (None, Some(error)) => println!("error: {}: {error}", method.method),
                        (None, None) => {}
                    }
                }
            }
            Ok(if report.clean() { 0 } else { 1 })
        }
    }
}
