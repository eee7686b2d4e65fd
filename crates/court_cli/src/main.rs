//! Court CLI
//!
//! Detection JSON → mini-court positions, shot events, per-frame stats

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "court_cli")]
#[command(about = "Court-relative tennis kinematics from detection output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Analyze one match from a detection JSON file
    Analyze {
        /// Input match request JSON
        #[arg(long)]
        input: PathBuf,

        /// Output response JSON
        #[arg(long)]
        output: PathBuf,

        /// Pipeline config (YAML, or JSON by extension)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Per-frame stats table as CSV
        #[arg(long)]
        stats_csv: Option<PathBuf>,

        /// Pretty-print the response JSON
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print or save the JSON schema of the match request
    Schema {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if use_json {
        tracing_subscriber::registry().with(fmt::layer().json()).with(env_filter).init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            config,
            stats_csv,
            pretty,
        } => {
            println!("🎾 Analyzing match...");
            println!("   Input:  {}", input.display());
            println!("   Output: {}", output.display());
            if let Some(path) = &config {
                println!("   Config: {}", path.display());
            }

            let summary = court_cli::run_analyze(
                &input,
                &output,
                config.as_deref(),
                stats_csv.as_deref(),
                pretty,
            )?;

            print_summary(&summary);
            if let Some(path) = stats_csv {
                println!("\n📄 Stats table saved to: {}", path.display());
            }
        }

        Commands::Schema { out } => {
            let schema = court_cli::write_schema(out.as_deref())?;
            match out {
                Some(path) => println!("📄 Schema saved to: {}", path.display()),
                None => println!("{}", schema),
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_summary(summary: &court_cli::AnalysisSummary) {
    println!("\n✅ Analysis complete!");
    println!("   Frames:   {}", summary.frame_count);
    println!(
        "   Players:  {} (player 1), {} (player 2)",
        summary.selected_players[0], summary.selected_players[1]
    );
    println!("   Shots:    {}", summary.shot_count);
    println!("   Rallies:  {} intervals measured", summary.interval_count);
    println!("   Created:  {}", summary.created_at);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("court_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
