use std::path::PathBuf;

use clap::{Parser, Subcommand};

use board_fixture::BoardFixture;

#[derive(Parser)]
#[command(name = "constraint-cli")]
#[command(version, about = "Board dimensional-constraint pipeline", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a board fixture and write the corrected geometry back
    Solve {
        /// Input fixture JSON
        input: PathBuf,

        /// Output path; defaults to overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Solve { input, output } => solve(input, output),
    }
}

fn solve(input: PathBuf, output: Option<PathBuf>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&input)?;
    let fixture = board_fixture::load_fixture(&text)?;
    let board_name = fixture.board_name.clone();
    let original_dimensions = fixture.dimensions.clone();

    let update =
        board_mapper::constrain_board(fixture.shapes, fixture.dimensions, fixture.pads)?;
    println!(
        "solved '{}': dof={}, iterations={}",
        board_name, update.result.dof, update.result.iterations
    );

    // Dimensions not bound to any entity come through unchanged.
    let mut dimensions = original_dimensions;
    for updated in &update.dimensions {
        if let Some(slot) = dimensions.iter_mut().find(|d| d.id() == updated.id()) {
            *slot = updated.clone();
        }
    }

    let out_fixture = BoardFixture {
        board_name,
        shapes: update.shapes,
        dimensions,
        pads: update.pads,
    };
    let json = board_fixture::save_fixture(&out_fixture)?;
    let out_path = output.unwrap_or(input);
    std::fs::write(&out_path, json)?;
    println!("wrote {}", out_path.display());
    Ok(())
}
