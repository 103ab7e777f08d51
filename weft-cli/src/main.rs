use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use weft_cli::{EmitMode, InputFormat, build_cmd};
use weft_sfc::CompileOptions;

#[derive(Parser)]
#[command(name = "weft", version, about = "Weft template compiler")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template into a JavaScript module.
    Build {
        /// Path to the template
        input: PathBuf,
        /// Output directory (default: target/weft-gen)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// What to emit: the compiled module or the declared tree
        #[arg(long, value_enum, default_value_t = EmitMode::Module)]
        emit: EmitMode,
        /// Name of the exported function
        #[arg(long, default_value = "compile")]
        function_name: String,
        /// Spaces per indentation level in the function body
        #[arg(long, default_value_t = 2)]
        indent: usize,
        /// Read the input as a pre-parsed JSON node list
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build {
            input,
            out_dir,
            emit,
            function_name,
            indent,
            json,
        } => {
            let options = CompileOptions {
                function_name,
                indent: " ".repeat(indent),
            };
            let format = if json {
                InputFormat::Json
            } else {
                InputFormat::Markup
            };
            let out_path = build_cmd(&input, out_dir.as_deref(), emit, &options, format)?;
            println!("Generated: {}", out_path.display());
        }
    }
    Ok(())
}
