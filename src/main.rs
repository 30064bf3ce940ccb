use clap::error::ErrorKind;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;

use mkconfig_rust::{generate_header, load_config, resolve, MkconfigError};

#[derive(Parser)]
#[command(name = "mkconfig")]
#[command(about = "NuttX configuration header generator - Rust Implementation", long_about = None)]
struct Cli {
    /// Absolute path to the directory containing the .config file
    config_dir: PathBuf,

    /// Output file (defaults to standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resolve the configuration only (no header generation)
    #[arg(long)]
    check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                // Wrong or missing arguments: usage error
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("{}", err);
        process::exit(err.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), MkconfigError> {
    if cli.verbose {
        eprintln!("Processing: {}", cli.config_dir.display());
    }

    let mut table = load_config(&cli.config_dir)?;
    if cli.verbose {
        eprintln!("  Loaded {} symbols", table.len());
    }

    resolve(&mut table);
    if cli.verbose {
        eprintln!("  Resolved to {} symbols", table.len());
    }

    if cli.check {
        println!("✓ {} - Configuration OK", cli.config_dir.display());
        return Ok(());
    }

    let header = generate_header(&table)?;
    match &cli.output {
        Some(path) => {
            fs::write(path, header)?;
            if cli.verbose {
                eprintln!("  → {}", path.display());
            }
        }
        None => print!("{}", header),
    }

    Ok(())
}
