use std::path::{Path, PathBuf};
use std::process;

use logo_ingest::config::Config;
use logo_ingest::error::AppResult;
use logo_ingest::ingest::{self, IngestOptions};
use logo_ingest::teams::TeamList;

/// Initialize tracing with an env-filter; RUST_LOG overrides the default
fn initialize_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

enum Command {
    Add,
    Fix,
    Check,
}

struct CliArgs {
    command: Command,
    logo_dir: Option<String>,
    data_file: Option<String>,
    teams_file: Option<String>,
    division: Option<String>,
    dry_run: bool,
}

fn print_usage() {
    println!("Usage: logo-ingest <command> [options]");
    println!();
    println!("Commands:");
    println!("  add      Scan logos, match them to teams, append records to the data file");
    println!("  fix      Repair records whose logo file is missing");
    println!("  check    Report records whose logo file is missing (read-only)");
    println!();
    println!("Options:");
    println!("  --logos <dir>      Logo directory (overrides config)");
    println!("  --data <file>      Destination data file (overrides config)");
    println!("  --teams <file>     Team list JSON (default: embedded list)");
    println!("  --division <name>  Division label for generated records");
    println!("  --dry-run          Do everything except write the data file");
    println!();
    println!("Config file: {}", Config::config_path_display());
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut command = None;
    let mut parsed = CliArgs {
        command: Command::Add,
        logo_dir: None,
        data_file: None,
        teams_file: None,
        division: None,
        dry_run: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "add" | "fix" | "check" if command.is_none() => {
                command = Some(match arg.as_str() {
                    "add" => Command::Add,
                    "fix" => Command::Fix,
                    _ => Command::Check,
                });
            }
            "--logos" => {
                parsed.logo_dir = Some(
                    iter.next()
                        .ok_or("--logos requires a directory")?
                        .clone(),
                );
            }
            "--data" => {
                parsed.data_file = Some(iter.next().ok_or("--data requires a file")?.clone());
            }
            "--teams" => {
                parsed.teams_file = Some(iter.next().ok_or("--teams requires a file")?.clone());
            }
            "--division" => {
                parsed.division = Some(iter.next().ok_or("--division requires a name")?.clone());
            }
            "--dry-run" => parsed.dry_run = true,
            "--help" | "-h" => return Err(String::new()),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    parsed.command = command.ok_or("No command given")?;
    Ok(parsed)
}

fn run(args: CliArgs) -> AppResult<()> {
    let cfg = Config::load()?;

    let logo_dir = PathBuf::from(args.logo_dir.unwrap_or_else(|| cfg.logo_dir.clone()));
    let data_file = PathBuf::from(args.data_file.unwrap_or_else(|| cfg.data_file.clone()));
    let teams_file = args.teams_file.or_else(|| cfg.teams_file.clone());
    let division = args.division.unwrap_or_else(|| cfg.division.clone());

    match args.command {
        Command::Add => {
            let teams = TeamList::load(teams_file.as_deref().map(Path::new))?;
            let opts = IngestOptions {
                division,
                dry_run: args.dry_run,
            };
            let summary = ingest::run_add(&logo_dir, &data_file, &teams, &opts)?;

            println!();
            println!("Summary:");
            println!("  Logos scanned:    {}", summary.logos_scanned);
            println!("  Matched:          {}", summary.matched);
            println!("  Review entries:   {}", summary.fallback);
            println!("  Placeholders:     {}", summary.placeholder);
            println!("  Already present:  {}", summary.skipped_existing);
            println!("  Appended:         {}", summary.appended);
            if args.dry_run {
                println!("  (dry run, nothing written)");
            }
            if summary.fallback > 0 || summary.placeholder > 0 {
                println!();
                println!("Next steps:");
                println!("  1. Review entries marked with TODO comments");
                println!("  2. Manually match any remaining logo files");
            }
        }
        Command::Fix => {
            let summary = ingest::run_fix(&logo_dir, &data_file, args.dry_run)?;

            println!();
            println!("Summary:");
            println!("  Already correct:  {}", summary.already_correct);
            println!("  Fixed:            {}", summary.fixed);
            println!("  Not found:        {}", summary.not_found.len());
            for name in &summary.not_found {
                println!("    - {}", name);
            }
            if args.dry_run {
                println!("  (dry run, nothing written)");
            }
        }
        Command::Check => {
            let report = ingest::run_check(&logo_dir, &data_file)?;

            println!();
            println!(
                "Checked {} entries, {} missing logos",
                report.total,
                report.missing.len()
            );
            for missing in &report.missing {
                println!("  - {} ({})", missing.name, missing.logo);
            }
        }
    }

    Ok(())
}

fn main() {
    initialize_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("✗ {}", msg);
                eprintln!();
            }
            print_usage();
            process::exit(if msg.is_empty() { 0 } else { 1 });
        }
    };

    if let Err(e) = run(parsed) {
        eprintln!("✗ {:#}", e);
        process::exit(1);
    }
}
