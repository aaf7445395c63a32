//! splitsheet - distribution statements for multi-party property sales.

mod config;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use splitsheet_core::{Mode, Worksheet, storage, verify_modes};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Csv,
    Md,
    Sheet,
}

impl Format {
    fn parse(name: &str) -> Option<Format> {
        match name {
            "csv" => Some(Format::Csv),
            "md" | "markdown" => Some(Format::Md),
            "sheet" => Some(Format::Sheet),
            _ => None,
        }
    }

    fn from_extension(path: &Path) -> Option<Format> {
        Format::parse(path.extension()?.to_str()?)
    }
}

struct Options {
    config: Option<PathBuf>,
    parties: Option<usize>,
    formulas: bool,
    check: bool,
    output: Option<PathBuf>,
    format: Option<Format>,
}

fn print_usage() {
    eprintln!("Usage: splitsheet [OPTIONS] [CONFIG]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [CONFIG]                  Statement file (.toml)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -p, --parties <N>         Build a blank N-party template instead");
    eprintln!("      --formulas            Write live formulas instead of computed values");
    eprintln!("      --check               Recalculate the formulas and verify both modes agree");
    eprintln!("  -o, --output <FILE>       Write to a file (default: stdout)");
    eprintln!("  -F, --format <FORMAT>     Output format: csv, md, sheet");
    eprintln!("  -h, --help                Print help");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut options = Options {
        config: None,
        parties: None,
        formulas: false,
        check: false,
        output: None,
        format: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-p" | "--parties" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --parties requires a count");
                    std::process::exit(1);
                }
                match args[i].parse::<usize>() {
                    Ok(n) if n > 0 => options.parties = Some(n),
                    _ => {
                        eprintln!("Error: --parties requires a positive count");
                        std::process::exit(1);
                    }
                }
            }
            "--formulas" => {
                options.formulas = true;
            }
            "--check" => {
                options.check = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a file path");
                    std::process::exit(1);
                }
                options.output = Some(PathBuf::from(&args[i]));
            }
            "-F" | "--format" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --format requires a value");
                    std::process::exit(1);
                }
                match Format::parse(&args[i]) {
                    Some(format) => options.format = Some(format),
                    None => {
                        eprintln!("Error: Unknown format: {} (use csv, md, or sheet)", args[i]);
                        std::process::exit(1);
                    }
                }
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if options.config.is_none() {
                    options.config = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(options: Options) -> Result<()> {
    let worksheet = if let Some(count) = options.parties {
        if options.config.is_some() {
            bail!("--parties builds a blank template; it cannot be combined with a config file");
        }
        if options.check {
            bail!("--check needs a config file with data to verify");
        }
        Worksheet::template(count)?
    } else {
        let path = options.config.clone().or_else(default_config_path).context(
            "no config file given (pass a .toml statement, or --parties N for a blank template)",
        )?;
        let distribution =
            config::load(&path).with_context(|| format!("failed to load {}", path.display()))?;

        if options.check {
            verify_modes(&distribution)?;
            println!("value and formula modes agree");
            return Ok(());
        }

        let mode = if options.formulas {
            Mode::Formulas
        } else {
            Mode::Values
        };
        Worksheet::build(&distribution, mode)?
    };

    let format = options
        .format
        .or_else(|| options.output.as_deref().and_then(Format::from_extension))
        .unwrap_or(Format::Md);

    match &options.output {
        Some(path) => {
            match format {
                Format::Csv => storage::write_csv(path, &worksheet)?,
                Format::Md => storage::write_markdown(path, &worksheet)?,
                Format::Sheet => storage::write_sheet(path, &worksheet)?,
            }
            println!("Exported to {}", path.display());
        }
        None => {
            let content = match format {
                Format::Csv => storage::csv_content(&worksheet),
                Format::Md => storage::markdown_content(&worksheet)?,
                Format::Sheet => storage::sheet_content(&worksheet),
            };
            print!("{}", content);
        }
    }

    Ok(())
}

/// The per-user default statement, if one is installed.
fn default_config_path() -> Option<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "splitsheet")?;
    let path = dirs.config_dir().join("default.toml");
    path.exists().then_some(path)
}
