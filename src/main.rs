use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use reelpick::recommend::parse_year_bound;
use reelpick::report;
use reelpick::{recommend, Catalog, Error, Mode, RecommendationQuery, RecommendationResult, GENRES};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelpick")]
#[command(author, version, about = "Recommend hidden gems, popular titles and critics' picks from a streaming catalog")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show results and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(clap::Args, Debug)]
struct CatalogArgs {
    /// Catalog CSV export (a file picker opens when omitted in GUI builds)
    #[arg(short, long, env = "REELPICK_CATALOG")]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend up to 10 titles for a genre, year range and mode
    Recommend {
        #[command(flatten)]
        source: CatalogArgs,

        /// Genre tag to match
        #[arg(short, long, default_value = "Drama", value_parser = PossibleValuesParser::new(GENRES))]
        genre: String,

        /// Earliest release year (empty for no bound)
        #[arg(long, default_value = "")]
        year_min: String,

        /// Latest release year (empty for no bound)
        #[arg(long, default_value = "")]
        year_max: String,

        /// Ranking mode
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,

        /// Directory for per-run result folders
        #[arg(long, default_value = "image")]
        output_dir: PathBuf,

        /// Don't write result files or charts
        #[arg(long)]
        no_export: bool,

        /// Don't prompt to open the result folder
        #[arg(long)]
        no_open: bool,
    },

    /// Start the interactive query form in the browser
    Serve {
        #[command(flatten)]
        source: CatalogArgs,

        /// Port to listen on
        #[arg(short, long, default_value = "3002")]
        port: u16,

        /// Directory for per-run result folders
        #[arg(long, default_value = "image")]
        output_dir: PathBuf,
    },

    /// List the supported genre tags
    Genres,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match args.command {
        Command::Genres => {
            for genre in GENRES {
                println!("{}", genre);
            }
        }

        Command::Serve { source, port, output_dir } => {
            let catalog = load_catalog(source.catalog, args.quiet);
            if let Err(e) = reelpick::serve::start(port, &catalog, output_dir) {
                eprintln!("Server error: {}", e);
                std::process::exit(1);
            }
        }

        Command::Recommend {
            source,
            genre,
            year_min,
            year_max,
            mode,
            output_dir,
            no_export,
            no_open,
        } => {
            let query = match build_query(genre, &year_min, &year_max, mode) {
                Ok(q) => q,
                Err(e) => fail(&e),
            };
            // Checked before loading so a missing mode costs nothing
            if query.mode.is_none() {
                fail(&Error::ModeNotSelected);
            }

            let catalog = load_catalog(source.catalog, args.quiet);
            let result = match recommend(&catalog, &query) {
                Ok(r) => r,
                Err(e) => fail(&e),
            };

            print_result(&result, args.quiet);

            if !no_export {
                let saved = report::create_run_directory(&output_dir)
                    .map_err(Error::from)
                    .and_then(|dir| report::export(&dir, &query, &result));
                match saved {
                    Ok(artifacts) => {
                        if !args.quiet {
                            eprintln!("\n\x1b[32mResults saved: {}\x1b[0m", artifacts.directory.display());
                        }
                        if !no_open && !args.quiet {
                            prompt_open(&artifacts.directory);
                        }
                    }
                    Err(e) => {
                        eprintln!("Failed to write results: {}", e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("reelpick={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn build_query(genre: String, year_min: &str, year_max: &str, mode: Option<Mode>) -> reelpick::Result<RecommendationQuery> {
    let mut query = RecommendationQuery::new(genre).with_years(parse_year_bound(year_min)?, parse_year_bound(year_max)?);
    query.mode = mode;
    Ok(query)
}

fn fail(error: &Error) -> ! {
    match error {
        Error::ModeNotSelected => {
            eprintln!("No recommendation mode selected.");
            eprintln!("Use --mode hidden-gem, --mode popular or --mode critics-pick.");
        }
        Error::NoResults => eprintln!("No titles match these filters."),
        other => eprintln!("Error: {}", other),
    }
    std::process::exit(error.exit_code());
}

fn load_catalog(path: Option<PathBuf>, quiet: bool) -> Catalog {
    let path = match path.or_else(pick_catalog) {
        Some(p) => p,
        None => {
            eprintln!("Usage: reelpick <COMMAND> --catalog <CSV>");
            eprintln!("Set REELPICK_CATALOG or run 'reelpick --help' for more options.");
            std::process::exit(1);
        }
    };

    let spinner = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message(format!("Loading {}", path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let loaded = Catalog::load(&path);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match loaded {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load catalog {}: {}", path.display(), e);
            std::process::exit(e.exit_code());
        }
    }
}

#[cfg(feature = "gui")]
fn pick_catalog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select catalog CSV")
        .add_filter("CSV files", &["csv"])
        .pick_file()
}

#[cfg(not(feature = "gui"))]
fn pick_catalog() -> Option<PathBuf> {
    None
}

fn print_result(result: &RecommendationResult, quiet: bool) {
    let column = result.score_column();

    if !quiet {
        eprintln!("\x1b[1mreelpick - {}\x1b[0m", result.label());
        eprintln!("{}", "─".repeat(70));
    }

    println!("{:>3}  {:<48}  {:>4}  {:>10}", "#", "TITLE", "YEAR", column.name());
    for r in result.records() {
        println!(
            "{:>3}  {:<48}  {:>4}  {:>10}",
            r.rank,
            truncate(&r.entry.record.title, 48),
            r.entry.record.release_year,
            report::format_score(column, r.score)
        );
    }

    if !quiet {
        let summary = report::Summary::from_result(result);
        eprintln!("\n{}", "─".repeat(70));
        eprintln!(
            "{} of {} qualifying titles shown",
            summary.selected, summary.candidates
        );
    }
}

fn prompt_open(dir: &Path) {
    eprint!("\nOpen result folder? [Y/n] ");
    io::stderr().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        let input = input.trim().to_lowercase();
        if input.is_empty() || input == "y" || input == "yes" {
            if let Err(e) = open::that(dir) {
                eprintln!("Failed to open folder: {}", e);
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}
