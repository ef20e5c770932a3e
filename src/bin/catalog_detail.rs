//! Metric distribution report for investigating catalog exports

use reelpick::recommend::filter::passes_mode;
use reelpick::{Catalog, CatalogEntry, Mode};
use std::env;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: catalog_detail <catalog.csv> [more.csv]");
        std::process::exit(1);
    }

    let mut failed = false;
    for path in &args[1..] {
        println!("\n{}", "=".repeat(60));
        println!("CATALOG: {}", path);
        println!("{}", "=".repeat(60));

        match Catalog::load(path) {
            Ok(catalog) => describe(&catalog),
            Err(e) => {
                eprintln!("Failed to load catalog: {}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn describe(catalog: &Catalog) {
    let report = catalog.load_report();
    println!(
        "Rows: {} read, {} kept, {} dropped",
        report.rows_read, report.kept, report.dropped
    );

    let with_metacritic = catalog
        .entries()
        .iter()
        .filter(|e| e.record.metacritic_score.is_some())
        .count();
    println!("Metacritic coverage: {} / {}", with_metacritic, catalog.len());

    println!("\n{:<18} {:>12} {:>12} {:>12} {:>12}", "COLUMN", "MEAN", "STD", "MIN", "MAX");
    println!("{}", "-".repeat(70));

    let columns: [(&str, fn(&CatalogEntry) -> f64); 6] = [
        ("IMDb", |e| e.record.imdb_score),
        ("IMDb Votes", |e| e.record.imdb_votes),
        ("Hidden Gem Score", |e| e.metrics.hidden_gem_score),
        ("z Hidden Gem", |e| e.metrics.z_hidden_gem),
        ("z IMDb", |e| e.metrics.z_imdb),
        ("z Votes", |e| e.metrics.z_votes),
    ];
    for (name, column) in columns {
        if let Some(stats) = catalog.column_stats(column) {
            println!(
                "{:<18} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                name, stats.mean, stats.std_dev, stats.min, stats.max
            );
        }
    }

    println!("\nQualifying titles per mode (any genre, any year):");
    for mode in Mode::ALL {
        let count = catalog.entries().iter().filter(|e| passes_mode(e, mode)).count();
        println!("  {:<14} {:>8}", mode.label(), count);
    }
}
