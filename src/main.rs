use std::io::IsTerminal;
use std::time::Duration;

use anyhow::Context;
use bibpub::{ArxivClient, pipeline, record};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, Format};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Resolve {
            from,
            format,
            client,
        } => {
            let text = cli::read_all(&from)?;
            let records = record::parse(&text);
            let client = ArxivClient::new(client.into());

            let spinner = spinner("querying arXiv");
            let result = pipeline::resolve_records(&records, &client);
            spinner.finish_and_clear();
            let links = result.context("could not resolve published versions")?;

            match format {
                Format::Text => {
                    for (key, link) in &links {
                        println!("{key}\t{link}");
                    }
                }
                Format::Json => println!("{}", serde_json::to_string_pretty(&links)?),
            }
            summary(links.len(), records.len() - links.len());
        }
        Command::Extract { from } => {
            let text = cli::read_all(&from)?;
            let records = record::parse(&text);
            let extracted = pipeline::extract_ids(&records);
            for e in &extracted {
                println!("{}\t{}\t{}", e.key, e.id, e.convention);
            }
            summary(extracted.len(), records.len() - extracted.len());
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(use_color())
        .init();
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// `✓ found ✗ missed` on stderr, so stdout stays machine-readable.
fn summary(ok: usize, missed: usize) {
    if use_color() {
        eprintln!("{} {}", format!("✓ {ok}").green(), format!("✗ {missed}").red());
    } else {
        eprintln!("✓ {ok} ✗ {missed}");
    }
}
