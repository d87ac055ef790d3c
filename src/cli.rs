use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use bibpub::{ClientConfig, config};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log more (-v for info, -vv for debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the published version of every arXiv preprint in the given bibliographies
    Resolve {
        #[arg(value_name = "SRC")]
        from: Vec<Source>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        #[command(flatten)]
        client: ClientArgs,
    },
    /// List the arXiv IDs found in the given bibliographies, without going online
    Extract {
        #[arg(value_name = "SRC")]
        from: Vec<Source>,
    },
}

#[derive(Args, Debug)]
pub struct ClientArgs {
    /// Agent string sent to the arXiv API
    #[arg(long, default_value = config::DEFAULT_AGENT)]
    pub agent: String,

    /// Base URL of the arXiv API
    #[arg(long, default_value = config::ARXIV_BASE)]
    pub api_base: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = config::REQUEST_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Extra attempts after a transient network failure
    #[arg(long, default_value_t = config::RETRIES)]
    pub retries: u32,
}

impl From<ClientArgs> for ClientConfig {
    fn from(args: ClientArgs) -> Self {
        ClientConfig::default()
            .with_agent(args.agent)
            .with_base_url(args.api_base)
            .with_timeout(Duration::from_secs(args.timeout))
            .with_retries(args.retries)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `key<TAB>link`, one per line
    Text,
    /// A single JSON object mapping keys to links
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where to read BibTeX from: a file, or standard input when given `-`.
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Source::Stdin);
        }
        fs::canonicalize(s)
            .map(Source::File)
            .map_err(|e| format!("cannot open {s}: {e}"))
    }
}

impl Source {
    pub fn read(&self) -> anyhow::Result<String> {
        match self {
            Source::Stdin => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read standard input")?;
                Ok(buf)
            }
            Source::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

/// Read and concatenate every source; no sources means standard input.
pub fn read_all(sources: &[Source]) -> anyhow::Result<String> {
    if sources.is_empty() {
        return Source::Stdin.read();
    }
    let mut text = String::new();
    for src in sources {
        text.push_str(&src.read()?);
        text.push('\n');
    }
    Ok(text)
}
