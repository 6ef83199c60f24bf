use anyhow::{Context, Result};
use clap::Parser;
use fm_cardinality::{estimate_path, BitScanPolicy, EstimatorConfig, TableFill};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(about = "Estimate the number of distinct whitespace-separated tokens in a file", long_about = None)]
struct Args {
    /// Text file to read. An unreadable file is treated as empty.
    input: PathBuf,
    /// JSON config file; command-line flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the hash family generator.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Number of hash functions (sketches) in the median ensemble.
    #[arg(short, long)]
    functions: Option<usize>,
    /// Lookup table size of each hash function.
    #[arg(short, long)]
    radix: Option<usize>,
    /// Bitmap width of every sketch (1..=64).
    #[arg(short, long)]
    width: Option<usize>,
    /// Bit-scan policy: shift_first or discard_low_bit.
    #[arg(short, long)]
    policy: Option<BitScanPolicy>,
    /// Table fill: unconstrained or odd_constrained.
    #[arg(long)]
    fill: Option<TableFill>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> Result<EstimatorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                EstimatorConfig::from_json_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => EstimatorConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(functions) = self.functions {
            config.functions = functions;
        }
        if let Some(radix) = self.radix {
            config.radix = radix;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        if let Some(fill) = self.fill {
            config.fill = fill;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fm_cli=info,fm_cardinality=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.config()?;
    debug!(?config, "effective configuration");

    let report = estimate_path(&config, &args.input)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
