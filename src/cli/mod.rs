//! Command-line front end: fill a YAML-described shape and print JSON.

mod set;

pub use set::parse_override;

use anyhow::Context;
use clap::Parser;
use feign_core::{FeignConfig, Shape, Value};
use feign_generator::{Filler, Overrides, RandomSource};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "feign")]
#[command(about = "Fill a shape described in YAML with random data and print it as JSON")]
#[command(long_about = None)]
pub struct Cli {
    /// Shape file (YAML)
    #[arg(long, value_name = "PATH")]
    pub shape: PathBuf,

    /// Configuration file with boundaries and an optional seed
    #[arg(long, value_name = "PATH", env = "FEIGN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for the random source (overrides the configuration file)
    #[arg(long, env = "FEIGN_SEED")]
    pub seed: Option<u64>,

    /// Number of values to generate
    #[arg(long, default_value = "1")]
    pub count: usize,

    /// Override a path (format: '.Field.Sub=VALUE', VALUE parsed as YAML)
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, Value)>,

    /// Pretty-print each value
    #[arg(long)]
    pub pretty: bool,
}

/// Generate `cli.count` values and write one JSON document per value.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let shape = Shape::from_file(&cli.shape)
        .with_context(|| format!("Failed to load shape from {:?}", cli.shape))?;

    let config = match &cli.config {
        Some(path) => FeignConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}"))?,
        None => FeignConfig::default(),
    };

    let seed = cli.seed.or(config.seed);
    let source = match seed {
        Some(seed) => RandomSource::with_seed(seed),
        None => RandomSource::new(),
    };
    source
        .set_boundaries(config.boundaries)
        .context("Invalid boundaries")?;

    let mut overrides = Overrides::new();
    for (path, value) in &cli.overrides {
        overrides.insert(path.clone(), value.clone());
    }

    tracing::info!(
        "Generating {} {} value(s) (seed={:?}, overrides={})",
        cli.count,
        shape.kind_name(),
        seed,
        overrides.len()
    );

    let filler = Filler::new(&source).with_hook(&overrides);
    let pointer = Shape::pointer(shape.clone());

    for index in 0..cli.count {
        let mut target = Value::pointer(shape.zero_value());
        filler
            .fill_value(&mut target, &pointer)
            .with_context(|| format!("Failed to fill value {index}"))?;

        let value = target.as_pointee().unwrap_or(&Value::Null);
        let json = if cli.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        writeln!(out, "{json}").context("Failed to write output")?;
    }

    Ok(())
}
