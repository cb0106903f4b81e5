//! Command-line interface for feign
//!
//! # Usage Examples
//!
//! ```bash
//! # One random value of the shape in order.yaml
//! feign --shape order.yaml
//!
//! # Five reproducible values, pretty-printed
//! feign --shape order.yaml --seed 42 --count 5 --pretty
//!
//! # Boundaries from a config file, two pinned paths
//! feign --shape order.yaml --config feign.yaml \
//!   --set '.Customer.Email=ops@example.com' \
//!   --set '.Notes=~'
//! ```

use clap::Parser;
use feign::cli::{run, Cli};

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();

    if let Err(e) = run(&cli, &mut stdout.lock()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
