//! Micromodel network generator
//!
//! Synthesize a pore network from a JSON config and write it as arrays.

use std::env;
use std::io::Write;

use micromodel_cli::{
    apply_seed_override, encode, load_config, summary, wants_help, Invocation, DEFAULT_LOG_FILTER,
    SEED_ENV,
};
use micromodel_synthesis::generate_network;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!("micromodel-gen - Generate a micromodel pore network");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  micromodel-gen [CONFIG.json] [OUTPUT.json]");
    eprintln!();
    eprintln!("  CONFIG.json  Synthesis config (default: built-in defaults)");
    eprintln!("  OUTPUT.json  Where to write network arrays (default: stdout)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MICROMODEL_SEED  Override the configured seed");
    eprintln!("  RUST_LOG         Log filter (default: {DEFAULT_LOG_FILTER})");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(invocation) = Invocation::parse(&args) else {
        print_usage();
        std::process::exit(if wants_help(&args) { 0 } else { 1 });
    };

    let config = load_config(invocation.config.as_deref())?;
    let config = apply_seed_override(config, env::var(SEED_ENV).ok().as_deref())?;
    tracing::info!(
        columns = config.columns,
        rows = config.rows,
        seed = config.seed,
        "generating network"
    );

    let generated = generate_network(&config)?;
    let json = encode(&generated.arrays())?;

    match &invocation.output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    eprint!("{}", summary(&generated));
    Ok(())
}
