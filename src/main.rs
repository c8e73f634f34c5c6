use std::process::ExitCode;

use block_helpers::{Engine, RenderConfig};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Render a block template against JSON data.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Template source (or a path to it with --file)
    template: String,
    /// JSON document used as the render context
    #[arg(default_value = "null")]
    data: String,
    /// Read the template from the file named by TEMPLATE
    #[arg(long)]
    file: bool,
    /// Treat numeric zero as truthy in if/unless
    #[arg(long)]
    include_zero: bool,
    /// Render config as JSON, e.g. '{"includeZero":true}'
    #[arg(long)]
    config: Option<String>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let mut config = match args.config.as_deref().map(RenderConfig::from_json) {
        Some(Ok(c)) => c,
        Some(Err(e)) => {
            eprintln!("Invalid config: {e}");
            return ExitCode::FAILURE;
        }
        None => RenderConfig::default(),
    };
    if args.include_zero {
        config.include_zero = true;
    }

    let template = if args.file {
        match std::fs::read_to_string(&args.template) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Cannot read {}: {e}", args.template);
                return ExitCode::FAILURE;
            }
        }
    } else {
        args.template
    };

    let engine = Engine::default().with_config(config);
    match engine.render_json(&template, &args.data) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
