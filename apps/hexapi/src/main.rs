//! hexapi command line entry point.

use clap::Parser;
use hexapi::cli::{Cli, run};
use hexapi_client::ClientError;
use hexapi_core::DataUsage;
use serde_json::Value;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when the account has no limited subscription.
const EXIT_NO_LIMITED_SUBSCRIPTIONS: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match run(&cli).await {
        Ok(output) => {
            print_json(&output);
            ExitCode::SUCCESS
        }
        Err(ClientError::NoLimitedSubscriptions) => {
            print_json(&DataUsage::not_found_body());
            ExitCode::from(EXIT_NO_LIMITED_SUBSCRIPTIONS)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: {e}"),
    }
}
