mod app;
mod assemble;
mod config;
mod error;
mod fetch;
mod proxy;
mod settings;
mod writer;

use std::process::ExitCode;
use std::time::Duration;

use error::AppError;
use fetch::HttpFetcher;
use settings::{Settings, SETTINGS_FILE};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let result = match Settings::load(SETTINGS_FILE) {
        Ok(settings) => {
            let fetcher = HttpFetcher::new(
                settings.source_url.clone(),
                Duration::from_secs(settings.timeout_secs),
            );
            app::run(&settings, &fetcher).await
        }
        Err(e) => Err(AppError::from(e)),
    };

    match result {
        Ok(summary) => {
            println!(
                "Parsed {} proxies ({} lines skipped).",
                summary.parsed, summary.skipped
            );
            println!("Config file created: {}", summary.output.display());
            ExitCode::SUCCESS
        }
        Err(AppError::EmptyResult) => {
            println!("Parsed 0 proxies. No valid VLESS servers found, nothing written.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
