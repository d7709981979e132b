use std::path::PathBuf;

use log::info;

use crate::assemble::assemble;
use crate::error::AppError;
use crate::fetch::SourceFetcher;
use crate::proxy::{deduplicate, parse_links};
use crate::settings::Settings;
use crate::writer::write_config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub parsed: usize,
    pub skipped: usize,
    pub output: PathBuf,
}

/// fetch -> parse -> dedupe -> assemble -> write. Nothing is written when
/// no line yields a proxy.
pub async fn run(settings: &Settings, fetcher: &dyn SourceFetcher) -> Result<Summary, AppError> {
    let text = fetcher.fetch().await?;

    let outcome = parse_links(&text);
    info!(
        "Parsed {} proxies, skipped {} lines",
        outcome.proxies.len(),
        outcome.skipped
    );
    if outcome.proxies.is_empty() {
        return Err(AppError::EmptyResult);
    }

    let proxies = deduplicate(outcome.proxies);
    let parsed = proxies.len();
    let config = assemble(settings, proxies);
    write_config(&config, &settings.output)?;

    Ok(Summary {
        parsed,
        skipped: outcome.skipped,
        output: settings.output.clone(),
    })
}
