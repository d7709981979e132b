pub mod link;
pub mod naming;
pub mod params;
pub mod tls;
pub mod transport;
pub mod vless;

use log::debug;

pub use link::Rejection;
pub use naming::deduplicate;
pub use vless::ProxyDescriptor;

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub proxies: Vec<ProxyDescriptor>,
    /// Non-empty lines that did not yield a proxy.
    pub skipped: usize,
}

pub fn parse_line(line: &str) -> Result<ProxyDescriptor, Rejection> {
    vless::normalize(link::extract(line)?)
}

/// Parses every line in order. Names are left as-is; run `deduplicate` after.
pub fn parse_links(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    for line in text.lines() {
        match parse_line(line) {
            Ok(proxy) => outcome.proxies.push(proxy),
            Err(Rejection::Empty) => {}
            Err(reason) => {
                let preview: String = line.trim().chars().take(60).collect();
                debug!("skipping line ({}): {}", reason, preview);
                outcome.skipped += 1;
            }
        }
    }
    outcome
}
