use thiserror::Error;
use url::{Host, Url};

use crate::proxy::params::QueryParams;

pub const SCHEME_PREFIX: &str = "vless://";

/// Why a single line did not produce a proxy. Lines are skipped, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty line")]
    Empty,
    #[error("not a vless:// link")]
    UnsupportedScheme,
    #[error("missing credential")]
    MissingCredential,
    #[error("missing host")]
    MissingHost,
    #[error("missing port")]
    MissingPort,
    #[error("invalid port")]
    InvalidPort,
    #[error("malformed link: {0}")]
    Malformed(#[from] url::ParseError),
}

/// Syntactic fields of one share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri {
    pub scheme: String,
    pub userinfo: String,
    pub host: String,
    pub port: u16,
    pub query: QueryParams,
    /// Decoded `#fragment`, or `<host>:<port>` when the link has none.
    pub fragment: String,
}

pub fn extract(line: &str) -> Result<ParsedUri, Rejection> {
    let line = line.trim();
    if line.is_empty() {
        return Err(Rejection::Empty);
    }
    let rest = line
        .strip_prefix(SCHEME_PREFIX)
        .ok_or(Rejection::UnsupportedScheme)?;

    let authority_end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    if !rest[..authority_end].contains('@') {
        return Err(Rejection::MissingCredential);
    }

    let url = Url::parse(line)?;

    let userinfo = decode(url.username());
    if userinfo.is_empty() {
        return Err(Rejection::MissingCredential);
    }

    let host = match url.host() {
        Some(Host::Ipv6(addr)) => addr.to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    };
    if host.is_empty() {
        return Err(Rejection::MissingHost);
    }

    let port = url.port().ok_or(Rejection::MissingPort)?;
    if port == 0 {
        return Err(Rejection::InvalidPort);
    }

    let query: QueryParams = url.query_pairs().into_owned().collect();

    let fragment = url
        .fragment()
        .map(|f| decode(f).trim().to_string())
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| format!("{}:{}", host, port));

    Ok(ParsedUri {
        scheme: url.scheme().to_string(),
        userinfo,
        host,
        port,
        query,
        fragment,
    })
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
