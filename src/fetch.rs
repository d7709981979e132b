use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::header::{HOST, USER_AGENT};
use hyper::{Body, Request};
use log::{debug, info};
use rustls::{OwnedTrustAnchor, RootCertStore, ServerName};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use url::{Host, Url};
use webpki_roots::TLS_SERVER_ROOTS;

use crate::error::FetchError;

pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send + Sync {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send + Sync> AsyncStream for T {}

pub type AnyStream = Box<dyn AsyncStream>;

/// Where the newline-delimited link list comes from.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Single-shot HTTP/1.1 GET over plain TCP or rustls. No retries, no redirects.
pub struct HttpFetcher {
    url: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    async fn get(&self) -> Result<String, FetchError> {
        let url = Url::parse(&self.url).map_err(|e| self.invalid_url(e.to_string()))?;
        let host = match url.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => return Err(self.invalid_url("missing host".into())),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| self.invalid_url("missing port".into()))?;

        let stream = connect(url.scheme(), &host, port).await?;
        let (mut sender, conn) = hyper::client::conn::handshake(stream).await?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!("[Fetch] connection closed with error: {}", e);
            }
        });

        let target = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let host_header = match (url.host_str(), url.port()) {
            (Some(h), Some(p)) => format!("{}:{}", h, p),
            (Some(h), None) => h.to_string(),
            (None, _) => host.clone(),
        };
        let request = Request::get(target)
            .header(HOST, host_header)
            .header(USER_AGENT, concat!("vless2clash/", env!("CARGO_PKG_VERSION")))
            .body(Body::empty())?;

        let response = sender.send_request(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = hyper::body::to_bytes(response.into_body()).await?;
        debug!("[Fetch] received {} bytes", body.len());
        Ok(decode_body(body))
    }

    fn invalid_url(&self, reason: String) -> FetchError {
        FetchError::InvalidUrl {
            url: self.url.clone(),
            reason,
        }
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        info!("Downloading from: {}", self.url);
        tokio::time::timeout(self.timeout, self.get())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout.as_secs()))?
    }
}

async fn connect(scheme: &str, host: &str, port: u16) -> Result<AnyStream, FetchError> {
    match scheme {
        "http" => {
            let stream = TcpStream::connect((host, port)).await?;
            Ok(Box::new(stream))
        }
        "https" => {
            let stream = TcpStream::connect((host, port)).await?;
            let server_name = ServerName::try_from(host)
                .map_err(|_| FetchError::ServerName(host.to_string()))?;
            let tls_stream = tls_connector().connect(server_name, stream).await?;
            debug!("[Fetch] TLS handshake with {} done", host);
            Ok(Box::new(tls_stream))
        }
        other => Err(FetchError::UnsupportedScheme(other.to_string())),
    }
}

fn tls_connector() -> TlsConnector {
    let mut root_cert_store = RootCertStore::empty();
    root_cert_store.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|ta| {
        OwnedTrustAnchor::from_subject_spki_name_constraints(
            ta.subject,
            ta.spki,
            ta.name_constraints,
        )
    }));

    let mut config = rustls::ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(root_cert_store)
        .with_no_client_auth();
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    TlsConnector::from(Arc::new(config))
}

fn decode_body(body: Bytes) -> String {
    let text = String::from_utf8_lossy(&body).into_owned();
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
