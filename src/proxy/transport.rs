use log::debug;

use crate::proxy::params::QueryParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub path: String,
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsOptions {
    pub path: String,
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpcOptions {
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// Raw stream, optionally disguised as HTTP/1.1 (`headerType=http`).
    Tcp(Option<HttpOptions>),
    Ws(WsOptions),
    Grpc(GrpcOptions),
}

impl Transport {
    /// Network name as Clash spells it.
    pub fn network(&self) -> &'static str {
        match self {
            Transport::Tcp(None) => "tcp",
            Transport::Tcp(Some(_)) => "http",
            Transport::Ws(_) => "ws",
            Transport::Grpc(_) => "grpc",
        }
    }
}

pub fn build_transport(params: &QueryParams) -> Transport {
    let network = params.get_or_default("type").to_ascii_lowercase();
    let header_type = params.get_or_default("headerType");
    let host = params.first("host").map(str::to_owned);

    match network.as_str() {
        "tcp" if header_type.eq_ignore_ascii_case("http") => Transport::Tcp(Some(HttpOptions {
            path: clean_path(params.get_or_default("path")),
            host,
        })),
        "ws" => Transport::Ws(WsOptions {
            path: clean_path(params.get_or_default("path")),
            host,
        }),
        "grpc" => Transport::Grpc(GrpcOptions {
            service_name: params.first("serviceName").map(str::to_owned),
        }),
        "tcp" => Transport::Tcp(None),
        other => {
            debug!("unsupported transport {:?}, falling back to tcp", other);
            Transport::Tcp(None)
        }
    }
}

/// Drops any query suffix carried inside the path (`/ws?ed=2048` -> `/ws`).
fn clean_path(raw: &str) -> String {
    let path = raw.split('?').next().unwrap_or_default();
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
