use crate::proxy::params::QueryParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    None,
    Tls,
    Reality,
}

impl Security {
    /// Anything other than `tls` or `reality` means no transport security.
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("tls") {
            Security::Tls
        } else if value.eq_ignore_ascii_case("reality") {
            Security::Reality
        } else {
            Security::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsOptions {
    pub server_name: String,
    pub fingerprint: String,
    pub alpn: Vec<String>,
    pub skip_cert_verify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealityOptions {
    pub public_key: String,
    pub short_id: String,
    pub spider_x: Option<String>,
}

pub fn build_tls(security: Security, params: &QueryParams, server: &str) -> Option<TlsOptions> {
    if security == Security::None {
        return None;
    }

    let alpn = params
        .first("alpn")
        .map(|alpn| {
            alpn.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    Some(TlsOptions {
        server_name: params.first("sni").unwrap_or(server).to_string(),
        fingerprint: fingerprint(params.get_or_default("fp")),
        alpn,
        skip_cert_verify: true,
    })
}

/// Reality needs both `pbk` and `sid`; without them the link keeps its
/// TLS block and loses only the reality block.
pub fn build_reality(security: Security, params: &QueryParams) -> Option<RealityOptions> {
    if security != Security::Reality {
        return None;
    }
    let public_key = params.first("pbk")?;
    let short_id = params.first("sid")?;
    Some(RealityOptions {
        public_key: public_key.to_string(),
        short_id: short_id.to_string(),
        spider_x: params.first("spx").map(str::to_owned),
    })
}

// Share links use xray's "randomized"; Clash calls it "random".
fn fingerprint(fp: &str) -> String {
    match fp {
        "randomized" => "random".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    #[test]
    fn security_modes() {
        assert_eq!(Security::from_param("tls"), Security::Tls);
        assert_eq!(Security::from_param("REALITY"), Security::Reality);
        assert_eq!(Security::from_param("none"), Security::None);
        assert_eq!(Security::from_param("xtls"), Security::None);
        assert_eq!(Security::from_param(""), Security::None);
    }

    #[test]
    fn no_tls_without_security() {
        assert_eq!(build_tls(Security::None, &params(&[("sni", "a.com")]), "s"), None);
    }

    #[test]
    fn tls_defaults() {
        let tls = build_tls(Security::Tls, &params(&[]), "example.com").unwrap();
        assert_eq!(
            tls,
            TlsOptions {
                server_name: "example.com".into(),
                fingerprint: "chrome".into(),
                alpn: vec![],
                skip_cert_verify: true,
            }
        );
    }

    #[test]
    fn tls_from_params() {
        let tls = build_tls(
            Security::Tls,
            &params(&[("sni", "front.example.com"), ("fp", "firefox"), ("alpn", "h2, http/1.1")]),
            "example.com",
        )
        .unwrap();
        assert_eq!(tls.server_name, "front.example.com");
        assert_eq!(tls.fingerprint, "firefox");
        assert_eq!(tls.alpn, vec!["h2", "http/1.1"]);
    }

    #[test]
    fn randomized_fingerprint_is_renamed() {
        let tls = build_tls(Security::Reality, &params(&[("fp", "randomized")]), "s").unwrap();
        assert_eq!(tls.fingerprint, "random");
    }

    #[test]
    fn reality_options() {
        let reality = build_reality(
            Security::Reality,
            &params(&[("pbk", "ABC"), ("sid", "01"), ("spx", "/probe")]),
        )
        .unwrap();
        assert_eq!(
            reality,
            RealityOptions {
                public_key: "ABC".into(),
                short_id: "01".into(),
                spider_x: Some("/probe".into()),
            }
        );
    }

    #[test]
    fn reality_requires_key_and_short_id() {
        assert_eq!(build_reality(Security::Reality, &params(&[("pbk", "ABC")])), None);
        assert_eq!(build_reality(Security::Reality, &params(&[("sid", "01")])), None);
        assert_eq!(
            build_reality(Security::Tls, &params(&[("pbk", "ABC"), ("sid", "01")])),
            None
        );
    }
}
