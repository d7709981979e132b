use crate::proxy::link::{ParsedUri, Rejection};
use crate::proxy::tls::{self, RealityOptions, Security, TlsOptions};
use crate::proxy::transport::{self, Transport};

/// One usable VLESS server, independent of the client config format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub uuid: String,
    pub security: Security,
    pub transport: Transport,
    pub tls: Option<TlsOptions>,
    pub reality: Option<RealityOptions>,
    pub flow: Option<String>,
    pub udp: bool,
}

pub fn normalize(parsed: ParsedUri) -> Result<ProxyDescriptor, Rejection> {
    let ParsedUri {
        userinfo,
        host,
        port,
        query,
        fragment,
        ..
    } = parsed;

    if userinfo.is_empty() {
        return Err(Rejection::MissingCredential);
    }
    if host.is_empty() {
        return Err(Rejection::MissingHost);
    }
    if port == 0 {
        return Err(Rejection::InvalidPort);
    }

    let security = Security::from_param(query.get_or_default("security"));

    Ok(ProxyDescriptor {
        name: fragment,
        tls: tls::build_tls(security, &query, &host),
        reality: tls::build_reality(security, &query),
        transport: transport::build_transport(&query),
        flow: query.first("flow").map(str::to_owned),
        security,
        server: host,
        port,
        uuid: userinfo,
        udp: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::link::extract;
    use crate::proxy::transport::GrpcOptions;

    fn parse(line: &str) -> Result<ProxyDescriptor, Rejection> {
        normalize(extract(line)?)
    }

    #[test]
    fn reality_link() {
        let proxy = parse(
            "vless://11111111-2222-3333-4444-555555555555@example.com:443?security=reality&pbk=ABC&sid=01&sni=example.com&fp=chrome&type=tcp#MyNode",
        )
        .unwrap();

        assert_eq!(proxy.name, "MyNode");
        assert_eq!(proxy.server, "example.com");
        assert_eq!(proxy.port, 443);
        assert_eq!(proxy.uuid, "11111111-2222-3333-4444-555555555555");
        assert_eq!(proxy.security, Security::Reality);
        assert_eq!(proxy.tls.as_ref().unwrap().server_name, "example.com");
        assert_eq!(proxy.tls.as_ref().unwrap().fingerprint, "chrome");
        assert_eq!(
            proxy.reality,
            Some(RealityOptions {
                public_key: "ABC".into(),
                short_id: "01".into(),
                spider_x: None,
            })
        );
        assert_eq!(proxy.transport, Transport::Tcp(None));
        assert!(proxy.udp);
    }

    #[test]
    fn reality_without_short_id_is_downgraded() {
        let proxy = parse("vless://id@example.com:443?security=reality&pbk=ABC#n").unwrap();
        assert_eq!(proxy.security, Security::Reality);
        assert!(proxy.tls.is_some());
        assert_eq!(proxy.reality, None);

        let proxy = parse("vless://id@example.com:443?security=reality&sid=01#n").unwrap();
        assert_eq!(proxy.reality, None);
    }

    #[test]
    fn bare_link_uses_defaults() {
        let proxy = parse("vless://id@example.com:8080#plain").unwrap();
        assert_eq!(proxy.security, Security::None);
        assert_eq!(proxy.transport, Transport::Tcp(None));
        assert_eq!(proxy.tls, None);
        assert_eq!(proxy.reality, None);
        assert_eq!(proxy.flow, None);
        assert!(proxy.udp);
    }

    #[test]
    fn grpc_link() {
        let proxy =
            parse("vless://id@example.com:443?security=tls&type=grpc&serviceName=my-service#g")
                .unwrap();
        assert_eq!(
            proxy.transport,
            Transport::Grpc(GrpcOptions {
                service_name: Some("my-service".into()),
            })
        );
    }

    #[test]
    fn flow_is_carried_only_when_present() {
        let proxy = parse("vless://id@example.com:443?flow=xtls-rprx-vision#f").unwrap();
        assert_eq!(proxy.flow.as_deref(), Some("xtls-rprx-vision"));

        let proxy = parse("vless://id@example.com:443?flow=#f").unwrap();
        assert_eq!(proxy.flow, None);
    }

    #[test]
    fn blank_sni_falls_back_to_server() {
        let proxy = parse("vless://id@example.com:443?security=tls&sni=#n").unwrap();
        assert_eq!(proxy.tls.unwrap().server_name, "example.com");
    }

    #[test]
    fn rejects_hand_built_uri_without_fields() {
        let parsed = extract("vless://id@example.com:443#n").unwrap();

        let mut no_id = parsed.clone();
        no_id.userinfo.clear();
        assert_eq!(normalize(no_id), Err(Rejection::MissingCredential));

        let mut no_host = parsed.clone();
        no_host.host.clear();
        assert_eq!(normalize(no_host), Err(Rejection::MissingHost));

        let mut no_port = parsed;
        no_port.port = 0;
        assert_eq!(normalize(no_port), Err(Rejection::InvalidPort));
    }
}
