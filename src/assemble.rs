use std::collections::BTreeMap;

use crate::config::{
    Config, Dns, GrpcOpts, HttpOpts, Profile, Proxy, ProxyGroup, RealityOpts, SniffPorts, Sniffer,
    Tun, VlessProxy, WsOpts,
};
use crate::proxy::transport::Transport;
use crate::proxy::ProxyDescriptor;
use crate::settings::Settings;

pub const SELECT_GROUP: &str = "SELECT";
pub const AUTO_GROUP: &str = "AUTO";
pub const LATENCY_TEST_URL: &str = "https://www.gstatic.com/generate_204";

const EXTERNAL_UI_URL: &str =
    "https://github.com/MetaCubeX/metacubexd/archive/refs/heads/gh-pages.zip";

pub fn assemble(settings: &Settings, proxies: Vec<ProxyDescriptor>) -> Config {
    let proxies: Vec<Proxy> = proxies.into_iter().map(to_clash_proxy).collect();
    let names: Vec<String> = proxies.iter().map(|p| p.name().to_string()).collect();

    Config {
        mixed_port: settings.mixed_port,
        ipv6: true,
        allow_lan: settings.allow_lan,
        mode: "rule".into(),
        log_level: settings.log_level.clone(),
        external_controller: settings.external_controller.clone(),
        external_ui: "ui".into(),
        external_ui_url: EXTERNAL_UI_URL.into(),
        profile: Profile {
            store_selected: true,
        },
        tun: default_tun(),
        dns: default_dns(),
        sniffer: default_sniffer(),
        proxies,
        proxy_groups: build_groups(names),
        rules: vec![format!("MATCH,{}", SELECT_GROUP)],
    }
}

fn build_groups(names: Vec<String>) -> Vec<ProxyGroup> {
    let mut selectable = Vec::with_capacity(names.len() + 2);
    selectable.push(AUTO_GROUP.to_string());
    selectable.extend(names.iter().cloned());
    selectable.push("DIRECT".to_string());

    vec![
        ProxyGroup {
            name: SELECT_GROUP.into(),
            group_type: "select".into(),
            url: None,
            interval: None,
            tolerance: None,
            proxies: selectable,
        },
        ProxyGroup {
            name: AUTO_GROUP.into(),
            group_type: "url-test".into(),
            url: Some(LATENCY_TEST_URL.into()),
            interval: Some(300),
            tolerance: Some(50),
            proxies: names,
        },
    ]
}

pub fn to_clash_proxy(proxy: ProxyDescriptor) -> Proxy {
    let network = proxy.transport.network().to_string();

    let (mut ws_opts, mut http_opts, mut grpc_opts) = (None, None, None);
    match proxy.transport {
        Transport::Tcp(None) => {}
        Transport::Tcp(Some(http)) => {
            http_opts = Some(HttpOpts {
                method: "GET".into(),
                path: vec![http.path],
                headers: http
                    .host
                    .map(|host| BTreeMap::from([("Host".to_string(), vec![host])]))
                    .unwrap_or_default(),
            });
        }
        Transport::Ws(ws) => {
            ws_opts = Some(WsOpts {
                path: ws.path,
                headers: ws
                    .host
                    .map(|host| BTreeMap::from([("Host".to_string(), host)]))
                    .unwrap_or_default(),
            });
        }
        Transport::Grpc(grpc) => {
            grpc_opts = grpc.service_name.map(|grpc_service_name| GrpcOpts { grpc_service_name });
        }
    }

    let tls = proxy.tls;
    let reality_opts = proxy.reality.map(|r| RealityOpts {
        public_key: r.public_key,
        short_id: r.short_id,
        spider_x: r.spider_x,
    });

    Proxy::Vless(VlessProxy {
        name: proxy.name,
        server: proxy.server,
        port: proxy.port,
        uuid: proxy.uuid,
        network,
        udp: proxy.udp,
        tfo: false,
        ip_version: "ipv4-prefer".into(),
        tls: tls.is_some(),
        servername: tls.as_ref().map(|t| t.server_name.clone()),
        client_fingerprint: tls.as_ref().map(|t| t.fingerprint.clone()),
        alpn: tls
            .as_ref()
            .map(|t| t.alpn.clone())
            .filter(|alpn| !alpn.is_empty()),
        skip_cert_verify: tls.as_ref().map(|t| t.skip_cert_verify),
        flow: proxy.flow,
        reality_opts,
        ws_opts,
        http_opts,
        grpc_opts,
    })
}

fn default_tun() -> Tun {
    Tun {
        enable: true,
        stack: "mixed".into(),
        auto_route: true,
        strict_route: true,
        auto_detect_interface: true,
        dns_hijack: vec!["any:53".into(), "tcp://any:53".into()],
        mtu: 9000,
    }
}

fn default_dns() -> Dns {
    Dns {
        enable: true,
        ipv6: true,
        enhanced_mode: "fake-ip".into(),
        fake_ip_range: "198.18.0.1/16".into(),
        nameserver: vec![
            "https://1.1.1.1/dns-query".into(),
            "https://8.8.8.8/dns-query".into(),
        ],
        fallback: vec![
            "https://1.0.0.1/dns-query".into(),
            "https://8.8.4.4/dns-query".into(),
        ],
    }
}

fn default_sniffer() -> Sniffer {
    Sniffer {
        enable: true,
        force_dns_mapping: true,
        parse_pure_ip: true,
        override_destination: true,
        sniff: BTreeMap::from([
            (
                "HTTP".to_string(),
                SniffPorts {
                    ports: vec![80, 8080, 8880, 2052, 2082, 2086, 2095],
                },
            ),
            (
                "TLS".to_string(),
                SniffPorts {
                    ports: vec![443, 8443, 2053, 2083, 2087, 2096],
                },
            ),
        ]),
    }
}
