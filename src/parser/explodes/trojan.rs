use super::common::{split_host_port, split_remark};
use crate::models::{
    CommonProxyOptions, GrpcOptions, ProxyNode, RealityOptions, WsOptions, TROJAN_DEFAULT_NAME,
};
use crate::utils::url::{is_truthy, parse_query, url_decode};

/// Parse a Trojan link into a ProxyNode
///
/// Format: `trojan://password@server:port[?params]#name`
pub fn explode_trojan(trojan: &str) -> Option<ProxyNode> {
    let content = trojan.strip_prefix("trojan://")?;
    let (content, name) = split_remark(content, TROJAN_DEFAULT_NAME);
    let (main, query) = match content.split_once('?') {
        Some((main, query)) => (main, query),
        None => (content, ""),
    };

    let (password, server_port) = main.rsplit_once('@')?;
    let password = url_decode(password);
    if password.is_empty() {
        return None;
    }
    let (server, port) = split_host_port(server_port)?;

    let params = parse_query(query);
    let get = |key: &str| params.get(key).cloned();
    let flag = |key: &str| params.get(key).map(String::as_str) == Some("1");

    let alpn = params.get("alpn").map(|alpn| {
        alpn.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    });
    let skip_cert_verify = (flag("allowInsecure") || flag("skipCertVerify")).then_some(true);
    let reality_opts = (params.get("security").map(String::as_str) == Some("reality")).then(|| {
        RealityOptions {
            public_key: get("pbk"),
            short_id: get("sid"),
        }
    });

    let network = get("type");
    let (ws_opts, grpc_opts) = match network.as_deref() {
        Some("ws") => (Some(WsOptions::new(get("path"), get("host"))), None),
        Some("grpc") => (
            None,
            Some(GrpcOptions {
                grpc_service_name: get("serviceName"),
            }),
        ),
        _ => (None, None),
    };

    Some(ProxyNode::Trojan {
        common: CommonProxyOptions::new(name, server, port),
        password,
        sni: get("sni"),
        alpn,
        client_fingerprint: get("fp"),
        fingerprint: get("fingerprint"),
        skip_cert_verify,
        udp: params.get("udp").map(|v| is_truthy(v)),
        reality_opts,
        network,
        ws_opts,
        grpc_opts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyType;

    #[test]
    fn test_explode_trojan() {
        let link = "trojan://password123@trojan.example.com:443?sni=sni.example.com&alpn=h2,http/1.1&fp=firefox&allowInsecure=1&udp=true#Trojan%20Node";
        let node = explode_trojan(link).unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Trojan);
        let ProxyNode::Trojan {
            common,
            password,
            sni,
            alpn,
            client_fingerprint,
            skip_cert_verify,
            udp,
            reality_opts,
            network,
            ..
        } = node
        else {
            panic!("expected trojan node");
        };
        assert_eq!(common, CommonProxyOptions::new("Trojan Node", "trojan.example.com", 443));
        assert_eq!(password, "password123");
        assert_eq!(sni.as_deref(), Some("sni.example.com"));
        assert_eq!(alpn, Some(vec!["h2".to_string(), "http/1.1".to_string()]));
        assert_eq!(client_fingerprint.as_deref(), Some("firefox"));
        assert_eq!(skip_cert_verify, Some(true));
        assert_eq!(udp, Some(true));
        assert_eq!(reality_opts, None);
        assert_eq!(network, None);
    }

    #[test]
    fn test_explode_trojan_reality_grpc() {
        let link = "trojan://pw@1.2.3.4:8443?security=reality&pbk=KEY&type=grpc&serviceName=svc&skipCertVerify=1";
        let ProxyNode::Trojan {
            common,
            reality_opts,
            network,
            grpc_opts,
            ws_opts,
            skip_cert_verify,
            ..
        } = explode_trojan(link).unwrap()
        else {
            panic!("expected trojan node");
        };
        assert_eq!(common.name, TROJAN_DEFAULT_NAME);
        assert_eq!(
            reality_opts,
            Some(RealityOptions {
                public_key: Some("KEY".to_string()),
                short_id: None,
            })
        );
        assert_eq!(network.as_deref(), Some("grpc"));
        assert_eq!(grpc_opts.unwrap().grpc_service_name.as_deref(), Some("svc"));
        assert!(ws_opts.is_none());
        assert_eq!(skip_cert_verify, Some(true));
    }

    #[test]
    fn test_explode_trojan_ws() {
        let link = "trojan://pw@1.2.3.4:443?type=ws&path=%2Fws&host=cdn.example";
        let ProxyNode::Trojan { ws_opts, .. } = explode_trojan(link).unwrap() else {
            panic!("expected trojan node");
        };
        assert_eq!(
            ws_opts,
            Some(WsOptions::new(
                Some("/ws".to_string()),
                Some("cdn.example".to_string())
            ))
        );
    }

    #[test]
    fn test_explode_trojan_invalid() {
        assert!(explode_trojan("trojan://trojan.example.com:443").is_none());
        assert!(explode_trojan("trojan://pw@trojan.example.com").is_none());
        assert!(explode_trojan("trojan://pw@:443").is_none());
    }
}
