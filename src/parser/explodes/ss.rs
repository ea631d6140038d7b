use super::common::{split_host_port, split_remark};
use super::plugin::parse_plugin;
use crate::models::{CommonProxyOptions, ProxyNode, SS_DEFAULT_NAME};
use crate::utils::base64::base64_decode;
use crate::utils::url::{is_truthy, parse_query, url_decode};

/// Parse a Shadowsocks link into a ProxyNode
///
/// Accepted shapes:
/// - `ss://base64(method:password@server:port)#name`
/// - `ss://base64(method:password)@server:port[/?params]#name` (SIP002)
/// - `ss://method:password@server:port[/?params]#name` (SIP002, plain userinfo)
pub fn explode_ss(ss: &str) -> Option<ProxyNode> {
    let content = ss.strip_prefix("ss://")?.replace("/?", "?");
    let (content, name) = split_remark(&content, SS_DEFAULT_NAME);
    let (body, query) = match content.split_once('?') {
        Some((body, query)) => (body, query),
        None => (content, ""),
    };

    let (method, password, server, port) = match body.rsplit_once('@') {
        Some((userinfo, server_port)) => {
            let (method, password) = decode_userinfo(userinfo)?;
            let (server, port) = split_host_port(server_port)?;
            (method, password, server, port)
        }
        None => {
            // Legacy format: everything is base64
            let decoded = base64_decode(body)?;
            let (method_password, server_port) = decoded.rsplit_once('@')?;
            let (method, password) = method_password.split_once(':')?;
            let (server, port) = split_host_port(server_port)?;
            (method.to_string(), password.to_string(), server, port)
        }
    };

    let method = method.trim();
    if method.is_empty() {
        return None;
    }

    let params = parse_query(query);
    let udp = params.get("udp").map(|v| is_truthy(v));
    let udp_over_tcp = params.get("uot").map(|v| is_truthy(v));

    let (plugin, client_fingerprint) = match params.get("plugin") {
        Some(plugin) => match parse_plugin(plugin).ok()? {
            Some(parsed) => (Some(parsed.plugin), parsed.client_fingerprint),
            None => (None, None),
        },
        None => (None, None),
    };

    Some(ProxyNode::Shadowsocks {
        common: CommonProxyOptions::new(name, server, port),
        cipher: method.to_string(),
        password: password.trim().to_string(),
        udp,
        udp_over_tcp,
        plugin,
        client_fingerprint,
    })
}

/// Decode the SIP002 userinfo: percent-decode, then base64 if it decodes.
fn decode_userinfo(userinfo: &str) -> Option<(String, String)> {
    let unescaped = url_decode(userinfo);
    let decoded = base64_decode(&unescaped).unwrap_or(unescaped);
    let (method, password) = decoded.split_once(':')?;
    Some((method.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObfsPluginOptions, ProxyType, ShadowsocksPlugin};
    use crate::utils::base64::base64_encode;
    use ::base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn fields(node: &ProxyNode) -> (&str, &str, u16, &str, &str) {
        match node {
            ProxyNode::Shadowsocks {
                common,
                cipher,
                password,
                ..
            } => (
                common.name.as_str(),
                common.server.as_str(),
                common.port,
                cipher.as_str(),
                password.as_str(),
            ),
            other => panic!("expected ss node, got {:?}", other.proxy_type()),
        }
    }

    #[test]
    fn test_explode_ss_example() {
        let node = explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388#MyNode").unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Shadowsocks);
        assert_eq!(fields(&node), ("MyNode", "1.2.3.4", 8388, "aes-256-gcm", "pass"));
    }

    #[test]
    fn test_explode_ss_legacy_format() {
        // Legacy format: ss://base64(method:password@server:port)
        let legacy_ss = "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwYXNzd29yZEAxMjcuMC4wLjE6ODA4MA==";
        let node = explode_ss(legacy_ss).unwrap();
        assert_eq!(
            fields(&node),
            ("SS节点", "127.0.0.1", 8080, "chacha20-ietf-poly1305", "password")
        );
    }

    #[test]
    fn test_explode_ss_round_trip_all_shapes() {
        let cases = [
            ("aes-128-gcm", "p@ss:word", "example.com", 443u16),
            ("2022-blake3-aes-256-gcm", "c2VjcmV0a2V5", "10.0.0.1", 8388),
            ("chacha20-ietf-poly1305", "x", "proxy.example.org", 65535),
        ];
        for (method, password, server, port) in cases {
            let whole = format!(
                "ss://{}#n",
                base64_encode(&format!("{method}:{password}@{server}:{port}"))
            );
            let sip002 = format!(
                "ss://{}@{server}:{port}#n",
                URL_SAFE_NO_PAD.encode(format!("{method}:{password}"))
            );
            let plain = format!(
                "ss://{}:{}@{server}:{port}#n",
                urlencoding::encode(method),
                urlencoding::encode(password)
            );
            for link in [whole, sip002, plain] {
                let node = explode_ss(&link).unwrap_or_else(|| panic!("failed: {link}"));
                assert_eq!(fields(&node), ("n", server, port, method, password), "{link}");
            }
        }
    }

    #[test]
    fn test_explode_ss_percent_encoded_padding() {
        let node = explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw%3D%3D@1.2.3.4:8388#n").unwrap();
        assert_eq!(fields(&node), ("n", "1.2.3.4", 8388, "aes-256-gcm", "pass"));
    }

    #[test]
    fn test_explode_ss_with_fragment() {
        let node = explode_ss(
            "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwYXNzd29yZA==@example.com:8388#Example%20Server",
        )
        .unwrap();
        assert_eq!(node.name(), "Example Server");
    }

    #[test]
    fn test_explode_ss_with_plugin() {
        let link = "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNTpwYXNzd29yZA==@example.com:8388/?plugin=obfs-local%3Bobfs%3Dhttp%3Bobfs-host%3Dexample.com&udp=1#Example%20Plugin";
        let node = explode_ss(link).unwrap();
        let ProxyNode::Shadowsocks {
            common,
            plugin,
            udp,
            udp_over_tcp,
            ..
        } = node
        else {
            panic!("expected ss node");
        };
        assert_eq!(common.server, "example.com");
        assert_eq!(common.port, 8388);
        assert_eq!(common.name, "Example Plugin");
        assert_eq!(udp, Some(true));
        assert_eq!(udp_over_tcp, None);
        assert_eq!(
            plugin,
            Some(ShadowsocksPlugin::Obfs(ObfsPluginOptions {
                mode: Some("http".to_string()),
                host: Some("example.com".to_string()),
            }))
        );
    }

    #[test]
    fn test_explode_ss_unknown_plugin_dropped() {
        let link = "ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388?plugin=custom%3Bk%3Dv&uot=true";
        let ProxyNode::Shadowsocks {
            plugin,
            udp_over_tcp,
            ..
        } = explode_ss(link).unwrap()
        else {
            panic!("expected ss node");
        };
        assert_eq!(plugin, None);
        assert_eq!(udp_over_tcp, Some(true));
    }

    #[test]
    fn test_explode_ss_bad_plugin_option_rejects_link() {
        let link = "ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388?plugin=kcptun%3Bmtu%3Dlots";
        assert!(explode_ss(link).is_none());
    }

    #[test]
    fn test_explode_ss_invalid() {
        assert!(explode_ss("ss://invalid").is_none());
        assert!(explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4").is_none());
        assert!(explode_ss("ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:notaport").is_none());
        // "nocolon" has no method separator
        assert!(explode_ss("ss://bm9jb2xvbg==@1.2.3.4:8388").is_none());
        assert!(explode_ss("vmess://abc").is_none());
    }
}
