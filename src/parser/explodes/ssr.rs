use super::common::parse_port;
use crate::models::{CommonProxyOptions, ProxyNode, SSR_DEFAULT_NAME};
use crate::utils::base64::base64_decode;

/// Parse a ShadowsocksR link into a ProxyNode
///
/// Format: `ssr://base64(server:port:protocol:method:obfs:base64(password)/?params)`
/// where `remarks`, `obfsparam` and `protoparam` are base64 encoded.
pub fn explode_ssr(ssr: &str) -> Option<ProxyNode> {
    let decoded = base64_decode(ssr.strip_prefix("ssr://")?)?;
    let (main, params) = match decoded.split_once("/?") {
        Some((main, params)) => (main, params),
        None => (decoded.as_str(), ""),
    };

    let parts: Vec<&str> = main.split(':').collect();
    let &[server, port, protocol, method, obfs, password] = parts.as_slice() else {
        return None;
    };
    if server.is_empty() {
        return None;
    }
    let port = parse_port(port)?;
    let password = base64_decode(password)?;

    let mut name = None;
    let mut obfs_param = String::new();
    let mut protocol_param = String::new();
    for (key, value) in params
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(_, value)| !value.is_empty())
    {
        match key {
            "remarks" => name = Some(base64_decode(value)?),
            "obfsparam" => obfs_param = base64_decode(value)?,
            "protoparam" => protocol_param = base64_decode(value)?,
            _ => {}
        }
    }
    let name = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| SSR_DEFAULT_NAME.to_string());

    Some(ProxyNode::ShadowsocksR {
        common: CommonProxyOptions::new(name, server, port),
        cipher: method.to_string(),
        password,
        protocol: protocol.to_string(),
        obfs: obfs.to_string(),
        protocol_param,
        obfs_param,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyType;
    use crate::utils::base64::base64_encode;
    use ::base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn url_safe_base64_encode(input: &str) -> String {
        URL_SAFE_NO_PAD.encode(input)
    }

    fn ssr_link(main: &str, params: &str) -> String {
        let body = if params.is_empty() {
            main.to_string()
        } else {
            format!("{main}/?{params}")
        };
        format!("ssr://{}", url_safe_base64_encode(&body))
    }

    #[test]
    fn test_explode_ssr() {
        let main = format!(
            "example.com:8388:auth_aes128_md5:aes-256-cfb:tls1.2_ticket_auth:{}",
            url_safe_base64_encode("password")
        );
        let params = format!(
            "obfsparam={}&protoparam={}&remarks={}&group={}",
            url_safe_base64_encode("obfs.example.com"),
            url_safe_base64_encode("32:abc"),
            url_safe_base64_encode("香港 01"),
            url_safe_base64_encode("group")
        );
        let node = explode_ssr(&ssr_link(&main, &params)).unwrap();
        assert_eq!(node.proxy_type(), ProxyType::ShadowsocksR);

        let ProxyNode::ShadowsocksR {
            common,
            cipher,
            password,
            protocol,
            obfs,
            protocol_param,
            obfs_param,
        } = node
        else {
            panic!("expected ssr node");
        };
        assert_eq!(common, CommonProxyOptions::new("香港 01", "example.com", 8388));
        assert_eq!(cipher, "aes-256-cfb");
        assert_eq!(password, "password");
        assert_eq!(protocol, "auth_aes128_md5");
        assert_eq!(obfs, "tls1.2_ticket_auth");
        assert_eq!(protocol_param, "32:abc");
        assert_eq!(obfs_param, "obfs.example.com");
    }

    #[test]
    fn test_explode_ssr_without_params() {
        let main = format!("1.2.3.4:443:origin:rc4-md5:plain:{}", base64_encode("pw"));
        let node = explode_ssr(&ssr_link(&main, "")).unwrap();
        assert_eq!(node.name(), SSR_DEFAULT_NAME);
        let ProxyNode::ShadowsocksR {
            protocol_param,
            obfs_param,
            ..
        } = node
        else {
            panic!("expected ssr node");
        };
        assert!(protocol_param.is_empty());
        assert!(obfs_param.is_empty());
    }

    #[test]
    fn test_explode_ssr_invalid() {
        // five fields
        let short = ssr_link("1.2.3.4:443:origin:rc4-md5:plain", "");
        assert!(explode_ssr(&short).is_none());

        let bad_port = ssr_link(&format!("1.2.3.4:0:origin:rc4-md5:plain:{}", base64_encode("pw")), "");
        assert!(explode_ssr(&bad_port).is_none());

        let bad_remarks = ssr_link(
            &format!("1.2.3.4:443:origin:rc4-md5:plain:{}", base64_encode("pw")),
            "remarks=!!!",
        );
        assert!(explode_ssr(&bad_remarks).is_none());

        assert!(explode_ssr("ssr://%%%").is_none());
    }
}
