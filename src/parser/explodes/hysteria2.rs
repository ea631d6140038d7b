use super::common::{split_host_port, split_remark};
use crate::models::{CommonProxyOptions, ProxyNode, HYSTERIA2_DEFAULT_NAME};
use crate::utils::url::{parse_query, url_decode};

/// Parse a Hysteria2 link into a ProxyNode
///
/// Format: `hysteria2://password@server:port[?params]#name`, `hy2://` is an alias.
pub fn explode_hysteria2(hysteria2: &str) -> Option<ProxyNode> {
    let content = hysteria2
        .strip_prefix("hysteria2://")
        .or_else(|| hysteria2.strip_prefix("hy2://"))?;
    let (content, name) = split_remark(content, HYSTERIA2_DEFAULT_NAME);
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
    Some(ProxyNode::Hysteria2 {
        common: CommonProxyOptions::new(name, server, port),
        password,
        sni: params.get("sni").cloned(),
        skip_cert_verify: (params.get("insecure").map(String::as_str) == Some("1")).then_some(true),
        obfs: params.get("obfs").cloned(),
        obfs_password: params.get("obfs-password").cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyType;

    #[test]
    fn test_explode_hysteria2() {
        let link = "hysteria2://p%40ss@hy.example.com:8443/?sni=real.example.com&insecure=1&obfs=salamander&obfs-password=obfspw#HY2%20Node";
        let node = explode_hysteria2(link).unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Hysteria2);
        let ProxyNode::Hysteria2 {
            common,
            password,
            sni,
            skip_cert_verify,
            obfs,
            obfs_password,
        } = node
        else {
            panic!("expected hysteria2 node");
        };
        assert_eq!(common, CommonProxyOptions::new("HY2 Node", "hy.example.com", 8443));
        assert_eq!(password, "p@ss");
        assert_eq!(sni.as_deref(), Some("real.example.com"));
        assert_eq!(skip_cert_verify, Some(true));
        assert_eq!(obfs.as_deref(), Some("salamander"));
        assert_eq!(obfs_password.as_deref(), Some("obfspw"));
    }

    #[test]
    fn test_explode_hy2_alias_minimal() {
        let ProxyNode::Hysteria2 {
            common,
            sni,
            skip_cert_verify,
            ..
        } = explode_hysteria2("hy2://secret@1.2.3.4:443?insecure=0").unwrap()
        else {
            panic!("expected hysteria2 node");
        };
        assert_eq!(common.name, HYSTERIA2_DEFAULT_NAME);
        assert_eq!(sni, None);
        assert_eq!(skip_cert_verify, None);
    }

    #[test]
    fn test_explode_hysteria2_invalid() {
        assert!(explode_hysteria2("hysteria2://hy.example.com:443").is_none());
        assert!(explode_hysteria2("hysteria2://@hy.example.com:443").is_none());
        assert!(explode_hysteria2("hy2://pw@hy.example.com").is_none());
    }
}
