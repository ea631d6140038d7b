use crate::models::ProxyNode;
use crate::utils::base64::base64_decode;
use crate::utils::url::url_decode;
use log::{debug, info};

/// Explode a proxy link into a ProxyNode
///
/// The scheme prefix selects the decoder. Prefixes are checked in a fixed
/// order; each one ends with `://`, so `hy2://` never shadows `hysteria2://`
/// and `socks4://` never shadows `socks5://`.
pub fn explode(link: &str) -> Option<ProxyNode> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    let node = if link.starts_with("ss://") {
        super::ss::explode_ss(link)
    } else if link.starts_with("ssr://") {
        super::ssr::explode_ssr(link)
    } else if link.starts_with("vmess://") {
        super::vmess::explode_vmess(link)
    } else if link.starts_with("vless://") {
        super::vless::explode_vless(link)
    } else if link.starts_with("hysteria2://") || link.starts_with("hy2://") {
        super::hysteria2::explode_hysteria2(link)
    } else if link.starts_with("trojan://") {
        super::trojan::explode_trojan(link)
    } else if link.starts_with("http://") || link.starts_with("https://") {
        super::http::explode_http(link)
    } else if link.starts_with("socks4://") || link.starts_with("socks5://") {
        super::socks::explode_socks(link)
    } else {
        debug!("Unsupported link scheme: {}", preview(link));
        return None;
    };

    if node.is_none() {
        debug!("Failed to parse link: {}", preview(link));
    }
    node
}

/// Explode a subscription body into ProxyNodes
///
/// The body is first tried as base64 (whitespace removed, padding corrected).
/// When that fails the raw text is used as-is. Every non-blank line goes
/// through [`explode`]; lines that fail are dropped and order is preserved.
pub fn explode_sub(sub: &str) -> Vec<ProxyNode> {
    let compact: String = sub.chars().filter(|c| !c.is_whitespace()).collect();
    let decoded = if compact.is_empty() {
        None
    } else {
        base64_decode(&compact)
    };
    let source = decoded.as_deref().unwrap_or(sub);

    let mut total = 0usize;
    let mut nodes = Vec::new();
    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        total += 1;
        if let Some(node) = explode(line) {
            nodes.push(node);
        }
    }

    info!(
        "Parsed {} of {} subscription lines (base64: {})",
        nodes.len(),
        total,
        decoded.is_some()
    );
    nodes
}

/// Split the `#name` fragment off a link body.
///
/// The name is percent-decoded. A missing or empty fragment yields
/// `default_name`.
pub(crate) fn split_remark<'a>(body: &'a str, default_name: &str) -> (&'a str, String) {
    match body.split_once('#') {
        Some((rest, fragment)) => {
            let name = url_decode(fragment).trim().to_string();
            if name.is_empty() {
                (rest, default_name.to_string())
            } else {
                (rest, name)
            }
        }
        None => (body, default_name.to_string()),
    }
}

/// Parse a port in `1..=65535`.
pub(crate) fn parse_port(port: &str) -> Option<u16> {
    port.trim().parse::<u16>().ok().filter(|p| *p != 0)
}

/// Split `host:port` on the last colon.
///
/// A trailing `/` is ignored and IPv6 brackets are removed from the host.
pub(crate) fn split_host_port(server_port: &str) -> Option<(String, u16)> {
    let server_port = server_port.trim().trim_end_matches('/');
    let (host, port) = server_port.rsplit_once(':')?;
    let host = strip_brackets(host.trim());
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), parse_port(port)?))
}

/// Like [`split_host_port`], but falls back to `default_port` when the
/// endpoint carries no port.
pub(crate) fn split_endpoint(endpoint: &str, default_port: u16) -> Option<(String, u16)> {
    let endpoint = endpoint.trim().trim_end_matches('/');
    let has_port = if endpoint.starts_with('[') {
        endpoint.contains("]:")
    } else {
        endpoint.contains(':')
    };
    if has_port {
        return split_host_port(endpoint);
    }
    let host = strip_brackets(endpoint);
    if host.is_empty() {
        return None;
    }
    Some((host.to_string(), default_port))
}

/// Split optional `user:pass@` credentials off an endpoint.
///
/// Both parts are percent-decoded; empty values become `None`.
pub(crate) fn split_credentials(body: &str) -> (Option<String>, Option<String>, &str) {
    let Some((auth, endpoint)) = body.rsplit_once('@') else {
        return (None, None, body);
    };
    let (username, password) = match auth.split_once(':') {
        Some((user, pass)) => (url_decode(user), url_decode(pass)),
        None => (url_decode(auth), String::new()),
    };
    (non_empty(username), non_empty(password), endpoint)
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

fn preview(link: &str) -> String {
    link.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyType;

    #[test]
    fn test_split_remark() {
        assert_eq!(
            split_remark("body#My%20Node", "default"),
            ("body", "My Node".to_string())
        );
        assert_eq!(split_remark("body#", "default"), ("body", "default".to_string()));
        assert_eq!(split_remark("body", "default"), ("body", "default".to_string()));
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(
            split_host_port("example.com:443/"),
            Some(("example.com".to_string(), 443))
        );
        assert_eq!(split_host_port("[::1]:8080"), Some(("::1".to_string(), 8080)));
        assert_eq!(split_host_port("example.com:0"), None);
        assert_eq!(split_host_port("example.com:70000"), None);
        assert_eq!(split_host_port("example.com:abc"), None);
        assert_eq!(split_host_port(":443"), None);
        assert_eq!(split_host_port("example.com"), None);
    }

    #[test]
    fn test_split_endpoint_default_port() {
        assert_eq!(
            split_endpoint("proxy.example/", 80),
            Some(("proxy.example".to_string(), 80))
        );
        assert_eq!(split_endpoint("[::1]", 1080), Some(("::1".to_string(), 1080)));
        assert_eq!(split_endpoint("[::1]:1081", 1080), Some(("::1".to_string(), 1081)));
    }

    #[test]
    fn test_explode_dispatches_by_scheme() {
        let node = explode("  ss://YWVzLTI1Ni1nY206cGFzcw==@1.2.3.4:8388#MyNode \n").unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Shadowsocks);

        let node = explode("socks4://10.0.0.1:1080").unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Socks4);

        let node = explode("hy2://secret@hy.example:443").unwrap();
        assert_eq!(node.proxy_type(), ProxyType::Hysteria2);
    }

    #[test]
    fn test_explode_unknown_scheme() {
        assert!(explode("wireguard://key@1.2.3.4:51820").is_none());
        assert!(explode("just some text").is_none());
        assert!(explode("").is_none());
        assert!(explode("ss:/").is_none());
    }
}
