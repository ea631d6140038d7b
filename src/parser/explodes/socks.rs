use super::common::{split_credentials, split_endpoint, split_remark};
use crate::models::{CommonProxyOptions, ProxyNode, SOCKS4_DEFAULT_NAME, SOCKS5_DEFAULT_NAME};

const SOCKS_DEFAULT_PORT: u16 = 1080;

/// Parse a SOCKS4 or SOCKS5 link into a ProxyNode
///
/// Format: `socks4|socks5://[username:password@]server[:port][/]#name`.
/// The bare `socks://` scheme is not accepted.
pub fn explode_socks(link: &str) -> Option<ProxyNode> {
    let (content, is_socks5) = match link.strip_prefix("socks5://") {
        Some(content) => (content, true),
        None => (link.strip_prefix("socks4://")?, false),
    };
    let default_name = if is_socks5 {
        SOCKS5_DEFAULT_NAME
    } else {
        SOCKS4_DEFAULT_NAME
    };

    let (content, name) = split_remark(content, default_name);
    let (username, password, endpoint) = split_credentials(content);
    let (server, port) = split_endpoint(endpoint, SOCKS_DEFAULT_PORT)?;
    let common = CommonProxyOptions::new(name, server, port);

    Some(if is_socks5 {
        ProxyNode::Socks5 {
            common,
            username,
            password,
        }
    } else {
        ProxyNode::Socks4 {
            common,
            username,
            password,
        }
    })
}
