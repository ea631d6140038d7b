use super::common::{split_host_port, split_remark};
use crate::models::{
    CommonProxyOptions, GrpcOptions, HttpOptions, ProxyNode, RealityOptions, WsOptions,
    VLESS_DEFAULT_NAME,
};
use crate::utils::url::parse_query;

/// Parse a VLESS link into a ProxyNode
///
/// Format: `vless://uuid@server:port[?params]#name`
///
/// Without a query the node carries only the connection header and uuid.
/// With one, `type` selects the transport (default `tcp`) and `security`
/// selects `tls` or `reality`.
pub fn explode_vless(vless: &str) -> Option<ProxyNode> {
    let content = vless.strip_prefix("vless://")?;
    let (content, name) = split_remark(content, VLESS_DEFAULT_NAME);
    let (main, query) = match content.split_once('?') {
        Some((main, query)) => (main, query),
        None => (content, ""),
    };

    let (uuid, server_port) = main.split_once('@')?;
    let uuid = uuid.trim();
    if uuid.is_empty() {
        return None;
    }
    let (server, port) = split_host_port(server_port)?;

    let mut network = None;
    let mut flow = None;
    let mut tls = None;
    let mut servername = None;
    let mut skip_cert_verify = None;
    let mut client_fingerprint = None;
    let mut reality_opts = None;
    let mut tfo = None;
    let mut ws_opts = None;
    let mut grpc_opts = None;
    let mut http_opts = None;

    if !query.is_empty() {
        let params = parse_query(query);
        let get = |key: &str| params.get(key).cloned();

        let transport = get("type").unwrap_or_else(|| "tcp".to_string());
        flow = get("flow");

        let security = params.get("security").map(String::as_str).unwrap_or_default();
        if security == "tls" || security == "reality" {
            tls = Some(true);
            servername = get("sni");
            skip_cert_verify = params.get("allowInsecure").map(|v| v == "1");
            client_fingerprint = get("fp");
        }
        if security == "reality" {
            reality_opts = Some(RealityOptions {
                public_key: get("pbk"),
                short_id: get("sid"),
            });
        }

        tfo = params.get("tfo").map(|v| v == "1");

        match transport.as_str() {
            "ws" => ws_opts = Some(WsOptions::new(get("path"), get("host"))),
            "grpc" => {
                grpc_opts = Some(GrpcOptions {
                    grpc_service_name: get("serviceName"),
                })
            }
            "tcp" if params.get("headerType").map(String::as_str) == Some("http") => {
                network = Some("http".to_string());
                http_opts = get("path").map(|path| HttpOptions { path: vec![path] });
            }
            _ => {}
        }
        network = network.or(Some(transport));
    }

    Some(ProxyNode::Vless {
        common: CommonProxyOptions::new(name, server, port),
        uuid: uuid.to_string(),
        network,
        flow,
        tls,
        servername,
        skip_cert_verify,
        client_fingerprint,
        reality_opts,
        tfo,
        ws_opts,
        grpc_opts,
        http_opts,
    })
}
