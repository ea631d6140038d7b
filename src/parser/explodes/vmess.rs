use serde_json::Value;

use crate::models::{
    CommonProxyOptions, GrpcOptions, H2Options, ProxyNode, WsOptions, VMESS_DEFAULT_NAME,
};
use crate::utils::base64::base64_decode;

/// Parse a VMess link into a ProxyNode
///
/// Format: `vmess://base64(json)` using the v2rayN share fields
/// (`ps`, `add`, `port`, `id`, `aid`, `scy`, `net`, `host`, `path`, `tls`, `sni`).
pub fn explode_vmess(vmess: &str) -> Option<ProxyNode> {
    let decoded = base64_decode(vmess.strip_prefix("vmess://")?)?;
    let json: Value = serde_json::from_str(&decoded).ok()?;
    if !json.is_object() {
        return None;
    }

    let server = str_field(&json, "add")?;
    let uuid = str_field(&json, "id")?;
    let port = match json.get("port") {
        None | Some(Value::Null) => 443,
        Some(Value::String(s)) if s.trim().is_empty() => 443,
        Some(value) => int_field(value)
            .and_then(|p| u16::try_from(p).ok())
            .filter(|p| *p != 0)?,
    };
    let alter_id = match json.get("aid") {
        None | Some(Value::Null) => 0,
        Some(value) => int_field(value).and_then(|a| u32::try_from(a).ok())?,
    };
    let name = str_field(&json, "ps").unwrap_or_else(|| VMESS_DEFAULT_NAME.to_string());
    let cipher = str_field(&json, "scy").unwrap_or_else(|| "auto".to_string());
    let network = str_field(&json, "net").unwrap_or_else(|| "tcp".to_string());
    let host = str_field(&json, "host");
    let path = str_field(&json, "path");

    let (tls, servername) = match json.get("tls").and_then(Value::as_str) {
        Some("tls") => (Some(true), str_field(&json, "sni")),
        _ => (None, None),
    };

    let mut ws_opts = None;
    let mut grpc_opts = None;
    let mut h2_opts = None;
    match network.as_str() {
        "ws" => {
            ws_opts = Some(WsOptions::new(
                Some(path.unwrap_or_else(|| "/".to_string())),
                host,
            ))
        }
        "grpc" => {
            grpc_opts = Some(GrpcOptions {
                grpc_service_name: Some(path.unwrap_or_default()),
            })
        }
        "h2" => {
            h2_opts = Some(H2Options {
                path: path.unwrap_or_else(|| "/".to_string()),
                host: host.map(|h| vec![h]),
            })
        }
        _ => {}
    }

    Some(ProxyNode::VMess {
        common: CommonProxyOptions::new(name, server, port),
        uuid,
        alter_id,
        cipher,
        network,
        tls,
        servername,
        ws_opts,
        grpc_opts,
        h2_opts,
    })
}

/// Non-empty string field.
fn str_field(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integer given either as a JSON number or as a numeric string.
fn int_field(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
