//! Proxy model definitions
//!
//! Contains the normalized node record produced by the link parsers and consumed
//! by the Clash generator. Field names follow Clash Meta naming so a node
//! serializes directly into a `proxies` entry.

use serde::{Deserialize, Serialize};

/// Policy names built into Clash. They are never valid node names.
pub const POLICY_KEYWORDS: [&str; 4] = ["DIRECT", "REJECT", "PASS", "COMPATIBLE"];

/// Returns true when `name` is one of the built-in Clash policies.
pub fn is_policy_keyword(name: &str) -> bool {
    POLICY_KEYWORDS.contains(&name)
}

/// Default node names used when a link carries no `#fragment`.
pub const SS_DEFAULT_NAME: &str = "SS节点";
pub const SSR_DEFAULT_NAME: &str = "SSR节点";
pub const VMESS_DEFAULT_NAME: &str = "VMess节点";
pub const VLESS_DEFAULT_NAME: &str = "VLESS节点";
pub const HYSTERIA2_DEFAULT_NAME: &str = "Hysteria2节点";
pub const TROJAN_DEFAULT_NAME: &str = "Trojan节点";
pub const HTTP_DEFAULT_NAME: &str = "HTTP节点";
pub const HTTPS_DEFAULT_NAME: &str = "HTTPS节点";
pub const SOCKS4_DEFAULT_NAME: &str = "SOCKS4节点";
pub const SOCKS5_DEFAULT_NAME: &str = "SOCKS5节点";

/// Represents the type of a proxy node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    Shadowsocks,
    ShadowsocksR,
    VMess,
    Vless,
    Hysteria2,
    Trojan,
    HTTP,
    HTTPS,
    Socks4,
    Socks5,
    /// Removed node kind, only ever read back from stored records.
    Relay,
}

impl ProxyType {
    /// The `type` value written into the Clash configuration.
    ///
    /// HTTPS proxies are plain `http` entries with `tls: true`.
    pub fn clash_type(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "ss",
            ProxyType::ShadowsocksR => "ssr",
            ProxyType::VMess => "vmess",
            ProxyType::Vless => "vless",
            ProxyType::Hysteria2 => "hysteria2",
            ProxyType::Trojan => "trojan",
            ProxyType::HTTP | ProxyType::HTTPS => "http",
            ProxyType::Socks4 => "socks4",
            ProxyType::Socks5 => "socks5",
            ProxyType::Relay => "relay",
        }
    }
}

/// Fields shared by every decoded node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonProxyOptions {
    pub name: String,
    pub server: String,
    pub port: u16,
}

impl CommonProxyOptions {
    pub fn new(name: impl Into<String>, server: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            port,
        }
    }
}

/// Reality public key / short id pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RealityOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub public_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub short_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WsHeaders {
    #[serde(rename = "Host")]
    pub host: String,
}

/// `ws-opts` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WsOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub headers: Option<WsHeaders>,
}

impl WsOptions {
    pub fn new(path: Option<String>, host: Option<String>) -> Self {
        Self {
            path,
            headers: host.map(|host| WsHeaders { host }),
        }
    }
}

/// `grpc-opts` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GrpcOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grpc_service_name: Option<String>,
}

/// `h2-opts` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct H2Options {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<Vec<String>>,
}

/// `http-opts` block used by the HTTP-obfuscated TCP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpOptions {
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObfsPluginOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct V2rayPluginOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mux: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skip_cert_verify: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GostPluginOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowTlsPluginOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RestlsPluginOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub restls_script: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KcptunPluginOptions {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crypt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mtu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sndwnd: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rcvwnd: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub datashard: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parityshard: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dscp: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nocomp: Option<bool>,
}

/// Shadowsocks SIP003 plugin, serialized as `plugin` + `plugin-opts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plugin", content = "plugin-opts")]
pub enum ShadowsocksPlugin {
    #[serde(rename = "obfs")]
    Obfs(ObfsPluginOptions),
    #[serde(rename = "v2ray-plugin")]
    V2ray(V2rayPluginOptions),
    #[serde(rename = "gost-plugin")]
    Gost(GostPluginOptions),
    #[serde(rename = "shadow-tls")]
    ShadowTls(ShadowTlsPluginOptions),
    #[serde(rename = "restls")]
    Restls(RestlsPluginOptions),
    #[serde(rename = "kcptun")]
    Kcptun(KcptunPluginOptions),
}

/// A normalized proxy node.
///
/// One variant per protocol, each carrying only its own fields on top of the
/// shared [`CommonProxyOptions`] header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProxyNode {
    #[serde(rename = "ss", rename_all = "kebab-case")]
    Shadowsocks {
        #[serde(flatten)]
        common: CommonProxyOptions,
        cipher: String,
        password: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        udp: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        udp_over_tcp: Option<bool>,
        #[serde(flatten)]
        plugin: Option<ShadowsocksPlugin>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        client_fingerprint: Option<String>,
    },
    #[serde(rename = "ssr", rename_all = "kebab-case")]
    ShadowsocksR {
        #[serde(flatten)]
        common: CommonProxyOptions,
        cipher: String,
        password: String,
        protocol: String,
        obfs: String,
        #[serde(default)]
        protocol_param: String,
        #[serde(default)]
        obfs_param: String,
    },
    #[serde(rename = "vmess", rename_all = "kebab-case")]
    VMess {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        #[serde(rename = "alterId")]
        alter_id: u32,
        cipher: String,
        network: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        tls: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        servername: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        ws_opts: Option<WsOptions>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        grpc_opts: Option<GrpcOptions>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        h2_opts: Option<H2Options>,
    },
    #[serde(rename = "vless", rename_all = "kebab-case")]
    Vless {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        network: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        flow: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        tls: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        servername: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        skip_cert_verify: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        client_fingerprint: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        reality_opts: Option<RealityOptions>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        tfo: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        ws_opts: Option<WsOptions>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        grpc_opts: Option<GrpcOptions>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        http_opts: Option<HttpOptions>,
    },
    #[serde(rename = "hysteria2", rename_all = "kebab-case")]
    Hysteria2 {
        #[serde(flatten)]
        common: CommonProxyOptions,
        password: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        sni: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        skip_cert_verify: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        obfs: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        obfs_password: Option<String>,
    },
    #[serde(rename = "trojan", rename_all = "kebab-case")]
    Trojan {
        #[serde(flatten)]
        common: CommonProxyOptions,
        password: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        sni: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        alpn: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        client_fingerprint: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        fingerprint: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        skip_cert_verify: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        udp: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        reality_opts: Option<RealityOptions>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        network: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        ws_opts: Option<WsOptions>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        grpc_opts: Option<GrpcOptions>,
    },
    #[serde(rename = "http")]
    Http {
        #[serde(flatten)]
        common: CommonProxyOptions,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        password: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        tls: Option<bool>,
    },
    #[serde(rename = "socks4")]
    Socks4 {
        #[serde(flatten)]
        common: CommonProxyOptions,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        password: Option<String>,
    },
    #[serde(rename = "socks5")]
    Socks5 {
        #[serde(flatten)]
        common: CommonProxyOptions,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        password: Option<String>,
    },
    /// Legacy chain node. Kept readable so stored records still load; the
    /// generator never emits it.
    #[serde(rename = "relay")]
    Relay {
        name: String,
        #[serde(default)]
        proxies: Vec<String>,
    },
}

impl ProxyNode {
    pub fn proxy_type(&self) -> ProxyType {
        match self {
            ProxyNode::Shadowsocks { .. } => ProxyType::Shadowsocks,
            ProxyNode::ShadowsocksR { .. } => ProxyType::ShadowsocksR,
            ProxyNode::VMess { .. } => ProxyType::VMess,
            ProxyNode::Vless { .. } => ProxyType::Vless,
            ProxyNode::Hysteria2 { .. } => ProxyType::Hysteria2,
            ProxyNode::Trojan { .. } => ProxyType::Trojan,
            ProxyNode::Http { tls: Some(true), .. } => ProxyType::HTTPS,
            ProxyNode::Http { .. } => ProxyType::HTTP,
            ProxyNode::Socks4 { .. } => ProxyType::Socks4,
            ProxyNode::Socks5 { .. } => ProxyType::Socks5,
            ProxyNode::Relay { .. } => ProxyType::Relay,
        }
    }

    /// Shared header, absent only for legacy relay records.
    pub fn common(&self) -> Option<&CommonProxyOptions> {
        match self {
            ProxyNode::Shadowsocks { common, .. }
            | ProxyNode::ShadowsocksR { common, .. }
            | ProxyNode::VMess { common, .. }
            | ProxyNode::Vless { common, .. }
            | ProxyNode::Hysteria2 { common, .. }
            | ProxyNode::Trojan { common, .. }
            | ProxyNode::Http { common, .. }
            | ProxyNode::Socks4 { common, .. }
            | ProxyNode::Socks5 { common, .. } => Some(common),
            ProxyNode::Relay { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProxyNode::Relay { name, .. } => name,
            _ => self.common().map(|c| c.name.as_str()).unwrap_or_default(),
        }
    }

    /// Overwrite the display name. This is the only mutation a decoded node
    /// is meant to receive.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            ProxyNode::Shadowsocks { common, .. }
            | ProxyNode::ShadowsocksR { common, .. }
            | ProxyNode::VMess { common, .. }
            | ProxyNode::Vless { common, .. }
            | ProxyNode::Hysteria2 { common, .. }
            | ProxyNode::Trojan { common, .. }
            | ProxyNode::Http { common, .. }
            | ProxyNode::Socks4 { common, .. }
            | ProxyNode::Socks5 { common, .. } => common.name = name,
            ProxyNode::Relay { name: n, .. } => *n = name,
        }
    }

    pub fn server(&self) -> Option<&str> {
        self.common().map(|c| c.server.as_str())
    }

    pub fn port(&self) -> Option<u16> {
        self.common().map(|c| c.port)
    }

    pub fn is_relay(&self) -> bool {
        matches!(self, ProxyNode::Relay { .. })
    }

    /// One-line description: `name (type) server:port`.
    pub fn summary(&self) -> String {
        match self.common() {
            Some(common) => format!(
                "{} ({}) {}:{}",
                common.name,
                self.proxy_type().clash_type(),
                common.server,
                common.port
            ),
            None => format!("{} ({})", self.name(), self.proxy_type().clash_type()),
        }
    }
}
