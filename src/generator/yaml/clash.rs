use serde::Serialize;

use crate::models::ProxyNode;

/// Top-level layout of a skeleton Clash configuration.
///
/// Field order is the key order of the emitted document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashYamlOutput<'a> {
    pub mixed_port: u16,
    pub allow_lan: bool,
    pub mode: String,
    pub log_level: String,
    pub external_controller: String,
    pub dns: ClashDns,
    pub proxies: Vec<&'a ProxyNode>,
    pub proxy_groups: Vec<ClashProxyGroup>,
    pub rules: Vec<String>,
}

/// DNS configuration for Clash
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashDns {
    pub enable: bool,
    pub ipv6: bool,
    pub enhanced_mode: String,
    pub fake_ip_range: String,
    pub fake_ip_filter: Vec<String>,
    pub default_nameserver: Vec<String>,
    pub nameserver: Vec<String>,
    pub fallback: Vec<String>,
    pub fallback_filter: ClashDnsFallbackFilter,
}

/// DNS fallback filter configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashDnsFallbackFilter {
    pub geoip: bool,
    pub geoip_code: String,
    pub ipcidr: Vec<String>,
}

/// Domains that must resolve to real addresses under fake-ip.
const FAKE_IP_FILTER: &[&str] = &[
    "*.lan",
    "*.localdomain",
    "*.example",
    "*.invalid",
    "*.localhost",
    "*.test",
    "*.local",
    "time.*.com",
    "time.*.gov",
    "time.*.edu.cn",
    "time.*.apple.com",
    "time1.*.com",
    "time2.*.com",
    "time3.*.com",
    "time4.*.com",
    "time5.*.com",
    "time6.*.com",
    "time7.*.com",
    "ntp.*.com",
    "ntp1.*.com",
    "ntp2.*.com",
    "ntp3.*.com",
    "ntp4.*.com",
    "ntp5.*.com",
    "ntp6.*.com",
    "ntp7.*.com",
    "*.time.edu.cn",
    "*.ntp.org.cn",
    "+.pool.ntp.org",
    "time1.cloud.tencent.com",
];

const DEFAULT_NAMESERVER: &[&str] = &["223.5.5.5", "119.29.29.29"];
const NAMESERVER: &[&str] = &["https://doh.pub/dns-query", "https://dns.alidns.com/dns-query"];
const FALLBACK: &[&str] = &["https://1.1.1.1/dns-query", "https://dns.google/dns-query"];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ClashDns {
    /// Fake-ip DNS with domestic resolvers and DoH fallback for non-CN answers.
    pub fn fake_ip() -> Self {
        Self {
            enable: true,
            ipv6: false,
            enhanced_mode: "fake-ip".to_string(),
            fake_ip_range: "198.18.0.1/16".to_string(),
            fake_ip_filter: to_strings(FAKE_IP_FILTER),
            default_nameserver: to_strings(DEFAULT_NAMESERVER),
            nameserver: to_strings(NAMESERVER),
            fallback: to_strings(FALLBACK),
            fallback_filter: ClashDnsFallbackFilter {
                geoip: true,
                geoip_code: "CN".to_string(),
                ipcidr: vec!["240.0.0.0/4".to_string()],
            },
        }
    }
}

/// Proxy group entry of `proxy-groups`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ClashProxyGroup {
    #[serde(rename = "select")]
    Select { name: String, proxies: Vec<String> },
    #[serde(rename = "url-test")]
    UrlTest {
        name: String,
        proxies: Vec<String>,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        interval: Option<u32>,
    },
}

impl ClashProxyGroup {
    pub fn select(name: impl Into<String>, proxies: Vec<String>) -> Self {
        Self::Select {
            name: name.into(),
            proxies,
        }
    }

    pub fn url_test(
        name: impl Into<String>,
        proxies: Vec<String>,
        url: impl Into<String>,
        interval: u32,
    ) -> Self {
        Self::UrlTest {
            name: name.into(),
            proxies,
            url: url.into(),
            interval: Some(interval),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Select { name, .. } | Self::UrlTest { name, .. } => name,
        }
    }

    pub fn proxies(&self) -> &[String] {
        match self {
            Self::Select { proxies, .. } | Self::UrlTest { proxies, .. } => proxies,
        }
    }
}
