//! SIP003 plugin strings (`name;key=value;...`) mapped onto Clash Meta
//! `plugin` / `plugin-opts`.

use std::collections::HashMap;
use std::num::ParseIntError;

use crate::models::{
    GostPluginOptions, KcptunPluginOptions, ObfsPluginOptions, RestlsPluginOptions,
    ShadowTlsPluginOptions, ShadowsocksPlugin, V2rayPluginOptions,
};
use crate::utils::url::is_truthy;

/// A recognized plugin plus the node-level fingerprint some plugins carry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedPlugin {
    pub plugin: ShadowsocksPlugin,
    pub client_fingerprint: Option<String>,
}

impl From<ShadowsocksPlugin> for ParsedPlugin {
    fn from(plugin: ShadowsocksPlugin) -> Self {
        Self {
            plugin,
            client_fingerprint: None,
        }
    }
}

type PluginOpts<'a> = HashMap<&'a str, &'a str>;
type PluginBuilder = fn(&PluginOpts<'_>) -> Result<ParsedPlugin, ParseIntError>;

/// Plugin families, matched in order by substring of the plugin name.
const PLUGIN_TABLE: &[(&[&str], PluginBuilder)] = &[
    (&["obfs"], build_obfs),
    (&["v2ray"], build_v2ray),
    (&["gost"], build_gost),
    (&["shadow-tls", "shadowtls"], build_shadow_tls),
    (&["restls"], build_restls),
    (&["kcptun"], build_kcptun),
];

/// Parse a SIP003 plugin string.
///
/// Returns `Ok(None)` for plugin names outside the known families, and an
/// error when a numeric option does not parse.
pub(crate) fn parse_plugin(plugin: &str) -> Result<Option<ParsedPlugin>, ParseIntError> {
    let mut parts = plugin.split(';');
    let name = parts.next().unwrap_or_default().trim();
    let opts: PluginOpts<'_> = parts.filter_map(|part| part.split_once('=')).collect();

    for (matchers, build) in PLUGIN_TABLE {
        if matchers.iter().any(|m| name.contains(m)) {
            return build(&opts).map(Some);
        }
    }
    Ok(None)
}

fn opt(opts: &PluginOpts<'_>, key: &str) -> Option<String> {
    opts.get(key).map(|v| v.to_string())
}

fn opt_u32(opts: &PluginOpts<'_>, key: &str) -> Result<Option<u32>, ParseIntError> {
    opts.get(key).map(|v| v.trim().parse::<u32>()).transpose()
}

fn fingerprint(opts: &PluginOpts<'_>) -> Option<String> {
    opts.get("client-fingerprint")
        .filter(|v| !v.is_empty())
        .or_else(|| opts.get("fp"))
        .map(|v| v.to_string())
}

fn build_obfs(opts: &PluginOpts<'_>) -> Result<ParsedPlugin, ParseIntError> {
    Ok(ShadowsocksPlugin::Obfs(ObfsPluginOptions {
        mode: opt(opts, "obfs"),
        host: opt(opts, "obfs-host"),
    })
    .into())
}

fn build_v2ray(opts: &PluginOpts<'_>) -> Result<ParsedPlugin, ParseIntError> {
    let mode = if opts.contains_key("mode") || opts.contains_key("transport") {
        opts.get("mode")
            .filter(|v| !v.is_empty())
            .or_else(|| opts.get("transport"))
            .copied()
            .or(Some("websocket"))
            .map(str::to_string)
    } else {
        None
    };
    Ok(ShadowsocksPlugin::V2ray(V2rayPluginOptions {
        mode,
        tls: opts.get("tls").map(|v| is_truthy(v)),
        host: opt(opts, "host"),
        path: opt(opts, "path"),
        mux: opts.get("mux").map(|v| is_truthy(v)),
        skip_cert_verify: opts.get("skip-cert-verify").map(|v| *v == "true"),
    })
    .into())
}

fn build_gost(opts: &PluginOpts<'_>) -> Result<ParsedPlugin, ParseIntError> {
    Ok(ShadowsocksPlugin::Gost(GostPluginOptions {
        mode: opt(opts, "mode"),
        host: opt(opts, "host"),
        path: opt(opts, "path"),
    })
    .into())
}

fn build_shadow_tls(opts: &PluginOpts<'_>) -> Result<ParsedPlugin, ParseIntError> {
    Ok(ParsedPlugin {
        plugin: ShadowsocksPlugin::ShadowTls(ShadowTlsPluginOptions {
            host: opt(opts, "host"),
            password: opt(opts, "password"),
            version: opt_u32(opts, "version")?,
        }),
        client_fingerprint: fingerprint(opts),
    })
}

fn build_restls(opts: &PluginOpts<'_>) -> Result<ParsedPlugin, ParseIntError> {
    Ok(ParsedPlugin {
        plugin: ShadowsocksPlugin::Restls(RestlsPluginOptions {
            host: opt(opts, "host"),
            password: opt(opts, "password"),
            version_hint: opt(opts, "version-hint"),
            restls_script: opt(opts, "restls-script"),
        }),
        client_fingerprint: fingerprint(opts),
    })
}

fn build_kcptun(opts: &PluginOpts<'_>) -> Result<ParsedPlugin, ParseIntError> {
    Ok(ShadowsocksPlugin::Kcptun(KcptunPluginOptions {
        key: opt(opts, "key"),
        crypt: opt(opts, "crypt"),
        mode: opt(opts, "mode"),
        mtu: opt_u32(opts, "mtu")?,
        sndwnd: opt_u32(opts, "sndwnd")?,
        rcvwnd: opt_u32(opts, "rcvwnd")?,
        datashard: opt_u32(opts, "datashard")?,
        parityshard: opt_u32(opts, "parityshard")?,
        dscp: opt_u32(opts, "dscp")?,
        nocomp: opts.get("nocomp").map(|v| *v == "true"),
    })
    .into())
}
