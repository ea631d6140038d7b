use log::{debug, info, warn};
use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::generator::config::group::{
    skeleton_groups, splice_proxy_groups, templatize_proxy_groups,
};
use crate::generator::config::rules::default_rules;
use crate::generator::yaml::clash::{ClashDns, ClashYamlOutput};
use crate::generator::{GeneratorError, ValidationFailure};
use crate::models::{is_policy_keyword, ProxyNode};

/// Keys every finished document must carry with non-empty values.
const REQUIRED_KEYS: [&str; 3] = ["proxies", "proxy-groups", "rules"];

/// A generated Clash configuration.
///
/// Keys keep their insertion order when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClashDocument(Mapping);

impl ClashDocument {
    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.0.get(key)
    }

    /// Number of entries in a top-level sequence, 0 when absent.
    pub fn count(&self, key: &str) -> usize {
        self.get(key)
            .and_then(YamlValue::as_sequence)
            .map_or(0, |seq| seq.len())
    }

    /// Serialize as block-style YAML.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.0)
    }
}

impl From<Mapping> for ClashDocument {
    fn from(mapping: Mapping) -> Self {
        Self(mapping)
    }
}

/// Generate a Clash Meta configuration from decoded nodes.
///
/// Relay records and nodes named after a built-in policy are left out of
/// `proxies`. An empty or whitespace-only `template` selects the built-in
/// skeleton; anything else must be a YAML mapping.
///
/// # Errors
///
/// [`GeneratorError::EmptyInput`] when `nodes` is empty,
/// [`GeneratorError::TemplateFormat`] when the template does not parse
/// into a mapping.
pub fn generate(
    nodes: &[ProxyNode],
    group_name: &str,
    template: Option<&str>,
) -> Result<ClashDocument, GeneratorError> {
    if nodes.is_empty() {
        return Err(GeneratorError::EmptyInput);
    }

    let proxies = usable_nodes(nodes);
    let node_names: Vec<String> = proxies.iter().map(|node| node.name().to_string()).collect();

    let document = match template.filter(|t| !t.trim().is_empty()) {
        Some(template) => generate_from_template(&proxies, &node_names, template)?,
        None => generate_skeleton(&proxies, &node_names, group_name)?,
    };

    info!(
        "Generated configuration with {} proxies, {} groups, {} rules",
        document.count("proxies"),
        document.count("proxy-groups"),
        document.count("rules")
    );
    Ok(document)
}

fn usable_nodes(nodes: &[ProxyNode]) -> Vec<&ProxyNode> {
    nodes
        .iter()
        .filter(|node| {
            if node.is_relay() {
                debug!("Skipping legacy relay node {}", node.name());
                return false;
            }
            if is_policy_keyword(node.name()) {
                warn!("Skipping node named after built-in policy {}", node.name());
                return false;
            }
            true
        })
        .collect()
}

fn generate_skeleton(
    proxies: &[&ProxyNode],
    node_names: &[String],
    group_name: &str,
) -> Result<ClashDocument, GeneratorError> {
    let output = ClashYamlOutput {
        mixed_port: 7890,
        allow_lan: false,
        mode: "rule".to_string(),
        log_level: "info".to_string(),
        external_controller: "127.0.0.1:9090".to_string(),
        dns: ClashDns::fake_ip(),
        proxies: proxies.to_vec(),
        proxy_groups: skeleton_groups(group_name, node_names),
        rules: default_rules(group_name),
    };

    match serde_yaml::to_value(&output)? {
        YamlValue::Mapping(mapping) => Ok(ClashDocument(mapping)),
        _ => Ok(ClashDocument(Mapping::new())),
    }
}

fn generate_from_template(
    proxies: &[&ProxyNode],
    node_names: &[String],
    template: &str,
) -> Result<ClashDocument, GeneratorError> {
    let mut mapping = parse_mapping(template)?;

    mapping.insert(
        YamlValue::String("proxies".to_string()),
        serde_yaml::to_value(proxies)?,
    );
    if let Some(YamlValue::Sequence(groups)) = mapping.get_mut("proxy-groups") {
        splice_proxy_groups(groups, node_names);
    }

    Ok(ClashDocument(mapping))
}

fn parse_mapping(text: &str) -> Result<Mapping, GeneratorError> {
    let parsed: YamlValue =
        serde_yaml::from_str(text).map_err(|e| GeneratorError::TemplateFormat(e.to_string()))?;
    match parsed {
        YamlValue::Mapping(mapping) => Ok(mapping),
        _ => Err(GeneratorError::TemplateFormat(
            "template root is not a mapping".to_string(),
        )),
    }
}

/// Turn an existing Clash configuration into a reusable template.
///
/// `proxies` is emptied and every group's node names collapse into a single
/// trailing `PROXY_NODES`, so [`generate`] can refill the template with a new
/// node list. All other keys keep their values and positions.
///
/// # Errors
///
/// [`GeneratorError::TemplateFormat`] when `config` does not parse into a
/// mapping.
pub fn derive_template(config: &str) -> Result<ClashDocument, GeneratorError> {
    let mut mapping = parse_mapping(config)?;

    if let Some(proxies) = mapping.get_mut("proxies") {
        let dropped = proxies.as_sequence().map_or(0, |seq| seq.len());
        debug!("Dropping {} proxies from imported configuration", dropped);
        *proxies = YamlValue::Sequence(Vec::new());
    }
    if let Some(YamlValue::Sequence(groups)) = mapping.get_mut("proxy-groups") {
        *groups = templatize_proxy_groups(groups);
    }

    let document = ClashDocument(mapping);
    info!(
        "Derived template with {} proxy groups",
        document.count("proxy-groups")
    );
    Ok(document)
}

fn is_empty_value(value: &YamlValue) -> bool {
    match value {
        YamlValue::Null => true,
        YamlValue::Sequence(seq) => seq.is_empty(),
        YamlValue::Mapping(map) => map.is_empty(),
        YamlValue::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Check that `proxies`, `proxy-groups` and `rules` are present and non-empty.
///
/// Keys are checked in that order and the first failure is returned.
pub fn check(document: &ClashDocument) -> Result<(), ValidationFailure> {
    for key in REQUIRED_KEYS {
        match document.get(key) {
            None => return Err(ValidationFailure::Missing(key)),
            Some(value) if is_empty_value(value) => return Err(ValidationFailure::Empty(key)),
            Some(_) => {}
        }
    }
    Ok(())
}

/// Like [`check`], but logs the failure and returns a plain flag.
pub fn validate(document: &ClashDocument) -> bool {
    match check(document) {
        Ok(()) => true,
        Err(failure) => {
            warn!("Invalid configuration: {}", failure);
            false
        }
    }
}
