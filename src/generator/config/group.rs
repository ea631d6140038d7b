//! Group generation utilities
//!
//! Builds the fixed skeleton groups, expands the `PROXY_NODES`
//! placeholder inside template groups, and turns the groups of an existing
//! configuration back into placeholder form.

use std::collections::HashSet;

use serde_yaml::{Sequence, Value};

use crate::generator::yaml::clash::ClashProxyGroup;
use crate::models::is_policy_keyword;

/// Placeholder in a template group's `proxies` list, replaced by all node names.
pub const PROXY_NODES_PLACEHOLDER: &str = "PROXY_NODES";

pub const AUTO_SELECT_GROUP: &str = "♻️ 自动选择";
pub const STREAMING_GROUP: &str = "📺 流媒体";
pub const DIRECT_GROUP: &str = "🎯 全球直连";
pub const AD_BLOCK_GROUP: &str = "🛑 广告拦截";
pub const FINAL_GROUP: &str = "🐟 漏网之鱼";

pub const URL_TEST_URL: &str = "http://www.gstatic.com/generate_204";
pub const URL_TEST_INTERVAL: u32 = 300;

fn names_after(head: &[&str], node_names: &[String]) -> Vec<String> {
    head.iter()
        .map(|s| s.to_string())
        .chain(node_names.iter().cloned())
        .collect()
}

/// Generates the six skeleton groups.
///
/// `group_name` is the main selector; every node-bearing group lists the
/// nodes in input order after its fixed entries.
pub fn skeleton_groups(group_name: &str, node_names: &[String]) -> Vec<ClashProxyGroup> {
    vec![
        ClashProxyGroup::select(
            group_name,
            names_after(&[AUTO_SELECT_GROUP, DIRECT_GROUP], node_names),
        ),
        ClashProxyGroup::url_test(
            AUTO_SELECT_GROUP,
            node_names.to_vec(),
            URL_TEST_URL,
            URL_TEST_INTERVAL,
        ),
        ClashProxyGroup::select(
            STREAMING_GROUP,
            names_after(&[group_name, AUTO_SELECT_GROUP], node_names),
        ),
        ClashProxyGroup::select(DIRECT_GROUP, names_after(&["DIRECT"], &[])),
        ClashProxyGroup::select(AD_BLOCK_GROUP, names_after(&["REJECT", "DIRECT"], &[])),
        ClashProxyGroup::select(
            FINAL_GROUP,
            names_after(&[group_name, DIRECT_GROUP, AUTO_SELECT_GROUP], &[]),
        ),
    ]
}

/// Rewrites a template group's `proxies` list in one pass.
///
/// Each `PROXY_NODES` entry becomes all node names in order; every other
/// entry, policy keywords included, stays where it was.
pub fn expand_group_proxies(entries: &Sequence, node_names: &[String]) -> Sequence {
    let mut expanded = Sequence::with_capacity(entries.len() + node_names.len());
    for entry in entries {
        match entry.as_str() {
            Some(PROXY_NODES_PLACEHOLDER) => {
                expanded.extend(node_names.iter().cloned().map(Value::String))
            }
            _ => expanded.push(entry.clone()),
        }
    }
    expanded
}

/// Applies [`expand_group_proxies`] to every mapping in `proxy-groups`.
///
/// Groups that are not mappings, or whose `proxies` is not a sequence, are
/// passed through unchanged.
pub fn splice_proxy_groups(groups: &mut Sequence, node_names: &[String]) {
    for group in groups.iter_mut() {
        let Some(group) = group.as_mapping_mut() else {
            continue;
        };
        if let Some(Value::Sequence(entries)) = group.get_mut("proxies") {
            *entries = expand_group_proxies(entries, node_names);
        }
    }
}

/// Replaces node names in a group's `proxies` list with one `PROXY_NODES`.
///
/// Policy keywords and references to other groups are kept in order; every
/// other entry is taken to be a node. An empty list becomes `[PROXY_NODES]`.
pub fn collapse_group_proxies(entries: &Sequence, group_names: &HashSet<String>) -> Sequence {
    let mut collapsed: Sequence = entries
        .iter()
        .filter(|entry| {
            entry
                .as_str()
                .is_some_and(|name| is_policy_keyword(name) || group_names.contains(name))
        })
        .cloned()
        .collect();
    collapsed.push(Value::String(PROXY_NODES_PLACEHOLDER.to_string()));
    collapsed
}

/// Rewrites `proxy-groups` of an existing configuration into template form.
///
/// Entries that are not mappings are dropped. Groups without a `proxies`
/// sequence are kept as they are.
pub fn templatize_proxy_groups(groups: &Sequence) -> Sequence {
    let group_names: HashSet<String> = groups
        .iter()
        .filter_map(|group| group.get("name")?.as_str())
        .map(str::to_string)
        .collect();

    groups
        .iter()
        .filter_map(Value::as_mapping)
        .map(|group| {
            let mut group = group.clone();
            if let Some(Value::Sequence(entries)) = group.get_mut("proxies") {
                *entries = collapse_group_proxies(entries, &group_names);
            }
            Value::Mapping(group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn seq(items: &[&str]) -> Sequence {
        items.iter().map(|s| Value::String(s.to_string())).collect()
    }

    #[test]
    fn test_skeleton_groups() {
        let groups = skeleton_groups("main", &names(&["x", "y"]));
        let group_names: Vec<&str> = groups.iter().map(|g| g.name()).collect();
        assert_eq!(
            group_names,
            vec![
                "main",
                AUTO_SELECT_GROUP,
                STREAMING_GROUP,
                DIRECT_GROUP,
                AD_BLOCK_GROUP,
                FINAL_GROUP
            ]
        );
        assert_eq!(groups[0].proxies(), names(&[AUTO_SELECT_GROUP, DIRECT_GROUP, "x", "y"]));
        assert_eq!(groups[1].proxies(), names(&["x", "y"]));
        assert_eq!(groups[2].proxies(), names(&["main", AUTO_SELECT_GROUP, "x", "y"]));
        assert_eq!(groups[3].proxies(), names(&["DIRECT"]));
        assert_eq!(groups[4].proxies(), names(&["REJECT", "DIRECT"]));
        assert_eq!(
            groups[5].proxies(),
            names(&["main", DIRECT_GROUP, AUTO_SELECT_GROUP])
        );
        assert!(matches!(
            &groups[1],
            ClashProxyGroup::UrlTest { interval: Some(300), .. }
        ));
    }

    #[test]
    fn test_expand_group_proxies() {
        let expanded = expand_group_proxies(&seq(&["A", "PROXY_NODES", "B"]), &names(&["x", "y"]));
        assert_eq!(expanded, seq(&["A", "x", "y", "B"]));

        let expanded =
            expand_group_proxies(&seq(&["PROXY_NODES", "DIRECT", "PROXY_NODES"]), &names(&["x"]));
        assert_eq!(expanded, seq(&["x", "DIRECT", "x"]));

        let expanded = expand_group_proxies(&seq(&["REJECT"]), &names(&["x"]));
        assert_eq!(expanded, seq(&["REJECT"]));
    }

    #[test]
    fn test_splice_skips_malformed_groups() {
        let mut groups: Sequence = serde_yaml::from_str(
            r#"
- name: g1
  proxies: [PROXY_NODES]
- just a string
- name: g2
  proxies: not-a-list
"#,
        )
        .unwrap();
        splice_proxy_groups(&mut groups, &names(&["n1", "n2"]));
        assert_eq!(groups[0]["proxies"], Value::Sequence(seq(&["n1", "n2"])));
        assert_eq!(groups[1].as_str(), Some("just a string"));
        assert_eq!(groups[2]["proxies"].as_str(), Some("not-a-list"));
    }

    #[test]
    fn test_collapse_keeps_policies_and_group_refs() {
        let group_names: HashSet<String> = names(&["main", "auto"]).into_iter().collect();
        let collapsed = collapse_group_proxies(
            &seq(&["auto", "香港 01", "DIRECT", "PASS", "日本 02", "COMPATIBLE", "REJECT"]),
            &group_names,
        );
        assert_eq!(
            collapsed,
            seq(&["auto", "DIRECT", "PASS", "COMPATIBLE", "REJECT", "PROXY_NODES"])
        );

        let collapsed = collapse_group_proxies(&seq(&["PROXY_NODES", "n1"]), &group_names);
        assert_eq!(collapsed, seq(&["PROXY_NODES"]));
    }

    #[test]
    fn test_templatize_proxy_groups() {
        let groups: Sequence = serde_yaml::from_str(
            r#"
- name: main
  type: select
  proxies: [auto, n1, n2]
- name: auto
  type: url-test
  proxies: [n1, n2]
  url: http://www.gstatic.com/generate_204
- name: empty
  type: select
  proxies: []
- name: provider
  type: select
  use: [sub]
- not a group
"#,
        )
        .unwrap();
        let groups = templatize_proxy_groups(&groups);
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0]["proxies"], Value::Sequence(seq(&["auto", "PROXY_NODES"])));
        assert_eq!(groups[1]["proxies"], Value::Sequence(seq(&["PROXY_NODES"])));
        assert_eq!(
            groups[1]["url"].as_str(),
            Some("http://www.gstatic.com/generate_204")
        );
        assert_eq!(groups[2]["proxies"], Value::Sequence(seq(&["PROXY_NODES"])));
        assert!(groups[3].get("proxies").is_none());
    }
}
