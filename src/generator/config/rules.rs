//! Built-in routing rules for the skeleton configuration.

use super::group::{AD_BLOCK_GROUP, DIRECT_GROUP, FINAL_GROUP, STREAMING_GROUP};

const AD_BLOCK_RULES: &[&str] = &[
    "DOMAIN-KEYWORD,adservice",
    "DOMAIN-KEYWORD,analytics",
    "DOMAIN-SUFFIX,doubleclick.net",
    "DOMAIN-SUFFIX,googleadservices.com",
];

const STREAMING_RULES: &[&str] = &[
    "DOMAIN-KEYWORD,youtube",
    "DOMAIN-KEYWORD,netflix",
    "DOMAIN-KEYWORD,spotify",
    "DOMAIN-SUFFIX,youtube.com",
    "DOMAIN-SUFFIX,googlevideo.com",
    "DOMAIN-SUFFIX,netflix.com",
    "DOMAIN-SUFFIX,nflxvideo.net",
    "DOMAIN-SUFFIX,spotify.com",
    "DOMAIN-SUFFIX,hulu.com",
    "DOMAIN-SUFFIX,disneyplus.com",
    "DOMAIN-SUFFIX,hbo.com",
    "DOMAIN-SUFFIX,primevideo.com",
];

const DOMESTIC_RULES: &[&str] = &[
    "DOMAIN-SUFFIX,cn",
    "DOMAIN-KEYWORD,baidu",
    "DOMAIN-KEYWORD,taobao",
    "DOMAIN-KEYWORD,alipay",
    "DOMAIN-KEYWORD,wechat",
    "DOMAIN-KEYWORD,qq",
    "DOMAIN-SUFFIX,qq.com",
    "DOMAIN-SUFFIX,taobao.com",
    "DOMAIN-SUFFIX,jd.com",
    "DOMAIN-SUFFIX,tmall.com",
    "DOMAIN-SUFFIX,alipay.com",
    "DOMAIN-SUFFIX,aliyun.com",
    "DOMAIN-SUFFIX,163.com",
    "DOMAIN-SUFFIX,126.com",
    "DOMAIN-SUFFIX,bilibili.com",
    "DOMAIN-SUFFIX,hdslb.com",
    "DOMAIN-SUFFIX,iqiyi.com",
    "DOMAIN-SUFFIX,youku.com",
];

const FOREIGN_RULES: &[&str] = &[
    "DOMAIN-KEYWORD,google",
    "DOMAIN-KEYWORD,facebook",
    "DOMAIN-KEYWORD,twitter",
    "DOMAIN-KEYWORD,instagram",
    "DOMAIN-KEYWORD,github",
    "DOMAIN-SUFFIX,google.com",
    "DOMAIN-SUFFIX,googleapis.com",
    "DOMAIN-SUFFIX,gstatic.com",
    "DOMAIN-SUFFIX,googleusercontent.com",
    "DOMAIN-SUFFIX,facebook.com",
    "DOMAIN-SUFFIX,twitter.com",
    "DOMAIN-SUFFIX,instagram.com",
    "DOMAIN-SUFFIX,github.com",
    "DOMAIN-SUFFIX,githubusercontent.com",
    "DOMAIN-SUFFIX,telegram.org",
    "DOMAIN-SUFFIX,t.me",
];

/// Generates the skeleton rule list.
///
/// Order: ad blocking, streaming, domestic direct, foreign sites through
/// `group_name`, then `GEOIP,CN` and the final `MATCH`.
pub fn default_rules(group_name: &str) -> Vec<String> {
    let sections: [(&[&str], &str); 4] = [
        (AD_BLOCK_RULES, AD_BLOCK_GROUP),
        (STREAMING_RULES, STREAMING_GROUP),
        (DOMESTIC_RULES, DIRECT_GROUP),
        (FOREIGN_RULES, group_name),
    ];

    let mut rules: Vec<String> = sections
        .iter()
        .flat_map(|(matchers, target)| matchers.iter().map(move |m| format!("{m},{target}")))
        .collect();
    rules.push(format!("GEOIP,CN,{DIRECT_GROUP}"));
    rules.push(format!("MATCH,{FINAL_GROUP}"));
    rules
}
