//! URL encoding/decoding utilities

use std::collections::HashMap;

/// Decodes a percent-encoded string
///
/// `+` is left untouched, matching fragment and userinfo semantics.
/// Returns the original string if the decoded bytes are not valid UTF-8.
///
/// # Examples
/// ```
/// use subclash::utils::url::url_decode;
///
/// let decoded = url_decode("Hello%20World%21");
/// assert_eq!(decoded, "Hello World!");
/// ```
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Parses a query string into a map.
///
/// Values are form-decoded. Keys with an empty value are skipped and the first
/// occurrence of a repeated key wins.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Boolean query flag: `true` or `1`.
pub fn is_truthy(value: &str) -> bool {
    value == "true" || value == "1"
}
