use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Normalizes the trailing `=` padding so the length is a multiple of four.
///
/// Share links routinely drop or mangle the padding, so any existing `=` is
/// stripped and `(4 - len % 4) % 4` characters are appended.
pub fn pad_base64(input: &str) -> String {
    let trimmed = input.trim_end_matches('=');
    let padding = (4 - trimmed.len() % 4) % 4;
    let mut padded = String::with_capacity(trimmed.len() + padding);
    padded.push_str(trimmed);
    padded.extend(std::iter::repeat('=').take(padding));
    padded
}

/// Decodes a Base64 string with padding correction.
///
/// The standard alphabet is tried first, then the URL-safe alphabet.
///
/// # Returns
/// The decoded text, or `None` if neither alphabet accepts the input or the
/// decoded bytes are not valid UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    let padded = pad_base64(input.trim());
    let bytes = general_purpose::STANDARD
        .decode(&padded)
        .or_else(|_| general_purpose::URL_SAFE.decode(&padded))
        .ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_base64() {
        assert_eq!(pad_base64("YQ"), "YQ==");
        assert_eq!(pad_base64("YWI"), "YWI=");
        assert_eq!(pad_base64("YWJj"), "YWJj");
        assert_eq!(pad_base64("YQ="), "YQ==");
    }

    #[test]
    fn test_decode_missing_padding() {
        assert_eq!(base64_decode("YWVzLTI1Ni1nY206cGFzcw").as_deref(), Some("aes-256-gcm:pass"));
    }

    #[test]
    fn test_decode_url_safe_fallback() {
        // "??>" encodes to "Pz8+" in the standard alphabet and "Pz8-" in the URL-safe one
        assert_eq!(base64_decode("Pz8-").as_deref(), Some("??>"));
        assert_eq!(base64_decode("Pz8+").as_deref(), Some("??>"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(base64_decode("not base64!"), None);
        // valid base64 but not UTF-8
        assert_eq!(base64_decode("/w=="), None);
    }
}
