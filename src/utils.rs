#[cfg(feature = "logging")]
use unicode_width::UnicodeWidthChar;

use url::Url;

/// Safely truncate a string, ensuring it is not truncated in the middle of multi-byte characters
///
/// The result's display width never exceeds `max_width`; an ellipsis marks the cut.
#[cfg(feature = "logging")]
pub fn truncate_str(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthStr;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(1);

        if current_width + char_width + 3 > max_width {
            break;
        }

        result.push(c);
        current_width += char_width;
    }

    result.push_str("...");
    result
}

/// Lower-cased hostname of `input`.
///
/// Bare hosts such as `example.edu` are accepted by retrying with an
/// `https://` scheme. Returns `None` when neither form yields a host.
pub fn hostname_of(input: &str) -> Option<String> {
    let input = input.trim();
    let parsed = Url::parse(input)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| Url::parse(&format!("https://{input}")).ok())?;

    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.trim_end_matches('.').to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "logging")]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Hello, world!", 10), "Hello, ...");
        assert_eq!(truncate_str("你好，世界！", 8), "你好...");
        assert_eq!(truncate_str("Hello 你好！", 10), "Hello ...");
        assert_eq!(truncate_str("Hi!", 10), "Hi!");
    }

    #[test]
    fn test_hostname_of() {
        assert_eq!(
            hostname_of("https://www.PSU.edu/about").as_deref(),
            Some("www.psu.edu")
        );
        assert_eq!(
            hostname_of("example.edu.invalid").as_deref(),
            Some("example.edu.invalid")
        );
        assert_eq!(
            hostname_of("http://localhost:8080/").as_deref(),
            Some("localhost")
        );
        assert_eq!(hostname_of(""), None);
        assert_eq!(hostname_of("not a url"), None);
    }
}
