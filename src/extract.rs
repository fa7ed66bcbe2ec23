use regex::Regex;

/// Finds `http://` / `https://` URLs in message text.
///
/// A URL is a maximal run of non-whitespace characters whose token starts
/// with the scheme prefix. Trailing punctuation that is glued to the token
/// is kept verbatim; stripping it would guess wrong for URLs that really do
/// end in `)` or `.`.
pub struct LinkExtractor {
    pattern: Regex,
}

impl LinkExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"https?://\S+").unwrap(),
        }
    }

    /// Extract all links from `text`, in order of first appearance.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .filter(|m| {
                // Only scheme prefixes at a token boundary count; a scheme
                // buried mid-word is not a link.
                m.start() == 0
                    || text[..m.start()]
                        .chars()
                        .next_back()
                        .is_some_and(char::is_whitespace)
            })
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}
