/// A filesystem-safe slug derived from a post title, used to name the
/// committed Markdown and image files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSlug(String);

const MAX_SLUG_LENGTH: usize = 60;

impl PostSlug {
    /// Lowercases and trims the title, keeps ASCII word characters and Hangul
    /// syllables, turns whitespace runs into single hyphens, collapses hyphen
    /// runs and truncates to 60 characters.
    ///
    /// Applying it to its own output is a no-op.
    pub fn from_title(title: &str) -> Self {
        let lowered = title.to_lowercase();
        let mut slug = String::with_capacity(lowered.len());
        let mut previous_was_hyphen = false;
        for c in lowered.trim().chars() {
            if c.is_whitespace() || c == '-' {
                if !previous_was_hyphen {
                    slug.push('-');
                    previous_was_hyphen = true;
                }
            } else if c.is_ascii_alphanumeric() || c == '_' || matches!(c, '가'..='힣') {
                slug.push(c);
                previous_was_hyphen = false;
            }
            // Everything else is dropped.
        }
        if let Some((cut, _)) = slug.char_indices().nth(MAX_SLUG_LENGTH) {
            slug.truncate(cut);
        }
        Self(slug)
    }
}

impl AsRef<str> for PostSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
