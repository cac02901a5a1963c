use chrono::NaiveDate;

/// The publication date of a post, as submitted by the admin form.
///
/// The date ends up both in the committed file path and in the frontmatter,
/// and the downstream site build coerces the frontmatter value to a date, so
/// anything that is not `YYYY-MM-DD` is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishDate(NaiveDate);

impl PublishDate {
    pub fn parse(s: &str) -> Result<Self, String> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| format!("`{s}` is not a valid publication date, expected YYYY-MM-DD"))
    }
}

impl std::fmt::Display for PublishDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
