use crate::domain::PublishDate;

/// The YAML frontmatter of a rendered post; `Display` produces the complete
/// Markdown document.
///
/// Free-text fields go through single-quoting and the summary is emitted as a
/// literal block scalar, so admin-submitted text cannot break out of its
/// field.
pub struct Frontmatter<'a> {
    pub title: &'a str,
    pub date: PublishDate,
    pub summary: &'a str,
    pub thumbnail: &'a str,
    pub url: &'a str,
}

impl std::fmt::Display for Frontmatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "---")?;
        writeln!(f, "title: {}", yaml_single_quoted(self.title))?;
        writeln!(f, "date: {}", self.date)?;
        writeln!(f, "summary: |")?;
        for line in self.summary.lines() {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "thumbnail: {}", yaml_single_quoted(self.thumbnail))?;
        writeln!(f, "url: {}", yaml_single_quoted(self.url))?;
        writeln!(f, "---")
    }
}

/// Wraps a scalar in single quotes, doubling embedded quotes per YAML
/// convention.
pub fn yaml_single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
