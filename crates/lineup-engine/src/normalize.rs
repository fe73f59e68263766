//! Search query construction.
//!
//! Track titles from the catalog often carry credits such as `"Song (feat. Y)"` that
//! make the player's search miss. [`TitleNormalizer`] strips those annotations so the
//! query only holds the bare title and the artist.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref DEFAULT_NORMALIZER: TitleNormalizer =
        TitleNormalizer::new(&["feat.", "ft.", "From"]);
}

/// Strips parentheticals opened by one of a fixed set of markers.
#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    pattern: Option<Regex>,
}

impl TitleNormalizer {
    pub fn new<S: AsRef<str>>(markers: &[S]) -> Self {
        let alternatives: Vec<String> = markers
            .iter()
            .map(|m| m.as_ref().trim())
            .filter(|m| !m.is_empty())
            .map(|m| {
                let escaped = regex::escape(m);
                // "From" must not match "(Fromage"; "feat." already ends on a boundary.
                if m.chars().last().is_some_and(|c| c.is_alphanumeric()) {
                    format!(r"{}\b", escaped)
                } else {
                    escaped
                }
            })
            .collect();

        if alternatives.is_empty() {
            return Self { pattern: None };
        }

        let source = format!(r"(?i)\(\s*(?:{})", alternatives.join("|"));
        // Every piece is escaped, so the pattern always compiles.
        let pattern = Regex::new(&source).ok();
        Self { pattern }
    }

    /// Remove every marked parenthetical, up to its closing `)` (or the end of
    /// the title when it is never closed).
    ///
    /// Text around the annotation is kept and joined by a single space. Titles
    /// without a marker come back unchanged, as does a title that would be left
    /// empty.
    pub fn normalize(&self, title: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return title.to_string();
        };

        let mut current = title.to_string();
        while let Some(m) = pattern.find(&current) {
            let end = closing_paren(&current, m.start());
            let before = current[..m.start()].trim_end();
            let after = current[end..].trim_start();
            current = match (before.is_empty(), after.is_empty()) {
                (_, true) => before.to_string(),
                (true, false) => after.to_string(),
                (false, false) => format!("{} {}", before, after),
            };
        }

        if current.is_empty() {
            title.to_string()
        } else {
            current
        }
    }
}

/// Byte offset just past the `)` closing the `(` at `open`, honouring nesting.
fn closing_paren(s: &str, open: usize) -> usize {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return open + i + 1;
                }
            }
            _ => {}
        }
    }
    s.len()
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        DEFAULT_NORMALIZER.clone()
    }
}

/// Build `<base>/search/<query>` where the query is `"<title> <artist>"`,
/// percent-encoded as a single path segment.
pub fn build_search_url(base: &str, title: &str, artist: &str) -> Result<String, url::ParseError> {
    let query = format!("{} {}", title, artist);
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .push("search")
        .push(query.trim());
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_featured_credit() {
        let n = TitleNormalizer::default();
        assert_eq!(n.normalize("Song (feat. Y)"), "Song");
        assert_eq!(n.normalize("Song (Feat. Y & Z)"), "Song");
        assert_eq!(n.normalize("Song (ft. Y)"), "Song");
        assert_eq!(
            n.normalize("Theme (From \"Some Movie\") [Remix]"),
            "Theme [Remix]"
        );
    }

    #[test]
    fn test_keeps_text_after_annotation() {
        let n = TitleNormalizer::default();
        assert_eq!(
            n.normalize("Song (feat. Y) - Remastered 2011"),
            "Song - Remastered 2011"
        );
        assert_eq!(n.normalize("Song (feat. Y (Z)) Live"), "Song Live");
        assert_eq!(n.normalize("(feat. Y) Song"), "Song");
        assert_eq!(n.normalize("Song (feat. Y"), "Song");
    }

    #[test]
    fn test_leaves_other_parentheticals() {
        let n = TitleNormalizer::default();
        assert_eq!(n.normalize("Song (Remix)"), "Song (Remix)");
        assert_eq!(n.normalize("Song (Fromage)"), "Song (Fromage)");
        assert_eq!(n.normalize("  Spaced  "), "  Spaced  ");
        assert_eq!(n.normalize("Intro feat. Y"), "Intro feat. Y");
    }

    #[test]
    fn test_keeps_text_before_marker_verbatim() {
        let n = TitleNormalizer::default();
        assert_eq!(n.normalize("A (Live) (feat. B)"), "A (Live)");
        assert_eq!(n.normalize("(feat. Y)"), "(feat. Y)");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = TitleNormalizer::default();
        for title in [
            "Song (feat. Y)",
            "A (Live) (feat. B) (From X)",
            "(feat. Y)",
            "Plain",
            "",
            "Song(feat.Y)",
            "Song (feat. Y) - Remastered 2011",
            "Theme (From X) [Remix] (ft. Z) Live",
        ] {
            let once = n.normalize(title);
            assert_eq!(n.normalize(&once), once, "not idempotent for {:?}", title);
        }
    }

    #[test]
    fn test_custom_markers() {
        let n = TitleNormalizer::new(&["with"]);
        assert_eq!(n.normalize("Song (with Y)"), "Song");
        assert_eq!(n.normalize("Song (feat. Y)"), "Song (feat. Y)");

        let none = TitleNormalizer::new::<&str>(&[]);
        assert_eq!(none.normalize("Song (feat. Y)"), "Song (feat. Y)");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = build_search_url("https://open.spotify.com", "Song", "X & Y/Z").unwrap();
        assert_eq!(url, "https://open.spotify.com/search/Song%20X%20&%20Y%2FZ");

        let url = build_search_url("https://open.spotify.com/", "Song?", "X").unwrap();
        assert_eq!(url, "https://open.spotify.com/search/Song%3F%20X");
    }
}
