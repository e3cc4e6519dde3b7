//! Small shared helpers

pub mod time;

use std::sync::OnceLock;

use regex::Regex;

/// Generated-avatar URL for entities without a real photo
pub fn generated_avatar_url(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=1a1a2e&color=ff2d55&size=200&bold=true",
        urlencoding::encode(name)
    )
}

/// Strip markup from feed-provided text
///
/// Feed descriptions routinely embed anchor tags and tracking markup; only
/// the visible text is kept.
pub fn strip_html_tags(text: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
    let stripped = re.replace_all(text, " ");
    collapse_whitespace(&stripped)
}

/// Truncate to at most `max_chars` characters, appending an ellipsis
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", truncated.trim_end())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_url_encodes_names() {
        let url = generated_avatar_url("Lamine Yamal");
        assert!(url.contains("Lamine%20Yamal"));
    }

    #[test]
    fn strip_html_removes_tags_and_collapses_whitespace() {
        let input = "Real Madrid <a href=\"x\">win</a> again\n\n<b>late</b>";
        assert_eq!(strip_html_tags(input), "Real Madrid win again late");
    }

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        let out = truncate_chars("abcdefghij", 6);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 6);
    }
}
