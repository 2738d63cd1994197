//! Text helpers for terminality classification and citation blocks.

use chatrelay_core::{AFFIRMATIVE_TOKEN, CITATION_SEPARATOR, SearchHit};

/// Whether the classifier output contains the affirmative token.
///
/// Substring match, case-insensitive: the model may answer "Yes." or
/// "yes, it has".
#[must_use]
pub fn is_affirmative(output: &str) -> bool {
    output.trim().to_lowercase().contains(AFFIRMATIVE_TOKEN)
}

/// Strip quotes, periods and surrounding whitespace from a model-written query.
/// Returns `None` when nothing usable is left.
#[must_use]
pub fn sanitize_search_query(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '"' | '\'' | '.')).collect();
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Append a numbered link list to `reply`. No hits leaves `reply` unchanged.
#[must_use]
pub fn append_citations(reply: String, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return reply;
    }
    let links = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| format!("{}. {}", i + 1, hit.link))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{reply}{CITATION_SEPARATOR}{links}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(link: &str) -> SearchHit {
        SearchHit { link: link.to_owned() }
    }

    #[test]
    fn affirmative_matches_loose_model_output() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("Yes."));
        assert!(is_affirmative("  YES, the question was answered"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("No."));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn query_sanitizing_removes_quotes_and_periods() {
        assert_eq!(
            sanitize_search_query("  \"rust borrow checker explained.\"  ").as_deref(),
            Some("rust borrow checker explained")
        );
        assert_eq!(sanitize_search_query("'tokio vs. async-std'").as_deref(), Some("tokio vs async-std"));
        assert_eq!(sanitize_search_query(" \"..\" "), None);
    }

    #[test]
    fn citations_are_numbered_from_one() {
        let out = append_citations(
            "Answer".to_owned(),
            &[hit("https://a.example"), hit("https://b.example")],
        );
        assert_eq!(out, "Answer\n\n---\n📚 References\n1. https://a.example\n2. https://b.example");
    }

    #[test]
    fn no_hits_leaves_reply_untouched() {
        assert_eq!(append_citations("Answer".to_owned(), &[]), "Answer");
    }
}
