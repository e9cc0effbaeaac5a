//! Render search snippets as a prompt context block.

use chrono::{DateTime, SecondsFormat, Utc};

/// `[Web search results | fetched <timestamp>]` followed by one `- ` line per snippet.
pub fn format_for_prompt(results: &[String], fetched_at: DateTime<Utc>) -> String {
    let mut out = format!(
        "[Web search results | fetched {}]",
        fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    for result in results {
        out.push_str("\n- ");
        out.push_str(result);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn header_and_bullets() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let text = format_for_prompt(&["one".into(), "two".into()], at);
        assert_eq!(
            text,
            "[Web search results | fetched 2026-03-01T09:30:00Z]\n- one\n- two"
        );
    }
}
