//! Split a compound instruction into its explicit steps.

/// Step separators, in priority order.
pub const SEPARATORS: [&str; 3] = [" and ", ", then ", " then "];

/// Split `text` on the first separator that yields at least two steps.
///
/// Pieces are trimmed and empty ones dropped. An empty result means the text
/// is not a multi-step instruction.
pub fn parse(text: &str) -> Vec<String> {
    for sep in SEPARATORS {
        if !text.contains(sep) {
            continue;
        }
        let steps: Vec<String> = text
            .split(sep)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if steps.len() >= 2 {
            return steps;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_and() {
        assert_eq!(
            parse("Open Chrome and open https://x.com"),
            vec!["Open Chrome", "open https://x.com"]
        );
    }

    #[test]
    fn single_step_is_empty() {
        assert!(parse("Open Chrome").is_empty());
    }

    #[test]
    fn comma_then_before_bare_then() {
        assert_eq!(
            parse("open Downloads, then open mama.pdf"),
            vec!["open Downloads", "open mama.pdf"]
        );
    }

    #[test]
    fn and_takes_priority_over_then() {
        // Only " and " is used once it yields two steps.
        assert_eq!(
            parse("open a and open b then open c"),
            vec!["open a", "open b then open c"]
        );
    }

    #[test]
    fn separator_with_one_nonempty_piece_falls_through() {
        assert_eq!(parse(" and open b then open c"), vec!["and open b", "open c"]);
        assert!(parse("open a and ").is_empty());
    }

    #[test]
    fn three_steps() {
        assert_eq!(
            parse("open a then open b then open c"),
            vec!["open a", "open b", "open c"]
        );
    }

    #[test]
    fn separators_are_case_sensitive() {
        assert!(parse("open a AND open b").is_empty());
    }
}
