/*!
Splits an expression string into a flat, ordered token array (component B), and classifies
individual tokens at use-time rather than at tokenize-time.

*/

use regex::Regex;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// The nine characters that always split the input, and are themselves kept as single-character
/// tokens.
///
pub const DELIMITERS: &[char] = &['/', '(', ')', '[', ']', '"', '\'', '=', '<', '>'];

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

///
/// Split `expr` on the nine delimiter characters, keeping each delimiter as its own token and
/// discarding empty fragments. Whitespace inside a non-delimiter run is preserved.
///
pub fn tokenize(expr: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in expr.chars() {
        if DELIMITERS.contains(&c) {
            if !current.is_empty() {
                tokens.push(current.clone());
                current.clear();
            }
            tokens.push(c.to_string());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

///
/// A token that is nothing but whitespace, once you account for the fact that an empty token
/// never reaches the array (§4.2). Still checked explicitly because a token may be all spaces.
///
pub fn is_whitespace_only(token: &str) -> bool {
    token.chars().all(char::is_whitespace)
}

///
/// Optional `+`/`-`, then one or more digits.
///
pub fn parse_integer(token: &str) -> Option<i64> {
    let trimmed = token.trim();
    if INTEGER_RE.is_match(trimmed) {
        trimmed.parse::<i64>().ok()
    } else {
        None
    }
}

///
/// Optional `+`/`-`/space, then digits and at most one decimal point, at least one digit total.
///
pub fn parse_double(token: &str) -> Option<f64> {
    let trimmed = token.trim_matches(|c: char| c == ' ');
    if DOUBLE_RE.is_match(trimmed) {
        trimmed.trim().parse::<f64>().ok()
    } else {
        None
    }
}

///
/// Starts with `@`, length ≥ 2 (after trimming).
///
pub fn is_attribute_reference(token: &str) -> bool {
    let trimmed = token.trim();
    trimmed.len() >= 2 && trimmed.starts_with('@')
}

// ------------------------------------------------------------------------------------------------
// Private Types
// ------------------------------------------------------------------------------------------------

lazy_static! {
    static ref INTEGER_RE: Regex = Regex::new(r"^[+-]?[0-9]+$").unwrap();
    static ref DOUBLE_RE: Regex = Regex::new(r"^[+-]?([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)$").unwrap();
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_path() {
        assert_eq!(tokenize("/a/b"), vec!["/", "a", "/", "b"]);
    }

    #[test]
    fn test_tokenize_keeps_inner_whitespace() {
        assert_eq!(tokenize("'v v'"), vec!["'", "v v", "'"]);
    }

    #[test]
    fn test_tokenize_discards_empty_fragments() {
        assert_eq!(tokenize("//a"), vec!["/", "/", "a"]);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("4.2"), None);
    }

    #[test]
    fn test_parse_double() {
        assert_eq!(parse_double("4.2"), Some(4.2));
        assert_eq!(parse_double(".5"), Some(0.5));
        assert_eq!(parse_double("abc"), None);
    }

    #[test]
    fn test_is_attribute_reference() {
        assert!(is_attribute_reference("@id"));
        assert!(!is_attribute_reference("@"));
        assert!(!is_attribute_reference("id"));
    }
}
