/*!
The evaluator proper (component D): a single mutually-recursive, token-cursor procedure over the
flat token array produced by [`crate::xpath::token`]. There is deliberately no intermediate AST —
every operator re-evaluates its operand sub-range from source values every time it is needed,
which is what produces the filter-context leakage captured as a bug-compatible behavior in
[`axis`] and tested in `tests/`.

*/

use crate::xpath::bracket::find_closer;
use crate::xpath::dom::Node;
use crate::xpath::error::XPathError;
use crate::xpath::token::{is_whitespace_only, parse_double, parse_integer};
use crate::xpath::value::{to_text, Number, Value};

pub mod axis;
pub mod function;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// The filter-context parameters that accompany every recursive call but do not participate in
/// the token-range cursor arithmetic (`from`/`to`/`isRecursive` stay explicit parameters per §9 —
/// bundling *those* would hide the exact bookkeeping this design exists to make visible).
///
/// `position` and `last` give `position()`/`last()` meaning inside a predicate; `filter_source`,
/// when `Some`, is the value-list a `[...]` predicate is currently being evaluated against — the
/// implicit root for the right-hand side of a comparison (§4.4.2).
///
#[derive(Clone)]
pub struct EvalContext<N: Node> {
    pub position: usize,
    pub last: usize,
    pub is_filter_context: bool,
    pub filter_source: Option<Vec<Value<N>>>,
}

impl<N: Node> EvalContext<N> {
    pub fn root() -> Self {
        Self {
            position: 1,
            last: 0,
            is_filter_context: false,
            filter_source: None,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

///
/// Evaluate `tokens[from..=to]` against `values`. Dispatches in the fixed order of §4.4: an empty
/// (whitespace-only) token is skipped, then grouping `(`, predicate `[`, string literal, a
/// comparison operator (filter context only), the step separator `/`, a function call, integer
/// and double literals, and finally — the default — a name axis step.
///
/// `from > to` is the recursion's base case: the input values pass through unchanged.
pub fn evaluate<N: Node>(
    tokens: &[String],
    values: &[Value<N>],
    from: usize,
    to: usize,
    is_recursive: bool,
    ctx: &EvalContext<N>,
) -> Result<Vec<Value<N>>, XPathError> {
    if from > to {
        return Ok(values.to_vec());
    }

    let tok = tokens[from].as_str();

    if is_whitespace_only(tok) {
        return evaluate(tokens, values, from + 1, to, is_recursive, ctx);
    }

    match tok {
        // 2. Grouping: ( expr )
        "(" => {
            let closer = find_closer(tokens, from, to).ok_or_else(|| {
                log::debug!("unclosed ( at token {}", from);
                XPathError::UnclosedBracket { opener: "(".into(), index: from }
            })?;
            let inner = evaluate(tokens, values, from + 1, closer.saturating_sub(1), false, ctx)?;
            evaluate(tokens, &inner, closer + 1, to, is_recursive, ctx)
        }

        // 3. Predicate: [ expr ] applied directly to the current values
        "[" => {
            let closer = find_closer(tokens, from, to).ok_or_else(|| {
                log::debug!("unclosed [ at token {}", from);
                XPathError::UnclosedBracket { opener: "[".into(), index: from }
            })?;
            log::trace!("predicate at token {} over {} value(s)", from, values.len());
            let filtered = filter(tokens, values, from + 1, closer.saturating_sub(1), ctx)?;
            evaluate(tokens, &filtered, closer + 1, to, is_recursive, ctx)
        }

        // 4. String literal: "..." or '...'
        "\"" | "'" => {
            let closer = find_closer(tokens, from, to).ok_or_else(|| {
                log::debug!("unclosed {} at token {}", tok, from);
                XPathError::UnclosedBracket { opener: tok.into(), index: from }
            })?;
            let literal = tokens[(from + 1)..closer].join("");
            evaluate(tokens, &[Value::String(literal)], closer + 1, to, is_recursive, ctx)
        }

        // 5. Comparison: only meaningful inside a predicate's filter context
        "=" | "<" | ">" if ctx.is_filter_context => {
            let peek = skip_whitespace(tokens, from + 1, to);
            let (op, rhs_from) = if tok != "=" && peek <= to && tokens[peek] == "=" {
                (format!("{}=", tok), peek + 1)
            } else {
                (tok.to_string(), from + 1)
            };
            let rhs_source = ctx.filter_source.clone().unwrap_or_default();
            let rhs = evaluate(tokens, &rhs_source, rhs_from, to, false, ctx)?;
            Ok(vec![Value::Boolean(compare(values, &op, &rhs))])
        }

        // 6. Step separator: / or //. `find_closer` on "/" locates the next same-depth "/",
        // i.e. the boundary of the current step; continuing past it recurses back into this
        // same case to dispatch the next step. Whitespace may separate the two slashes of a
        // `//` marker (or the slash from its step), so the lookahead skips it (§8 invariant 1).
        "/" => {
            let peek = skip_whitespace(tokens, from + 1, to);
            // When this is a double slash, the closer search must start at the *second* slash,
            // not the first — searching from `from` would immediately match that second slash
            // as if it were the next step's boundary.
            let (next_is_recursive, step_from, closer_search_from) = if peek <= to && tokens[peek] == "/" {
                (true, peek + 1, peek)
            } else {
                (false, from + 1, from)
            };
            if skip_whitespace(tokens, step_from, to) > to {
                return Err(XPathError::MissingStep);
            }
            log::trace!("step at token {} (recursive={})", step_from, next_is_recursive);
            let closer = find_closer(tokens, closer_search_from, to);
            let step_to = closer.map(|c| c - 1).unwrap_or(to);
            let stepped = evaluate(tokens, values, step_from, step_to, next_is_recursive, ctx)?;
            match closer {
                Some(c) => evaluate(tokens, &stepped, c, to, false, ctx),
                None => Ok(stepped),
            }
        }

        name => {
            // 7. Function call: identifier immediately followed by "("
            let peek = skip_whitespace(tokens, from + 1, to);
            if peek <= to && tokens[peek] == "(" {
                return function::call(tokens, values, from, to, ctx);
            }

            // 8/9. Numeric literal
            if let Some(i) = parse_integer(name) {
                return evaluate(tokens, &[Value::Number(Number::Int(i))], from + 1, to, is_recursive, ctx);
            }
            if let Some(f) = parse_double(name) {
                return evaluate(tokens, &[Value::Number(Number::Float(f))], from + 1, to, is_recursive, ctx);
            }

            // 10. Name axis step (attribute or element, §4.4.4) — handles its own remainder
            // continuation internally, so nothing further happens here.
            axis::dispatch(tokens, values, name, from, to, is_recursive, ctx)
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Private Functions
// ------------------------------------------------------------------------------------------------

///
/// The filter subroutine (§4.4.1): keeps each source value `v` at 1-based index `i` iff the
/// predicate range, evaluated against the singleton `[v]`, resolves to a matching position or a
/// truthy value.
fn filter<N: Node>(
    tokens: &[String],
    source: &[Value<N>],
    from: usize,
    to: usize,
    ctx: &EvalContext<N>,
) -> Result<Vec<Value<N>>, XPathError> {
    let last = source.len();
    let mut kept = Vec::new();
    for (idx, value) in source.iter().enumerate() {
        let position = idx + 1;
        let inner_ctx = EvalContext {
            position,
            last,
            is_filter_context: true,
            filter_source: Some(vec![value.clone()]),
        };
        let result = evaluate(tokens, std::slice::from_ref(value), from, to, false, &inner_ctx)?;
        if predicate_matches(&result, position) {
            kept.push(value.clone());
        }
    }
    Ok(kept)
}

///
/// A predicate keeps its source value when the result is a number equal to the 1-based
/// `position`, a `true` boolean, or any other non-empty result (XPath 1.0 boolean coercion).
fn predicate_matches<N: Node>(result: &[Value<N>], position: usize) -> bool {
    match result.first() {
        Some(Value::Number(n)) => n.as_f64() == position as f64,
        Some(Value::Boolean(b)) => *b,
        Some(_) => true,
        None => false,
    }
}

///
/// The first index at or after `idx` (up to and including `to`) that is not a whitespace-only
/// token, or `to + 1` if none remains. Used wherever dispatch peeks one token ahead to recognize a
/// two-character operator (`//`, `<=`, a function call's `(`) so that whitespace inserted between
/// the two tokens doesn't change the result (§8 invariant 1).
pub(super) fn skip_whitespace(tokens: &[String], mut idx: usize, to: usize) -> usize {
    while idx <= to && is_whitespace_only(&tokens[idx]) {
        idx += 1;
    }
    idx
}

///
/// Comparison semantics (§4.4.2): numeric on both sides compares numerically, otherwise both
/// sides coerce to text and compare lexicographically by codepoint (Rust's byte-wise `&str` `Ord`
/// already gives this for valid UTF-8). Either side empty is always `false`.
fn compare<N: Node>(lhs: &[Value<N>], op: &str, rhs: &[Value<N>]) -> bool {
    let (l, r) = match (lhs.first(), rhs.first()) {
        (Some(l), Some(r)) => (l, r),
        _ => return false,
    };

    let ordering = match (l, r) {
        (Value::Number(a), Value::Number(b)) => a.as_f64().partial_cmp(&b.as_f64()),
        _ => to_text(l).partial_cmp(&to_text(r)),
    };
    let ordering = match ordering {
        Some(o) => o,
        None => return false,
    };

    match op {
        "=" => ordering == std::cmp::Ordering::Equal,
        "<" => ordering == std::cmp::Ordering::Less,
        ">" => ordering == std::cmp::Ordering::Greater,
        "<=" => ordering != std::cmp::Ordering::Greater,
        ">=" => ordering != std::cmp::Ordering::Less,
        _ => false,
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xpath::simple_dom::Element;
    use crate::xpath::token::tokenize;

    fn eval_str(root: &Element, expr: &str) -> Vec<Value<Element>> {
        let tokens = tokenize(expr);
        let to = tokens.len() - 1;
        evaluate(&tokens, &[Value::Element(root.clone())], 0, to, false, &EvalContext::root()).unwrap()
    }

    #[test]
    fn test_child_step() {
        let root = Element::new("div");
        let span = Element::new("span");
        root.append_child(span.clone());

        assert_eq!(eval_str(&root, "/span"), vec![Value::Element(span)]);
    }

    #[test]
    fn test_predicate_by_position() {
        let root = Element::new("div");
        let a = Element::new("p");
        let b = Element::new("p");
        root.append_child(a);
        root.append_child(b.clone());

        assert_eq!(eval_str(&root, "/p[2]"), vec![Value::Element(b)]);
    }

    #[test]
    fn test_string_literal() {
        let root = Element::new("div");
        assert_eq!(eval_str(&root, "'hello'"), vec![Value::String("hello".to_string())]);
    }

    #[test]
    fn test_attribute_comparison_predicate() {
        let root = Element::new("div");
        let a = Element::new("a");
        a.set_attribute("id", "keep");
        let b = Element::new("a");
        b.set_attribute("id", "drop");
        root.append_child(a.clone());
        root.append_child(b);

        assert_eq!(eval_str(&root, "/a[@id='keep']"), vec![Value::Element(a)]);
    }

    #[test]
    fn test_descendant_axis_matches_nested() {
        let root = Element::new("div");
        let mid = Element::new("div");
        let leaf = Element::new("span");
        mid.append_child(leaf.clone());
        root.append_child(mid);

        assert_eq!(eval_str(&root, "//span"), vec![Value::Element(leaf)]);
    }
}
