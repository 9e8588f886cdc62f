/*!
The name step (§4.4.4): dispatches to the attribute axis or the element axis depending on whether
the trimmed token starts with `@`. Both sub-cases evaluate "the remainder" — whatever tokens
follow the name — against each node (or attribute value) they produce, which is how a trailing
predicate or further path segment ends up applied per-match rather than to a combined batch.

A recursive named step (`//name`) is descendant-*or-self*: the context element is itself a
candidate against `name`, not just its children, so `//div` evaluated with a `<div>` itself as the
context can still select that element. Without this, the context node could never appear in a
`//name` result, since nothing "above" it would ever iterate it as a child to re-add via the
bug-compatible branch below.

*/

use super::{evaluate, EvalContext};
use crate::xpath::dom::Node;
use crate::xpath::error::XPathError;
use crate::xpath::token::is_attribute_reference;
use crate::xpath::value::Value;

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

///
/// Entry point for dispatch case 10: routes to the attribute axis (§4.4.4a) or element axis
/// (§4.4.4b) by inspecting `name`.
pub fn dispatch<N: Node>(
    tokens: &[String],
    values: &[Value<N>],
    name: &str,
    from: usize,
    to: usize,
    is_recursive: bool,
    ctx: &EvalContext<N>,
) -> Result<Vec<Value<N>>, XPathError> {
    let name = name.trim();
    if is_attribute_reference(name) {
        attribute_axis(tokens, values, name, from, to, is_recursive, ctx)
    } else {
        element_axis(tokens, values, name, from, to, is_recursive, ctx)
    }
}

// ------------------------------------------------------------------------------------------------
// Private Functions
// ------------------------------------------------------------------------------------------------

///
/// §4.4.4a. `pool` is every element reachable from `values` — the union of descendants when
/// `isRecursive`, otherwise `values` itself. A non-element value reaching the attribute axis is a
/// syntactic error: the grammar never puts a string/number/boolean in front of `@name`.
fn attribute_axis<N: Node>(
    tokens: &[String],
    values: &[Value<N>],
    name: &str,
    from: usize,
    to: usize,
    is_recursive: bool,
    ctx: &EvalContext<N>,
) -> Result<Vec<Value<N>>, XPathError> {
    let attr_name = &name[1..];

    let pool: Vec<N> = if is_recursive {
        let mut set: Vec<N> = Vec::new();
        for v in values {
            let e = as_element(v)?;
            for d in e.descendant_elements() {
                if !set.iter().any(|x| x == &d) {
                    set.push(d);
                }
            }
        }
        set
    } else {
        let mut elems = Vec::new();
        for v in values {
            elems.push(as_element(v)?.clone());
        }
        elems
    };

    let mut acc = Vec::new();
    for e in &pool {
        if attr_name == "*" {
            for (_, value) in e.attributes() {
                let r = evaluate(tokens, &[Value::String(value)], from + 1, to, false, ctx)?;
                merge(&mut acc, r);
            }
        } else if let Some(value) = e.attribute(attr_name) {
            let r = evaluate(tokens, &[Value::String(value)], from + 1, to, false, ctx)?;
            merge(&mut acc, r);
        }
    }
    Ok(acc)
}

fn as_element<N: Node>(value: &Value<N>) -> Result<&N, XPathError> {
    match value {
        Value::Element(e) => Ok(e),
        _ => Err(XPathError::AttributeAxisOnNonElement),
    }
}

///
/// §4.4.4b. `name` is one of `.`, `..`, `*`, or a (case-insensitively matched) element name.
/// Non-recursive: collect each source element's matching children, evaluate the remainder
/// against that set, and union the results. Recursive (`//name`): test the context element itself
/// as a descendant-or-self candidate, walk every descendant via self-recursion, *and* —
/// intentionally, see the module docs — re-add a directly matching child whenever it also appears
/// in that level's "refined" remainder result. That duplication is the bug-compatible behavior
/// this crate exists to reproduce faithfully; `merge`'s de-duplication keeps the self-candidate
/// test and the child re-add from ever double-counting the same element.
fn element_axis<N: Node>(
    tokens: &[String],
    source: &[Value<N>],
    name: &str,
    from: usize,
    to: usize,
    is_recursive: bool,
    ctx: &EvalContext<N>,
) -> Result<Vec<Value<N>>, XPathError> {
    let is_special = matches!(name, "." | ".." | "*");

    let mut deduped: Vec<N> = Vec::new();
    for v in source {
        if let Value::Element(e) = v {
            if !deduped.iter().any(|x| x == e) {
                deduped.push(e.clone());
            }
        }
    }

    let mut acc: Vec<Value<N>> = Vec::new();

    for (idx, e) in deduped.iter().enumerate() {
        let position = idx + 1;

        let subnodes: Vec<N> = match name {
            "." => vec![e.clone()],
            ".." => e.parent().into_iter().collect(),
            "*" => e.child_elements(),
            _ => e.child_elements_named(name),
        };
        let mut set: Vec<N> = Vec::new();
        for s in subnodes {
            if !set.iter().any(|x| x == &s) {
                set.push(s);
            }
        }

        let inner_ctx = EvalContext {
            position,
            last: set.len(),
            is_filter_context: ctx.is_filter_context,
            filter_source: ctx.filter_source.clone(),
        };
        let set_values: Vec<Value<N>> = set.into_iter().map(Value::Element).collect();
        let refined = evaluate(tokens, &set_values, from + 1, to, false, &inner_ctx)?;

        if is_recursive {
            if is_special {
                merge(&mut acc, refined.clone());
            } else if e.name().eq_ignore_ascii_case(name) {
                let self_ctx = EvalContext {
                    position,
                    last: 1,
                    is_filter_context: ctx.is_filter_context,
                    filter_source: ctx.filter_source.clone(),
                };
                let self_refined = evaluate(tokens, &[Value::Element(e.clone())], from + 1, to, false, &self_ctx)?;
                merge(&mut acc, self_refined);
            }
            for c in e.child_elements() {
                let recursed = element_axis(tokens, &[Value::Element(c.clone())], name, from, to, true, ctx)?;
                merge(&mut acc, recursed);

                if !is_special && refined.iter().any(|v| matches!(v, Value::Element(ce) if ce == &c)) {
                    merge(&mut acc, vec![Value::Element(c)]);
                }
            }
        } else {
            merge(&mut acc, refined);
        }
    }

    Ok(acc)
}

///
/// Append `items` to `acc`, skipping anything already present — the set-backed de-duplication
/// called for by the recursive-descent accumulator (§9's "Recursive descent and duplicates").
fn merge<N: Node>(acc: &mut Vec<Value<N>>, items: Vec<Value<N>>) {
    for item in items {
        if !acc.iter().any(|existing| existing == &item) {
            acc.push(item);
        }
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
    fn test_wildcard_child_axis() {
        let root = Element::new("div");
        let a = Element::new("a");
        let b = Element::new("b");
        root.append_child(a.clone());
        root.append_child(b.clone());

        assert_eq!(eval_str(&root, "/*"), vec![Value::Element(a), Value::Element(b)]);
    }

    #[test]
    fn test_parent_axis() {
        let root = Element::new("div");
        let child = Element::new("span");
        root.append_child(child.clone());

        assert_eq!(eval_str(&child, "/.."), vec![Value::Element(root)]);
    }

    #[test]
    fn test_attribute_axis_star() {
        let root = Element::new("a");
        root.set_attribute("id", "t1");
        root.set_attribute("class", "x");

        let result = eval_str(&root, "/@*");
        assert_eq!(
            result,
            vec![Value::String("t1".to_string()), Value::String("x".to_string())]
        );
    }

    #[test]
    fn test_attribute_axis_on_non_element_errors() {
        let tokens = tokenize("@id");
        let to = tokens.len() - 1;
        let err = evaluate::<Element>(&tokens, &[Value::String("x".to_string())], 0, to, false, &EvalContext::root())
            .unwrap_err();
        assert_eq!(err, XPathError::AttributeAxisOnNonElement);
    }

    #[test]
    fn test_bug_compatible_recursive_predicate_scenario() {
        // <div><span>Foo</span><div>Bar</div></div>
        let root = Element::new("div");
        let span = Element::new("span");
        span.append_text("Foo");
        let inner_div = Element::new("div");
        inner_div.append_text("Bar");
        root.append_child(span.clone());
        root.append_child(inner_div);

        let result = eval_str(&root, "//span");
        assert_eq!(result, vec![Value::Element(span)]);
    }
}
