/*!
The function-call subroutine (§4.4.3): `last()`, `position()`, `text()`, `count(...)`, and
`data(...)`. Each is evaluated once per *source* value (the values flowing into the call), not
once overall — `//p/count(@id)` emits one count per matched `<p>`, which is what makes `last()`
and `position()` meaningful when chained after a step rather than only inside a predicate.

*/

use super::{evaluate, skip_whitespace, EvalContext};
use crate::xpath::bracket::find_closer;
use crate::xpath::dom::Node;
use crate::xpath::error::XPathError;
use crate::xpath::value::{Number, Value};

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

///
/// `from` is the function-name token's index; the caller has already confirmed the next
/// non-whitespace token is `(`. Evaluates the call and continues past the closing `)`, matching
/// every other dispatch case's own continuation.
pub fn call<N: Node>(
    tokens: &[String],
    values: &[Value<N>],
    from: usize,
    to: usize,
    ctx: &EvalContext<N>,
) -> Result<Vec<Value<N>>, XPathError> {
    let name = tokens[from].trim().to_string();
    let paren = skip_whitespace(tokens, from + 1, to);
    let close = find_closer(tokens, paren, to).ok_or_else(|| {
        log::debug!("unclosed ( at token {} for function {:?}", paren, name);
        XPathError::UnclosedBracket { opener: "(".into(), index: paren }
    })?;
    let arg_from = paren + 1;
    let arg_to = close.saturating_sub(1);
    log::trace!("function call {:?} at token {} over {} value(s)", name, from, values.len());

    let mut acc = Vec::new();
    for (idx, v) in values.iter().enumerate() {
        let position = idx + 1;
        match name.as_str() {
            "last" => {
                let n = if ctx.is_filter_context { ctx.last } else { values.len() };
                acc.push(Value::Number(Number::Int(n as i64)));
            }
            "position" => {
                let n = if ctx.is_filter_context { ctx.position } else { position };
                acc.push(Value::Number(Number::Int(n as i64)));
            }
            "text" => match v {
                Value::Element(e) => acc.push(Value::String(e.text_content())),
                Value::String(s) => acc.push(Value::String(s.clone())),
                _ => {}
            },
            "count" | "data" => {
                let inner_ctx = EvalContext {
                    position,
                    last: 0,
                    is_filter_context: ctx.is_filter_context,
                    filter_source: ctx.filter_source.clone(),
                };
                let inner = evaluate(tokens, std::slice::from_ref(v), arg_from, arg_to, false, &inner_ctx)?;
                if name == "count" {
                    acc.push(Value::Number(Number::Int(inner.len() as i64)));
                } else {
                    acc.extend(inner);
                }
            }
            other => return Err(XPathError::UnknownFunction(other.to_string())),
        }
    }

    if close == to {
        Ok(acc)
    } else {
        evaluate(tokens, &acc, close + 1, to, false, ctx)
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------
