/*!
A restricted XPath evaluator faithfully reproducing the token-cursor engine shipped with
HtmlCleaner 2.24: no intermediate AST, a flat token array, and three integer cursors threaded
through a single mutually-recursive procedure (see [`eval`]).

```
use htmlcleaner_xpath::xpath::simple_dom::Element;
use htmlcleaner_xpath::xpath::{evaluate, value::Value};

let root = Element::new("div");
let span = Element::new("span");
root.append_child(span.clone());

let result = evaluate(root, "/span").unwrap();
assert_eq!(result, vec![Value::Element(span)]);
```

*/

pub mod bracket;
pub mod dom;
pub mod error;
pub mod eval;
pub mod simple_dom;
pub mod token;
pub mod value;

use dom::Node;
use error::XPathError;
use eval::{evaluate as evaluate_tokens, EvalContext};
use value::Value;

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

///
/// Evaluate `expression` against `root`. Tokenizes, then dispatches the root evaluation frame per
/// §3's invariant 3: `from = 0`, `to = tokens.len() - 1`, `isRecursive = false`, `position = 1`,
/// `last = 0`, `isFilterContext = false`.
///
/// An empty (post-trim) expression is rejected before tokenizing, rather than attempting to
/// evaluate against an empty token array.
pub fn evaluate<N: Node>(root: N, expression: &str) -> Result<Vec<Value<N>>, XPathError> {
    if expression.trim().is_empty() {
        return Err(XPathError::EmptyExpression);
    }

    log::trace!("evaluating expression {:?}", expression);
    let tokens = token::tokenize(expression);
    let to = tokens.len() - 1;
    let result = evaluate_tokens(&tokens, &[Value::Element(root)], 0, to, false, &EvalContext::root());
    if let Err(ref e) = result {
        log::debug!("evaluation of {:?} failed: {}", expression, e);
    }
    result
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------
