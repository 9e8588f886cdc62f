/*!
A restricted implementation of the XML Path Language (XPath), reproducing the token-cursor
evaluator shipped with HtmlCleaner 2.24 over a generic, abstract DOM.

The [`xpath`] module is the crate's single entry point: it owns the tokenizer, bracket matcher,
and evaluator described in its own module documentation, plus a reference DOM implementation for
callers without one of their own.

# Example

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

#[macro_use]
extern crate lazy_static;

// ------------------------------------------------------------------------------------------------
// Modules
// ------------------------------------------------------------------------------------------------

pub mod xpath;
