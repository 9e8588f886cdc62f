/*!
A minimal, shared-ownership reference implementation of [`Node`](crate::xpath::dom::Node)
(component E). This crate does not parse or sanitize HTML (that is the upstream cleaner's job,
out of scope per §1 of the design); this module exists so that library consumers without a DOM
of their own, and this crate's own tests, have something to build and evaluate against.

Mirrors the shape of the teacher's external DOM dependency (`xml_dom`'s `RefNode`, itself
`Rc<RefCell<_>>`) without adopting that crate's HTML-parsing surface.

# Example

```
use htmlcleaner_xpath::xpath::dom::Node;
use htmlcleaner_xpath::xpath::simple_dom::Element;

let root = Element::new("div");
root.append_child(Element::new("span"));
assert_eq!(root.child_elements().len(), 1);
```

*/

use crate::xpath::dom::Node;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// A shared handle to one element node. Cloning an `Element` clones the handle, not the subtree;
/// two handles that point at the same node compare equal.
///
#[derive(Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

///
/// One child slot: either an element (participates in axis steps) or bare text (ignored by axis
/// steps, but folded into `textContent`).
///
#[derive(Clone)]
pub enum Child {
    Element(Element),
    Text(String),
}

// ------------------------------------------------------------------------------------------------
// Private Types
// ------------------------------------------------------------------------------------------------

pub struct ElementData {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Child>,
    parent: Option<Weak<RefCell<ElementData>>>,
}

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl Element {
    pub fn new(name: &str) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
        })))
    }

    pub fn borrow(&self) -> Ref<'_, ElementData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, ElementData> {
        self.0.borrow_mut()
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> &Self {
        let mut data = self.0.borrow_mut();
        if let Some(existing) = data.attributes.iter_mut().find(|(n, _)| n == name) {
            existing.1 = value.to_string();
        } else {
            data.attributes.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn append_text(&self, text: &str) -> &Self {
        self.0.borrow_mut().children.push(Child::Text(text.to_string()));
        self
    }

    pub fn append_child(&self, child: Element) -> &Self {
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        self.0.borrow_mut().children.push(Child::Element(child));
        self
    }
}

// ------------------------------------------------------------------------------------------------

impl Node for Element {
    fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    fn parent(&self) -> Option<Self> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Element)
    }

    fn child_elements(&self) -> Vec<Self> {
        self.0
            .borrow()
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Element(e) => Some(e.clone()),
                Child::Text(_) => None,
            })
            .collect()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        self.0.borrow().attributes.clone()
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.0.borrow().children {
        match child {
            Child::Text(t) => out.push_str(t),
            Child::Element(e) => collect_text(e, out),
        }
    }
}

// ------------------------------------------------------------------------------------------------

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl std::hash::Hash for Element {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state)
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Element({})", self.name())
    }
}

// ------------------------------------------------------------------------------------------------
// Unit Tests
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_child_wiring() {
        let root = Element::new("div");
        let span = Element::new("span");
        root.append_child(span.clone());

        assert_eq!(root.child_elements().len(), 1);
        assert_eq!(span.parent().unwrap(), root);
    }

    #[test]
    fn test_text_content_concatenates_nested_text() {
        let root = Element::new("div");
        let span = Element::new("span");
        span.append_text("Foo");
        root.append_child(span);
        root.append_text("Bar");

        assert_eq!(root.text_content(), "FooBar");
    }

    #[test]
    fn test_attribute_lookup() {
        let e = Element::new("a");
        e.set_attribute("id", "t1");
        assert_eq!(e.attribute("id"), Some("t1".to_string()));
        assert_eq!(e.attribute("missing"), None);
    }

    #[test]
    fn test_descendant_elements_preorder() {
        let root = Element::new("div");
        let a = Element::new("a");
        let b = Element::new("b");
        a.append_child(b);
        root.append_child(a);

        let names: Vec<String> = root.descendant_elements().iter().map(Node::name).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
