/*!
The abstract interface over element/attribute/text nodes used by the evaluator (component A).

The evaluator never constructs or sanitizes a DOM itself (that is the upstream cleaner's job, out
of scope here per §1); it only ever walks one through this trait. Any tree implementation
satisfying these few operations is acceptable — see [`crate::xpath::simple_dom`] for a minimal
reference implementation used by this crate's own tests.

*/

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// An element node in some host DOM. Implementors only need to supply [`name`](Node::name),
/// [`parent`](Node::parent), [`child_elements`](Node::child_elements), [`attributes`](Node::attributes),
/// and [`text_content`](Node::text_content); [`attribute`](Node::attribute), [`child_elements_named`](Node::child_elements_named),
/// and [`descendant_elements`](Node::descendant_elements) have default implementations in terms of those.
///
/// `Eq + Hash` is required so the evaluator can de-duplicate node-sets produced by overlapping
/// descendant paths (§4.4.4) without asking the host DOM for an identity comparison of its own.
///
pub trait Node: Clone + Eq + std::hash::Hash {
    /// The element's case-sensitive tag name.
    fn name(&self) -> String;

    /// The element's parent, or `None` at the document root.
    fn parent(&self) -> Option<Self>;

    /// Ordered child elements, non-element children (text, comments, ...) filtered out.
    fn child_elements(&self) -> Vec<Self>;

    /// This element's attributes, in document order, names unique.
    fn attributes(&self) -> Vec<(String, String)>;

    /// The value of a single named attribute, or `None` if it is not present.
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The concatenation of all descendant text, DOM-Level-2 style.
    fn text_content(&self) -> String;

    /// Child elements named `name`, compared case-insensitively.
    fn child_elements_named(&self, name: &str) -> Vec<Self> {
        self.child_elements()
            .into_iter()
            .filter(|e| e.name().eq_ignore_ascii_case(name))
            .collect()
    }

    /// Every element descendant, in preorder, `self` excluded.
    fn descendant_elements(&self) -> Vec<Self> {
        let mut out = Vec::new();
        for child in self.child_elements() {
            out.push(child.clone());
            out.extend(child.descendant_elements());
        }
        out
    }
}

// ------------------------------------------------------------------------------------------------
// Modules
// ------------------------------------------------------------------------------------------------
