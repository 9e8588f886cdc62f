/*!
The single error type raised by the evaluator (component F of the design).

*/

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

///
/// Every way an expression evaluation can fail. There is no partial-success mode; any of these
/// propagates straight to the top-level `evaluate` call.
///
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum XPathError {
    #[error("the expression string is empty")]
    EmptyExpression,

    #[error("unclosed '{opener}' starting at token {index}")]
    UnclosedBracket { opener: String, index: usize },

    #[error("expected a step after '/' but the expression ended")]
    MissingStep,

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("the attribute axis was applied to a non-element value")]
    AttributeAxisOnNonElement,
}

// ------------------------------------------------------------------------------------------------
// Private Functions
// ------------------------------------------------------------------------------------------------

// ------------------------------------------------------------------------------------------------
// Modules
// ------------------------------------------------------------------------------------------------
