use thiserror::Error;

/// Failures raised while parsing a card document or driving its interactive state.
///
/// The first four variants abort a parse; the caller is expected to drop the partial tree
/// and report the card as malformed.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("unknown element type: {0}")]
    UnknownElementType(String),
    #[error("unknown action type: {0}")]
    UnknownActionType(String),
    #[error("unknown input type: {0}")]
    UnknownInputType(String),
    #[error("elements of type {element_type} are not allowed in this container")]
    ContainmentViolation { element_type: String },
    #[error("card document is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("invalid button id '{0}'")]
    InvalidButtonId(String),
    #[error("button '{0}' is not on screen")]
    UnknownButton(String),
    #[error("failed to render request body: {0}")]
    Template(#[from] handlebars::RenderError),
}

impl CardError {
    /// True for the errors that make a document unusable.
    pub fn is_malformed_card(&self) -> bool {
        matches!(
            self,
            CardError::UnknownElementType(_)
                | CardError::UnknownActionType(_)
                | CardError::UnknownInputType(_)
                | CardError::ContainmentViolation { .. }
                | CardError::InvalidJson(_)
        )
    }
}

pub type CardResult<T> = Result<T, CardError>;
