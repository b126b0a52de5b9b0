/// Convenience result type used across newsprint.
pub type NewsprintResult<T> = Result<T, NewsprintError>;

/// Top-level error taxonomy used by editor, renderer and exporter APIs.
#[derive(thiserror::Error, Debug)]
pub enum NewsprintError {
    /// Invalid user-provided field input or composition data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while reading, sniffing or decoding image data.
    #[error("image error: {0}")]
    Image(String),

    /// Errors while laying out or rasterizing a visual tree.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding or delivering an exported artifact.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NewsprintError {
    /// Build a [`NewsprintError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NewsprintError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`NewsprintError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`NewsprintError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`NewsprintError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
