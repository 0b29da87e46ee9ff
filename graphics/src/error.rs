//! Graphics error types.

use std::fmt;

use crate::shader::ShaderStage;

/// Errors that can occur in the graphics system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// A patch rule's anchor marker is missing from the target stage.
    ///
    /// Indicates the patch rules and the base shader source disagree.
    PatchAnchorNotFound {
        /// Name of the rule that failed.
        rule: String,
        /// Stage the rule targets.
        stage: ShaderStage,
        /// The anchor text that was searched for.
        anchor: String,
    },
    /// A program that was already augmented was handed to the augmentor again.
    AlreadyAugmented,
    /// Include resolution, parsing or validation of a shader failed.
    ShaderCompilationFailed(String),
    /// A handle no longer refers to a live object.
    InvalidHandle(String),
    /// An invalid parameter was provided.
    InvalidParameter(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatchAnchorNotFound {
                rule,
                stage,
                anchor,
            } => write!(
                f,
                "patch anchor not found: rule '{rule}' expects '{anchor}' in {stage} source"
            ),
            Self::AlreadyAugmented => write!(f, "shader program is already augmented"),
            Self::ShaderCompilationFailed(msg) => write!(f, "shader compilation failed: {msg}"),
            Self::InvalidHandle(msg) => write!(f, "invalid handle: {msg}"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
        }
    }
}

impl std::error::Error for GraphicsError {}
