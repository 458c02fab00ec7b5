//! CLI output: error mapping and the result type handed back to the binary.

use crate::error::ApiError;

/// Rendered command output plus whether the command should exit successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    /// Output that still gets printed but ends with a non-zero exit code.
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
        }
    }
}

/// Map domain errors to a single line for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::UnknownMapId(id) => {
            format!("error: unknown map id '{}' (see 'optmap list')", id)
        }
        _ => format!("error: {}", e),
    }
}
