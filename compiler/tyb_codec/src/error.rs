use tyb_diagnostic::{Diagnostic, ErrorCode};

/// Failure to decode a type string or a metadata sidecar.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("unexpected end of type string `{text}`")]
    UnexpectedEnd { text: String },

    #[error("unexpected `{found}` at offset {offset} in `{text}`")]
    UnexpectedChar {
        found: char,
        offset: usize,
        text: String,
    },

    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error("trailing input at offset {offset} in `{text}`")]
    TrailingInput { offset: usize, text: String },

    #[error("`{name}` expects {expected} type argument(s), found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("malformed metadata at offset {offset}: {reason}")]
    MalformedSidecar { offset: usize, reason: String },
}

impl CodecError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            CodecError::UnknownType { .. } => ErrorCode::E1001,
            _ => ErrorCode::E1002,
        };
        Diagnostic::error(code).with_message(self.to_string())
    }
}
