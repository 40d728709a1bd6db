use tyb_codec::CodecError;
use tyb_diagnostic::{Diagnostic, ErrorCode};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("cannot resolve declaration `{name}`")]
    Unresolved { name: String },

    #[error("malformed metadata on `{subject}`: {source}")]
    Metadata {
        subject: String,
        #[source]
        source: CodecError,
    },

    #[error("cyclic supertype chain through `{name}`")]
    CyclicSupertype { name: String },

    #[error("`{holder}` has no accessor `{accessor}`")]
    MissingAccessor { holder: String, accessor: String },

    #[error("unsupported signature type `{ty}` in `{subject}`")]
    UnsupportedSignature { subject: String, ty: String },
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::Unresolved { .. }
            | LoadError::Metadata {
                source: CodecError::UnknownType { .. },
                ..
            } => ErrorCode::E1001,
            LoadError::Metadata { .. } | LoadError::UnsupportedSignature { .. } => ErrorCode::E1002,
            LoadError::CyclicSupertype { .. } => ErrorCode::E1003,
            LoadError::MissingAccessor { .. } => ErrorCode::E1004,
        }
    }

    /// Declaration the failure is attributed to, when the error knows it.
    pub fn subject(&self) -> Option<&str> {
        match self {
            LoadError::Unresolved { .. } => None,
            LoadError::Metadata { subject, .. } | LoadError::UnsupportedSignature { subject, .. } => {
                Some(subject)
            }
            LoadError::CyclicSupertype { name } => Some(name),
            LoadError::MissingAccessor { holder, .. } => Some(holder),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self.subject() {
            Some(subject) => diag.with_subject(subject),
            None => diag,
        }
    }
}
