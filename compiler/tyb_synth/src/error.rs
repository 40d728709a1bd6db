use tyb_diagnostic::{Diagnostic, ErrorCode};
use tyb_erase::{BoxingMismatch, EraseError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SynthError {
    #[error("no argument for parameter `{param}` of `{function}`")]
    MissingNamedArgument { function: String, param: String },

    #[error("`{function}` has no parameter named `{name}`")]
    UnknownNamedArgument { function: String, name: String },

    #[error("argument `{name}` of `{function}` given more than once")]
    DuplicateNamedArgument { function: String, name: String },

    /// The declaration is not of the shape the requested definition needs.
    #[error("cannot synthesize {what} for `{subject}`")]
    WrongShape { subject: String, what: &'static str },

    #[error(transparent)]
    Erase(#[from] EraseError),

    #[error(transparent)]
    Boxing(#[from] BoxingMismatch),
}

impl SynthError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SynthError::MissingNamedArgument { .. } => ErrorCode::E3001,
            SynthError::UnknownNamedArgument { .. } => ErrorCode::E3002,
            SynthError::DuplicateNamedArgument { .. } => ErrorCode::E3003,
            SynthError::WrongShape { .. } | SynthError::Erase(_) => ErrorCode::E2001,
            SynthError::Boxing(_) => ErrorCode::E2002,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SynthError::Erase(err) => err.to_diagnostic(),
            SynthError::Boxing(err) => err.to_diagnostic(),
            SynthError::MissingNamedArgument { function, .. }
            | SynthError::UnknownNamedArgument { function, .. }
            | SynthError::DuplicateNamedArgument { function, .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_subject(function.clone()),
            SynthError::WrongShape { subject, .. } => Diagnostic::error(self.code())
                .with_message(self.to_string())
                .with_subject(subject.clone()),
        }
    }
}
