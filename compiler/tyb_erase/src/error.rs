use tyb_diagnostic::{Diagnostic, ErrorCode};

use crate::{BoundarySite, Boxing};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EraseError {
    #[error("no erasure rule for {construct}")]
    UnsupportedConstruct { construct: String },
}

impl EraseError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            EraseError::UnsupportedConstruct { .. } => {
                Diagnostic::error(ErrorCode::E2001).with_message(self.to_string())
            }
        }
    }
}

/// Producer and consumer disagree on boxing at a site that cannot take an
/// adapter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{produced:?} value where a {required:?} value is required at {site:?} boundary")]
pub struct BoxingMismatch {
    pub produced: Boxing,
    pub required: Boxing,
    pub site: BoundarySite,
}

impl BoxingMismatch {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(ErrorCode::E2002)
            .with_message(self.to_string())
            .with_note("boxing is only adapted at assignments, comparisons and interpolations")
    }
}
