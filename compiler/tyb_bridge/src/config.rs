use tyb_diagnostic::DiagnosticConfig;
use tyb_loader::LoaderConfig;

/// Settings for one [`Session`](crate::Session).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    pub loader: LoaderConfig,
    /// Applied to the diagnostic queue of each unit.
    pub diagnostics: DiagnosticConfig,
}

impl BridgeConfig {
    /// Report everything, without an error limit or deduplication.
    pub fn unlimited() -> Self {
        BridgeConfig {
            loader: LoaderConfig::default(),
            diagnostics: DiagnosticConfig::unlimited(),
        }
    }
}
