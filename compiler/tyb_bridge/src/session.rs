//! One compilation run over a model and an artifact source.

use rustc_hash::FxHashSet;
use tyb_codec::metadata::describe;
use tyb_diagnostic::{Diagnostic, DiagnosticQueue};
use tyb_erase::{EraseError, ErasureContext, TargetType, TypeEraser};
use tyb_ir::{DeclFlags, DeclId, DeclKind, Model, Origin, Type};
use tyb_loader::{ArtifactSource, DeclarationKind, DeclarationLoader, LoadError};
use tyb_synth::{ClassDef, Synthesizer};

use crate::BridgeConfig;

/// Result of compiling one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitOutput {
    /// Definitions of every declaration that compiled, in unit order.
    pub classes: Vec<ClassDef>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn class(&self, qualified: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.qualified_name() == qualified)
    }
}

/// Model, loader and configuration of one run.
///
/// The analyzer fills the model through [`Session::model_mut`]; binary
/// declarations are pulled in on demand from the artifact source.
pub struct Session<'s> {
    model: Model,
    loader: DeclarationLoader<'s>,
    config: BridgeConfig,
}

impl<'s> Session<'s> {
    pub fn new(source: &'s dyn ArtifactSource) -> Self {
        Self::with_config(source, BridgeConfig::default())
    }

    pub fn with_config(source: &'s dyn ArtifactSource, config: BridgeConfig) -> Self {
        Session {
            model: Model::new(),
            loader: DeclarationLoader::with_config(source, config.loader.clone()),
            config,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Load and complete the class or interface `qualified`.
    pub fn load_type(&mut self, qualified: &str) -> Result<DeclId, LoadError> {
        let id = self.loader.load(&mut self.model, qualified, DeclarationKind::Type)?;
        self.loader.ensure_complete(&mut self.model, id)?;
        Ok(id)
    }

    /// Load and complete the top-level value or function `qualified`.
    pub fn load_value(&mut self, qualified: &str) -> Result<DeclId, LoadError> {
        let id = self.loader.load(&mut self.model, qualified, DeclarationKind::Value)?;
        self.loader.ensure_complete(&mut self.model, id)?;
        Ok(id)
    }

    /// Members of `id`, completing it first.
    pub fn members(&mut self, id: DeclId) -> Result<Vec<DeclId>, LoadError> {
        self.loader.members(&mut self.model, id)
    }

    /// Diagnostics the loader reported outside of a unit.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.loader.take_diagnostics()
    }

    pub fn erase(&self, ty: &Type, context: ErasureContext) -> Result<Option<TargetType>, EraseError> {
        TypeEraser::new(&self.model).erase(ty, context, false)
    }

    /// Metadata sidecar to persist alongside `decl`.
    pub fn metadata(&self, decl: DeclId) -> String {
        describe(&self.model, decl).to_sidecar()
    }

    /// Synthesize the definitions of `decls`.
    ///
    /// A declaration that fails contributes a diagnostic attributed to it
    /// and nothing else; its siblings are still compiled. Processing stops
    /// once the error limit is reached.
    #[tracing::instrument(level = "debug", skip_all, fields(declarations = decls.len()))]
    pub fn compile_unit(&mut self, decls: &[DeclId]) -> UnitOutput {
        let mut queue = DiagnosticQueue::with_config(self.config.diagnostics.clone());
        let mut classes = Vec::new();

        for &decl in decls {
            let subject = self.model.qualified_name(decl);
            match self.compile_declaration(decl) {
                Ok(mut defs) => {
                    tracing::trace!(subject = %subject, classes = defs.len(), "compiled");
                    classes.append(&mut defs);
                }
                Err(diag) => {
                    tracing::debug!(subject = %subject, code = ?diag.code, "declaration failed");
                    if !queue.push(diag.or_subject(subject)) && queue.limit_reached() {
                        break;
                    }
                }
            }
            queue.extend(self.loader.take_diagnostics());
        }

        UnitOutput {
            classes,
            diagnostics: queue.flush(),
        }
    }

    fn compile_declaration(&mut self, decl: DeclId) -> Result<Vec<ClassDef>, Diagnostic> {
        self.complete_supertypes(decl).map_err(|e| e.to_diagnostic())?;

        let synth = Synthesizer::new(&self.model);
        let d = self.model.decl(decl);
        let toplevel = d.flags.contains(DeclFlags::TOPLEVEL);
        let defs = match &d.kind {
            DeclKind::Nominal(n) if n.is_interface() => {
                let mut defs = vec![synth.class(decl)];
                if self.has_concrete_members(decl) {
                    defs.push(synth.companion(decl));
                }
                defs.into_iter().collect()
            }
            DeclKind::Nominal(_) => synth.class(decl).map(|c| vec![c]),
            // The singleton class carries the object's value.
            DeclKind::Value(_) if toplevel && self.is_object_value(decl) => Ok(Vec::new()),
            DeclKind::Value(_) if toplevel => synth.value_holder(decl).map(|c| vec![c]),
            DeclKind::Function(_) if toplevel => synth.function_holder(decl).map(|c| vec![c]),
            _ => Ok(Vec::new()),
        };
        defs.map_err(|e| e.to_diagnostic())
    }

    /// Complete every binary declaration among the transitive supertypes of
    /// `decl`, so that inherited members are visible to the synthesizer.
    fn complete_supertypes(&mut self, decl: DeclId) -> Result<(), LoadError> {
        let mut pending = self.model.supertype_decls(decl);
        let mut seen = FxHashSet::default();
        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            if self.model.decl(id).origin == Origin::Binary {
                self.loader.ensure_complete(&mut self.model, id)?;
            }
            pending.extend(self.model.supertype_decls(id));
        }
        Ok(())
    }

    fn has_concrete_members(&self, iface: DeclId) -> bool {
        self.model.decl(iface).members.iter().any(|&m| {
            let member = self.model.decl(m);
            !member.flags.contains(DeclFlags::FORMAL)
                && matches!(member.kind, DeclKind::Value(_) | DeclKind::Function(_))
        })
    }

    fn is_object_value(&self, decl: DeclId) -> bool {
        self.model
            .decl(decl)
            .as_value()
            .and_then(|v| v.ty.as_ref())
            .and_then(Type::nominal_decl)
            .and_then(|c| self.model.decl(c).as_nominal())
            .is_some_and(|n| n.object_type)
    }
}
