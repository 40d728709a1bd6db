//! Lowering of synthetic class definitions into artifacts.
//!
//! The result is what the loader would find after the backend wrote the
//! class out: erased signatures plus the metadata sidecars. Field slots and
//! method bodies have no artifact form and are dropped.

use tyb_erase::{TargetType, TypeArg};
use tyb_ir::lang::platform;
use tyb_ir::Wrapper;
use tyb_loader::{
    ClassArtifact, ClassFlags, JvmType, MethodArtifact, MethodFlags, ParamArtifact, TypeParamArtifact,
};
use tyb_synth::{ClassDef, MethodDef, Modifiers, TypeParamDef};

/// Artifact of `class` and its nested classes.
pub fn class_to_artifact(class: &ClassDef) -> ClassArtifact {
    ClassArtifact {
        package: class.package.clone(),
        name: class.name.clone(),
        flags: class_flags(class.modifiers),
        type_params: class.type_params.iter().map(type_param).collect(),
        superclass: class.superclass.as_ref().map(jvm_type),
        interfaces: class.interfaces.iter().map(jvm_type).collect(),
        methods: class.methods.iter().map(method).collect(),
        nested: class.nested.iter().map(class_to_artifact).collect(),
        metadata: class.metadata.clone(),
    }
}

/// Signature type of a target type.
pub fn jvm_type(ty: &TargetType) -> JvmType {
    match ty {
        TargetType::Native(wrapper) => match wrapper {
            Wrapper::String => JvmType::class(platform::STRING),
            Wrapper::Boolean => JvmType::Boolean,
            Wrapper::Integer => JvmType::Long,
            Wrapper::Float => JvmType::Double,
            Wrapper::Character => JvmType::Char,
        },
        TargetType::Class { name, args } => JvmType::generic(name.clone(), args.iter().map(jvm_arg).collect()),
        TargetType::Var(name) => JvmType::var(name.clone()),
    }
}

/// Signatures only carry `? extends` bounds; a lower bound degrades to `?`.
fn jvm_arg(arg: &TypeArg) -> JvmType {
    match arg {
        TypeArg::Exact(ty) => jvm_type(ty),
        TypeArg::Extends(ty) => JvmType::Wildcard {
            bound: Some(Box::new(jvm_type(ty))),
        },
        TypeArg::Super(_) | TypeArg::Wildcard => JvmType::Wildcard { bound: None },
    }
}

fn method(def: &MethodDef) -> MethodArtifact {
    let mut flags = method_flags(def.modifiers);
    if def.is_constructor() {
        flags |= MethodFlags::CONSTRUCTOR;
    }
    MethodArtifact {
        name: def.name.clone(),
        flags,
        type_params: def.type_params.iter().map(type_param).collect(),
        params: def
            .params
            .iter()
            .map(|p| ParamArtifact {
                name: p.name.clone(),
                ty: jvm_type(&p.ty),
                metadata: p.metadata.clone(),
            })
            .collect(),
        return_type: def.return_type.as_ref().map_or(JvmType::Void, jvm_type),
        metadata: def.metadata.clone(),
    }
}

fn type_param(def: &TypeParamDef) -> TypeParamArtifact {
    TypeParamArtifact {
        name: def.name.clone(),
        bounds: def.bounds.iter().map(jvm_type).collect(),
    }
}

fn class_flags(modifiers: Modifiers) -> ClassFlags {
    let mut flags = ClassFlags::empty();
    flags.set(ClassFlags::PUBLIC, modifiers.contains(Modifiers::PUBLIC));
    flags.set(ClassFlags::INTERFACE, modifiers.contains(Modifiers::INTERFACE));
    flags.set(ClassFlags::ABSTRACT, modifiers.contains(Modifiers::ABSTRACT));
    flags.set(ClassFlags::FINAL, modifiers.contains(Modifiers::FINAL));
    flags
}

fn method_flags(modifiers: Modifiers) -> MethodFlags {
    let mut flags = MethodFlags::empty();
    flags.set(MethodFlags::PUBLIC, modifiers.contains(Modifiers::PUBLIC));
    flags.set(MethodFlags::PRIVATE, modifiers.contains(Modifiers::PRIVATE));
    flags.set(MethodFlags::STATIC, modifiers.contains(Modifiers::STATIC));
    flags.set(MethodFlags::ABSTRACT, modifiers.contains(Modifiers::ABSTRACT));
    flags.set(MethodFlags::FINAL, modifiers.contains(Modifiers::FINAL));
    flags
}
