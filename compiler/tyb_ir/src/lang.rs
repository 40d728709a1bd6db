//! Well-known declarations of the language module and the wrapper table.

use crate::DeclId;

/// Name of the language module and of its single package.
pub const LANG_MODULE: &str = "lang";

/// Target-platform class names the bridge refers to directly.
pub mod platform {
    /// Modules of the target platform's own packages, present in every model.
    pub const MODULES: [&str; 3] = ["java", "javax", "sun"];
    pub const OBJECT: &str = "java.lang.Object";
    pub const STRING: &str = "java.lang.String";
    pub const BOOLEAN: &str = "java.lang.Boolean";
    pub const CHARACTER: &str = "java.lang.Character";
    /// Boxed integral classes, all reconstructed as `lang.Integer`.
    pub const INTEGRAL: [&str; 4] = [
        "java.lang.Long",
        "java.lang.Integer",
        "java.lang.Short",
        "java.lang.Byte",
    ];
    /// Boxed floating-point classes, reconstructed as `lang.Float`.
    pub const FLOATING: [&str; 2] = ["java.lang.Double", "java.lang.Float"];
}

/// Ids of the declarations [`Model::new`](crate::Model::new) bootstraps.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LangDecls {
    pub module: DeclId,
    pub package: DeclId,
    /// Universal top type.
    pub void: DeclId,
    pub object: DeclId,
    pub identifiable_object: DeclId,
    pub equality: DeclId,
    pub identifiable: DeclId,
    pub nothing: DeclId,
    pub string: DeclId,
    pub boolean: DeclId,
    pub integer: DeclId,
    pub float: DeclId,
    pub character: DeclId,
    pub empty: DeclId,
    pub sequence: DeclId,
    pub iterable: DeclId,
    pub exception: DeclId,
}

impl LangDecls {
    pub(crate) const UNSET: LangDecls = LangDecls {
        module: DeclId::from_raw(0),
        package: DeclId::from_raw(0),
        void: DeclId::from_raw(0),
        object: DeclId::from_raw(0),
        identifiable_object: DeclId::from_raw(0),
        equality: DeclId::from_raw(0),
        identifiable: DeclId::from_raw(0),
        nothing: DeclId::from_raw(0),
        string: DeclId::from_raw(0),
        boolean: DeclId::from_raw(0),
        integer: DeclId::from_raw(0),
        float: DeclId::from_raw(0),
        character: DeclId::from_raw(0),
        empty: DeclId::from_raw(0),
        sequence: DeclId::from_raw(0),
        iterable: DeclId::from_raw(0),
        exception: DeclId::from_raw(0),
    };

    /// Declarations with no target counterpart of their own; values of these
    /// types are carried as the platform's root object class.
    pub fn erases_to_object(&self, decl: DeclId) -> bool {
        decl == self.void
            || decl == self.object
            || decl == self.identifiable_object
            || decl == self.equality
            || decl == self.identifiable
            || decl == self.nothing
    }

    /// The wrapper-table entry for a language declaration.
    pub fn wrapper(&self, decl: DeclId) -> Option<Wrapper> {
        Wrapper::ALL.into_iter().find(|&w| self.wrapper_decl(w) == decl)
    }

    pub fn wrapper_decl(&self, wrapper: Wrapper) -> DeclId {
        match wrapper {
            Wrapper::String => self.string,
            Wrapper::Boolean => self.boolean,
            Wrapper::Integer => self.integer,
            Wrapper::Float => self.float,
            Wrapper::Character => self.character,
        }
    }
}

/// Language types with a native target representation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Wrapper {
    String,
    Boolean,
    Integer,
    Float,
    Character,
}

impl Wrapper {
    pub const ALL: [Wrapper; 5] = [
        Wrapper::String,
        Wrapper::Boolean,
        Wrapper::Integer,
        Wrapper::Float,
        Wrapper::Character,
    ];

    /// Simple name of the language declaration.
    pub fn lang_name(self) -> &'static str {
        match self {
            Wrapper::String => "String",
            Wrapper::Boolean => "Boolean",
            Wrapper::Integer => "Integer",
            Wrapper::Float => "Float",
            Wrapper::Character => "Character",
        }
    }

    /// The native target type.
    pub fn native_name(self) -> &'static str {
        match self {
            Wrapper::String => platform::STRING,
            Wrapper::Boolean => "boolean",
            Wrapper::Integer => "long",
            Wrapper::Float => "double",
            Wrapper::Character => "char",
        }
    }

    /// Qualified name of the boxed form, the language class itself.
    pub fn boxed_name(self) -> String {
        format!("{LANG_MODULE}.{}", self.lang_name())
    }

    /// Whether the native form is a reference type that can hold null.
    pub fn native_is_reference(self) -> bool {
        matches!(self, Wrapper::String)
    }
}
