//! Plain-data view of compiled artifacts.
//!
//! Reading and writing the binary container is someone else's job; the
//! loader only needs class names, flags, erased signatures and the metadata
//! sidecars attached to classes, methods and parameters.

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use tyb_codec::DeclMetadata;

/// A type in a target signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JvmType {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Array(Box<JvmType>),
    Declared { name: String, args: Vec<JvmType> },
    TypeVar(String),
    /// `?`, `? extends bound`.
    Wildcard { bound: Option<Box<JvmType>> },
}

impl JvmType {
    pub fn class(name: impl Into<String>) -> JvmType {
        JvmType::Declared {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<JvmType>) -> JvmType {
        JvmType::Declared {
            name: name.into(),
            args,
        }
    }

    pub fn array(component: JvmType) -> JvmType {
        JvmType::Array(Box::new(component))
    }

    pub fn var(name: impl Into<String>) -> JvmType {
        JvmType::TypeVar(name.into())
    }

    /// Whether this is the named class, ignoring type arguments.
    pub fn is_class(&self, qualified: &str) -> bool {
        matches!(self, JvmType::Declared { name, .. } if name == qualified)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            JvmType::Boolean
                | JvmType::Byte
                | JvmType::Char
                | JvmType::Short
                | JvmType::Int
                | JvmType::Long
                | JvmType::Float
                | JvmType::Double
        )
    }
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ClassFlags: u8 {
        const PUBLIC = 1 << 0;
        const INTERFACE = 1 << 1;
        const ABSTRACT = 1 << 2;
        const FINAL = 1 << 3;
    }
}

bitflags! {
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodFlags: u8 {
        const PUBLIC = 1 << 0;
        const STATIC = 1 << 1;
        const ABSTRACT = 1 << 2;
        const FINAL = 1 << 3;
        const CONSTRUCTOR = 1 << 4;
        const PRIVATE = 1 << 5;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamArtifact {
    pub name: String,
    pub bounds: Vec<JvmType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamArtifact {
    pub name: String,
    pub ty: JvmType,
    pub metadata: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodArtifact {
    pub name: String,
    pub flags: MethodFlags,
    pub type_params: Vec<TypeParamArtifact>,
    pub params: Vec<ParamArtifact>,
    pub return_type: JvmType,
    pub metadata: Option<String>,
}

impl MethodArtifact {
    /// A public instance method.
    pub fn new(name: impl Into<String>, return_type: JvmType) -> Self {
        MethodArtifact {
            name: name.into(),
            flags: MethodFlags::PUBLIC,
            type_params: Vec::new(),
            params: Vec::new(),
            return_type,
            metadata: None,
        }
    }

    /// A public constructor.
    pub fn constructor() -> Self {
        let mut ctor = MethodArtifact::new("<init>", JvmType::Void);
        ctor.flags |= MethodFlags::CONSTRUCTOR;
        ctor
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, ty: JvmType) -> Self {
        self.params.push(ParamArtifact {
            name: name.into(),
            ty,
            metadata: None,
        });
        self
    }

    #[must_use]
    pub fn with_param_metadata(mut self, name: impl Into<String>, ty: JvmType, meta: &DeclMetadata) -> Self {
        self.params.push(ParamArtifact {
            name: name.into(),
            ty,
            metadata: Some(meta.to_sidecar()),
        });
        self
    }

    #[must_use]
    pub fn with_type_param(mut self, name: impl Into<String>, bounds: Vec<JvmType>) -> Self {
        self.type_params.push(TypeParamArtifact {
            name: name.into(),
            bounds,
        });
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, meta: &DeclMetadata) -> Self {
        self.metadata = Some(meta.to_sidecar());
        self
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.flags.contains(MethodFlags::PUBLIC)
    }

    #[inline]
    pub fn is_constructor(&self) -> bool {
        self.flags.contains(MethodFlags::CONSTRUCTOR)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassArtifact {
    /// Dotted package name, empty for the default package.
    pub package: String,
    /// Simple name. Nested classes use their own simple name.
    pub name: String,
    pub flags: ClassFlags,
    pub type_params: Vec<TypeParamArtifact>,
    pub superclass: Option<JvmType>,
    pub interfaces: Vec<JvmType>,
    pub methods: Vec<MethodArtifact>,
    pub nested: Vec<ClassArtifact>,
    pub metadata: Option<String>,
}

impl ClassArtifact {
    /// A public class extending `java.lang.Object`.
    pub fn class(package: impl Into<String>, name: impl Into<String>) -> Self {
        ClassArtifact {
            package: package.into(),
            name: name.into(),
            flags: ClassFlags::PUBLIC,
            type_params: Vec::new(),
            superclass: Some(JvmType::class(tyb_ir::lang::platform::OBJECT)),
            interfaces: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
            metadata: None,
        }
    }

    /// A public interface.
    pub fn interface(package: impl Into<String>, name: impl Into<String>) -> Self {
        let mut iface = ClassArtifact::class(package, name);
        iface.flags |= ClassFlags::INTERFACE | ClassFlags::ABSTRACT;
        iface.superclass = None;
        iface
    }

    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn extends(mut self, superclass: JvmType) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn implements(mut self, iface: JvmType) -> Self {
        self.interfaces.push(iface);
        self
    }

    #[must_use]
    pub fn with_type_param(mut self, name: impl Into<String>, bounds: Vec<JvmType>) -> Self {
        self.type_params.push(TypeParamArtifact {
            name: name.into(),
            bounds,
        });
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodArtifact) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a nested class; it inherits this class's package.
    #[must_use]
    pub fn with_nested(mut self, mut nested: ClassArtifact) -> Self {
        nested.package.clone_from(&self.package);
        self.nested.push(nested);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, meta: &DeclMetadata) -> Self {
        self.metadata = Some(meta.to_sidecar());
        self
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.flags.contains(ClassFlags::PUBLIC)
    }

    pub fn nested_class(&self, name: &str) -> Option<&ClassArtifact> {
        self.nested.iter().find(|n| n.name == name)
    }

    pub fn find_method(&self, name: &str, predicate: impl Fn(&MethodArtifact) -> bool) -> Option<&MethodArtifact> {
        self.methods.iter().find(|m| m.name == name && predicate(m))
    }
}

/// Where the loader finds compiled classes.
pub trait ArtifactSource {
    /// A top-level class by qualified name.
    fn find_class(&self, qualified: &str) -> Option<&ClassArtifact>;
}

/// In-memory artifact source.
#[derive(Default)]
pub struct ArtifactSet {
    classes: FxHashMap<String, ClassArtifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level class, replacing any class of the same name.
    pub fn insert(&mut self, class: ClassArtifact) {
        self.classes.insert(class.qualified_name(), class);
    }

    #[must_use]
    pub fn with(mut self, class: ClassArtifact) -> Self {
        self.insert(class);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ArtifactSource for ArtifactSet {
    fn find_class(&self, qualified: &str) -> Option<&ClassArtifact> {
        self.classes.get(qualified)
    }
}

impl FromIterator<ClassArtifact> for ArtifactSet {
    fn from_iter<I: IntoIterator<Item = ClassArtifact>>(iter: I) -> Self {
        let mut set = ArtifactSet::new();
        for class in iter {
            set.insert(class);
        }
        set
    }
}
