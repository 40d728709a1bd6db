//! Target-side naming conventions.
//!
//! The synthesizer produces names with these functions and the loader parses
//! them back, so both directions go through this one module.

use std::borrow::Cow;

/// Reserved words of the target platform. Source identifiers that collide
/// with one are emitted with a `$` prefix.
const TARGET_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

/// Static field of a value holder or singleton.
pub const HOLDER_VALUE_FIELD: &str = "value";

/// Field of a companion that points back at the instance it serves.
pub const COMPANION_THIS: &str = "$this";

/// Accessor mapped to the `hash` attribute.
pub const HASH_ACCESSOR: &str = "hashCode";

/// Accessor mapped to the `string` attribute.
pub const STRING_ACCESSOR: &str = "toString";

pub const EQUALS_METHOD: &str = "equals";

pub fn is_target_keyword(name: &str) -> bool {
    TARGET_KEYWORDS.contains(&name)
}

/// `name`, or `$name` when it collides with a target keyword.
pub fn quote_if_keyword(name: &str) -> Cow<'_, str> {
    if is_target_keyword(name) {
        Cow::Owned(format!("${name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Inverse of [`quote_if_keyword`].
pub fn unquote(name: &str) -> &str {
    match name.strip_prefix('$') {
        Some(rest) if is_target_keyword(rest) => rest,
        _ => name,
    }
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Getter for an attribute: `get` + capitalised name.
pub fn getter_name(attribute: &str) -> String {
    format!("get{}", capitalize(attribute))
}

/// Setter for an attribute: `set` + capitalised name.
pub fn setter_name(attribute: &str) -> String {
    format!("set{}", capitalize(attribute))
}

/// Attribute name from a getter (`getX`, `isX`) method name.
///
/// The prefix must be followed by an uppercase letter, so `getaway` and
/// `island` are not getters.
pub fn attribute_from_getter(method: &str) -> Option<String> {
    ["get", "is"]
        .into_iter()
        .find_map(|prefix| accessor_suffix(method, prefix))
        .map(decapitalize)
}

/// Attribute name from a setter (`setX`) method name.
pub fn attribute_from_setter(method: &str) -> Option<String> {
    accessor_suffix(method, "set").map(decapitalize)
}

fn accessor_suffix<'n>(method: &'n str, prefix: &str) -> Option<&'n str> {
    let rest = method.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(char::is_ascii_uppercase)
        .map(|_| rest)
}

/// Companion class for an interface: `Iface$impl`.
pub fn companion_name(interface: &str) -> String {
    format!("{interface}$impl")
}

/// Field through which a class reaches the companion of an interface it
/// satisfies: `$Iface$impl`.
pub fn companion_field_name(interface: &str) -> String {
    format!("${}", companion_name(interface))
}

/// Method computing the default value of `param` of `function`.
pub fn default_value_method(function: &str, param: &str) -> String {
    format!("{function}${param}")
}

/// Local holding the `index`th argument of a named-argument invocation.
pub fn named_arg_local(index: usize) -> String {
    format!("$arg{index}")
}

#[cfg(test)]
mod tests;
