//! Human-readable rendering of structural types, for diagnostics.

use crate::{Model, Type};

impl Model {
    /// Render a type with simple names and source sugar: `T?` for optionals
    /// and `T[]` for sequences.
    pub fn format_type(&self, ty: &Type) -> String {
        let mut out = String::new();
        self.write_type(ty, &mut out);
        out
    }

    fn write_type(&self, ty: &Type, out: &mut String) {
        if let Some(inner) = ty.optional_inner() {
            self.write_operand(inner, out);
            out.push('?');
            return;
        }
        if let Some(element) = self.sequence_element(ty) {
            self.write_operand(element, out);
            out.push_str("[]");
            return;
        }
        match ty {
            Type::Bottom => out.push_str("Bottom"),
            Type::Param(p) => out.push_str(self.simple_name(*p)),
            Type::Nominal { decl, args } => {
                out.push_str(self.simple_name(*decl));
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(arg, out);
                    }
                    out.push('>');
                }
            }
            Type::Union(cases) => self.write_joined(cases, '|', out),
            Type::Intersection(parts) => self.write_joined(parts, '&', out),
        }
    }

    fn write_joined(&self, types: &[Type], sep: char, out: &mut String) {
        for (i, t) in types.iter().enumerate() {
            if i > 0 {
                out.push(sep);
            }
            self.write_operand(t, out);
        }
    }

    /// Operands of `|`, `&`, `?` and `[]` get parentheses when compound.
    fn write_operand(&self, ty: &Type, out: &mut String) {
        let compound = matches!(ty, Type::Union(_) | Type::Intersection(_))
            && !ty.is_optional()
            && self.sequence_element(ty).is_none();
        if compound {
            out.push('(');
            self.write_type(ty, out);
            out.push(')');
        } else {
            self.write_type(ty, out);
        }
    }
}

#[cfg(test)]
mod tests;
