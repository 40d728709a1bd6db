//! Type string encoder.

use tyb_ir::{Model, Type};
use tyb_stack::ensure_sufficient_stack;

use crate::BOTTOM;

/// Encode a structural type.
///
/// Nominal types are written with qualified names, type parameters with
/// their simple name. Unions nested in an intersection are parenthesised;
/// nothing else needs to be.
pub fn encode(model: &Model, ty: &Type) -> String {
    let mut out = String::new();
    write_type(model, ty, &mut out);
    out
}

fn write_type(model: &Model, ty: &Type, out: &mut String) {
    ensure_sufficient_stack(|| match ty {
        Type::Bottom => out.push_str(BOTTOM),
        Type::Param(p) => out.push_str(model.simple_name(*p)),
        Type::Nominal { decl, args } => {
            out.push_str(&model.qualified_name(*decl));
            if !args.is_empty() {
                out.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_type(model, arg, out);
                }
                out.push('>');
            }
        }
        Type::Union(cases) => {
            for (i, case) in cases.iter().enumerate() {
                if i > 0 {
                    out.push('|');
                }
                write_type(model, case, out);
            }
        }
        Type::Intersection(parts) => {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.push('&');
                }
                if matches!(part, Type::Union(_)) {
                    out.push('(');
                    write_type(model, part, out);
                    out.push(')');
                } else {
                    write_type(model, part, out);
                }
            }
        }
    });
}
