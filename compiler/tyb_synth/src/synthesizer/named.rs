//! Lowering of named-argument invocations to positional calls.

use smallvec::{smallvec, SmallVec};
use tyb_erase::BoundarySite;
use tyb_ir::{naming, DeclFlags, DeclId, Type};

use super::Synthesizer;
use crate::def::{Expr, Stmt};
use crate::SynthError;

/// One argument of a named-argument invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedArg {
    pub name: String,
    /// Static type of `value`.
    pub ty: Type,
    pub value: Expr,
}

impl NamedArg {
    pub fn new(name: impl Into<String>, ty: Type, value: Expr) -> Self {
        NamedArg {
            name: name.into(),
            ty,
            value,
        }
    }
}

/// A named-argument invocation as locals plus a positional call.
///
/// Executing `locals` in order and then `call` evaluates every argument
/// exactly once, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedCall {
    pub locals: Vec<Stmt>,
    pub call: Expr,
}

impl Synthesizer<'_> {
    /// Lower a call to `function` with named arguments.
    ///
    /// Each argument is bound to a `$argN` local of the parameter's type,
    /// numbered in source order. Omitted defaulted parameters call the
    /// default-value method with the parameters before them; an omitted
    /// variadic parameter gets the empty sequence.
    ///
    /// `receiver` is used for member functions and must be cheap to
    /// evaluate more than once (`this` or a local).
    #[tracing::instrument(level = "debug", skip(self, receiver, args), fields(args = args.len()))]
    pub fn named_call(
        &self,
        function: DeclId,
        receiver: Option<Expr>,
        args: Vec<NamedArg>,
    ) -> Result<NamedCall, SynthError> {
        let decl = self.model.decl(function);
        let f = decl
            .as_function()
            .ok_or_else(|| self.wrong_shape(function, "a named-argument call"))?;
        let qualified = self.model.qualified_name(function);
        let params = f.parameter_lists.first().map_or(&[][..], |l| l.params.as_slice());
        let method = naming::quote_if_keyword(self.model.simple_name(function)).into_owned();

        let target = if decl.flags.contains(DeclFlags::TOPLEVEL) {
            CallTarget::Static(if self.package_name(function).is_empty() {
                method.clone()
            } else {
                format!("{}.{method}", self.package_name(function))
            })
        } else {
            CallTarget::Member(receiver.unwrap_or(Expr::This))
        };

        let mut slots: SmallVec<[Option<String>; 8]> = smallvec![None; params.len()];
        let mut locals = Vec::with_capacity(params.len());
        let given = args.len();

        for (index, arg) in args.into_iter().enumerate() {
            let Some(pos) = params.iter().position(|p| self.model.name(p.name) == arg.name) else {
                return Err(SynthError::UnknownNamedArgument {
                    function: qualified,
                    name: arg.name,
                });
            };
            if slots[pos].is_some() {
                return Err(SynthError::DuplicateNamedArgument {
                    function: qualified,
                    name: arg.name,
                });
            }
            let param = &params[pos];
            let local = naming::named_arg_local(index);
            let init = self.coerce(arg.value, &arg.ty, &param.ty, BoundarySite::Assignment)?;
            locals.push(Stmt::Local {
                name: local.clone(),
                ty: self.erase(&param.ty)?,
                init,
            });
            slots[pos] = Some(local);
        }

        let mut next = given;
        let mut positional = Vec::with_capacity(params.len());
        for (pos, param) in params.iter().enumerate() {
            let arg = match slots[pos].clone() {
                Some(local) => Expr::Local(local),
                None if param.defaulted => {
                    let local = naming::named_arg_local(next);
                    next += 1;
                    let preceding = slots[..pos].iter().flatten().cloned().map(Expr::Local).collect();
                    let default = naming::default_value_method(&method, self.model.name(param.name));
                    locals.push(Stmt::Local {
                        name: local.clone(),
                        ty: self.erase(&param.ty)?,
                        init: target.invoke(default, preceding),
                    });
                    slots[pos] = Some(local.clone());
                    Expr::Local(local)
                }
                None if param.sequenced => Expr::EmptySequence,
                None => {
                    return Err(SynthError::MissingNamedArgument {
                        function: qualified,
                        param: self.model.name(param.name).to_owned(),
                    })
                }
            };
            positional.push(arg);
        }

        Ok(NamedCall {
            locals,
            call: target.invoke(method, positional),
        })
    }
}

enum CallTarget {
    /// Static method on a holder class.
    Static(String),
    Member(Expr),
}

impl CallTarget {
    fn invoke(&self, method: String, args: Vec<Expr>) -> Expr {
        match self {
            CallTarget::Static(class) => Expr::StaticCall {
                class: class.clone(),
                method,
                args,
            },
            CallTarget::Member(receiver) => Expr::call(receiver.clone(), method, args),
        }
    }
}
