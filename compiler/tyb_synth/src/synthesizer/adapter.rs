use tyb_erase::BoxingAdapter;
use tyb_ir::Wrapper;

use crate::Expr;

/// Static factory on a boxed class taking the native value.
pub const BOX_METHOD: &str = "instance";

/// Accessor returning the native value of a boxed instance.
pub fn unbox_method(wrapper: Wrapper) -> &'static str {
    match wrapper {
        Wrapper::String => "toString",
        Wrapper::Boolean => "booleanValue",
        Wrapper::Integer => "longValue",
        Wrapper::Float => "doubleValue",
        Wrapper::Character => "charValue",
    }
}

/// Wrap `value` in the conversion `adapter` stands for.
pub fn adapt(adapter: BoxingAdapter, wrapper: Wrapper, value: Expr) -> Expr {
    match adapter {
        BoxingAdapter::Box => Expr::StaticCall {
            class: wrapper.boxed_name(),
            method: BOX_METHOD.to_owned(),
            args: vec![value],
        },
        BoxingAdapter::Unbox => Expr::call(value, unbox_method(wrapper), Vec::new()),
    }
}
