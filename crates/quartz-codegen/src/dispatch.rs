//! Entry points of the compiled contract: the deploy hook that runs the
//! constructor and the selector dispatcher that routes external calls.

use crate::abi::{method_signature, selector};
use crate::context::{c_type, GenContext};
use crate::functions::function_name;
use crate::writer::CodeWriter;
use quartz_ir::{IrMethod, Type};

fn calldata_read(index: usize, ty: &Type) -> String {
    let word = format!("calldata_word({})", index);
    match ty {
        Type::U256 => word,
        Type::I256 => format!("word_to_i256({})", word),
        Type::Address => format!("word_to_addr({})", word),
        Type::Bool => format!("word_to_bool({})", word),
        Type::Bytes => format!("word_to_bytes({})", word),
        Type::Struct(name) => format!("({}*)calldata_ptr({})", name, index),
        _ => word,
    }
}

fn emit_call(method: &IrMethod, ctx: &GenContext, out: &mut CodeWriter) {
    let mut args = Vec::with_capacity(method.params.len());
    for (i, param) in method.params.iter().enumerate() {
        let arg = format!("a{}", i);
        out.push(format!(
            "{} {} = {};",
            c_type(&param.ty),
            arg,
            calldata_read(i, &param.ty)
        ));
        args.push(arg);
    }
    let call = format!(
        "{}({})",
        function_name(&ctx.contract.name, method),
        args.join(", ")
    );
    match &method.return_type {
        Type::Void => out.push(format!("{};", call)),
        Type::Struct(name) => {
            let size = ctx
                .contract
                .struct_def(name)
                .map(|d| d.byte_size())
                .unwrap_or(0);
            out.push(format!("{}* r = {};", name, call));
            out.push(format!("return_ptr((const byte_t*)r, {});", size));
        }
        Type::Bool => out.push(format!("return_word(bool_to_word({}));", call)),
        Type::Address => out.push(format!("return_word(addr_to_word({}));", call)),
        Type::I256 => out.push(format!("return_word(i256_to_word({}));", call)),
        Type::Bytes => out.push(format!("return_word(bytes_to_word({}));", call)),
        _ => out.push(format!("return_word({});", call)),
    }
}

/// The deploy entry runs the constructor, if any. When parents and child
/// both declare one, the child's (merged last) wins.
pub fn emit_deploy(methods: &[&IrMethod], ctx: &GenContext, out: &mut CodeWriter) {
    out.open("void quartz_deploy(void) {");
    if let Some(ctor) = methods.iter().rev().find(|m| m.is_constructor) {
        emit_call(ctor, ctx, out);
    }
    out.close("}");
    out.blank();
}

/// One `if` arm per externally callable method, matched on the 4-byte
/// selector of its canonical signature.
pub fn emit_dispatch(methods: &[&IrMethod], ctx: &GenContext, out: &mut CodeWriter) {
    out.open("void quartz_dispatch(u32 selector) {");
    for method in methods {
        if method.is_constructor || !method.is_externally_callable() {
            continue;
        }
        let signature = method_signature(method);
        out.open(format!(
            "if (selector == 0x{:08x}) {{ /* {} */",
            selector(&signature),
            signature
        ));
        emit_call(method, ctx, out);
        out.push("return;");
        out.close("}");
    }
    out.push("runtime_revert_unknown_selector();");
    out.close("}");
}
