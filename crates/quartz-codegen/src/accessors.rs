//! Generated accessor layer: typed storage load/store pairs per field,
//! packed struct types with offset-based getters and setters, mapping
//! accessors keyed by slot, and the event/error helpers. Everything the
//! handler chains call by name is defined here, so the method bodies
//! stay free of slot numbers and byte offsets.

use crate::abi::abi_signature;
use crate::context::{c_type, GenContext};
use crate::writer::CodeWriter;
use quartz_ir::{ErrorDef, EventDef, StorageField, StructDef, Type};

/// Wrap a value expression into its storage word form.
fn to_word(expr: &str, ty: &Type) -> String {
    match ty {
        Type::U256 => expr.to_string(),
        Type::I256 => format!("i256_to_word({})", expr),
        Type::Address => format!("addr_to_word({})", expr),
        Type::Bool => format!("bool_to_word({})", expr),
        Type::Bytes => format!("bytes_to_word({})", expr),
        _ => format!("ptr_to_word({})", expr),
    }
}

/// Unwrap a storage word back into a typed value expression.
fn from_word(expr: &str, ty: &Type) -> String {
    match ty {
        Type::U256 => expr.to_string(),
        Type::I256 => format!("word_to_i256({})", expr),
        Type::Address => format!("word_to_addr({})", expr),
        Type::Bool => format!("word_to_bool({})", expr),
        Type::Bytes => format!("word_to_bytes({})", expr),
        _ => expr.to_string(),
    }
}

fn field_accessor_fns(ty: &Type) -> (&'static str, &'static str) {
    match ty {
        Type::I256 => ("read_iword", "write_iword"),
        Type::Address => ("read_addr", "write_addr"),
        Type::Bool => ("read_bool", "write_bool"),
        Type::Bytes => ("read_bytes", "write_bytes"),
        Type::Struct(_) => ("read_ptr", "write_ptr"),
        _ => ("read_word", "write_word"),
    }
}

pub fn emit_prelude(ctx: &GenContext, out: &mut CodeWriter) {
    out.push(format!(
        "/* Contract {} compiled from {}. Do not edit. */",
        ctx.contract.name, ctx.file
    ));
    out.push("#include \"quartz_runtime.h\"");
    out.blank();
}

pub fn emit_struct(def: &StructDef, out: &mut CodeWriter) {
    let size = def.byte_size();
    out.push(format!("/* {}: {} bytes packed */", def.name, size));
    out.push(format!(
        "typedef struct {{ byte_t data[{}]; }} {};",
        size, def.name
    ));
    out.blank();

    for field in &def.fields {
        let (read, write) = field_accessor_fns(&field.ty);
        let cty = c_type(&field.ty);
        let read_expr = match &field.ty {
            Type::Struct(inner) => {
                format!("({}*){}(p->data + {})", inner, read, field.offset)
            }
            _ => format!("{}(p->data + {})", read, field.offset),
        };
        out.open(format!(
            "static inline {} {}_get_{}({}* p) {{",
            cty, def.name, field.name, def.name
        ));
        out.push(format!("return {};", read_expr));
        out.close("}");
        out.blank();

        out.open(format!(
            "static inline void {}_set_{}({}* p, {} v) {{",
            def.name, field.name, def.name, cty
        ));
        out.push(format!("{}(p->data + {}, v);", write, field.offset));
        out.close("}");
        out.blank();
    }

    let params = def
        .fields
        .iter()
        .map(|f| format!("{} {}", c_type(&f.ty), f.name))
        .collect::<Vec<_>>()
        .join(", ");
    out.open(format!(
        "static inline {}* {}_new({}) {{",
        def.name, def.name, params
    ));
    out.push(format!(
        "{}* p = ({}*)heap_alloc({});",
        def.name, def.name, size
    ));
    for field in &def.fields {
        out.push(format!("{}_set_{}(p, {});", def.name, field.name, field.name));
    }
    out.push("return p;");
    out.close("}");
    out.blank();
}

pub fn emit_storage_accessors(field: &StorageField, ctx: &GenContext, out: &mut CodeWriter) {
    let slot = field.slot.expect("layout ran before codegen");
    match &field.ty {
        Type::Mapping(key_ty, value_ty) => {
            emit_mapping_accessors(field, slot, key_ty, value_ty, ctx, out)
        }
        Type::Struct(name) => {
            let size = ctx
                .contract
                .struct_def(name)
                .map(|d| d.byte_size())
                .unwrap_or(0);
            out.open(format!(
                "static inline {}* load_{}(void) {{",
                name, field.name
            ));
            out.push(format!(
                "return ({}*)storage_load_ptr({}, {});",
                name, slot, size
            ));
            out.close("}");
            out.blank();
            out.open(format!(
                "static inline void store_{}({}* v) {{",
                field.name, name
            ));
            out.push(format!(
                "storage_store_ptr({}, (const byte_t*)v, {});",
                slot, size
            ));
            out.close("}");
            out.blank();
        }
        ty => {
            let cty = c_type(ty);
            out.open(format!(
                "static inline {} load_{}(void) {{",
                cty, field.name
            ));
            out.push(format!(
                "return {};",
                from_word(&format!("storage_load_word({})", slot), ty)
            ));
            out.close("}");
            out.blank();
            out.open(format!(
                "static inline void store_{}({} v) {{",
                field.name, cty
            ));
            out.push(format!("storage_store_word({}, {});", slot, to_word("v", ty)));
            out.close("}");
            out.blank();
        }
    }
}

fn emit_mapping_accessors(
    field: &StorageField,
    slot: u32,
    key_ty: &Type,
    value_ty: &Type,
    ctx: &GenContext,
    out: &mut CodeWriter,
) {
    let key_cty = c_type(key_ty);
    let key_word = to_word("key", key_ty);

    match value_ty {
        Type::Struct(name) => {
            let size = ctx
                .contract
                .struct_def(name)
                .map(|d| d.byte_size())
                .unwrap_or(0);
            out.open(format!(
                "static inline {}* map_get_{}({} key) {{",
                name, field.name, key_cty
            ));
            out.push(format!(
                "return ({}*)storage_map_load_ptr({}, {}, {});",
                name, slot, key_word, size
            ));
            out.close("}");
            out.blank();
            out.open(format!(
                "static inline void map_set_{}({} key, {}* v) {{",
                field.name, key_cty, name
            ));
            out.push(format!(
                "storage_map_store_ptr({}, {}, (const byte_t*)v, {});",
                slot, key_word, size
            ));
            out.close("}");
            out.blank();
        }
        ty => {
            let cty = c_type(ty);
            out.open(format!(
                "static inline {} map_get_{}({} key) {{",
                cty, field.name, key_cty
            ));
            out.push(format!(
                "return {};",
                from_word(&format!("storage_map_load_word({}, {})", slot, key_word), ty)
            ));
            out.close("}");
            out.blank();
            out.open(format!(
                "static inline void map_set_{}({} key, {} v) {{",
                field.name, key_cty, cty
            ));
            out.push(format!(
                "storage_map_store_word({}, {}, {});",
                slot,
                key_word,
                to_word("v", ty)
            ));
            out.close("}");
            out.blank();
        }
    }
}

pub fn emit_event_helper(event: &EventDef, out: &mut CodeWriter) {
    let params = event
        .params
        .iter()
        .map(|p| format!("{} {}", c_type(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ");
    let signature = abi_signature(&event.name, event.params.iter().map(|p| &p.ty));

    out.open(format!(
        "static inline void emit_{}({}) {{",
        event.name, params
    ));

    let indexed: Vec<_> = event.params.iter().filter(|p| p.indexed).collect();
    let plain: Vec<_> = event.params.iter().filter(|p| !p.indexed).collect();

    let topics = if indexed.is_empty() {
        "(const u256*)0".to_string()
    } else {
        out.push(format!("u256 topics[{}];", indexed.len()));
        for (i, p) in indexed.iter().enumerate() {
            out.push(format!("topics[{}] = {};", i, to_word(&p.name, &p.ty)));
        }
        "topics".to_string()
    };
    let data = if plain.is_empty() {
        "(const u256*)0".to_string()
    } else {
        out.push(format!("u256 data[{}];", plain.len()));
        for (i, p) in plain.iter().enumerate() {
            out.push(format!("data[{}] = {};", i, to_word(&p.name, &p.ty)));
        }
        "data".to_string()
    };
    out.push(format!(
        "runtime_log(\"{}\", {}, {}, {}, {});",
        signature,
        topics,
        indexed.len(),
        data,
        plain.len()
    ));
    out.close("}");
    out.blank();
}

pub fn emit_error_helper(error: &ErrorDef, out: &mut CodeWriter) {
    let params = error
        .params
        .iter()
        .map(|p| format!("{} {}", c_type(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ");
    let signature = abi_signature(&error.name, error.params.iter().map(|p| &p.ty));

    out.open(format!(
        "static inline void revert_{}({}) {{",
        error.name, params
    ));
    if error.params.is_empty() {
        out.push(format!(
            "runtime_revert(\"{}\", (const u256*)0, 0);",
            signature
        ));
    } else {
        out.push(format!("u256 data[{}];", error.params.len()));
        for (i, p) in error.params.iter().enumerate() {
            out.push(format!("data[{}] = {};", i, to_word(&p.name, &p.ty)));
        }
        out.push(format!(
            "runtime_revert(\"{}\", data, {});",
            signature,
            error.params.len()
        ));
    }
    out.close("}");
    out.blank();
}
