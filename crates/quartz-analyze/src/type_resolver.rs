use crate::context::AnalysisContext;
use quartz_ir::{DiagCode, Type};
use quartz_parser::TypeName;

/// Resolve a written type name against the fixed catalogue and the
/// declared struct set. Unknown names yield a diagnostic and a `u256`
/// placeholder so analysis can continue.
pub fn resolve_type(name: &TypeName, ctx: &mut AnalysisContext, line: usize) -> Type {
    match name {
        TypeName::Plain(text) => {
            if let Some(ty) = Type::from_surface_name(text) {
                return ty;
            }
            if ctx.structs.contains_key(text) {
                return Type::Struct(text.clone());
            }
            ctx.error(
                DiagCode::Semantic,
                format!("unknown type `{}`", text),
                line,
            );
            Type::U256
        }
        TypeName::Map(key, value) => {
            let key = resolve_type(key, ctx, line);
            let value = resolve_type(value, ctx, line);
            if !matches!(key, Type::U256 | Type::I256 | Type::Address | Type::Bytes) {
                ctx.error(
                    DiagCode::Semantic,
                    format!("`{}` cannot be used as a mapping key", key),
                    line,
                );
            }
            Type::Mapping(Box::new(key), Box::new(value))
        }
    }
}
