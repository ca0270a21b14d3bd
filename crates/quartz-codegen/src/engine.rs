/*! Handler dispatch for expression emission.
 *
 * Every IR expression is routed to a chain of handlers keyed by the
 * category of value it produces. The first handler whose `can_handle`
 * accepts the node emits it; an expression nothing claims falls through
 * to [`FallbackHandler`], which emits a placeholder and records a
 * warning instead of aborting the run.
 */

use crate::context::{c_type, GenContext};
use quartz_ir::{DiagCode, IrExpression, Scope, Type};
use tracing::trace;

/// What one emitted expression contributed: the statements that must run
/// first, and the value expression the parent can splice in.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    pub setup: Vec<String>,
    pub value: String,
    pub ty: Type,
}

impl Emitted {
    pub fn value(setup: Vec<String>, value: impl Into<String>, ty: Type) -> Self {
        Self {
            setup,
            value: value.into(),
            ty,
        }
    }

    /// A statement-shaped result with no usable value.
    pub fn unit(setup: Vec<String>) -> Self {
        Self {
            setup,
            value: String::new(),
            ty: Type::Void,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Uint,
    Int,
    Address,
    Bool,
    Bytes,
    Struct,
    Mapping,
    Event,
    Env,
    Unit,
}

pub trait Handler {
    fn name(&self) -> &'static str;
    fn can_handle(&self, expr: &IrExpression) -> bool;
    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted;
}

const BUILTIN_TARGETS: &[&str] = &[
    "store", "assign", "set", "new", "map_get", "map_set", "add", "sub", "mul", "div", "mod",
    "eq", "ne", "lt", "gt", "le", "ge", "and", "or", "not", "neg",
];

pub fn is_builtin_target(target: &str) -> bool {
    BUILTIN_TARGETS.contains(&target)
}

/// Route an expression to its chain by the shape of the node first and
/// the type of the produced value second.
pub fn category_of(expr: &IrExpression, ctx: &GenContext) -> Category {
    match expr {
        IrExpression::Call { target, receiver, ret, .. } => {
            if !is_builtin_target(target) && ctx.contract.event_def(target).is_some() {
                return Category::Event;
            }
            match target.as_str() {
                "map_get" | "map_set" => Category::Mapping,
                "new" | "set" => Category::Struct,
                "store" | "assign" => receiver
                    .as_deref()
                    .map(|r| category_of_type(&r.ty()))
                    .unwrap_or(Category::Unit),
                _ => category_of_type(ret),
            }
        }
        IrExpression::Member { object, ty, .. } => {
            if is_env_object(object) {
                Category::Env
            } else if matches!(object.ty(), Type::Struct(_)) {
                Category::Struct
            } else {
                category_of_type(ty)
            }
        }
        other => category_of_type(&other.ty()),
    }
}

fn is_env_object(object: &IrExpression) -> bool {
    matches!(
        object,
        IrExpression::Var { name, scope: Scope::Memory, ty: Type::Void }
            if name == "msg" || name == "block"
    )
}

pub fn category_of_type(ty: &Type) -> Category {
    match ty {
        Type::U256 => Category::Uint,
        Type::I256 => Category::Int,
        Type::Address => Category::Address,
        Type::Bool => Category::Bool,
        Type::Bytes => Category::Bytes,
        Type::Struct(_) => Category::Struct,
        Type::Mapping(_, _) => Category::Mapping,
        Type::Void | Type::Function(_) => Category::Unit,
    }
}

pub struct Engine {
    chains: Vec<(Category, Vec<Box<dyn Handler>>)>,
    fallback: FallbackHandler,
}

impl Engine {
    pub fn new(chains: Vec<(Category, Vec<Box<dyn Handler>>)>) -> Self {
        Self {
            chains,
            fallback: FallbackHandler,
        }
    }

    pub fn emit(&self, expr: &IrExpression, ctx: &mut GenContext) -> Emitted {
        let category = category_of(expr, ctx);
        if let Some((_, chain)) = self.chains.iter().find(|(c, _)| *c == category) {
            for handler in chain {
                if handler.can_handle(expr) {
                    trace!(handler = handler.name(), ?category, "emitting expression");
                    return handler.handle(expr, self, ctx);
                }
            }
        }
        self.fallback.handle(expr, self, ctx)
    }

    /// Emit the arguments of a call in order, collecting their setup.
    pub fn emit_args(
        &self,
        args: &[IrExpression],
        ctx: &mut GenContext,
    ) -> (Vec<String>, Vec<String>) {
        let mut setup = Vec::new();
        let mut values = Vec::new();
        for arg in args {
            let emitted = self.emit(arg, ctx);
            setup.extend(emitted.setup);
            values.push(emitted.value);
        }
        (setup, values)
    }
}

/// Last resort for expressions no chain claims: a zeroed placeholder
/// value plus a warning naming the shape that was skipped.
pub struct FallbackHandler;

impl Handler for FallbackHandler {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn can_handle(&self, _expr: &IrExpression) -> bool {
        true
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let shape = match expr {
            IrExpression::Call { target, .. } => format!("call `{}`", target),
            IrExpression::Member { property, .. } => format!("member `{}`", property),
            IrExpression::Var { name, .. } => format!("variable `{}`", name),
            IrExpression::Literal { .. } => "literal".to_string(),
            IrExpression::This => "`this`".to_string(),
        };
        let file = ctx.file.clone();
        ctx.warnings.warning(
            DiagCode::Unsupported,
            format!("no handler accepted {}; emitting a placeholder", shape),
            &file,
            ctx.current_line,
        );
        let temp = ctx.temps.fresh();
        let ty = expr.ty();
        let spelled = if ty == Type::Void { Type::U256 } else { ty };
        let zero = match &spelled {
            Type::Bool | Type::Struct(_) => "0".to_string(),
            Type::Address => "addr_zero()".to_string(),
            Type::Bytes => "bytes_zero()".to_string(),
            Type::I256 => "i256_from_i64(0)".to_string(),
            _ => "u256_from_u64(0)".to_string(),
        };
        Emitted::value(
            vec![format!(
                "{} {} = {}; /* unsupported */",
                c_type(&spelled),
                temp,
                zero
            )],
            temp,
            spelled,
        )
    }
}
