//! Handlers for boolean values. Bools are plain machine values in the
//! target, so locals read without the copy helper that word types need;
//! storage round-trips through `word_to_bool` inside the accessors.

use crate::context::{runtime_prefix, GenContext};
use crate::engine::{Emitted, Engine, Handler};
use quartz_ir::{IrExpression, Literal, Scope, Type};

pub struct BoolLiteralHandler;

impl Handler for BoolLiteralHandler {
    fn name(&self) -> &'static str {
        "bool-literal"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Literal {
                value: Literal::Bool(_),
                ..
            }
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, _ctx: &mut GenContext) -> Emitted {
        let IrExpression::Literal {
            value: Literal::Bool(b),
            ..
        } = expr
        else {
            unreachable!()
        };
        Emitted::value(Vec::new(), if *b { "1" } else { "0" }, Type::Bool)
    }
}

pub struct BoolStorageLoadHandler;

impl Handler for BoolStorageLoadHandler {
    fn name(&self) -> &'static str {
        "bool-storage-load"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Var {
                scope: Scope::Storage,
                ty: Type::Bool,
                ..
            }
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Var { name, .. } = expr else {
            unreachable!()
        };
        let temp = ctx.temps.fresh();
        Emitted::value(
            vec![format!("bool_t {} = load_{}();", temp, name)],
            temp,
            Type::Bool,
        )
    }
}

pub struct BoolLocalReadHandler;

impl Handler for BoolLocalReadHandler {
    fn name(&self) -> &'static str {
        "bool-local-read"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Var {
                scope: Scope::Memory,
                ty: Type::Bool,
                ..
            }
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, _ctx: &mut GenContext) -> Emitted {
        let IrExpression::Var { name, .. } = expr else {
            unreachable!()
        };
        Emitted::value(Vec::new(), name.clone(), Type::Bool)
    }
}

pub struct BoolStoreHandler;

impl Handler for BoolStoreHandler {
    fn name(&self) -> &'static str {
        "bool-storage-store"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(r), .. }
                if target == "store"
                    && matches!(&**r, IrExpression::Var { scope: Scope::Storage, ty: Type::Bool, .. })
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { receiver, args, .. } = expr else {
            unreachable!()
        };
        let Some(IrExpression::Var { name, .. }) = receiver.as_deref() else {
            unreachable!()
        };
        let value = engine.emit(&args[0], ctx);
        let mut setup = value.setup;
        setup.push(format!("store_{}({});", name, value.value));
        Emitted::unit(setup)
    }
}

pub struct BoolAssignHandler;

impl Handler for BoolAssignHandler {
    fn name(&self) -> &'static str {
        "bool-local-assign"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(r), .. }
                if target == "assign"
                    && matches!(&**r, IrExpression::Var { scope: Scope::Memory, ty: Type::Bool, .. })
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { receiver, args, .. } = expr else {
            unreachable!()
        };
        let Some(IrExpression::Var { name, .. }) = receiver.as_deref() else {
            unreachable!()
        };
        let value = engine.emit(&args[0], ctx);
        let mut setup = value.setup;
        setup.push(format!("{} = {};", name, value.value));
        Emitted::unit(setup)
    }
}

const COMPARE_TARGETS: &[&str] = &["eq", "ne", "lt", "gt", "le", "ge"];

/// Comparisons dispatch on the operand type: `u256_lt`, `i256_ge`,
/// `addr_eq` and so on. Comparing two bools stays a plain C comparison.
pub struct CompareHandler;

impl Handler for CompareHandler {
    fn name(&self) -> &'static str {
        "compare"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(_), .. }
                if COMPARE_TARGETS.contains(&target.as_str())
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call {
            target,
            receiver,
            args,
            ..
        } = expr
        else {
            unreachable!()
        };
        let operand_ty = receiver.as_deref().unwrap().ty();
        let left = engine.emit(receiver.as_deref().unwrap(), ctx);
        let right = engine.emit(&args[0], ctx);
        let mut setup = left.setup;
        setup.extend(right.setup);
        let temp = ctx.temps.fresh();
        let line = if operand_ty == Type::Bool {
            let op = if target == "eq" { "==" } else { "!=" };
            format!("bool_t {} = ({} {} {});", temp, left.value, op, right.value)
        } else {
            format!(
                "bool_t {} = {}_{}({}, {});",
                temp,
                runtime_prefix(&operand_ty),
                target,
                left.value,
                right.value
            )
        };
        setup.push(line);
        Emitted::value(setup, temp, Type::Bool)
    }
}

/// `&&` and `||` evaluate both sides up front; the chain has already
/// flattened any setup they need, so short-circuiting would skip
/// statements that later reads depend on.
pub struct LogicHandler;

impl Handler for LogicHandler {
    fn name(&self) -> &'static str {
        "logic"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(_), .. }
                if target == "and" || target == "or"
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call {
            target,
            receiver,
            args,
            ..
        } = expr
        else {
            unreachable!()
        };
        let left = engine.emit(receiver.as_deref().unwrap(), ctx);
        let right = engine.emit(&args[0], ctx);
        let mut setup = left.setup;
        setup.extend(right.setup);
        let temp = ctx.temps.fresh();
        let op = if target == "and" { "&&" } else { "||" };
        setup.push(format!(
            "bool_t {} = ({} {} {});",
            temp, left.value, op, right.value
        ));
        Emitted::value(setup, temp, Type::Bool)
    }
}

pub struct NotHandler;

impl Handler for NotHandler {
    fn name(&self) -> &'static str {
        "not"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(_), .. } if target == "not"
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { receiver, .. } = expr else {
            unreachable!()
        };
        let operand = engine.emit(receiver.as_deref().unwrap(), ctx);
        let mut setup = operand.setup;
        let temp = ctx.temps.fresh();
        setup.push(format!("bool_t {} = !({});", temp, operand.value));
        Emitted::value(setup, temp, Type::Bool)
    }
}
