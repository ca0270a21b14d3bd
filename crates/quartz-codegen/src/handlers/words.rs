//! Handlers for word-shaped values: u256, i256, addresses and bytes.
//! One family instance per type keeps the chains separate while the
//! emission shape stays shared.

use crate::context::GenContext;
use crate::engine::{Emitted, Engine, Handler};
use num_traits::ToPrimitive;
use quartz_ir::{IrExpression, Literal, Scope, Type};

/// One word-like type family: its IR type, its spelling in the target,
/// and the prefix of the runtime helpers that operate on it.
#[derive(Debug, Clone)]
pub struct Family {
    pub ty: Type,
    pub c: &'static str,
    pub prefix: &'static str,
}

pub fn uint_family() -> Family {
    Family {
        ty: Type::U256,
        c: "u256",
        prefix: "u256",
    }
}

pub fn int_family() -> Family {
    Family {
        ty: Type::I256,
        c: "i256",
        prefix: "i256",
    }
}

pub fn address_family() -> Family {
    Family {
        ty: Type::Address,
        c: "addr_t",
        prefix: "addr",
    }
}

pub fn bytes_family() -> Family {
    Family {
        ty: Type::Bytes,
        c: "bytes_t",
        prefix: "bytes",
    }
}

pub struct NumberLiteralHandler(pub Family);

impl Handler for NumberLiteralHandler {
    fn name(&self) -> &'static str {
        "number-literal"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Literal { value: Literal::Number(_), ty } if *ty == self.0.ty
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Literal {
            value: Literal::Number(n),
            ..
        } = expr
        else {
            unreachable!()
        };
        let temp = ctx.temps.fresh();
        let init = match n.to_u64() {
            Some(small) => format!("{}_from_u64({})", self.0.prefix, small),
            None => format!("{}_from_hex(\"0x{:x}\")", self.0.prefix, n),
        };
        Emitted::value(
            vec![format!("{} {} = {};", self.0.c, temp, init)],
            temp,
            self.0.ty.clone(),
        )
    }
}

pub struct StorageLoadHandler(pub Family);

impl Handler for StorageLoadHandler {
    fn name(&self) -> &'static str {
        "storage-load"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Var { scope: Scope::Storage, ty, .. } if *ty == self.0.ty
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Var { name, .. } = expr else {
            unreachable!()
        };
        let temp = ctx.temps.fresh();
        Emitted::value(
            vec![format!("{} {} = load_{}();", self.0.c, temp, name)],
            temp,
            self.0.ty.clone(),
        )
    }
}

/// Reading a local always copies into a fresh temp, so later writes to
/// either name cannot alias each other.
pub struct LocalReadHandler(pub Family);

impl Handler for LocalReadHandler {
    fn name(&self) -> &'static str {
        "local-read"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Var { scope: Scope::Memory, ty, .. } if *ty == self.0.ty
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Var { name, .. } = expr else {
            unreachable!()
        };
        let temp = ctx.temps.fresh();
        Emitted::value(
            vec![format!(
                "{} {} = {}_copy({});",
                self.0.c, temp, self.0.prefix, name
            )],
            temp,
            self.0.ty.clone(),
        )
    }
}

pub struct StoreHandler(pub Family);

impl Handler for StoreHandler {
    fn name(&self) -> &'static str {
        "storage-store"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(r), .. }
                if target == "store"
                    && matches!(&**r, IrExpression::Var { scope: Scope::Storage, ty, .. } if *ty == self.0.ty)
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

pub struct AssignHandler(pub Family);

impl Handler for AssignHandler {
    fn name(&self) -> &'static str {
        "local-assign"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(r), .. }
                if target == "assign"
                    && matches!(&**r, IrExpression::Var { scope: Scope::Memory, ty, .. } if *ty == self.0.ty)
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

const ARITH_TARGETS: &[&str] = &["add", "sub", "mul", "div", "mod"];

pub struct ArithHandler(pub Family);

impl Handler for ArithHandler {
    fn name(&self) -> &'static str {
        "arith"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(_), ret, .. }
                if ARITH_TARGETS.contains(&target.as_str()) && *ret == self.0.ty
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
        setup.push(format!(
            "{} {} = {}_{}({}, {});",
            self.0.c, temp, self.0.prefix, target, left.value, right.value
        ));
        Emitted::value(setup, temp, self.0.ty.clone())
    }
}

pub struct NegHandler(pub Family);

impl Handler for NegHandler {
    fn name(&self) -> &'static str {
        "neg"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(_), ret, .. }
                if target == "neg" && *ret == self.0.ty
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { receiver, .. } = expr else {
            unreachable!()
        };
        let operand = engine.emit(receiver.as_deref().unwrap(), ctx);
        let mut setup = operand.setup;
        let temp = ctx.temps.fresh();
        setup.push(format!(
            "{} {} = {}_neg({});",
            self.0.c, temp, self.0.prefix, operand.value
        ));
        Emitted::value(setup, temp, self.0.ty.clone())
    }
}

pub struct BytesLiteralHandler;

impl Handler for BytesLiteralHandler {
    fn name(&self) -> &'static str {
        "bytes-literal"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Literal {
                value: Literal::Str(_),
                ..
            }
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Literal {
            value: Literal::Str(text),
            ..
        } = expr
        else {
            unreachable!()
        };
        let temp = ctx.temps.fresh();
        Emitted::value(
            vec![format!(
                "bytes_t {} = bytes_from_literal(\"{}\");",
                temp,
                text.escape_default()
            )],
            temp,
            Type::Bytes,
        )
    }
}
