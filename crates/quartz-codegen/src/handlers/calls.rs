//! Handler for calls into the contract's own methods. Internal calls
//! become plain function calls on the flattened contract, so inherited
//! methods resolve exactly like the contract's own.

use crate::context::{c_type, GenContext};
use crate::engine::{is_builtin_target, Emitted, Engine, Handler};
use quartz_ir::{IrExpression, Type};

pub struct MethodCallHandler;

impl Handler for MethodCallHandler {
    fn name(&self) -> &'static str {
        "method-call"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: None, .. } if !is_builtin_target(target)
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { target, args, ret, .. } = expr else {
            unreachable!()
        };
        let (mut setup, values) = engine.emit_args(args, ctx);
        let call = format!("{}_{}({})", ctx.contract.name, target, values.join(", "));
        if *ret == Type::Void {
            setup.push(format!("{};", call));
            return Emitted::unit(setup);
        }
        let temp = ctx.temps.fresh();
        setup.push(format!("{} {} = {};", c_type(ret), temp, call));
        Emitted::value(setup, temp, ret.clone())
    }
}
