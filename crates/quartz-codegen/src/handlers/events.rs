//! Handler for event emission. Analysis already checked that the name is
//! a declared event; the call turns into the generated `emit_<Event>`
//! helper.

use crate::context::GenContext;
use crate::engine::{is_builtin_target, Emitted, Engine, Handler};
use quartz_ir::IrExpression;

pub struct EventEmitHandler;

impl Handler for EventEmitHandler {
    fn name(&self) -> &'static str {
        "event-emit"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: None, .. } if !is_builtin_target(target)
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { target, args, .. } = expr else {
            unreachable!()
        };
        let (mut setup, values) = engine.emit_args(args, ctx);
        setup.push(format!("emit_{}({});", target, values.join(", ")));
        Emitted::unit(setup)
    }
}
