//! Handler for transaction environment reads (`msg.sender`,
//! `block.timestamp` and friends), which map to runtime intrinsics.

use crate::context::{c_type, GenContext};
use crate::engine::{Emitted, Engine, Handler};
use quartz_ir::{IrExpression, Scope, Type};

fn intrinsic(object: &IrExpression, property: &str) -> Option<&'static str> {
    let IrExpression::Var {
        name,
        scope: Scope::Memory,
        ty: Type::Void,
    } = object
    else {
        return None;
    };
    match (name.as_str(), property) {
        ("msg", "sender") => Some("msg_sender"),
        ("msg", "value") => Some("msg_value"),
        ("block", "number") => Some("block_number"),
        ("block", "timestamp") => Some("block_timestamp"),
        _ => None,
    }
}

pub struct EnvHandler;

impl Handler for EnvHandler {
    fn name(&self) -> &'static str {
        "env"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Member { object, property, .. }
                if intrinsic(object, property).is_some()
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Member {
            object,
            property,
            ty,
        } = expr
        else {
            unreachable!()
        };
        let call = intrinsic(object, property).unwrap();
        let temp = ctx.temps.fresh();
        Emitted::value(
            vec![format!("{} {} = {}();", c_type(ty), temp, call)],
            temp,
            ty.clone(),
        )
    }
}
