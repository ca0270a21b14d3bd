//! Handlers for mapping reads and writes. Each mapping field gets its
//! own `map_get_<field>`/`map_set_<field>` accessor pair keyed by the
//! field's storage slot.

use crate::context::{c_type, GenContext};
use crate::engine::{Emitted, Engine, Handler};
use quartz_ir::{IrExpression, Scope, Type};

fn mapping_receiver(expr: &IrExpression) -> Option<&str> {
    match expr {
        IrExpression::Call { receiver: Some(r), .. } => match &**r {
            IrExpression::Var {
                name,
                scope: Scope::Storage,
                ty: Type::Mapping(_, _),
            } => Some(name),
            _ => None,
        },
        _ => None,
    }
}

pub struct MapGetHandler;

impl Handler for MapGetHandler {
    fn name(&self) -> &'static str {
        "map-get"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(expr, IrExpression::Call { target, .. } if target == "map_get")
            && mapping_receiver(expr).is_some()
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let field = mapping_receiver(expr).unwrap().to_string();
        let IrExpression::Call { args, ret, .. } = expr else {
            unreachable!()
        };
        let key = engine.emit(&args[0], ctx);
        let mut setup = key.setup;
        let temp = ctx.temps.fresh();
        setup.push(format!(
            "{} {} = map_get_{}({});",
            c_type(ret),
            temp,
            field,
            key.value
        ));
        Emitted::value(setup, temp, ret.clone())
    }
}

pub struct MapSetHandler;

impl Handler for MapSetHandler {
    fn name(&self) -> &'static str {
        "map-set"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(expr, IrExpression::Call { target, .. } if target == "map_set")
            && mapping_receiver(expr).is_some()
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let field = mapping_receiver(expr).unwrap().to_string();
        let IrExpression::Call { args, .. } = expr else {
            unreachable!()
        };
        let key = engine.emit(&args[0], ctx);
        let value = engine.emit(&args[1], ctx);
        let mut setup = key.setup;
        setup.extend(value.setup);
        setup.push(format!("map_set_{}({}, {});", field, key.value, value.value));
        Emitted::unit(setup)
    }
}
