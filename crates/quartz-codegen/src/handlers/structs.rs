//! Handlers for struct values. Structs live behind pointers in the
//! target; field access goes through the generated `<Struct>_get_` and
//! `<Struct>_set_` accessors so the packed offsets stay in one place.

use crate::context::{c_type, GenContext};
use crate::engine::{Emitted, Engine, Handler};
use quartz_ir::{IrExpression, Scope, Type};

fn struct_name(ty: &Type) -> Option<&str> {
    match ty {
        Type::Struct(name) => Some(name),
        _ => None,
    }
}

pub struct StructNewHandler;

impl Handler for StructNewHandler {
    fn name(&self) -> &'static str {
        "struct-new"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, ret: Type::Struct(_), .. } if target == "new"
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { args, ret, .. } = expr else {
            unreachable!()
        };
        let name = struct_name(ret).unwrap().to_string();
        let (mut setup, values) = engine.emit_args(args, ctx);
        let temp = ctx.temps.fresh();
        setup.push(format!(
            "{}* {} = {}_new({});",
            name,
            temp,
            name,
            values.join(", ")
        ));
        Emitted::value(setup, temp, ret.clone())
    }
}

pub struct StructGetHandler;

impl Handler for StructGetHandler {
    fn name(&self) -> &'static str {
        "struct-get"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Member { object, .. } if matches!(object.ty(), Type::Struct(_))
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Member {
            object,
            property,
            ty,
        } = expr
        else {
            unreachable!()
        };
        let owner = struct_name(&object.ty()).unwrap().to_string();
        let emitted = engine.emit(object, ctx);
        let mut setup = emitted.setup;
        let temp = ctx.temps.fresh();
        setup.push(format!(
            "{} {} = {}_get_{}({});",
            c_type(ty),
            temp,
            owner,
            property,
            emitted.value
        ));
        Emitted::value(setup, temp, ty.clone())
    }
}

pub struct StructSetHandler;

impl Handler for StructSetHandler {
    fn name(&self) -> &'static str {
        "struct-set"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(r), .. }
                if target == "set" && matches!(&**r, IrExpression::Member { .. })
        )
    }

    fn handle(&self, expr: &IrExpression, engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Call { receiver, args, .. } = expr else {
            unreachable!()
        };
        let Some(IrExpression::Member {
            object, property, ..
        }) = receiver.as_deref()
        else {
            unreachable!()
        };
        let owner = struct_name(&object.ty()).unwrap_or("u256").to_string();
        let target = engine.emit(object, ctx);
        let value = engine.emit(&args[0], ctx);
        let mut setup = target.setup;
        setup.extend(value.setup);
        setup.push(format!(
            "{}_set_{}({}, {});",
            owner, property, target.value, value.value
        ));
        Emitted::unit(setup)
    }
}

/// Struct locals are pointers; a read aliases the record rather than
/// copying its bytes.
pub struct StructLocalReadHandler;

impl Handler for StructLocalReadHandler {
    fn name(&self) -> &'static str {
        "struct-local-read"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Var {
                scope: Scope::Memory,
                ty: Type::Struct(_),
                ..
            }
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, _ctx: &mut GenContext) -> Emitted {
        let IrExpression::Var { name, ty, .. } = expr else {
            unreachable!()
        };
        Emitted::value(Vec::new(), name.clone(), ty.clone())
    }
}

pub struct StructStorageLoadHandler;

impl Handler for StructStorageLoadHandler {
    fn name(&self) -> &'static str {
        "struct-storage-load"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Var {
                scope: Scope::Storage,
                ty: Type::Struct(_),
                ..
            }
        )
    }

    fn handle(&self, expr: &IrExpression, _engine: &Engine, ctx: &mut GenContext) -> Emitted {
        let IrExpression::Var { name, ty, .. } = expr else {
            unreachable!()
        };
        let owner = struct_name(ty).unwrap().to_string();
        let temp = ctx.temps.fresh();
        Emitted::value(
            vec![format!("{}* {} = load_{}();", owner, temp, name)],
            temp,
            ty.clone(),
        )
    }
}

pub struct StructStoreHandler;

impl Handler for StructStoreHandler {
    fn name(&self) -> &'static str {
        "struct-storage-store"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(r), .. }
                if target == "store"
                    && matches!(&**r, IrExpression::Var { scope: Scope::Storage, ty: Type::Struct(_), .. })
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

pub struct StructAssignHandler;

impl Handler for StructAssignHandler {
    fn name(&self) -> &'static str {
        "struct-local-assign"
    }

    fn can_handle(&self, expr: &IrExpression) -> bool {
        matches!(
            expr,
            IrExpression::Call { target, receiver: Some(r), .. }
                if target == "assign"
                    && matches!(&**r, IrExpression::Var { scope: Scope::Memory, ty: Type::Struct(_), .. })
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
