//! Method bodies. Every expression chain contributes setup lines that
//! must run before the statement that consumes them, so statement
//! emission is a matter of splicing those lines in the right order.

use crate::context::{c_type, GenContext};
use crate::engine::Engine;
use crate::writer::CodeWriter;
use quartz_ir::{IrMethod, IrStatement, Type};

/// Function name for a method on the flattened contract.
pub fn function_name(contract: &str, method: &IrMethod) -> String {
    format!("{}_{}", contract, method.name)
}

pub fn emit_method(method: &IrMethod, engine: &Engine, ctx: &mut GenContext, out: &mut CodeWriter) {
    ctx.temps.reset();
    ctx.current_line = method.line;

    let params = if method.params.is_empty() {
        "void".to_string()
    } else {
        method
            .params
            .iter()
            .map(|p| format!("{} {}", c_type(&p.ty), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    };
    out.open(format!(
        "{} {}({}) {{",
        c_type(&method.return_type),
        function_name(&ctx.contract.name, method),
        params
    ));
    for stmt in &method.body {
        emit_statement(stmt, engine, ctx, out);
    }
    out.close("}");
}

fn emit_statement(stmt: &IrStatement, engine: &Engine, ctx: &mut GenContext, out: &mut CodeWriter) {
    match stmt {
        IrStatement::Let { name, ty, init, .. } => {
            let init = engine.emit(init, ctx);
            out.push_all(init.setup);
            out.push(format!("{} {} = {};", c_type(ty), name, init.value));
        }
        IrStatement::Expr(expr) => {
            let emitted = engine.emit(expr, ctx);
            out.push_all(emitted.setup);
            // A leftover value is already bound to a temp in the setup
            // lines; an expression statement discards it.
        }
        IrStatement::If {
            cond,
            then,
            otherwise,
        } => {
            let cond = engine.emit(cond, ctx);
            out.push_all(cond.setup);
            out.open(format!("if ({}) {{", cond.value));
            for stmt in then {
                emit_statement(stmt, engine, ctx, out);
            }
            match otherwise {
                Some(body) => {
                    out.close_open("} else {");
                    for stmt in body {
                        emit_statement(stmt, engine, ctx, out);
                    }
                    out.close("}");
                }
                None => out.close("}"),
            }
        }
        IrStatement::Block(body) => {
            out.open("{");
            for stmt in body {
                emit_statement(stmt, engine, ctx, out);
            }
            out.close("}");
        }
        // The condition's setup has to rerun every iteration, so it sits
        // at the end of the loop body in front of the break test.
        IrStatement::DoWhile { body, cond } => {
            out.open("do {");
            for stmt in body {
                emit_statement(stmt, engine, ctx, out);
            }
            let cond = engine.emit(cond, ctx);
            out.push_all(cond.setup);
            out.push(format!("if (!({})) {{ break; }}", cond.value));
            out.close("} while (1);");
        }
        IrStatement::Return(None) => out.push("return;"),
        IrStatement::Return(Some(value)) => {
            let value = engine.emit(value, ctx);
            out.push_all(value.setup);
            if value.ty == Type::Void {
                out.push("return;");
            } else {
                out.push(format!("return {};", value.value));
            }
        }
        IrStatement::Revert { error, args } => {
            let (setup, values) = engine.emit_args(args, ctx);
            out.push_all(setup);
            out.push(format!("revert_{}({});", error, values.join(", ")));
        }
    }
}
