use crate::context::AnalysisContext;
use crate::expr::{build_expression, placeholder};
use crate::type_resolver::resolve_type;
use quartz_ir::{
    DiagCode, IrExpression, IrStatement, Scope, Symbol, Type, VariableSymbol,
};
use quartz_parser::{Expr, Stmt};

/// Lower one parsed statement to one IR statement, threading scope
/// pushes/pops for nested blocks through the shared symbol table.
pub fn build_statement(stmt: &Stmt, ctx: &mut AnalysisContext) -> IrStatement {
    match stmt {
        Stmt::Let {
            name,
            ty,
            init,
            mutable,
            line,
        } => {
            let init_ir = build_expression(init, ctx);
            let ty = match ty {
                Some(written) => resolve_type(written, ctx, *line),
                None => init_ir.ty(),
            };
            ctx.declare(
                Symbol::Variable(VariableSymbol::local(name.clone(), ty.clone())),
                *line,
            );
            IrStatement::Let {
                name: name.clone(),
                ty,
                init: init_ir,
                mutable: *mutable,
            }
        }
        Stmt::Expr { expr, line } => match expr {
            Expr::Assign { target, value, .. } => build_assignment(target, value, *line, ctx),
            other => IrStatement::Expr(build_expression(other, ctx)),
        },
        Stmt::If {
            cond,
            then,
            otherwise,
            ..
        } => {
            let cond_ir = build_expression(cond, ctx);
            ctx.symbols.push_scope();
            let then_ir = then.iter().map(|s| build_statement(s, ctx)).collect();
            ctx.symbols.pop_scope();
            let otherwise_ir = otherwise.as_ref().map(|stmts| {
                ctx.symbols.push_scope();
                let built = stmts.iter().map(|s| build_statement(s, ctx)).collect();
                ctx.symbols.pop_scope();
                built
            });
            IrStatement::If {
                cond: cond_ir,
                then: then_ir,
                otherwise: otherwise_ir,
            }
        }
        Stmt::Block { body, .. } => {
            ctx.symbols.push_scope();
            let built = body.iter().map(|s| build_statement(s, ctx)).collect();
            ctx.symbols.pop_scope();
            IrStatement::Block(built)
        }
        Stmt::DoWhile { body, cond, .. } => {
            ctx.symbols.push_scope();
            let body_ir = body.iter().map(|s| build_statement(s, ctx)).collect();
            ctx.symbols.pop_scope();
            let cond_ir = build_expression(cond, ctx);
            IrStatement::DoWhile {
                body: body_ir,
                cond: cond_ir,
            }
        }
        Stmt::Return { value, .. } => {
            IrStatement::Return(value.as_ref().map(|v| build_expression(v, ctx)))
        }
        Stmt::Revert { error, args, line } => {
            if !ctx.errors.contains_key(error) {
                ctx.error(
                    DiagCode::Semantic,
                    format!("revert names undeclared error `{}`", error),
                    *line,
                );
            }
            let args_ir = args.iter().map(|a| build_expression(a, ctx)).collect();
            IrStatement::Revert {
                error: error.clone(),
                args: args_ir,
            }
        }
        Stmt::Emit { event, args, line } => {
            if !ctx.events.contains_key(event) {
                ctx.error(
                    DiagCode::Semantic,
                    format!("emit names undeclared event `{}`", event),
                    *line,
                );
            }
            let args_ir = args.iter().map(|a| build_expression(a, ctx)).collect();
            IrStatement::Expr(IrExpression::Call {
                target: event.clone(),
                receiver: None,
                args: args_ir,
                ret: Type::Void,
                scope: Scope::Memory,
            })
        }
    }
}

/// Assignments lower to explicit store/set calls: the write location
/// decides which accessor the generated code will call.
fn build_assignment(
    target: &Expr,
    value: &Expr,
    line: usize,
    ctx: &mut AnalysisContext,
) -> IrStatement {
    let value_ir = build_expression(value, ctx);

    match target {
        // this.<field> = v : storage store
        Expr::Member {
            object, property, ..
        } if matches!(**object, Expr::This { .. }) => {
            match ctx.lookup(property) {
                Some(Symbol::Variable(var)) if var.scope == Scope::Storage => {
                    let receiver = IrExpression::Var {
                        name: var.name.clone(),
                        scope: Scope::Storage,
                        ty: var.ty.clone(),
                    };
                    IrStatement::Expr(IrExpression::Call {
                        target: "store".to_string(),
                        receiver: Some(Box::new(receiver)),
                        args: vec![value_ir],
                        ret: Type::Void,
                        scope: Scope::Storage,
                    })
                }
                _ => {
                    ctx.error(
                        DiagCode::Semantic,
                        format!("`{}` is not a storage field of this contract", property),
                        line,
                    );
                    IrStatement::Expr(placeholder())
                }
            }
        }
        // value.field = v : struct field set
        Expr::Member {
            object, property, ..
        } => {
            let member = build_expression(
                &Expr::Member {
                    object: object.clone(),
                    property: property.clone(),
                    line,
                },
                ctx,
            );
            IrStatement::Expr(IrExpression::Call {
                target: "set".to_string(),
                receiver: Some(Box::new(member)),
                args: vec![value_ir],
                ret: Type::Void,
                scope: Scope::Memory,
            })
        }
        // this.<mapping>[k] = v : mapping store
        Expr::Index { object, index, .. } => {
            let key = build_expression(index, ctx);
            let object_ir = build_expression(object, ctx);
            match object_ir {
                IrExpression::Var {
                    scope: Scope::Storage,
                    ref ty,
                    ..
                } if ty.is_mapping() => IrStatement::Expr(IrExpression::Call {
                    target: "map_set".to_string(),
                    receiver: Some(Box::new(object_ir.clone())),
                    args: vec![key, value_ir],
                    ret: Type::Void,
                    scope: Scope::Storage,
                }),
                _ => {
                    ctx.error(
                        DiagCode::Semantic,
                        "only storage mappings support indexed assignment",
                        line,
                    );
                    IrStatement::Expr(placeholder())
                }
            }
        }
        // x = v : local rebind
        Expr::Ident { name, .. } => match ctx.lookup(name) {
            Some(Symbol::Variable(var)) if var.scope == Scope::Memory => {
                let receiver = IrExpression::Var {
                    name: var.name.clone(),
                    scope: Scope::Memory,
                    ty: var.ty.clone(),
                };
                IrStatement::Expr(IrExpression::Call {
                    target: "assign".to_string(),
                    receiver: Some(Box::new(receiver)),
                    args: vec![value_ir],
                    ret: Type::Void,
                    scope: Scope::Memory,
                })
            }
            _ => {
                ctx.error(
                    DiagCode::Semantic,
                    format!("cannot assign to `{}`", name),
                    line,
                );
                IrStatement::Expr(placeholder())
            }
        },
        other => {
            ctx.error(
                DiagCode::Syntax,
                format!("unsupported assignment target on line {}", other.line()),
                line,
            );
            IrStatement::Expr(placeholder())
        }
    }
}
