use crate::context::AnalysisContext;
use num_bigint::BigUint;
use num_traits::Num;
use quartz_ir::{DiagCode, IrExpression, Literal, Scope, Symbol, Type};
use quartz_parser::{BinOp, Expr, UnOp};

/// Lower one parsed expression to one IR node.
///
/// Never fails: problems land in the diagnostics sink and a best-effort
/// placeholder comes back so one run surfaces as many problems as it can.
pub fn build_expression(expr: &Expr, ctx: &mut AnalysisContext) -> IrExpression {
    match expr {
        Expr::Number { text, line } => build_number(text, *line, ctx),
        Expr::Str { value, .. } => IrExpression::Literal {
            value: Literal::Str(value.clone()),
            ty: Type::Bytes,
        },
        Expr::Bool { value, .. } => IrExpression::Literal {
            value: Literal::Bool(*value),
            ty: Type::Bool,
        },
        Expr::Ident { name, line } => build_identifier(name, *line, ctx),
        Expr::This { .. } => IrExpression::This,
        Expr::Member {
            object,
            property,
            line,
        } => build_member(object, property, *line, ctx),
        Expr::Call { callee, args, line } => build_call(callee, args, *line, ctx),
        Expr::Index {
            object,
            index,
            line,
        } => build_index(object, index, *line, ctx),
        Expr::StructLit { name, fields, line } => build_struct_literal(name, fields, *line, ctx),
        Expr::Binary {
            op,
            left,
            right,
            line: _,
        } => build_binary(*op, left, right, ctx),
        Expr::Unary { op, operand, .. } => build_unary(*op, operand, ctx),
        Expr::Assign { line, .. } => {
            ctx.error(
                DiagCode::Syntax,
                "assignment is a statement, not an expression",
                *line,
            );
            placeholder()
        }
    }
}

pub fn placeholder() -> IrExpression {
    IrExpression::Literal {
        value: Literal::Number(BigUint::from(0u32)),
        ty: Type::U256,
    }
}

fn build_number(text: &str, line: usize, ctx: &mut AnalysisContext) -> IrExpression {
    let cleaned = text.replace('_', "");
    let parsed = if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        BigUint::from_str_radix(hex, 16)
    } else {
        BigUint::from_str_radix(&cleaned, 10)
    };
    match parsed {
        Ok(value) => IrExpression::Literal {
            value: Literal::Number(value),
            ty: Type::U256,
        },
        Err(_) => {
            ctx.error(
                DiagCode::Syntax,
                format!("malformed number literal `{}`", text),
                line,
            );
            placeholder()
        }
    }
}

fn build_identifier(name: &str, line: usize, ctx: &mut AnalysisContext) -> IrExpression {
    match ctx.lookup(name) {
        Some(Symbol::Variable(var)) => IrExpression::Var {
            name: var.name.clone(),
            scope: var.scope,
            ty: var.ty.clone(),
        },
        _ => {
            ctx.error(
                DiagCode::Semantic,
                format!("unresolved identifier `{}`", name),
                line,
            );
            IrExpression::Var {
                name: name.to_string(),
                scope: Scope::Memory,
                ty: Type::U256,
            }
        }
    }
}

fn env_member_type(object: &str, property: &str) -> Option<Type> {
    match (object, property) {
        ("msg", "sender") => Some(Type::Address),
        ("msg", "value") => Some(Type::U256),
        ("block", "number") => Some(Type::U256),
        ("block", "timestamp") => Some(Type::U256),
        _ => None,
    }
}

fn build_member(
    object: &Expr,
    property: &str,
    line: usize,
    ctx: &mut AnalysisContext,
) -> IrExpression {
    // `this.<field>` is a storage access, not a member chain.
    if matches!(object, Expr::This { .. }) {
        return match ctx.lookup(property) {
            Some(Symbol::Variable(var)) if var.scope == Scope::Storage => IrExpression::Var {
                name: var.name.clone(),
                scope: Scope::Storage,
                ty: var.ty.clone(),
            },
            _ => {
                ctx.error(
                    DiagCode::Semantic,
                    format!("`{}` is not a storage field of this contract", property),
                    line,
                );
                IrExpression::Var {
                    name: property.to_string(),
                    scope: Scope::Memory,
                    ty: Type::U256,
                }
            }
        };
    }

    if let Expr::Ident { name, .. } = object {
        if ctx.lookup(name).is_none() {
            if let Some(ty) = env_member_type(name, property) {
                return IrExpression::Member {
                    object: Box::new(IrExpression::Var {
                        name: name.clone(),
                        scope: Scope::Memory,
                        ty: Type::Void,
                    }),
                    property: property.to_string(),
                    ty,
                };
            }
        }
    }

    let object_ir = build_expression(object, ctx);
    let ty = match object_ir.ty() {
        Type::Struct(struct_name) => match ctx
            .structs
            .get(&struct_name)
            .and_then(|def| def.field(property))
        {
            Some(field) => field.ty.clone(),
            None => {
                ctx.error(
                    DiagCode::Semantic,
                    format!("struct `{}` has no field `{}`", struct_name, property),
                    line,
                );
                Type::U256
            }
        },
        // Unknown receiver: assume a transient memory value. The lenient
        // default keeps chains over unannotated values compiling.
        _ => Type::U256,
    };

    IrExpression::Member {
        object: Box::new(object_ir),
        property: property.to_string(),
        ty,
    }
}

fn build_call(
    callee: &Expr,
    args: &[Expr],
    line: usize,
    ctx: &mut AnalysisContext,
) -> IrExpression {
    let args_ir: Vec<IrExpression> = args.iter().map(|a| build_expression(a, ctx)).collect();

    match callee {
        Expr::Ident { name, .. } => {
            let ret = match ctx.lookup(name) {
                Some(Symbol::Function(f)) => f.ret.clone(),
                _ => {
                    ctx.error(
                        DiagCode::Semantic,
                        format!("call to undeclared function `{}`", name),
                        line,
                    );
                    Type::U256
                }
            };
            IrExpression::Call {
                target: name.clone(),
                receiver: None,
                args: args_ir,
                ret,
                scope: Scope::Memory,
            }
        }
        Expr::Member {
            object, property, ..
        } if matches!(**object, Expr::This { .. }) => {
            let ret = match ctx.lookup(property) {
                Some(Symbol::Function(f)) => f.ret.clone(),
                _ => {
                    ctx.error(
                        DiagCode::Semantic,
                        format!("contract has no method `{}`", property),
                        line,
                    );
                    Type::U256
                }
            };
            IrExpression::Call {
                target: property.clone(),
                receiver: None,
                args: args_ir,
                ret,
                scope: Scope::Memory,
            }
        }
        Expr::Member {
            object, property, ..
        } => {
            // Method call on a value. The receiver defaults to memory scope
            // when its base cannot be resolved; codegen decides whether the
            // target is meaningful.
            let receiver = build_expression(object, ctx);
            IrExpression::Call {
                target: property.clone(),
                receiver: Some(Box::new(receiver)),
                args: args_ir,
                ret: Type::U256,
                scope: Scope::Memory,
            }
        }
        other => {
            ctx.error(
                DiagCode::Syntax,
                format!("unsupported call target on line {}", other.line()),
                line,
            );
            placeholder()
        }
    }
}

fn build_index(
    object: &Expr,
    index: &Expr,
    line: usize,
    ctx: &mut AnalysisContext,
) -> IrExpression {
    let key = build_expression(index, ctx);
    let object_ir = build_expression(object, ctx);

    match object_ir {
        IrExpression::Var {
            ref name,
            scope: Scope::Storage,
            ref ty,
        } => match ty {
            Type::Mapping(_, value_ty) => IrExpression::Call {
                target: "map_get".to_string(),
                receiver: Some(Box::new(IrExpression::Var {
                    name: name.clone(),
                    scope: Scope::Storage,
                    ty: ty.clone(),
                })),
                args: vec![key],
                ret: (**value_ty).clone(),
                scope: Scope::Storage,
            },
            other => {
                ctx.error(
                    DiagCode::Semantic,
                    format!("`{}` of type `{}` cannot be indexed", name, other),
                    line,
                );
                placeholder()
            }
        },
        _ => {
            ctx.error(
                DiagCode::Syntax,
                "only storage mappings can be indexed",
                line,
            );
            placeholder()
        }
    }
}

fn build_struct_literal(
    name: &str,
    fields: &[(String, Expr)],
    line: usize,
    ctx: &mut AnalysisContext,
) -> IrExpression {
    let Some(def) = ctx.structs.get(name).cloned() else {
        ctx.error(
            DiagCode::Semantic,
            format!("unknown struct `{}`", name),
            line,
        );
        return placeholder();
    };

    for (field_name, _) in fields {
        if def.field(field_name).is_none() {
            ctx.error(
                DiagCode::Semantic,
                format!("struct `{}` has no field `{}`", name, field_name),
                line,
            );
        }
    }

    // Arguments follow declaration order so codegen and ABI agree on the
    // layout regardless of the order written in the literal.
    let mut args = Vec::with_capacity(def.fields.len());
    for field in &def.fields {
        match fields.iter().find(|(n, _)| n == &field.name) {
            Some((_, value)) => args.push(build_expression(value, ctx)),
            None => {
                ctx.error(
                    DiagCode::Semantic,
                    format!("missing field `{}` in `{}` literal", field.name, name),
                    line,
                );
                args.push(placeholder());
            }
        }
    }

    IrExpression::Call {
        target: "new".to_string(),
        receiver: None,
        args,
        ret: Type::Struct(name.to_string()),
        scope: Scope::Memory,
    }
}

fn binary_target(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "add",
        BinOp::Sub => "sub",
        BinOp::Mul => "mul",
        BinOp::Div => "div",
        BinOp::Mod => "mod",
        BinOp::Eq => "eq",
        BinOp::Ne => "ne",
        BinOp::Lt => "lt",
        BinOp::Gt => "gt",
        BinOp::Le => "le",
        BinOp::Ge => "ge",
        BinOp::And => "and",
        BinOp::Or => "or",
    }
}

fn build_binary(op: BinOp, left: &Expr, right: &Expr, ctx: &mut AnalysisContext) -> IrExpression {
    let left_ir = build_expression(left, ctx);
    let right_ir = build_expression(right, ctx);
    let ret = match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => left_ir.ty(),
        _ => Type::Bool,
    };
    IrExpression::Call {
        target: binary_target(op).to_string(),
        receiver: Some(Box::new(left_ir)),
        args: vec![right_ir],
        ret,
        scope: Scope::Memory,
    }
}

fn build_unary(op: UnOp, operand: &Expr, ctx: &mut AnalysisContext) -> IrExpression {
    let operand_ir = build_expression(operand, ctx);
    let (target, ret) = match op {
        UnOp::Not => ("not", Type::Bool),
        UnOp::Neg => ("neg", operand_ir.ty()),
    };
    IrExpression::Call {
        target: target.to_string(),
        receiver: Some(Box::new(operand_ir)),
        args: Vec::new(),
        ret,
        scope: Scope::Memory,
    }
}
