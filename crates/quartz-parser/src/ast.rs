//! AST for the Quartz surface language, built from the pest parse tree.
//!
//! The AST is deliberately close to the concrete syntax: no name
//! resolution, no types beyond the written type names. Analysis owns all
//! semantic interpretation.

use crate::Rule;
use pest::iterators::Pair;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub contracts: Vec<ContractDecl>,
    pub structs: Vec<StructDecl>,
    pub events: Vec<EventDecl>,
    pub errors: Vec<ErrorDecl>,
}

impl SourceUnit {
    pub fn contract(&self, name: &str) -> Option<&ContractDecl> {
        self.contracts.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDecl {
    pub name: String,
    pub parent: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeName,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub annotations: Vec<String>,
    pub params: Vec<ParamDecl>,
    pub returns: Option<TypeName>,
    pub body: Vec<Stmt>,
    pub is_constructor: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeName,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeName {
    Plain(String),
    Map(Box<TypeName>, Box<TypeName>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDecl {
    pub name: String,
    pub params: Vec<EventParamDecl>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParamDecl {
    pub name: String,
    pub ty: TypeName,
    pub indexed: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Let {
        name: String,
        ty: Option<TypeName>,
        init: Expr,
        mutable: bool,
        line: usize,
    },
    Expr {
        expr: Expr,
        line: usize,
    },
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Option<Vec<Stmt>>,
        line: usize,
    },
    Block {
        body: Vec<Stmt>,
        line: usize,
    },
    DoWhile {
        body: Vec<Stmt>,
        cond: Expr,
        line: usize,
    },
    Return {
        value: Option<Expr>,
        line: usize,
    },
    Revert {
        error: String,
        args: Vec<Expr>,
        line: usize,
    },
    Emit {
        event: String,
        args: Vec<Expr>,
        line: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn from_token(token: &str) -> Option<BinOp> {
        match token {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            "%" => Some(BinOp::Mod),
            "==" => Some(BinOp::Eq),
            "!=" => Some(BinOp::Ne),
            "<" => Some(BinOp::Lt),
            ">" => Some(BinOp::Gt),
            "<=" => Some(BinOp::Le),
            ">=" => Some(BinOp::Ge),
            "&&" => Some(BinOp::And),
            "||" => Some(BinOp::Or),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    Not,
    Neg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number {
        text: String,
        line: usize,
    },
    Str {
        value: String,
        line: usize,
    },
    Bool {
        value: bool,
        line: usize,
    },
    Ident {
        name: String,
        line: usize,
    },
    This {
        line: usize,
    },
    Member {
        object: Box<Expr>,
        property: String,
        line: usize,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: usize,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        line: usize,
    },
    StructLit {
        name: String,
        fields: Vec<(String, Expr)>,
        line: usize,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        line: usize,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        line: usize,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        line: usize,
    },
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::Number { line, .. }
            | Expr::Str { line, .. }
            | Expr::Bool { line, .. }
            | Expr::Ident { line, .. }
            | Expr::This { line }
            | Expr::Member { line, .. }
            | Expr::Call { line, .. }
            | Expr::Index { line, .. }
            | Expr::StructLit { line, .. }
            | Expr::Binary { line, .. }
            | Expr::Unary { line, .. }
            | Expr::Assign { line, .. } => *line,
        }
    }
}

fn line_of(pair: &Pair<Rule>) -> usize {
    pair.as_span().start_pos().line_col().0
}

pub(crate) fn build_source_unit(pair: Pair<Rule>) -> SourceUnit {
    let mut unit = SourceUnit::default();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::contract_decl => unit.contracts.push(build_contract(child)),
            Rule::struct_decl => unit.structs.push(build_struct(child)),
            Rule::event_decl => unit.events.push(build_event(child)),
            Rule::error_decl => unit.errors.push(build_error(child)),
            Rule::EOI => {}
            _ => {}
        }
    }
    unit
}

fn build_contract(pair: Pair<Rule>) -> ContractDecl {
    let line = line_of(&pair);
    let mut name = String::new();
    let mut parent = None;
    let mut fields = Vec::new();
    let mut methods = Vec::new();

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = child.as_str().to_string(),
            Rule::extends_clause => {
                parent = child
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::ident)
                    .map(|p| p.as_str().to_string());
            }
            Rule::field_decl => fields.push(build_field(child)),
            Rule::method_decl | Rule::constructor_decl => methods.push(build_method(child)),
            _ => {}
        }
    }

    ContractDecl {
        name,
        parent,
        fields,
        methods,
        line,
    }
}

fn build_field(pair: Pair<Rule>) -> FieldDecl {
    let line = line_of(&pair);
    let mut name = String::new();
    let mut ty = TypeName::Plain(String::new());
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = child.as_str().to_string(),
            Rule::type_name => ty = build_type_name(child),
            _ => {}
        }
    }
    FieldDecl { name, ty, line }
}

fn build_method(pair: Pair<Rule>) -> MethodDecl {
    let line = line_of(&pair);
    let is_constructor = pair.as_rule() == Rule::constructor_decl;
    let mut name = if is_constructor {
        "constructor".to_string()
    } else {
        String::new()
    };
    let mut annotations = Vec::new();
    let mut params = Vec::new();
    let mut returns = None;
    let mut body = Vec::new();

    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::annotation => {
                if let Some(ident) = child.into_inner().next() {
                    annotations.push(ident.as_str().to_string());
                }
            }
            Rule::ident => name = child.as_str().to_string(),
            Rule::param_list => {
                for param in child.into_inner() {
                    params.push(build_param(param));
                }
            }
            Rule::return_clause => {
                returns = child
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::type_name)
                    .map(build_type_name);
            }
            Rule::block => body = build_block(child),
            _ => {}
        }
    }

    MethodDecl {
        name,
        annotations,
        params,
        returns,
        body,
        is_constructor,
        line,
    }
}

fn build_param(pair: Pair<Rule>) -> ParamDecl {
    let line = line_of(&pair);
    let mut name = String::new();
    let mut ty = TypeName::Plain(String::new());
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = child.as_str().to_string(),
            Rule::type_name => ty = build_type_name(child),
            _ => {}
        }
    }
    ParamDecl { name, ty, line }
}

fn build_type_name(pair: Pair<Rule>) -> TypeName {
    let inner = pair
        .into_inner()
        .next()
        .expect("type_name has exactly one alternative");
    match inner.as_rule() {
        Rule::map_type => {
            let mut types = inner
                .into_inner()
                .filter(|p| p.as_rule() == Rule::type_name)
                .map(build_type_name);
            let key = types.next().expect("map type has a key");
            let value = types.next().expect("map type has a value");
            TypeName::Map(Box::new(key), Box::new(value))
        }
        Rule::plain_type => TypeName::Plain(inner.as_str().trim().to_string()),
        other => unreachable!("unexpected type rule {:?}", other),
    }
}

fn build_struct(pair: Pair<Rule>) -> StructDecl {
    let line = line_of(&pair);
    let mut name = String::new();
    let mut fields = Vec::new();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = child.as_str().to_string(),
            Rule::field_decl => fields.push(build_field(child)),
            _ => {}
        }
    }
    StructDecl { name, fields, line }
}

fn build_event(pair: Pair<Rule>) -> EventDecl {
    let line = line_of(&pair);
    let mut name = String::new();
    let mut params = Vec::new();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = child.as_str().to_string(),
            Rule::event_param => {
                let param_line = line_of(&child);
                let mut param_name = String::new();
                let mut ty = TypeName::Plain(String::new());
                let mut indexed = false;
                for part in child.into_inner() {
                    match part.as_rule() {
                        Rule::ident => param_name = part.as_str().to_string(),
                        Rule::kw_indexed => indexed = true,
                        Rule::type_name => ty = build_type_name(part),
                        _ => {}
                    }
                }
                params.push(EventParamDecl {
                    name: param_name,
                    ty,
                    indexed,
                    line: param_line,
                });
            }
            _ => {}
        }
    }
    EventDecl { name, params, line }
}

fn build_error(pair: Pair<Rule>) -> ErrorDecl {
    let line = line_of(&pair);
    let mut name = String::new();
    let mut params = Vec::new();
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::ident => name = child.as_str().to_string(),
            Rule::param => params.push(build_param(child)),
            _ => {}
        }
    }
    ErrorDecl { name, params, line }
}

fn build_block(pair: Pair<Rule>) -> Vec<Stmt> {
    pair.into_inner().map(build_statement).collect()
}

fn build_statement(pair: Pair<Rule>) -> Stmt {
    let line = line_of(&pair);
    match pair.as_rule() {
        Rule::let_stmt | Rule::const_stmt => {
            let mutable = pair.as_rule() == Rule::let_stmt;
            let mut name = String::new();
            let mut ty = None;
            let mut init = None;
            for child in pair.into_inner() {
                match child.as_rule() {
                    Rule::ident => name = child.as_str().to_string(),
                    Rule::type_ascription => {
                        ty = child
                            .into_inner()
                            .find(|p| p.as_rule() == Rule::type_name)
                            .map(build_type_name);
                    }
                    Rule::expression => init = Some(build_expression(child)),
                    _ => {}
                }
            }
            Stmt::Let {
                name,
                ty,
                init: init.expect("declaration always has an initializer"),
                mutable,
                line,
            }
        }
        Rule::if_stmt => build_if(pair),
        Rule::do_while_stmt => {
            let mut body = Vec::new();
            let mut cond = None;
            for child in pair.into_inner() {
                match child.as_rule() {
                    Rule::block => body = build_block(child),
                    Rule::expression => cond = Some(build_expression(child)),
                    _ => {}
                }
            }
            Stmt::DoWhile {
                body,
                cond: cond.expect("do-while always has a condition"),
                line,
            }
        }
        Rule::return_stmt => {
            let value = pair
                .into_inner()
                .find(|p| p.as_rule() == Rule::expression)
                .map(build_expression);
            Stmt::Return { value, line }
        }
        Rule::revert_stmt => {
            let mut error = String::new();
            let mut args = Vec::new();
            for child in pair.into_inner() {
                match child.as_rule() {
                    Rule::ident => error = child.as_str().to_string(),
                    Rule::call_args => args = build_call_args(child),
                    _ => {}
                }
            }
            Stmt::Revert { error, args, line }
        }
        Rule::emit_stmt => {
            let mut event = String::new();
            let mut args = Vec::new();
            for child in pair.into_inner() {
                match child.as_rule() {
                    Rule::ident => event = child.as_str().to_string(),
                    Rule::call_args => args = build_call_args(child),
                    _ => {}
                }
            }
            Stmt::Emit { event, args, line }
        }
        Rule::block => Stmt::Block {
            body: build_block(pair),
            line,
        },
        Rule::expr_stmt => {
            let expr = pair
                .into_inner()
                .next()
                .map(build_expression)
                .expect("expression statement wraps an expression");
            Stmt::Expr { expr, line }
        }
        other => unreachable!("unexpected statement rule {:?}", other),
    }
}

fn build_if(pair: Pair<Rule>) -> Stmt {
    let line = line_of(&pair);
    let mut cond = None;
    let mut then = Vec::new();
    let mut otherwise = None;
    for child in pair.into_inner() {
        match child.as_rule() {
            Rule::expression => cond = Some(build_expression(child)),
            Rule::block => then = build_block(child),
            Rule::else_clause => {
                for part in child.into_inner() {
                    match part.as_rule() {
                        Rule::block => otherwise = Some(build_block(part)),
                        Rule::if_stmt => otherwise = Some(vec![build_if(part)]),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    Stmt::If {
        cond: cond.expect("if always has a condition"),
        then,
        otherwise,
        line,
    }
}

fn build_call_args(pair: Pair<Rule>) -> Vec<Expr> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::expression)
        .map(build_expression)
        .collect()
}

fn build_expression(pair: Pair<Rule>) -> Expr {
    match pair.as_rule() {
        Rule::expression | Rule::paren_expr => build_expression(
            pair.into_inner()
                .next()
                .expect("wrapper rule holds one expression"),
        ),
        Rule::assignment => {
            let line = line_of(&pair);
            let mut inner = pair.into_inner();
            let target = build_expression(inner.next().expect("assignment has a left side"));
            let mut rest = inner.filter(|p| p.as_rule() != Rule::assign_op);
            match rest.next() {
                Some(value) => Expr::Assign {
                    target: Box::new(target),
                    value: Box::new(build_expression(value)),
                    line,
                },
                None => target,
            }
        }
        Rule::logic_or
        | Rule::logic_and
        | Rule::equality
        | Rule::comparison
        | Rule::additive
        | Rule::multiplicative => build_binary_chain(pair),
        Rule::unary => {
            let line = line_of(&pair);
            let mut inner = pair.into_inner();
            let first = inner.next().expect("unary has an operand");
            match first.as_rule() {
                Rule::un_op => {
                    let op = match first.as_str() {
                        "!" => UnOp::Not,
                        _ => UnOp::Neg,
                    };
                    let operand = build_expression(inner.next().expect("unary has an operand"));
                    Expr::Unary {
                        op,
                        operand: Box::new(operand),
                        line,
                    }
                }
                _ => build_expression(first),
            }
        }
        Rule::postfix => build_postfix(pair),
        Rule::number => Expr::Number {
            text: pair.as_str().to_string(),
            line: line_of(&pair),
        },
        Rule::string => {
            let raw = pair.as_str();
            Expr::Str {
                value: raw[1..raw.len() - 1].to_string(),
                line: line_of(&pair),
            }
        }
        Rule::boolean => Expr::Bool {
            value: pair.as_str() == "true",
            line: line_of(&pair),
        },
        Rule::this_expr => Expr::This {
            line: line_of(&pair),
        },
        Rule::ident => Expr::Ident {
            name: pair.as_str().to_string(),
            line: line_of(&pair),
        },
        Rule::struct_literal => {
            let line = line_of(&pair);
            let mut name = String::new();
            let mut fields = Vec::new();
            for child in pair.into_inner() {
                match child.as_rule() {
                    Rule::ident => name = child.as_str().to_string(),
                    Rule::struct_lit_field => {
                        let mut inner = child.into_inner();
                        let field_name = inner
                            .next()
                            .expect("struct literal field has a name")
                            .as_str()
                            .to_string();
                        let value = build_expression(
                            inner.next().expect("struct literal field has a value"),
                        );
                        fields.push((field_name, value));
                    }
                    _ => {}
                }
            }
            Expr::StructLit { name, fields, line }
        }
        other => unreachable!("unexpected expression rule {:?}", other),
    }
}

fn build_binary_chain(pair: Pair<Rule>) -> Expr {
    let line = line_of(&pair);
    let mut inner = pair.into_inner();
    let mut expr = build_expression(inner.next().expect("binary chain has a first operand"));
    while let Some(op_pair) = inner.next() {
        let op = BinOp::from_token(op_pair.as_str())
            .unwrap_or_else(|| unreachable!("operator rule produced `{}`", op_pair.as_str()));
        let right = build_expression(inner.next().expect("operator is followed by an operand"));
        expr = Expr::Binary {
            op,
            left: Box::new(expr),
            right: Box::new(right),
            line,
        };
    }
    expr
}

fn build_postfix(pair: Pair<Rule>) -> Expr {
    let line = line_of(&pair);
    let mut inner = pair.into_inner();
    let mut expr = build_expression(inner.next().expect("postfix has a primary"));
    for op in inner {
        match op.as_rule() {
            Rule::member_access => {
                let property = op
                    .into_inner()
                    .next()
                    .expect("member access has a property")
                    .as_str()
                    .to_string();
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                    line,
                };
            }
            Rule::call_args => {
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args: build_call_args(op),
                    line,
                };
            }
            Rule::index_access => {
                let index = build_expression(
                    op.into_inner()
                        .next()
                        .expect("index access has an index expression"),
                );
                expr = Expr::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                    line,
                };
            }
            other => unreachable!("unexpected postfix rule {:?}", other),
        }
    }
    expr
}
