use crate::context::AnalysisContext;
use crate::stmt::build_statement;
use crate::type_resolver::resolve_type;
use quartz_ir::{
    DiagCode, FunctionSymbol, IrContract, IrMethod, Param, StorageField, Symbol, Type,
    VariableSymbol, Visibility,
};
use quartz_parser::{ContractDecl, MethodDecl};

/// Declare a contract's storage fields and method signatures into the
/// current (root) scope. Running this over the whole inheritance chain
/// before any body is analyzed makes forward references and calls into
/// parent methods resolve without a separate pass.
pub fn declare_contract_surface(decl: &ContractDecl, ctx: &mut AnalysisContext) {
    for field in &decl.fields {
        let ty = resolve_type(&field.ty, ctx, field.line);
        ctx.declare(
            Symbol::Variable(VariableSymbol::storage(field.name.clone(), ty)),
            field.line,
        );
    }

    let mut seen: Vec<&str> = Vec::new();
    for method in &decl.methods {
        if method.is_constructor {
            continue;
        }
        // A later contract in the chain redeclaring a parent method is an
        // override, not a duplicate; only a repeat within one contract is.
        let overrides_earlier = !seen.contains(&method.name.as_str())
            && matches!(ctx.lookup(&method.name), Some(Symbol::Function(_)));
        seen.push(&method.name);
        if overrides_earlier {
            continue;
        }
        let ret = method
            .returns
            .as_ref()
            .map(|ty| resolve_type(ty, ctx, method.line))
            .unwrap_or(Type::Void);
        let params = method
            .params
            .iter()
            .map(|p| resolve_type(&p.ty, ctx, p.line))
            .collect();
        ctx.declare(
            Symbol::Function(FunctionSymbol {
                name: method.name.clone(),
                declared: true,
                ret,
                params,
            }),
            method.line,
        );
    }
}

/// Build one contract's IR. Surfaces must already be declared via
/// [`declare_contract_surface`]; this only lowers bodies.
pub fn build_contract(decl: &ContractDecl, ctx: &mut AnalysisContext) -> IrContract {
    let mut contract = IrContract::new(decl.name.clone());
    contract.parent_name = decl.parent.clone();

    for field in &decl.fields {
        // The surface pass already resolved and declared the field, so
        // reuse the declared type instead of diagnosing twice.
        let ty = match ctx.lookup(&field.name).and_then(Symbol::as_variable) {
            Some(var) => var.ty.clone(),
            None => resolve_type(&field.ty, ctx, field.line),
        };
        contract.storage.push(StorageField {
            name: field.name.clone(),
            ty,
            slot: None,
            line: field.line,
        });
    }

    for method in &decl.methods {
        contract.methods.push(build_method(method, ctx));
    }

    contract
}

fn build_method(decl: &MethodDecl, ctx: &mut AnalysisContext) -> IrMethod {
    let visibility = method_visibility(decl, ctx);

    let return_type = decl
        .returns
        .as_ref()
        .map(|ty| resolve_type(ty, ctx, decl.line))
        .unwrap_or(Type::Void);

    ctx.symbols.push_scope();
    let mut params = Vec::with_capacity(decl.params.len());
    for param in &decl.params {
        let ty = resolve_type(&param.ty, ctx, param.line);
        ctx.declare(
            Symbol::Variable(VariableSymbol::local(param.name.clone(), ty.clone())),
            param.line,
        );
        params.push(Param::new(param.name.clone(), ty));
    }
    let body = decl.body.iter().map(|s| build_statement(s, ctx)).collect();
    ctx.symbols.pop_scope();

    IrMethod {
        name: decl.name.clone(),
        visibility,
        params,
        return_type,
        body,
        is_constructor: decl.is_constructor,
        line: decl.line,
    }
}

fn parse_annotation(name: &str) -> Option<Visibility> {
    match name {
        "external" => Some(Visibility::External),
        "view" => Some(Visibility::View),
        "internal" => Some(Visibility::Internal),
        "public" => Some(Visibility::Public),
        _ => None,
    }
}

/// Classify a method from its annotations. Unannotated methods are
/// internal; constructors are public and reject any other annotation.
fn method_visibility(decl: &MethodDecl, ctx: &mut AnalysisContext) -> Visibility {
    let mut found: Vec<Visibility> = Vec::new();
    for annotation in &decl.annotations {
        match parse_annotation(annotation) {
            Some(vis) => found.push(vis),
            None => ctx.error(
                DiagCode::Semantic,
                format!("unknown annotation `@{}`", annotation),
                decl.line,
            ),
        }
    }

    if found.len() > 1 {
        ctx.error(
            DiagCode::Semantic,
            format!(
                "`{}` carries more than one visibility annotation",
                decl.name
            ),
            decl.line,
        );
    }

    if decl.is_constructor {
        if found.iter().any(|v| *v != Visibility::Public) {
            ctx.error(
                DiagCode::Semantic,
                "constructors are always public",
                decl.line,
            );
        }
        return Visibility::Public;
    }

    found.first().copied().unwrap_or(Visibility::Internal)
}
