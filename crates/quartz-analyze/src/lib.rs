/*! Semantic analysis for Quartz contracts.
 *
 * Turns a parsed source unit into one merged, layout-assigned
 * [`IrContract`]: resolve the inheritance chain root-first in a shared
 * symbol table, lower every method body, flatten parents into the main
 * contract, then assign storage slots and struct offsets. Problems
 * accumulate in a [`Diagnostics`] sink; only a failed parse stops the
 * pipeline early.
 */

use quartz_ir::{
    assign_layout, flatten, DiagCode, Diagnostics, ErrorDef, EventDef, EventParam, IrContract,
    Param, StructDef, StructFieldDef,
};
use quartz_parser::{ContractDecl, SourceUnit};
use tracing::{debug, instrument};

mod context;
mod contract_builder;
mod expr;
mod stmt;
mod type_resolver;

pub use context::AnalysisContext;
pub use contract_builder::{build_contract, declare_contract_surface};
pub use expr::build_expression;
pub use stmt::build_statement;
pub use type_resolver::resolve_type;

/// Result of one analysis run. `contract` is `None` only when the source
/// did not parse or declared no contract at all.
#[derive(Debug)]
pub struct Analysis {
    pub contract: Option<IrContract>,
    pub diagnostics: Diagnostics,
}

/// Analyze one source file end to end.
#[instrument(skip(source), fields(file = %file))]
pub fn analyze_source(source: &str, file: &str) -> Analysis {
    let unit = match quartz_parser::parse_source(source) {
        Ok(unit) => unit,
        Err(err) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.error(
                DiagCode::Syntax,
                err.variant.message().to_string(),
                file,
                quartz_parser::error_line(&err),
            );
            return Analysis {
                contract: None,
                diagnostics,
            };
        }
    };
    analyze_unit(&unit, file)
}

/// Analyze an already-parsed source unit.
pub fn analyze_unit(unit: &SourceUnit, file: &str) -> Analysis {
    let mut ctx = AnalysisContext::new(file);

    register_declarations(unit, &mut ctx);

    let Some(main) = main_contract(unit) else {
        ctx.error(DiagCode::Semantic, "source declares no contract", 0);
        return Analysis {
            contract: None,
            diagnostics: ctx.diagnostics,
        };
    };
    debug!(contract = %main.name, "selected main contract");

    let chain = inheritance_chain(unit, main, &mut ctx);

    // One shared root scope for the whole chain so child bodies see
    // parent fields and methods.
    for decl in &chain {
        declare_contract_surface(decl, &mut ctx);
    }

    let mut built: Option<IrContract> = None;
    for decl in &chain {
        let mut contract = build_contract(decl, &mut ctx);
        contract.parent = built.take().map(Box::new);
        built = Some(contract);
    }
    let mut contract = built.expect("chain always contains the main contract");

    // Unit-level declarations belong to the main contract alone so the
    // merge cannot duplicate them.
    contract.structs = ctx.structs.values().cloned().collect();
    contract.events = ctx.events.values().cloned().collect();
    contract.errors = ctx.errors.values().cloned().collect();

    let mut merged = flatten(contract);

    let layout_line = merged.storage.first().map(|f| f.line).unwrap_or(main.line);
    if let Err(err) = assign_layout(&mut merged) {
        ctx.error(DiagCode::Layout, err.to_string(), layout_line);
    }

    Analysis {
        contract: Some(merged),
        diagnostics: ctx.diagnostics,
    }
}

/// The main contract is the last one that no other contract extends.
fn main_contract<'a>(unit: &'a SourceUnit) -> Option<&'a ContractDecl> {
    unit.contracts
        .iter()
        .rev()
        .find(|c| !unit.contracts.iter().any(|other| other.parent.as_deref() == Some(&c.name)))
        .or_else(|| unit.contracts.last())
}

/// Walk `extends` links from the main contract upward and return the
/// chain root-first. Unknown parents and cycles end the walk with a
/// diagnostic.
fn inheritance_chain<'a>(
    unit: &'a SourceUnit,
    main: &'a ContractDecl,
    ctx: &mut AnalysisContext,
) -> Vec<&'a ContractDecl> {
    let mut chain = vec![main];
    let mut current = main;
    while let Some(parent_name) = &current.parent {
        if chain.iter().any(|c| &c.name == parent_name) {
            ctx.error(
                DiagCode::Semantic,
                format!("inheritance cycle through `{}`", parent_name),
                current.line,
            );
            break;
        }
        match unit.contract(parent_name) {
            Some(parent) => {
                chain.push(parent);
                current = parent;
            }
            None => {
                ctx.error(
                    DiagCode::Semantic,
                    format!("unknown parent contract `{}`", parent_name),
                    current.line,
                );
                break;
            }
        }
    }
    chain.reverse();
    chain
}

/// Register unit-level structs, events and errors before any contract is
/// touched; bodies reference them by bare name.
fn register_declarations(unit: &SourceUnit, ctx: &mut AnalysisContext) {
    for decl in &unit.structs {
        let fields = decl
            .fields
            .iter()
            .map(|f| StructFieldDef {
                name: f.name.clone(),
                ty: resolve_type(&f.ty, ctx, f.line),
                offset: 0,
            })
            .collect();
        let def = StructDef {
            name: decl.name.clone(),
            fields,
            line: decl.line,
        };
        if ctx.structs.insert(decl.name.clone(), def).is_some() {
            ctx.error(
                DiagCode::Semantic,
                format!("struct `{}` is declared twice", decl.name),
                decl.line,
            );
        }
    }

    for decl in &unit.events {
        let params = decl
            .params
            .iter()
            .map(|p| EventParam {
                name: p.name.clone(),
                ty: resolve_type(&p.ty, ctx, p.line),
                indexed: p.indexed,
            })
            .collect();
        let def = EventDef {
            name: decl.name.clone(),
            params,
            line: decl.line,
        };
        if ctx.events.insert(decl.name.clone(), def).is_some() {
            ctx.error(
                DiagCode::Semantic,
                format!("event `{}` is declared twice", decl.name),
                decl.line,
            );
        }
    }

    for decl in &unit.errors {
        let params = decl
            .params
            .iter()
            .map(|p| Param::new(p.name.clone(), resolve_type(&p.ty, ctx, p.line)))
            .collect();
        let def = ErrorDef {
            name: decl.name.clone(),
            params,
            line: decl.line,
        };
        if ctx.errors.insert(decl.name.clone(), def).is_some() {
            ctx.error(
                DiagCode::Semantic,
                format!("error `{}` is declared twice", decl.name),
                decl.line,
            );
        }
    }
}

#[cfg(test)]
mod tests;
