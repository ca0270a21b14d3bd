//! Whole-module generation: orders the sections of the output file and
//! refuses to run over a contract that still carries error diagnostics.

use crate::abi::{build_abi, to_json};
use crate::accessors::{
    emit_error_helper, emit_event_helper, emit_prelude, emit_storage_accessors, emit_struct,
};
use crate::context::GenContext;
use crate::dispatch::{emit_deploy, emit_dispatch};
use crate::functions::emit_method;
use crate::handlers::default_engine;
use crate::writer::CodeWriter;
use quartz_ir::{DiagCode, Diagnostics, IrContract, IrMethod};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("refusing to generate code over {count} error diagnostic(s)")]
    HasErrors { count: usize },
    #[error("abi serialization failed: {0}")]
    Abi(#[from] serde_json::Error),
}

/// Everything one compilation produces for a contract.
#[derive(Debug, Clone)]
pub struct CodegenOutput {
    pub source: String,
    pub abi: String,
    pub warnings: Diagnostics,
}

/// Generate the target source and ABI for a flattened, layout-assigned
/// contract.
#[instrument(skip_all, fields(contract = %contract.name))]
pub fn generate(
    contract: &IrContract,
    diagnostics: &Diagnostics,
    file: &str,
) -> Result<CodegenOutput, CodegenError> {
    if diagnostics.has_errors() {
        return Err(CodegenError::HasErrors {
            count: diagnostics.error_count(),
        });
    }

    let engine = default_engine();
    let mut ctx = GenContext::new(contract, file);
    let mut out = CodeWriter::new();

    emit_prelude(&ctx, &mut out);
    for def in &contract.structs {
        emit_struct(def, &mut out);
    }
    for field in &contract.storage {
        emit_storage_accessors(field, &ctx, &mut out);
    }
    for event in &contract.events {
        emit_event_helper(event, &mut out);
    }
    for error in &contract.errors {
        emit_error_helper(error, &mut out);
    }

    let methods = last_definitions(contract, &mut ctx);
    debug!(count = methods.len(), "emitting methods");
    for method in &methods {
        emit_method(method, &engine, &mut ctx, &mut out);
        out.blank();
    }

    emit_deploy(&methods, &ctx, &mut out);
    emit_dispatch(&methods, &ctx, &mut out);

    let abi = to_json(&build_abi(contract, &methods))?;
    Ok(CodegenOutput {
        source: out.finish(),
        abi,
        warnings: ctx.warnings,
    })
}

/// The merge keeps every same-named method; emission keeps only the last
/// of each name, so a child override replaces the inherited body. Each
/// shadowed definition turns into a warning.
fn last_definitions<'c>(contract: &'c IrContract, ctx: &mut GenContext) -> Vec<&'c IrMethod> {
    let mut kept: Vec<&IrMethod> = Vec::new();
    for method in &contract.methods {
        if let Some(pos) = kept.iter().position(|m| m.name == method.name) {
            let file = ctx.file.clone();
            ctx.warnings.warning(
                DiagCode::Semantic,
                format!(
                    "`{}` is defined more than once after inheritance; keeping the last definition",
                    method.name
                ),
                &file,
                method.line,
            );
            kept.remove(pos);
        }
        kept.push(method);
    }
    kept
}
