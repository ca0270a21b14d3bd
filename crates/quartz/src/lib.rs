/*! Unified interface for the Quartz contract compiler.
 *
 * Single import for the whole pipeline: parsing the annotated class
 * syntax, analysis into the merged IR contract, and generation of the
 * target source plus ABI. [`compile`] runs all of it in one call.
 */

pub use quartz_analyze as analyze;
pub use quartz_codegen as codegen;
pub use quartz_ir as ir;
pub use quartz_parser as parser;

pub use quartz_analyze::analyze_source;
pub use quartz_codegen::{generate, CodegenOutput};
pub use quartz_ir::{Diagnostic, Diagnostics, IrContract, Level, Type};
pub use quartz_parser::parse_source;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    /// Analysis reported errors; the diagnostics carry the details.
    #[error("compilation failed with {} error(s)", .diagnostics.error_count())]
    Analysis { diagnostics: Diagnostics },
    #[error(transparent)]
    Codegen(#[from] quartz_codegen::CodegenError),
}

/// The result of a clean compilation: the generated target source, the
/// JSON ABI, the merged IR contract, and any warnings the run produced.
#[derive(Debug)]
pub struct CompileOutput {
    pub target_source: String,
    pub abi_json: String,
    pub contract: IrContract,
    pub diagnostics: Diagnostics,
}

/// Compile one source file end to end.
pub fn compile(source: &str, file: &str) -> Result<CompileOutput, CompileError> {
    let analysis = analyze_source(source, file);
    let contract = match analysis.contract {
        Some(contract) if !analysis.diagnostics.has_errors() => contract,
        _ => {
            return Err(CompileError::Analysis {
                diagnostics: analysis.diagnostics,
            })
        }
    };

    let generated = generate(&contract, &analysis.diagnostics, file)?;

    let mut diagnostics = analysis.diagnostics;
    diagnostics.extend(generated.warnings);

    Ok(CompileOutput {
        target_source: generated.source,
        abi_json: generated.abi,
        contract,
        diagnostics,
    })
}
