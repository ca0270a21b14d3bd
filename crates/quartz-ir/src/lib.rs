/*! IR data model for the Quartz contract compiler.
 *
 * Analysis turns a parsed contract class into the typed tree defined here;
 * the inheritance mixer and storage layout assigner then produce the final
 * contract that code generation consumes. Everything downstream of the
 * parser speaks in these types.
 */

pub mod contract;
pub mod diagnostics;
pub mod inherit;
pub mod layout;
pub mod symbols;
pub mod types;

pub use contract::{
    ErrorDef, EventDef, EventParam, IrContract, IrExpression, IrMethod, IrStatement, Literal,
    Param, Scope, StorageField, StructDef, StructFieldDef, Visibility,
};
pub use diagnostics::{DiagCode, Diagnostic, Diagnostics, Level};
pub use inherit::{flatten, mix};
pub use layout::assign_layout;
pub use symbols::{FunctionSymbol, StructSymbol, Symbol, SymbolTable, VariableSymbol};
pub use types::{FunctionType, Type};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("duplicate symbol `{name}` in the same scope")]
    DuplicateSymbol { name: String },
    #[error("layout error: {message}")]
    Layout { message: String },
    #[error("unknown type `{0}`")]
    UnknownType(String),
}

pub type Result<T> = std::result::Result<T, IrError>;

#[cfg(test)]
mod tests;
