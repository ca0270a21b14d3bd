use indexmap::IndexMap;
use quartz_ir::{
    DiagCode, Diagnostics, ErrorDef, EventDef, IrError, StructDef, Symbol, SymbolTable,
};

/// Shared state for one analysis run: the scoped symbol table, the
/// diagnostics sink, and registries for the declarations that live
/// alongside the contract in the source unit.
pub struct AnalysisContext {
    pub file: String,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    pub structs: IndexMap<String, StructDef>,
    pub events: IndexMap<String, EventDef>,
    pub errors: IndexMap<String, ErrorDef>,
}

impl AnalysisContext {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            structs: IndexMap::new(),
            events: IndexMap::new(),
            errors: IndexMap::new(),
        }
    }

    pub fn error(&mut self, code: DiagCode, message: impl Into<String>, line: usize) {
        let file = self.file.clone();
        self.diagnostics.error(code, message, &file, line);
    }

    pub fn warning(&mut self, code: DiagCode, message: impl Into<String>, line: usize) {
        let file = self.file.clone();
        self.diagnostics.warning(code, message, &file, line);
    }

    /// Declare into the current scope, downgrading a duplicate to a
    /// semantic diagnostic so analysis keeps going.
    pub fn declare(&mut self, symbol: Symbol, line: usize) {
        if let Err(IrError::DuplicateSymbol { name }) = self.symbols.declare(symbol) {
            self.error(
                DiagCode::Semantic,
                format!("`{}` is already declared in this scope", name),
                line,
            );
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.lookup(name)
    }
}
