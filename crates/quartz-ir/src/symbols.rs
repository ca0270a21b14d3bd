use crate::contract::Scope as ValueScope;
use crate::types::Type;
use crate::{contract::StructDef, IrError};
use indexmap::IndexMap;

/// One resolvable name. Variables carry their value scope so the
/// expression builder knows whether a read must go through a storage
/// accessor; `value_ty` holds the mapping value type when relevant.
#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(VariableSymbol),
    Struct(StructSymbol),
    Function(FunctionSymbol),
}

#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: Type,
    pub value_ty: Option<Type>,
    pub scope: ValueScope,
    pub length: Option<u32>,
}

impl VariableSymbol {
    pub fn local(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            value_ty: None,
            scope: ValueScope::Memory,
            length: None,
        }
    }

    pub fn storage(name: impl Into<String>, ty: Type) -> Self {
        let value_ty = match &ty {
            Type::Mapping(_, value) => Some((**value).clone()),
            _ => None,
        };
        Self {
            name: name.into(),
            ty,
            value_ty,
            scope: ValueScope::Storage,
            length: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructSymbol {
    pub name: String,
    pub def: StructDef,
}

#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: String,
    pub declared: bool,
    pub ret: Type,
    pub params: Vec<Type>,
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Struct(s) => &s.name,
            Symbol::Function(f) => &f.name,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }
}

/// A stack of lexical scopes. Lookup walks innermost-first; declaring the
/// same name twice at one level is an error, while shadowing an outer
/// binding is not. Storage symbols land in the root scope before any
/// method body is analyzed, so forward references resolve regardless of
/// declaration order in source.
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<IndexMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![IndexMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn pop_scope(&mut self) {
        // The root scope holds contract-level symbols and is never popped.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare(&mut self, symbol: Symbol) -> Result<(), IrError> {
        let scope = self
            .scopes
            .last_mut()
            .expect("symbol table always has a root scope");
        let name = symbol.name().to_string();
        if scope.contains_key(&name) {
            return Err(IrError::DuplicateSymbol { name });
        }
        scope.insert(name, symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
