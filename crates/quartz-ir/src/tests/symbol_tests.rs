use crate::symbols::{Symbol, SymbolTable, VariableSymbol};
use crate::types::Type;
use crate::IrError;
use pretty_assertions::assert_eq;

fn local(name: &str, ty: Type) -> Symbol {
    Symbol::Variable(VariableSymbol::local(name, ty))
}

#[test]
fn test_lookup_innermost_first() {
    let mut table = SymbolTable::new();
    table.declare(local("x", Type::U256)).unwrap();

    table.push_scope();
    table.declare(local("x", Type::Bool)).unwrap();

    let found = table.lookup("x").unwrap().as_variable().unwrap();
    assert_eq!(found.ty, Type::Bool);

    table.pop_scope();
    let found = table.lookup("x").unwrap().as_variable().unwrap();
    assert_eq!(found.ty, Type::U256);
}

#[test]
fn test_duplicate_in_same_scope_rejected() {
    let mut table = SymbolTable::new();
    table.declare(local("total", Type::U256)).unwrap();

    let err = table.declare(local("total", Type::U256)).unwrap_err();
    assert!(matches!(err, IrError::DuplicateSymbol { name } if name == "total"));
}

#[test]
fn test_shadowing_across_scopes_allowed() {
    let mut table = SymbolTable::new();
    table.declare(local("owner", Type::Address)).unwrap();

    table.push_scope();
    assert!(table.declare(local("owner", Type::Address)).is_ok());
}

#[test]
fn test_lookup_walks_to_outer_scopes() {
    let mut table = SymbolTable::new();
    table.declare(local("value", Type::U256)).unwrap();

    table.push_scope();
    table.push_scope();
    assert!(table.lookup("value").is_some());
    assert!(table.lookup("missing").is_none());
}

#[test]
fn test_root_scope_is_never_popped() {
    let mut table = SymbolTable::new();
    table.declare(local("value", Type::U256)).unwrap();

    table.pop_scope();
    table.pop_scope();
    assert_eq!(table.depth(), 1);
    assert!(table.lookup("value").is_some());
}

#[test]
fn test_storage_symbol_captures_mapping_value_type() {
    let ty = Type::Mapping(Box::new(Type::Address), Box::new(Type::U256));
    let sym = VariableSymbol::storage("balances", ty);
    assert_eq!(sym.value_ty, Some(Type::U256));
}
