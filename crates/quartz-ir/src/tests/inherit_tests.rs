use crate::contract::{IrContract, IrMethod, StorageField, Visibility};
use crate::inherit::flatten;
use crate::types::Type;
use pretty_assertions::assert_eq;

fn method(name: &str, visibility: Visibility) -> IrMethod {
    IrMethod {
        name: name.to_string(),
        visibility,
        params: Vec::new(),
        return_type: Type::Void,
        body: Vec::new(),
        is_constructor: false,
        line: 1,
    }
}

fn field(name: &str) -> StorageField {
    StorageField {
        name: name.to_string(),
        ty: Type::U256,
        slot: None,
        line: 1,
    }
}

#[test]
fn test_no_parent_is_identity() {
    let mut contract = IrContract::new("Solo");
    contract.methods.push(method("run", Visibility::Public));

    let merged = flatten(contract.clone());
    assert_eq!(merged, contract);
}

#[test]
fn test_parent_methods_come_first() {
    let mut parent = IrContract::new("Parent");
    parent.methods.push(method("a", Visibility::Public));
    parent.methods.push(method("b", Visibility::Internal));

    let mut child = IrContract::new("Child");
    child.methods.push(method("c", Visibility::External));
    child.parent_name = Some("Parent".to_string());
    child.parent = Some(Box::new(parent));

    let merged = flatten(child);
    let names: Vec<&str> = merged.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_view_methods_are_not_inherited() {
    let mut parent = IrContract::new("Parent");
    parent.methods.push(method("peek", Visibility::View));
    parent.methods.push(method("poke", Visibility::External));

    let mut child = IrContract::new("Child");
    child.parent = Some(Box::new(parent));

    let merged = flatten(child);
    let names: Vec<&str> = merged.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["poke"]);
}

#[test]
fn test_same_named_methods_are_not_deduplicated() {
    let mut parent = IrContract::new("Parent");
    parent.methods.push(method("total", Visibility::Public));

    let mut child = IrContract::new("Child");
    child.methods.push(method("total", Visibility::Public));
    child.parent = Some(Box::new(parent));

    let merged = flatten(child);
    let names: Vec<&str> = merged.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["total", "total"]);
}

#[test]
fn test_storage_is_parent_then_child() {
    let mut parent = IrContract::new("Parent");
    parent.storage.push(field("value"));

    let mut child = IrContract::new("Child");
    child.storage.push(field("extra"));
    child.parent = Some(Box::new(parent));

    let merged = flatten(child);
    let names: Vec<&str> = merged.storage.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["value", "extra"]);
}

#[test]
fn test_multi_level_chain_flattens_depth_first() {
    let mut grandparent = IrContract::new("A");
    grandparent.storage.push(field("a"));
    grandparent.methods.push(method("fa", Visibility::Public));

    let mut parent = IrContract::new("B");
    parent.storage.push(field("b"));
    parent.methods.push(method("fb", Visibility::Public));
    parent.parent = Some(Box::new(grandparent));

    let mut child = IrContract::new("C");
    child.storage.push(field("c"));
    child.methods.push(method("fc", Visibility::Public));
    child.parent = Some(Box::new(parent));

    let merged = flatten(child);
    let fields: Vec<&str> = merged.storage.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["a", "b", "c"]);
    let methods: Vec<&str> = merged.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["fa", "fb", "fc"]);
    assert!(merged.parent.is_none());
}
