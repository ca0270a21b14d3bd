use crate::contract::{IrContract, StorageField, StructDef, StructFieldDef};
use crate::layout::{assign_layout, assign_struct_offsets};
use crate::types::Type;
use crate::IrError;
use pretty_assertions::assert_eq;

fn field(name: &str, ty: Type) -> StorageField {
    StorageField {
        name: name.to_string(),
        ty,
        slot: None,
        line: 1,
    }
}

fn struct_field(name: &str, ty: Type) -> StructFieldDef {
    StructFieldDef {
        name: name.to_string(),
        ty,
        offset: 0,
    }
}

#[test]
fn test_slots_follow_declaration_order() {
    let mut contract = IrContract::new("Vault");
    contract.storage.push(field("owner", Type::Address));
    contract.storage.push(field("total", Type::U256));
    contract.storage.push(field("open", Type::Bool));

    assign_layout(&mut contract).unwrap();

    let slots: Vec<u32> = contract.storage.iter().map(|f| f.slot.unwrap()).collect();
    assert_eq!(slots, vec![0, 1, 2]);
}

#[test]
fn test_one_slot_per_field_regardless_of_width() {
    let mut contract = IrContract::new("Flags");
    contract.storage.push(field("a", Type::Bool));
    contract.storage.push(field("b", Type::Bool));

    assign_layout(&mut contract).unwrap();
    assert_eq!(contract.storage[1].slot, Some(1));
}

#[test]
fn test_appending_a_field_keeps_earlier_slots() {
    let mut contract = IrContract::new("Vault");
    contract.storage.push(field("total", Type::U256));
    assign_layout(&mut contract).unwrap();
    let first = contract.storage[0].slot;

    contract.storage.push(field("added", Type::U256));
    assign_layout(&mut contract).unwrap();
    assert_eq!(contract.storage[0].slot, first);
    assert_eq!(contract.storage[1].slot, Some(1));
}

#[test]
fn test_struct_offsets_align_to_natural_alignment() {
    let mut def = StructDef {
        name: "UserInfo".to_string(),
        fields: vec![
            struct_field("age", Type::U256),
            struct_field("active", Type::Bool),
        ],
        line: 1,
    };

    assign_struct_offsets(&mut def).unwrap();
    assert_eq!(def.fields[0].offset, 0);
    assert_eq!(def.fields[1].offset, 32);
    assert_eq!(def.byte_size(), 33);
}

#[test]
fn test_bool_then_word_pads_to_alignment() {
    let mut def = StructDef {
        name: "Pair".to_string(),
        fields: vec![
            struct_field("flag", Type::Bool),
            struct_field("amount", Type::U256),
        ],
        line: 1,
    };

    assign_struct_offsets(&mut def).unwrap();
    assert_eq!(def.fields[0].offset, 0);
    assert_eq!(def.fields[1].offset, 32);
}

#[test]
fn test_sizeless_struct_field_is_a_layout_error() {
    let mut def = StructDef {
        name: "Bad".to_string(),
        fields: vec![struct_field(
            "lookup",
            Type::Mapping(Box::new(Type::Address), Box::new(Type::U256)),
        )],
        line: 1,
    };

    let err = assign_struct_offsets(&mut def).unwrap_err();
    assert!(matches!(err, IrError::Layout { .. }));
}
