use crate::contract::{IrContract, StructDef};
use crate::IrError;

/// Assign storage slots and struct field offsets for a merged contract.
///
/// Slots are the 0-based position of each field in the merged storage
/// list, one slot per top-level field regardless of byte width. The
/// conservative policy keeps slot numbers stable: appending a field never
/// moves an earlier one.
pub fn assign_layout(contract: &mut IrContract) -> Result<(), IrError> {
    for (index, field) in contract.storage.iter_mut().enumerate() {
        field.slot = Some(index as u32);
    }
    for def in contract.structs.iter_mut() {
        assign_struct_offsets(def)?;
    }
    Ok(())
}

/// Pack struct fields in declaration order. Each field lands at the
/// running byte offset rounded up to its natural alignment.
pub fn assign_struct_offsets(def: &mut StructDef) -> Result<(), IrError> {
    let mut offset = 0u32;
    for field in def.fields.iter_mut() {
        let size = field.ty.size_bytes().ok_or_else(|| IrError::Layout {
            message: format!(
                "field `{}` of struct `{}` has type `{}` with no defined size",
                field.name, def.name, field.ty
            ),
        })?;
        let align = field.ty.align_bytes().unwrap_or(1);
        offset = align_up(offset, align);
        field.offset = offset;
        offset += size;
    }
    Ok(())
}

fn align_up(offset: u32, align: u32) -> u32 {
    debug_assert!(align.is_power_of_two());
    (offset + align - 1) & !(align - 1)
}
