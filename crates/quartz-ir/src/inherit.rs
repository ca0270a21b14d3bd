use crate::contract::{IrContract, Visibility};

/// Flatten a contract's inheritance chain into a single merged contract.
///
/// Parents are merged depth-first, so a grandparent's items land ahead of
/// the parent's, which land ahead of the child's. Each level is one call
/// to [`mix`].
pub fn flatten(mut contract: IrContract) -> IrContract {
    match contract.parent.take() {
        None => contract,
        Some(parent) => {
            let parent = flatten(*parent);
            mix(contract, &parent)
        }
    }
}

/// Merge one parent into a child. Parent methods visible to descendants
/// (public, external, internal) are placed ahead of the child's own, and
/// the storage/event/struct/error lists are parent-then-child in
/// declaration order. Same-named entries on both sides are kept as two
/// entries; the merge does not implement override semantics.
pub fn mix(child: IrContract, parent: &IrContract) -> IrContract {
    let mut merged = IrContract::new(child.name.clone());

    merged.methods = parent
        .methods
        .iter()
        .filter(|m| {
            matches!(
                m.visibility,
                Visibility::Public | Visibility::External | Visibility::Internal
            )
        })
        .cloned()
        .collect();
    merged.methods.extend(child.methods);

    merged.storage = parent.storage.clone();
    merged.storage.extend(child.storage);

    merged.structs = parent.structs.clone();
    merged.structs.extend(child.structs);

    merged.events = parent.events.clone();
    merged.events.extend(child.events);

    merged.errors = parent.errors.clone();
    merged.errors.extend(child.errors);

    merged.parent_name = child.parent_name;
    merged
}
