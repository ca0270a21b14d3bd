use quartz_ir::{Diagnostics, IrContract, Type};

/// Mutable state threaded through one emission run: the temp counter,
/// the warning sink, and the contract being generated.
pub struct GenContext<'a> {
    pub contract: &'a IrContract,
    pub temps: TempAllocator,
    pub warnings: Diagnostics,
    pub file: String,
    /// Line of the method currently being emitted; IR expressions carry
    /// no position of their own, so warnings point here.
    pub current_line: usize,
}

impl<'a> GenContext<'a> {
    pub fn new(contract: &'a IrContract, file: impl Into<String>) -> Self {
        Self {
            contract,
            temps: TempAllocator::new(),
            warnings: Diagnostics::new(),
            file: file.into(),
            current_line: 0,
        }
    }
}

/// Allocates `_t<N>` names. Reset at each function boundary so the
/// numbering inside a function never depends on what was emitted before
/// it.
#[derive(Debug, Default)]
pub struct TempAllocator {
    next: u32,
}

impl TempAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn fresh(&mut self) -> String {
        let name = format!("_t{}", self.next);
        self.next += 1;
        name
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Spelling of an IR type in the generated source. Mappings never
/// materialize as values, so they degrade to a bare word.
pub fn c_type(ty: &Type) -> String {
    match ty {
        Type::Mapping(_, _) | Type::Function(_) => "u256".to_string(),
        other => other.target_name(),
    }
}

/// Runtime helper prefix for a word-like type (`u256_copy`, `addr_eq`
/// and friends).
pub fn runtime_prefix(ty: &Type) -> &'static str {
    match ty {
        Type::I256 => "i256",
        Type::Address => "addr",
        Type::Bytes => "bytes",
        _ => "u256",
    }
}
