use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed catalogue of value categories the compiler supports.
///
/// There is deliberately no numeric tower: integers are 256-bit, full stop.
/// Every value in the target language is either a raw storage word or a
/// heap-resident runtime object, and this enum is the single source of truth
/// for how each category is sized, aligned, named externally, and named in
/// generated target source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    U256,
    I256,
    Address,
    Bool,
    Bytes,
    Struct(String),
    Mapping(Box<Type>, Box<Type>),
    Void,
    Function(Box<FunctionType>),
}

impl Type {
    /// Byte width used for struct packing. `None` for categories that have
    /// no in-place representation (mappings, void, functions).
    pub fn size_bytes(&self) -> Option<u32> {
        match self {
            Type::U256 | Type::I256 => Some(32),
            Type::Address => Some(20),
            Type::Bool => Some(1),
            Type::Bytes => Some(32),
            Type::Struct(_) => Some(32),
            Type::Mapping(_, _) | Type::Void | Type::Function(_) => None,
        }
    }

    /// Natural power-of-two alignment for struct packing.
    pub fn align_bytes(&self) -> Option<u32> {
        match self {
            Type::U256 | Type::I256 => Some(32),
            Type::Address => Some(32),
            Type::Bool => Some(1),
            Type::Bytes => Some(32),
            Type::Struct(_) => Some(32),
            Type::Mapping(_, _) | Type::Void | Type::Function(_) => None,
        }
    }

    /// Canonical name in the external ABI. Mappings are not externally
    /// encodable and structs encode as tuples.
    pub fn abi_name(&self) -> Option<String> {
        match self {
            Type::U256 => Some("uint256".to_string()),
            Type::I256 => Some("int256".to_string()),
            Type::Address => Some("address".to_string()),
            Type::Bool => Some("bool".to_string()),
            Type::Bytes => Some("bytes".to_string()),
            Type::Struct(_) => Some("tuple".to_string()),
            Type::Mapping(_, _) | Type::Void | Type::Function(_) => None,
        }
    }

    /// Type name in generated target-language source.
    pub fn target_name(&self) -> String {
        match self {
            Type::U256 => "u256".to_string(),
            Type::I256 => "i256".to_string(),
            Type::Address => "addr_t".to_string(),
            Type::Bool => "bool_t".to_string(),
            Type::Bytes => "bytes_t".to_string(),
            Type::Struct(name) => format!("{}*", name),
            Type::Mapping(_, _) => "mapping_t".to_string(),
            Type::Void => "void".to_string(),
            Type::Function(_) => "fn_t".to_string(),
        }
    }

    /// Heap-resident in the target: reads must be copied into a fresh
    /// temporary before any mutating operation touches them.
    pub fn is_reference_like(&self) -> bool {
        matches!(
            self,
            Type::U256 | Type::I256 | Type::Address | Type::Bytes | Type::Struct(_)
        )
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Type::Mapping(_, _))
    }

    /// Resolve a surface-language type name. Struct names are resolved by
    /// the analyzer against the declared struct set, not here.
    pub fn from_surface_name(name: &str) -> Option<Type> {
        match name {
            "u256" => Some(Type::U256),
            "i256" => Some(Type::I256),
            "address" => Some(Type::Address),
            "bool" => Some(Type::Bool),
            "bytes" | "string" => Some(Type::Bytes),
            "void" => Some(Type::Void),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::U256 => write!(f, "u256"),
            Type::I256 => write!(f, "i256"),
            Type::Address => write!(f, "address"),
            Type::Bool => write!(f, "bool"),
            Type::Bytes => write!(f, "bytes"),
            Type::Struct(name) => write!(f, "{}", name),
            Type::Mapping(key, value) => write!(f, "map<{}, {}>", key, value),
            Type::Void => write!(f, "void"),
            Type::Function(ft) => write!(f, "fn{}", ft),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub ret: Type,
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "({}) -> {}", params, self.ret)
    }
}
