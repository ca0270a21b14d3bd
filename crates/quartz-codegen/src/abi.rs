//! ABI description of the compiled contract: selectors for the dispatch
//! table and a JSON document listing every externally callable method,
//! event and error.

use quartz_ir::{IrContract, IrMethod, Type, Visibility};
use serde::Serialize;
use tiny_keccak::{Hasher, Keccak};

pub fn abi_type(ty: &Type) -> String {
    ty.abi_name().unwrap_or_else(|| "uint256".to_string())
}

/// Canonical signature text, e.g. `transfer(address,uint256)`.
pub fn abi_signature<'a>(name: &str, types: impl Iterator<Item = &'a Type>) -> String {
    let joined = types.map(|t| abi_type(t)).collect::<Vec<_>>().join(",");
    format!("{}({})", name, joined)
}

/// First four bytes of the keccak-256 of the canonical signature,
/// big-endian.
pub fn selector(signature: &str) -> u32 {
    let mut hasher = Keccak::v256();
    let mut digest = [0u8; 32];
    hasher.update(signature.as_bytes());
    hasher.finalize(&mut digest);
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

pub fn method_signature(method: &IrMethod) -> String {
    abi_signature(&method.name, method.params.iter().map(|p| &p.ty))
}

#[derive(Debug, Clone, Serialize)]
pub struct AbiParam {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    pub inputs: Vec<AbiParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<AbiParam>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

fn plain_param(name: &str, ty: &Type) -> AbiParam {
    AbiParam {
        name: name.to_string(),
        kind: abi_type(ty),
        indexed: None,
    }
}

/// Build the ABI for the flattened contract. `methods` is the already
/// deduplicated, order-preserving method list that codegen emits.
pub fn build_abi(contract: &IrContract, methods: &[&IrMethod]) -> Vec<AbiEntry> {
    let mut entries = Vec::new();

    if let Some(ctor) = methods.iter().rev().find(|m| m.is_constructor) {
        entries.push(AbiEntry {
            kind: "constructor".to_string(),
            name: None,
            visibility: Some(ctor.visibility.to_string()),
            inputs: ctor
                .params
                .iter()
                .map(|p| plain_param(&p.name, &p.ty))
                .collect(),
            outputs: None,
            state_mutability: Some("nonpayable".to_string()),
            selector: None,
        });
    }

    for method in methods {
        if method.is_constructor || !method.is_externally_callable() {
            continue;
        }
        let outputs = match &method.return_type {
            Type::Void => Vec::new(),
            ty => vec![plain_param("", ty)],
        };
        let mutability = if method.visibility == Visibility::View {
            "view"
        } else {
            "nonpayable"
        };
        entries.push(AbiEntry {
            kind: "function".to_string(),
            name: Some(method.name.clone()),
            visibility: Some(method.visibility.to_string()),
            inputs: method
                .params
                .iter()
                .map(|p| plain_param(&p.name, &p.ty))
                .collect(),
            outputs: Some(outputs),
            state_mutability: Some(mutability.to_string()),
            selector: Some(format!("0x{:08x}", selector(&method_signature(method)))),
        });
    }

    for event in &contract.events {
        entries.push(AbiEntry {
            kind: "event".to_string(),
            name: Some(event.name.clone()),
            visibility: None,
            inputs: event
                .params
                .iter()
                .map(|p| AbiParam {
                    name: p.name.clone(),
                    kind: abi_type(&p.ty),
                    indexed: Some(p.indexed),
                })
                .collect(),
            outputs: None,
            state_mutability: None,
            selector: None,
        });
    }

    for error in &contract.errors {
        entries.push(AbiEntry {
            kind: "error".to_string(),
            name: Some(error.name.clone()),
            visibility: None,
            inputs: error
                .params
                .iter()
                .map(|p| plain_param(&p.name, &p.ty))
                .collect(),
            outputs: None,
            state_mutability: None,
            selector: None,
        });
    }

    entries
}

pub fn to_json(entries: &[AbiEntry]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}
