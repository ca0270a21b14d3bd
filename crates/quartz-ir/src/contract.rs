use crate::types::Type;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A contract after analysis. `parent` forms a single-inheritance chain
/// that the mixer flattens before layout assignment; the item lists are
/// append-only during that merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrContract {
    pub name: String,
    pub storage: Vec<StorageField>,
    pub methods: Vec<IrMethod>,
    pub structs: Vec<StructDef>,
    pub events: Vec<EventDef>,
    pub errors: Vec<ErrorDef>,
    pub parent_name: Option<String>,
    pub parent: Option<Box<IrContract>>,
}

impl IrContract {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: Vec::new(),
            methods: Vec::new(),
            structs: Vec::new(),
            events: Vec::new(),
            errors: Vec::new(),
            parent_name: None,
            parent: None,
        }
    }

    pub fn storage_field(&self, name: &str) -> Option<&StorageField> {
        self.storage.iter().find(|f| f.name == name)
    }

    pub fn struct_def(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn event_def(&self, name: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn error_def(&self, name: &str) -> Option<&ErrorDef> {
        self.errors.iter().find(|e| e.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&IrMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constructor(&self) -> Option<&IrMethod> {
        self.methods.iter().find(|m| m.is_constructor)
    }
}

/// One top-level persistent field. `slot` is `None` until the layout
/// assigner has run over the merged contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageField {
    pub name: String,
    pub ty: Type,
    pub slot: Option<u32>,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    External,
    View,
    Internal,
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::External => write!(f, "external"),
            Visibility::View => write!(f, "view"),
            Visibility::Internal => write!(f, "internal"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrMethod {
    pub name: String,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Vec<IrStatement>,
    pub is_constructor: bool,
    pub line: usize,
}

impl IrMethod {
    /// Methods reachable from outside the contract, i.e. routed by the
    /// selector dispatcher and present in the ABI.
    pub fn is_externally_callable(&self) -> bool {
        matches!(
            self.visibility,
            Visibility::External | Visibility::View | Visibility::Public
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Whether a value lives in persistent storage (reads and writes go
/// through generated accessors) or in transient memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Storage,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(BigUint),
    Bool(bool),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrExpression {
    Literal {
        value: Literal,
        ty: Type,
    },
    Var {
        name: String,
        scope: Scope,
        ty: Type,
    },
    Member {
        object: Box<IrExpression>,
        property: String,
        ty: Type,
    },
    Call {
        target: String,
        receiver: Option<Box<IrExpression>>,
        args: Vec<IrExpression>,
        ret: Type,
        scope: Scope,
    },
    This,
}

impl IrExpression {
    pub fn ty(&self) -> Type {
        match self {
            IrExpression::Literal { ty, .. } => ty.clone(),
            IrExpression::Var { ty, .. } => ty.clone(),
            IrExpression::Member { ty, .. } => ty.clone(),
            IrExpression::Call { ret, .. } => ret.clone(),
            IrExpression::This => Type::Void,
        }
    }

    pub fn number(value: u64) -> Self {
        IrExpression::Literal {
            value: Literal::Number(BigUint::from(value)),
            ty: Type::U256,
        }
    }
}

/// Built once per method during analysis. Never mutated after code
/// generation begins; the inheritance mixer relocates whole methods only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IrStatement {
    Let {
        name: String,
        ty: Type,
        init: IrExpression,
        mutable: bool,
    },
    Expr(IrExpression),
    If {
        cond: IrExpression,
        then: Vec<IrStatement>,
        otherwise: Option<Vec<IrStatement>>,
    },
    Block(Vec<IrStatement>),
    DoWhile {
        body: Vec<IrStatement>,
        cond: IrExpression,
    },
    Return(Option<IrExpression>),
    Revert {
        error: String,
        args: Vec<IrExpression>,
    },
}

/// Field order is fixed at declaration and determines both the packed
/// layout and the generated accessor names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<StructFieldDef>,
    pub line: usize,
}

impl StructDef {
    pub fn field(&self, name: &str) -> Option<&StructFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Total packed size once offsets are assigned.
    pub fn byte_size(&self) -> u32 {
        self.fields
            .last()
            .map(|f| f.offset + f.ty.size_bytes().unwrap_or(0))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructFieldDef {
    pub name: String,
    pub ty: Type,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub name: String,
    pub params: Vec<EventParam>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParam {
    pub name: String,
    pub ty: Type,
    pub indexed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDef {
    pub name: String,
    pub params: Vec<Param>,
    pub line: usize,
}
