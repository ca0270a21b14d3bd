//! Handler chains, one per value category. The first handler in a chain
//! that claims an expression emits it; registration order is therefore
//! part of the engine's behavior and stays fixed.

pub mod bools;
pub mod calls;
pub mod env;
pub mod events;
pub mod mappings;
pub mod structs;
pub mod words;

use crate::engine::{Category, Engine, Handler};
use bools::{
    BoolAssignHandler, BoolLiteralHandler, BoolLocalReadHandler, BoolStorageLoadHandler,
    BoolStoreHandler, CompareHandler, LogicHandler, NotHandler,
};
use calls::MethodCallHandler;
use env::EnvHandler;
use events::EventEmitHandler;
use mappings::{MapGetHandler, MapSetHandler};
use structs::{
    StructAssignHandler, StructGetHandler, StructLocalReadHandler, StructNewHandler,
    StructSetHandler, StructStorageLoadHandler, StructStoreHandler,
};
use words::{
    address_family, bytes_family, int_family, uint_family, ArithHandler, AssignHandler,
    BytesLiteralHandler, Family, LocalReadHandler, NegHandler, NumberLiteralHandler,
    StorageLoadHandler, StoreHandler,
};

fn word_chain(family: fn() -> Family, with_arith: bool) -> Vec<Box<dyn Handler>> {
    let mut chain: Vec<Box<dyn Handler>> = vec![
        Box::new(NumberLiteralHandler(family())),
        Box::new(StorageLoadHandler(family())),
        Box::new(LocalReadHandler(family())),
        Box::new(StoreHandler(family())),
        Box::new(AssignHandler(family())),
    ];
    if with_arith {
        chain.push(Box::new(ArithHandler(family())));
        chain.push(Box::new(NegHandler(family())));
    }
    chain.push(Box::new(MethodCallHandler));
    chain
}

/// The engine with every stock chain registered.
pub fn default_engine() -> Engine {
    let bool_chain: Vec<Box<dyn Handler>> = vec![
        Box::new(BoolLiteralHandler),
        Box::new(BoolStorageLoadHandler),
        Box::new(BoolLocalReadHandler),
        Box::new(BoolStoreHandler),
        Box::new(BoolAssignHandler),
        Box::new(CompareHandler),
        Box::new(LogicHandler),
        Box::new(NotHandler),
        Box::new(MethodCallHandler),
    ];

    let mut bytes_chain = word_chain(bytes_family, false);
    bytes_chain.insert(0, Box::new(BytesLiteralHandler));

    let struct_chain: Vec<Box<dyn Handler>> = vec![
        Box::new(StructNewHandler),
        Box::new(StructGetHandler),
        Box::new(StructSetHandler),
        Box::new(StructLocalReadHandler),
        Box::new(StructStorageLoadHandler),
        Box::new(StructStoreHandler),
        Box::new(StructAssignHandler),
        Box::new(MethodCallHandler),
    ];

    Engine::new(vec![
        (Category::Uint, word_chain(uint_family, true)),
        (Category::Int, word_chain(int_family, true)),
        (Category::Address, word_chain(address_family, false)),
        (Category::Bool, bool_chain),
        (Category::Bytes, bytes_chain),
        (Category::Struct, struct_chain),
        (
            Category::Mapping,
            vec![Box::new(MapGetHandler), Box::new(MapSetHandler)],
        ),
        (Category::Event, vec![Box::new(EventEmitHandler)]),
        (Category::Env, vec![Box::new(EnvHandler)]),
        (Category::Unit, vec![Box::new(MethodCallHandler)]),
    ])
}
