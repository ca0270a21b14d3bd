/*! Target code generation for the Quartz contract compiler.
 *
 * Takes the flattened, layout-assigned IR contract and emits one C-like
 * source file plus a JSON ABI. Expression emission runs through a chain
 * of handlers per value category; anything no handler claims degrades to
 * a placeholder with a warning rather than failing the run.
 */

pub mod abi;
pub mod accessors;
pub mod context;
pub mod dispatch;
pub mod engine;
pub mod functions;
pub mod handlers;
pub mod module;
pub mod writer;

pub use abi::{abi_signature, selector, AbiEntry, AbiParam};
pub use context::{c_type, GenContext, TempAllocator};
pub use engine::{category_of, Category, Emitted, Engine, FallbackHandler, Handler};
pub use handlers::default_engine;
pub use module::{generate, CodegenError, CodegenOutput};
pub use writer::CodeWriter;
