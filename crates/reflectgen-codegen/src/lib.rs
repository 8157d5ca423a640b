//! AST selection, emission, and writing (C2, C6, C7) tying the front-end
//! driver and semantic model together into one `binding` invocation.

pub mod emit;
pub mod pipeline;
pub mod walker;
pub mod writer;

pub use emit::{generate_run_id, Emitter};
pub use pipeline::run_binding;
pub use walker::select_classes;
pub use writer::write_outputs;
