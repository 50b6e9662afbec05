//! Module resolution
//!
//! Two-phase protocol: a top-level request (`/<name>.js`) resolves the
//! module's entry file and issues a [`ModuleContext`]; later requests
//! triggered by relative imports recover that context from the cookie
//! and resolve against the entry file's directory, never leaving the
//! trusted root.

pub mod classifier;
pub mod context;
pub mod error;
pub mod module;
pub mod relative;

pub use classifier::{classify, RequestKind};
pub use context::{ContextCarrier, ModuleContext};
pub use error::ResolveError;
pub use module::{resolve_module, ResolvedModule};
pub use relative::resolve_relative;
