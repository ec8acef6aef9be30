//! Shared utilities.

pub mod context;
pub mod diagnostic;
pub mod interning;

pub use context::GlobalContext;
pub use diagnostic::{BrokerError, Diagnostic};
pub use interning::InternedString;
