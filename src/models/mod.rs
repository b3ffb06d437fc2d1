pub mod common;
pub mod edit;
pub mod envelope;
pub mod generation;

pub use common::*;
pub use edit::*;
pub use envelope::*;
pub use generation::*;
