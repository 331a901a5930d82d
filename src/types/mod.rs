//! Data types shared across the layout engine.

mod binding;
mod path;
mod span;
mod summary;

pub use binding::*;
pub use path::*;
pub use span::*;
pub use summary::*;
