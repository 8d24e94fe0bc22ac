pub mod entity;
pub mod matched;
pub mod program;
pub mod project;
pub mod types;

pub use entity::*;
pub use matched::*;
pub use program::*;
pub use project::*;
pub use types::*;
