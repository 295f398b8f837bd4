//! Skill collection module
//!
//! A skill is a directory under the skills root holding a single markdown
//! document. This module owns name handling and every filesystem operation
//! on that layout.

mod error;
mod name;
mod store;

pub use error::StoreError;
pub use store::SkillStore;
