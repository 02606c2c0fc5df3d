//! Application layer: the store and its collaborators
//!
//! This layer owns the outline state and depends on I/O boundary traits.

pub mod drag;
pub mod error;
pub mod error_ext;
pub mod render;
pub mod seed;
pub mod store;

pub use drag::{drop_subtopic, drop_topic, plan_reorder, DragEnd};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::ResultExt;
pub use render::TreeConvert;
pub use seed::{bootstrap, SeedOutcome};
pub use store::OutlineStore;
