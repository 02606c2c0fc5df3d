//! Domain layer: the outline tree and its operations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod command;
pub mod entities;
pub mod error;
pub mod ids;
pub mod reorder;

pub use command::{Applied, Command};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use reorder::{array_move, move_within};
