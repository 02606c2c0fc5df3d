//! Editor core for a three-level question sheet: Topics hold Subtopics,
//! Subtopics hold Questions, and Topics and Subtopics can be reordered by
//! dragging.
//!
//! [`application::OutlineStore`] owns the forest and exposes the full set of
//! operations; [`application::seed`] shapes the public sheet payload into an
//! initial forest; [`cli`] is a terminal front end driving the store.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{OutlineStore, SeedOutcome};
pub use domain::{Command, DomainError, Forest, Question, Subtopic, Topic};
