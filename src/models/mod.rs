//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod problem;
pub mod problem_file;
pub mod test_case;
pub mod test_group;
pub mod user;

pub use problem::*;
pub use problem_file::*;
pub use test_case::*;
pub use test_group::*;
pub use user::*;
