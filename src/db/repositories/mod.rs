//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod problem_file_repo;
pub mod problem_repo;
pub mod test_repo;
pub mod user_repo;

pub use problem_file_repo::ProblemFileRepository;
pub use problem_repo::{NewProblem, ProblemChanges, ProblemRepository};
pub use test_repo::TestRepository;
pub use user_repo::UserRepository;
