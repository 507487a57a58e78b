//! Business logic services

pub mod auth_service;
pub mod export_service;
pub mod file_service;
pub mod problem_service;
pub mod test_service;

pub use auth_service::AuthService;
pub use export_service::ExportService;
pub use file_service::FileService;
pub use problem_service::ProblemService;
pub use test_service::TestService;
