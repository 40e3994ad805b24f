//! CookFlow Engine library.
//!
//! Challenge progress engine and its HTTP surface.
//!
//! ## Structure
//!
//! - `use_cases/` - Progress engine and cooking dispatcher
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition
//! - `config` - Environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
pub use config::EngineConfig;
