// Infrastructure layer - implements interfaces defined in the domain layer
pub mod config;
pub mod logging;
pub mod persistence;
pub mod repositories;
pub mod security;
