// Application layer - use cases over the domain repositories
pub mod dto;
pub mod errors;
pub mod services;
