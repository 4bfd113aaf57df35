// Persistence utilities
pub mod file_system;
pub mod jsonl_utils;
pub mod record_store;
