pub mod access;
pub mod audit;
pub mod exam;
pub mod licensure;
pub mod profile;
pub mod question;
pub mod settings;
pub mod user;
