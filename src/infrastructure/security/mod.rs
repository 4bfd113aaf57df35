// Credentials: password hashing, bearer tokens, temporary passwords
pub mod password;
pub mod token;
