// Authentication: session tokens, password credentials, third-party identity
// tokens, and the bearer-token extractor guarding dashboard routes.

pub mod extractor;
pub mod handlers;
pub mod identity;
pub mod password;
pub mod service;
pub mod token;
