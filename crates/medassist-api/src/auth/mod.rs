// Authentication module
// Decision: Bearer JWT carried in the Authorization header; no cookies, no sessions
// Decision: The gate re-resolves the token's user on every request; stale tokens grant nothing

pub mod config;
pub mod extract;
pub mod jwt;
pub mod routes;

pub use config::AuthConfig;
pub use extract::AuthUser;
