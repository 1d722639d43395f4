// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here runs behind `middleware::require_auth`, which places an
// `AuthUser` in the request extensions. Mutations re-check ownership against
// that user before touching a row; a row that does not exist is reported the
// same way as a row owned by someone else (403).

pub mod comments;
pub mod goals;
pub mod likes;
pub mod todos;
pub mod utils;
