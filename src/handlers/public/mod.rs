// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation and token acquisition. Everything else lives under
// `protected` and sits behind the bearer-token middleware.

pub mod auth;

pub use auth::*;
