// handlers/public/auth/mod.rs - Public authentication handlers
//
// POST /api/auth/signup and POST /api/auth/login.

pub mod login;
pub mod signup;

pub use login::login;
pub use signup::signup;

/// Treat absent, empty and whitespace-only form values alike
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
