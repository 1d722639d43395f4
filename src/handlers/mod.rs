// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (bearer token auth)
pub mod protected; // Tier 2: token required (/api/todos, /api/goals, /api/comments)
pub mod public; // Tier 1: no authentication (/api/auth/*)
pub mod system; // root banner and health check
