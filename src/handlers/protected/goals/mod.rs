// handlers/protected/goals/mod.rs - /api/goals handlers
//
// GET   /api/goals?date=YYYY-MM-DD   list
// POST  /api/goals                   create   - {title, date}
// PATCH /api/goals/:id/complete      complete

pub mod complete;
pub mod create;
pub mod list;

pub use complete::complete;
pub use create::create;
pub use list::list;
