//! CLI command implementations for quizbank

mod check;
mod common;
mod list;
mod load;
mod stats;

pub use check::check;
pub use list::list;
pub use load::load;
pub use stats::stats;
