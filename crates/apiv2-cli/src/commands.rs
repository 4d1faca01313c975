pub mod check;
pub mod list;
pub mod schema;
pub mod show;
