pub mod budget_reporter;
pub mod summary_reporter;
pub mod table;
