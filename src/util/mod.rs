pub mod amount;
pub mod date;
