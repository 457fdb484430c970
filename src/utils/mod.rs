pub mod date;
pub mod fuzzy;
