pub mod config;
pub mod exchange;
pub mod models;
pub mod persistence;
pub mod signals;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
