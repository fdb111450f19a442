pub mod credential;
pub mod reports;
