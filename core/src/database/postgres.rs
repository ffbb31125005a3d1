pub mod client;
pub mod statement;
