pub mod cluster;
pub mod core;
pub mod iam;
pub mod s3;
pub mod yaml;
