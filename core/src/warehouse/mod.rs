pub mod report;
pub mod schema;
pub mod staging;
pub mod tables;
pub mod time_parts;
pub mod transform;
