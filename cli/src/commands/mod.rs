pub mod create_tables;
pub mod etl;
pub mod init;
pub mod sql;
