pub mod generate;
pub mod history;
pub mod init;
pub mod progress;
pub mod report;
pub mod roles;
pub mod score;
pub mod summary;
pub mod take;
pub mod validate;
