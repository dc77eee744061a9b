pub mod download;
pub mod example;
pub mod upload;
