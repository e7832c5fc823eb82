pub mod application_repository;
pub mod connection;
pub mod feedback_repository;
pub mod job_repository;
pub mod keys;
pub mod kv;
pub mod migrations;
pub mod models;
pub mod user_repository;
