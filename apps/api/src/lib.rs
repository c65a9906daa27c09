pub mod assist;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod jobs;
pub mod models;
pub mod resumes;
pub mod routes;
pub mod state;
