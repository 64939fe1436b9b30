pub mod ai;
pub mod analysis;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod feedback;
pub mod meals;
pub mod nutrition;
pub mod photos;
pub mod profiles;
pub mod state;
pub mod storage;
