pub mod calc;
pub mod models;
pub mod plan;
pub mod progress;
pub mod service;
pub mod storage;
pub mod store;
