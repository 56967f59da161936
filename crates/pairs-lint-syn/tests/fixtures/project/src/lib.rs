pub mod app;
pub mod kv;
pub mod log;
