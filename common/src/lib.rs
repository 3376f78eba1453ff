pub mod config;
pub mod messaging;
pub mod order;
pub mod payload;
pub mod permission;
pub mod session;
pub mod subscription;
