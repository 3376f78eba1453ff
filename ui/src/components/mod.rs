pub mod app;
pub mod identity;
pub mod notification_manager;
pub mod notifications;
pub mod orders_page;
pub mod web_messaging;
