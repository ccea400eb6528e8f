// Presentation layer - HTTP surface for the dashboard view
pub mod app_state;
pub mod handlers;
