// Presentation layer - view state and HTTP surface
pub mod app_state;
pub mod handlers;
pub mod view_state;
