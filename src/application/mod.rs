// Application layer - use cases over the backend repository
pub mod dashboard_service;
pub mod maintenance_repository;
pub mod refresh_service;
