// Domain layer - pure data and analytics
pub mod control_limits;
pub mod dashboard;
pub mod equipment;
pub mod error;
pub mod health;
pub mod normalizer;
pub mod parameters;
pub mod snapshot;
pub mod statistics;
pub mod table;
pub mod trend;
