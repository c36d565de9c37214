pub mod applications;
pub mod jobs;
pub mod services;
pub mod societies;
pub mod subscriptions;
pub mod vendors;
