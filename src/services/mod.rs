// Services module - Business logic

pub mod notifier;
pub mod revision_service;
