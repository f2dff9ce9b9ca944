pub mod notification_service;
pub mod submission_service;
