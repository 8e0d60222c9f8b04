pub mod form_handler;
pub mod health_handler;
pub mod page;
pub mod submission;
