pub mod action;
pub mod health;
pub mod parameters;
pub mod request;
pub mod response;
pub mod retry;
pub mod template;
