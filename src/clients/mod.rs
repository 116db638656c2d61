pub mod health;
pub mod loader;
pub mod template;
