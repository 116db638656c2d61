pub mod registry;
pub mod replace;

use std::sync::Arc;

use crate::{
    clients::{loader::TemplateLoader, template::TemplateEngine},
    models::action::REPLACE_ACTION,
};

use self::{registry::ActionRegistry, replace::ReplaceActionHandler};

/// Registry with every action kind this service understands.
pub fn default_registry(loader: TemplateLoader, engine: TemplateEngine) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry.register(
        REPLACE_ACTION,
        Arc::new(ReplaceActionHandler::new(loader, engine)),
    );
    registry
}
