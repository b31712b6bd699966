// File: treasurehunt-core/src/messages.rs

use std::collections::HashMap;
use tracing::warn;
use treasurehunt_common::traits::MessageResolver;
use crate::config::MessagesConfig;

const PREFIX_TOKEN: &str = "{prefix}";

/// Player-facing templates loaded from `messages.toml`.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    prefix: String,
    templates: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new(config: &MessagesConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            templates: config
                .messages
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl MessageResolver for MessageCatalog {
    fn resolve(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        let Some(template) = self.templates.get(key) else {
            warn!("No message template for key '{}'", key);
            return key.to_string();
        };

        let mut text = template.replace(PREFIX_TOKEN, &self.prefix);
        for (name, value) in placeholders {
            text = text.replace(&format!("%{}%", name), value);
        }
        text
    }
}
