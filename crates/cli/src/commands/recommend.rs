use std::path::PathBuf;

use ridematch_agent::{ChatAdvisor, ChatMessage, ConversationContext};
use ridematch_core::catalog::Catalog;
use ridematch_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use ridematch_core::errors::ApplicationError;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::commands::CommandResult;

pub fn run(catalog_path: Option<PathBuf>, history: &[String], message: &str) -> CommandResult {
    let correlation_id = Uuid::new_v4().to_string();

    let config = match AppConfig::load(LoadOptions {
        overrides: ConfigOverrides { catalog_path, ..ConfigOverrides::default() },
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::from(error).into_interface(correlation_id.as_str());
            return CommandResult::from_interface_error("recommend", &error);
        }
    };

    let Some(path) = config.catalog.path.clone() else {
        let error = ApplicationError::Catalog(
            "no catalog file given (use --catalog or set catalog.path)".to_string(),
        )
        .into_interface(correlation_id.as_str());
        return CommandResult::from_interface_error("recommend", &error);
    };

    let catalog = match Catalog::load_json(&path) {
        Ok(catalog) => catalog,
        Err(error) => {
            let error = ApplicationError::from(error).into_interface(correlation_id.as_str());
            warn!(
                event_name = "recommend.catalog_failed",
                correlation_id = correlation_id.as_str(),
                catalog_path = %path.display(),
                error = %error,
                "catalog could not be loaded"
            );
            return CommandResult::from_interface_error("recommend", &error);
        }
    };

    info!(
        event_name = "recommend.catalog_loaded",
        correlation_id = correlation_id.as_str(),
        products = catalog.len(),
        "catalog snapshot loaded"
    );

    let advisor = ChatAdvisor::from_config(&config);
    let context = ConversationContext::with_messages(
        config.parser.history_window,
        history.iter().map(ChatMessage::user).collect(),
    );
    let reply = advisor.reply(&context, message, &catalog, &correlation_id);

    CommandResult::success_with_data(
        "recommend",
        format!("{} suggestion(s)", reply.items.len()),
        Some(&correlation_id),
        json!({ "items": reply.items, "insight": reply.insight }),
    )
}
