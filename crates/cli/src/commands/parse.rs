use ridematch_agent::{ChatMessage, ConversationContext, QueryParser};
use ridematch_core::config::{AppConfig, LoadOptions};
use ridematch_core::errors::ApplicationError;
use ridematch_core::query::build_insight_sentence;
use serde_json::json;
use uuid::Uuid;

use crate::commands::CommandResult;

pub fn run(history: &[String], message: &str) -> CommandResult {
    let correlation_id = Uuid::new_v4().to_string();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::from(error).into_interface(correlation_id.as_str());
            return CommandResult::from_interface_error("parse", &error);
        }
    };

    let parser = QueryParser::from_config(&config.parser);
    let context = ConversationContext::with_messages(
        config.parser.history_window,
        history.iter().map(ChatMessage::user).collect(),
    );
    let query = context.accumulated_query(&parser, message);
    let insight = build_insight_sentence(&query);

    CommandResult::success_with_data(
        "parse",
        format!("parsed {} message(s)", context.recent_user_texts().len() + 1),
        Some(&correlation_id),
        json!({ "query": query, "insight": insight }),
    )
}
