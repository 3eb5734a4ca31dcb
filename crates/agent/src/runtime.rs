use ridematch_core::catalog::Catalog;
use ridematch_core::config::AppConfig;
use ridematch_core::query::{build_insight_sentence, ParsedQuery};
use ridematch_core::recommend::{Recommender, Suggestion};
use serde::Serialize;
use tracing::info;

use crate::conversation::ConversationContext;
use crate::parser::QueryParser;

/// What the chat endpoint sends back for one shopper message.
#[derive(Clone, Debug, Serialize)]
pub struct ChatReply {
    pub items: Vec<Suggestion>,
    pub insight: Option<String>,
    #[serde(skip)]
    pub query: ParsedQuery,
}

/// Parses a message in its conversation context and recommends products.
#[derive(Clone, Debug, Default)]
pub struct ChatAdvisor {
    parser: QueryParser,
    recommender: Recommender,
}

impl ChatAdvisor {
    pub fn new(parser: QueryParser, recommender: Recommender) -> Self {
        Self { parser, recommender }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            QueryParser::from_config(&config.parser),
            Recommender::new(config.recommender.to_settings()),
        )
    }

    pub fn reply(
        &self,
        context: &ConversationContext,
        message: &str,
        catalog: &Catalog,
        correlation_id: &str,
    ) -> ChatReply {
        let query = context.accumulated_query(&self.parser, message);
        let items = self.recommender.get_suggestions(&query, catalog);
        let insight = build_insight_sentence(&query);

        info!(
            event_name = "advisor.reply",
            correlation_id,
            history_messages = context.recent_user_texts().len(),
            suggestions = items.len(),
            fallback = items.first().is_some_and(|item| item.ranking.is_fallback()),
            "built recommendation reply"
        );

        ChatReply { items, insight, query }
    }
}
