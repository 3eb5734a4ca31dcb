//! Shopper-facing advisor for the ridematch storefront
//!
//! This crate turns chat messages into product suggestions:
//! - Parses free-text Vietnamese messages into a structured `ParsedQuery`
//! - Accumulates intent across the recent turns of a conversation
//! - Runs the core recommender and builds the "AI hiểu" insight line
//!
//! # Flow
//!
//! 1. **Parsing** (`parser`) - text → `ParsedQuery`, never fails
//! 2. **Context** (`conversation`) - last N user messages folded oldest-first
//! 3. **Reply** (`runtime`) - suggestions plus optional insight for the caller
//!
//! Scoring and reason text live in `ridematch-core`; nothing here decides
//! which product is shown.

pub mod conversation;
pub mod parser;
pub mod runtime;

pub use conversation::{ChatMessage, ConversationContext, Role};
pub use parser::QueryParser;
pub use runtime::{ChatAdvisor, ChatReply};
