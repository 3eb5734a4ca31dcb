use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ridematch_core::config::{AppConfig, LoadOptions};
use ridematch_core::errors::ApplicationError;
use serde::Serialize;
use serde_json::json;
use toml::Value;
use uuid::Uuid;

use crate::commands::CommandResult;

struct Field {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

#[derive(Debug, Serialize)]
struct ResolvedField<'a> {
    key: &'a str,
    value: &'a str,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::from(error).into_interface(Uuid::new_v4().to_string());
            return CommandResult::from_interface_error("config", &error);
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = match config_file_path.as_deref().map(load_config_file_doc).transpose() {
        Ok(doc) => doc,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_inspection",
                format!("config inspection failed: {error:#}"),
                2,
            );
        }
    };

    let fields = [
        Field {
            key_path: "catalog.path",
            env_keys: &["RIDEMATCH_CATALOG_PATH"],
            value: config
                .catalog
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
        },
        Field {
            key_path: "parser.budget_band_millions",
            env_keys: &["RIDEMATCH_PARSER_BUDGET_BAND_MILLIONS"],
            value: config.parser.budget_band_millions.to_string(),
        },
        Field {
            key_path: "parser.history_window",
            env_keys: &["RIDEMATCH_PARSER_HISTORY_WINDOW"],
            value: config.parser.history_window.to_string(),
        },
        Field {
            key_path: "recommender.max_results",
            env_keys: &["RIDEMATCH_RECOMMENDER_MAX_RESULTS"],
            value: config.recommender.max_results.to_string(),
        },
        Field {
            key_path: "recommender.fallback_limit",
            env_keys: &["RIDEMATCH_RECOMMENDER_FALLBACK_LIMIT"],
            value: config.recommender.fallback_limit.to_string(),
        },
        Field {
            key_path: "recommender.headroom_percent",
            env_keys: &["RIDEMATCH_RECOMMENDER_HEADROOM_PERCENT"],
            value: config.recommender.headroom_percent.to_string(),
        },
        Field {
            key_path: "recommender.parts_category",
            env_keys: &["RIDEMATCH_RECOMMENDER_PARTS_CATEGORY"],
            value: config.recommender.parts_category.clone(),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["RIDEMATCH_LOGGING_LEVEL", "RIDEMATCH_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["RIDEMATCH_LOGGING_FORMAT", "RIDEMATCH_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ];

    let resolved = fields
        .iter()
        .map(|field| ResolvedField {
            key: field.key_path,
            value: &field.value,
            source: field_source(
                field.key_path,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect::<Vec<_>>();

    CommandResult::success_with_data(
        "config",
        "effective config (source precedence: env > file > default)",
        None,
        json!({ "fields": resolved }),
    )
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("ridematch.toml"), PathBuf::from("config/ridematch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config file `{}`", path.display()))?;
    raw.parse::<Value>().with_context(|| format!("parsing config file `{}`", path.display()))
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
