use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::ApplicationError;
use crate::query::{DEFAULT_BUDGET_BAND_MILLIONS, DEFAULT_HISTORY_WINDOW};
use crate::recommend::{
    RecommenderSettings, ScoringWeights, DEFAULT_FALLBACK_LIMIT, DEFAULT_HEADROOM_PERCENT,
    DEFAULT_MAX_RESULTS, DEFAULT_PARTS_CATEGORY,
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub parser: ParserConfig,
    pub recommender: RecommenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ParserConfig {
    pub budget_band_millions: u32,
    pub history_window: usize,
}

#[derive(Clone, Debug)]
pub struct RecommenderConfig {
    pub max_results: usize,
    pub fallback_limit: usize,
    pub headroom_percent: u32,
    pub parts_category: String,
    pub weights: ScoringWeights,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        ApplicationError::Configuration(value.to_string())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig { path: None },
            parser: ParserConfig {
                budget_band_millions: DEFAULT_BUDGET_BAND_MILLIONS,
                history_window: DEFAULT_HISTORY_WINDOW,
            },
            recommender: RecommenderConfig {
                max_results: DEFAULT_MAX_RESULTS,
                fallback_limit: DEFAULT_FALLBACK_LIMIT,
                headroom_percent: DEFAULT_HEADROOM_PERCENT,
                parts_category: DEFAULT_PARTS_CATEGORY.to_string(),
                weights: ScoringWeights::default(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl RecommenderConfig {
    pub fn to_settings(&self) -> RecommenderSettings {
        RecommenderSettings {
            max_results: self.max_results,
            fallback_limit: self.fallback_limit,
            headroom_ratio: Decimal::new(self.headroom_percent.into(), 2),
            parts_category: self.parts_category.clone(),
            weights: self.weights,
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("ridematch.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = Some(path);
            }
        }

        if let Some(parser) = patch.parser {
            if let Some(budget_band_millions) = parser.budget_band_millions {
                self.parser.budget_band_millions = budget_band_millions;
            }
            if let Some(history_window) = parser.history_window {
                self.parser.history_window = history_window;
            }
        }

        if let Some(recommender) = patch.recommender {
            if let Some(max_results) = recommender.max_results {
                self.recommender.max_results = max_results;
            }
            if let Some(fallback_limit) = recommender.fallback_limit {
                self.recommender.fallback_limit = fallback_limit;
            }
            if let Some(headroom_percent) = recommender.headroom_percent {
                self.recommender.headroom_percent = headroom_percent;
            }
            if let Some(parts_category) = recommender.parts_category {
                self.recommender.parts_category = parts_category;
            }
            if let Some(weights) = recommender.weights {
                weights.apply_to(&mut self.recommender.weights);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("RIDEMATCH_CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("RIDEMATCH_PARSER_BUDGET_BAND_MILLIONS") {
            self.parser.budget_band_millions =
                parse_u32("RIDEMATCH_PARSER_BUDGET_BAND_MILLIONS", &value)?;
        }
        if let Some(value) = read_env("RIDEMATCH_PARSER_HISTORY_WINDOW") {
            self.parser.history_window = parse_usize("RIDEMATCH_PARSER_HISTORY_WINDOW", &value)?;
        }

        if let Some(value) = read_env("RIDEMATCH_RECOMMENDER_MAX_RESULTS") {
            self.recommender.max_results =
                parse_usize("RIDEMATCH_RECOMMENDER_MAX_RESULTS", &value)?;
        }
        if let Some(value) = read_env("RIDEMATCH_RECOMMENDER_FALLBACK_LIMIT") {
            self.recommender.fallback_limit =
                parse_usize("RIDEMATCH_RECOMMENDER_FALLBACK_LIMIT", &value)?;
        }
        if let Some(value) = read_env("RIDEMATCH_RECOMMENDER_HEADROOM_PERCENT") {
            self.recommender.headroom_percent =
                parse_u32("RIDEMATCH_RECOMMENDER_HEADROOM_PERCENT", &value)?;
        }
        if let Some(value) = read_env("RIDEMATCH_RECOMMENDER_PARTS_CATEGORY") {
            self.recommender.parts_category = value;
        }

        let log_level =
            read_env("RIDEMATCH_LOGGING_LEVEL").or_else(|| read_env("RIDEMATCH_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("RIDEMATCH_LOGGING_FORMAT").or_else(|| read_env("RIDEMATCH_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = Some(catalog_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_parser(&self.parser)?;
        validate_recommender(&self.recommender)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("ridematch.toml"), PathBuf::from("config/ridematch.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_parser(parser: &ParserConfig) -> Result<(), ConfigError> {
    if parser.budget_band_millions == 0 || parser.budget_band_millions > 100 {
        return Err(ConfigError::Validation(
            "parser.budget_band_millions must be in range 1..=100".to_string(),
        ));
    }

    if parser.history_window > 20 {
        return Err(ConfigError::Validation(
            "parser.history_window must be in range 0..=20".to_string(),
        ));
    }

    Ok(())
}

fn validate_recommender(recommender: &RecommenderConfig) -> Result<(), ConfigError> {
    if recommender.max_results == 0 || recommender.max_results > 100 {
        return Err(ConfigError::Validation(
            "recommender.max_results must be in range 1..=100".to_string(),
        ));
    }

    if recommender.fallback_limit == 0 || recommender.fallback_limit > recommender.max_results {
        return Err(ConfigError::Validation(
            "recommender.fallback_limit must be greater than zero and at most recommender.max_results"
                .to_string(),
        ));
    }

    if recommender.headroom_percent == 0 || recommender.headroom_percent > 100 {
        return Err(ConfigError::Validation(
            "recommender.headroom_percent must be in range 1..=100".to_string(),
        ));
    }

    if recommender.parts_category.trim().is_empty() {
        return Err(ConfigError::Validation(
            "recommender.parts_category must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    parser: Option<ParserPatch>,
    recommender: Option<RecommenderPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ParserPatch {
    budget_band_millions: Option<u32>,
    history_window: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommenderPatch {
    max_results: Option<usize>,
    fallback_limit: Option<usize>,
    headroom_percent: Option<u32>,
    parts_category: Option<String>,
    weights: Option<WeightsPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WeightsPatch {
    part_tag_match: Option<u32>,
    part_name_hint: Option<u32>,
    part_browse_base: Option<u32>,
    part_brand_field: Option<u32>,
    part_brand_in_name: Option<u32>,
    part_model_in_name: Option<u32>,
    vehicle_brand: Option<u32>,
    vehicle_model_in_name: Option<u32>,
    vehicle_tag: Option<u32>,
    budget_headroom: Option<u32>,
}

impl WeightsPatch {
    fn apply_to(self, weights: &mut ScoringWeights) {
        let fields = [
            (self.part_tag_match, &mut weights.part_tag_match),
            (self.part_name_hint, &mut weights.part_name_hint),
            (self.part_browse_base, &mut weights.part_browse_base),
            (self.part_brand_field, &mut weights.part_brand_field),
            (self.part_brand_in_name, &mut weights.part_brand_in_name),
            (self.part_model_in_name, &mut weights.part_model_in_name),
            (self.vehicle_brand, &mut weights.vehicle_brand),
            (self.vehicle_model_in_name, &mut weights.vehicle_model_in_name),
            (self.vehicle_tag, &mut weights.vehicle_tag),
            (self.budget_headroom, &mut weights.budget_headroom),
        ];
        for (patched, slot) in fields {
            if let Some(value) = patched {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
