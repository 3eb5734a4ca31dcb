use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use ridematch_cli::commands::{config, parse, recommend};
use serde_json::Value;
use tempfile::TempDir;

const CATALOG: &str = r#"[
  {"id": 1, "name": "Honda Vision 2024", "price": 32000000, "brand": "Honda", "category": "Xe tay ga", "tags": ["usage-city", "lightweight"], "stock": 12},
  {"id": 2, "name": "Yamaha Janus", "price": 29000000, "brand": "Yamaha", "category": "Xe tay ga", "tags": ["usage-city"], "stock": 4},
  {"id": 3, "name": "Honda Winner X", "price": 46000000, "brand": "Honda", "category": "Xe côn tay", "tags": ["sporty"], "stock": 2},
  {"id": 4, "name": "Nhớt Motul Scooter", "price": 120000, "brand": "Motul", "category": "Phụ tùng", "tags": ["part-oil"], "stock": 40},
  {"id": 5, "name": "Lốp IRC Vision", "price": 450000, "brand": "IRC", "category": "Phụ tùng", "tags": ["part-tire"], "stock": 9}
]"#;

#[test]
fn parse_returns_structured_query_and_insight() {
    with_env(&[], || {
        let result = parse::run(&[], "em cao 1m6, tầm 40-55tr, thích honda");
        assert_eq!(result.exit_code, 0, "expected successful parse");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "parse");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["query"]["height_cm"], 160);
        assert_eq!(payload["data"]["query"]["preferred_brands"][0], "honda");
        assert_eq!(
            payload["data"]["insight"],
            "AI hiểu: thương hiệu Honda, ngân sách từ 40 đến 55 triệu, chiều cao 160cm"
        );
    });
}

#[test]
fn parse_folds_history_before_current_message() {
    with_env(&[], || {
        let history = vec!["cao 170cm".to_string(), "thích yamaha".to_string()];
        let result = parse::run(&history, "đi làm hằng ngày");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["query"]["height_cm"], 170);
        assert_eq!(payload["data"]["query"]["purpose"], "city");
        assert_eq!(payload["data"]["query"]["preferred_brands"][0], "yamaha");
    });
}

#[test]
fn parse_reports_config_failure() {
    with_env(&[("RIDEMATCH_PARSER_BUDGET_BAND_MILLIONS", "0")], || {
        let result = parse::run(&[], "xe honda");
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn recommend_ranks_vehicles_from_catalog_file() {
    with_env(&[], || {
        let (_dir, path) = write_catalog(CATALOG);
        let result = recommend::run(Some(path), &[], "xe honda đi làm");
        assert_eq!(result.exit_code, 0, "expected successful recommendation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert!(payload["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));

        let ids = item_ids(&payload);
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(
            payload["data"]["items"][0]["reason"],
            "Xe Honda đúng thương hiệu bạn quan tâm"
        );
    });
}

#[test]
fn recommend_part_search_stays_in_parts_category() {
    with_env(&[], || {
        let (_dir, path) = write_catalog(CATALOG);
        let result = recommend::run(Some(path), &[], "cần thay nhớt");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(item_ids(&payload), vec![4]);
        assert_eq!(
            payload["data"]["items"][0]["reason"],
            "Dầu nhớt phù hợp để bảo dưỡng định kỳ"
        );
    });
}

#[test]
fn recommend_falls_back_for_uninformative_message() {
    with_env(&[], || {
        let (_dir, path) = write_catalog(CATALOG);
        let result = recommend::run(Some(path), &[], "xin chào shop");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(item_ids(&payload), vec![3, 2, 1]);
        assert_eq!(payload["data"]["items"][0]["ranking"]["kind"], "fallback");
        assert!(payload["data"]["insight"].is_null());
    });
}

#[test]
fn recommend_uses_catalog_path_from_env() {
    let (_dir, path) = write_catalog(CATALOG);
    let path_value = path.display().to_string();
    with_env(&[("RIDEMATCH_CATALOG_PATH", path_value.as_str())], || {
        let result = recommend::run(None, &[], "xe yamaha");
        assert_eq!(result.exit_code, 0);
        assert_eq!(item_ids(&parse_payload(&result.output)), vec![2]);
    });
}

#[test]
fn recommend_without_catalog_reports_unavailable() {
    with_env(&[], || {
        let result = recommend::run(None, &[], "xe honda");
        assert_eq!(result.exit_code, 3);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "catalog_unavailable");
    });
}

#[test]
fn recommend_rejects_malformed_catalog() {
    with_env(&[], || {
        let (_dir, path) = write_catalog("{not json");
        let result = recommend::run(Some(path), &[], "xe honda");
        assert_eq!(result.exit_code, 4, "unparseable catalog content is invalid, not unreadable");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "bad_request");
        assert!(payload["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
    });
}

#[test]
fn recommend_reports_missing_catalog_file_as_unavailable() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir should be created");
        let result = recommend::run(Some(dir.path().join("absent.json")), &[], "xe honda");
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "catalog_unavailable");
    });
}

#[test]
fn recommend_rejects_duplicate_product_ids() {
    with_env(&[], || {
        let (_dir, path) = write_catalog(
            r#"[{"id": 7, "name": "A", "price": 1}, {"id": 7, "name": "B", "price": 2}]"#,
        );
        let result = recommend::run(Some(path), &[], "xe honda");
        assert_eq!(result.exit_code, 4);
        assert_eq!(parse_payload(&result.output)["error_class"], "bad_request");
    });
}

#[test]
fn config_reports_env_source() {
    with_env(&[("RIDEMATCH_RECOMMENDER_MAX_RESULTS", "20")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(
            config_field(&payload, "recommender.max_results"),
            Some(("20".to_string(), "env (RIDEMATCH_RECOMMENDER_MAX_RESULTS)".to_string()))
        );
        assert_eq!(
            config_field(&payload, "recommender.fallback_limit"),
            Some(("8".to_string(), "default".to_string()))
        );
        assert_eq!(
            config_field(&payload, "parser.history_window"),
            Some(("3".to_string(), "default".to_string()))
        );
    });
}

#[test]
fn config_reports_validation_failure_as_json() {
    with_env(&[("RIDEMATCH_RECOMMENDER_MAX_RESULTS", "0")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("recommender.max_results")));
    });
}

fn write_catalog(raw: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir should be created");
    let path = dir.path().join("catalog.json");
    fs::write(&path, raw).expect("catalog fixture should be written");
    (dir, path)
}

fn item_ids(payload: &Value) -> Vec<i64> {
    payload["data"]["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["product_id"].as_i64()).collect())
        .unwrap_or_default()
}

fn config_field(payload: &Value, key: &str) -> Option<(String, String)> {
    let field = payload["data"]["fields"]
        .as_array()?
        .iter()
        .find(|field| field["key"] == key)?;
    Some((field["value"].as_str()?.to_string(), field["source"].as_str()?.to_string()))
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "RIDEMATCH_CATALOG_PATH",
        "RIDEMATCH_PARSER_BUDGET_BAND_MILLIONS",
        "RIDEMATCH_PARSER_HISTORY_WINDOW",
        "RIDEMATCH_RECOMMENDER_MAX_RESULTS",
        "RIDEMATCH_RECOMMENDER_FALLBACK_LIMIT",
        "RIDEMATCH_RECOMMENDER_HEADROOM_PERCENT",
        "RIDEMATCH_RECOMMENDER_PARTS_CATEGORY",
        "RIDEMATCH_LOGGING_LEVEL",
        "RIDEMATCH_LOGGING_FORMAT",
        "RIDEMATCH_LOG_LEVEL",
        "RIDEMATCH_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
