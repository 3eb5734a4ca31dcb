//! Human-readable justification for each suggestion.
//!
//! Text only: nothing here decides whether a product is suggested.

use super::scoring::{brand_matches, model_in_name};
use super::types::Ranking;
use crate::domain::product::{Product, ProductClass};
use crate::query::ParsedQuery;
use crate::tags;

pub const FALLBACK_REASON: &str = "Sản phẩm được nhiều khách hàng quan tâm";

const EV_PART_REASON: &str = "Phụ tùng chuyên dụng cho xe điện";
const OIL_REASON: &str = "Dầu nhớt phù hợp để bảo dưỡng định kỳ";
const TIRE_REASON: &str = "Lốp xe phù hợp để thay thế, đảm bảo bám đường";
const BRAKE_REASON: &str = "Phụ tùng phanh giúp tăng độ an toàn khi vận hành";
const PART_DEFAULT_REASON: &str = "Phụ tùng phù hợp với yêu cầu của bạn";
const VEHICLE_DEFAULT_REASON: &str = "Phù hợp với tiêu chí bạn đưa ra";

pub fn build_reason(
    product: &Product,
    query: &ParsedQuery,
    ranking: Ranking,
    class: ProductClass,
) -> String {
    if ranking.is_fallback() {
        return FALLBACK_REASON.to_string();
    }

    match class {
        ProductClass::Part => part_reason(product, query),
        ProductClass::Vehicle => vehicle_reason(product, query),
    }
}

fn part_reason(product: &Product, query: &ParsedQuery) -> String {
    let name = product.normalized_name();

    if tags::contains_any(&name, tags::EV_PART_NAME_HINTS) {
        return EV_PART_REASON.to_string();
    }
    if product.has_tag(tags::PART_OIL) {
        return OIL_REASON.to_string();
    }
    if product.has_tag(tags::PART_TIRE) {
        return TIRE_REASON.to_string();
    }
    if product.has_tag(tags::PART_BRAKE) {
        return BRAKE_REASON.to_string();
    }
    if model_in_name(&name, query) {
        let model = query
            .model_names()
            .into_iter()
            .find(|model| name.contains(model.as_str()))
            .unwrap_or_default();
        return format!("Phụ tùng tương thích với dòng xe {}", model.to_uppercase());
    }

    PART_DEFAULT_REASON.to_string()
}

fn vehicle_reason(product: &Product, query: &ParsedQuery) -> String {
    if brand_matches(product, query) {
        return format!("Xe {} đúng thương hiệu bạn quan tâm", product.brand_name().trim());
    }

    VEHICLE_DEFAULT_REASON.to_string()
}
