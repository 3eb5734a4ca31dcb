use std::sync::LazyLock;

use regex::Regex;
use ridematch_core::config::ParserConfig;
use ridematch_core::query::{ParsedQuery, Purpose, DEFAULT_BUDGET_BAND_MILLIONS};
use ridematch_core::tags;
use rust_decimal::Decimal;

static HEIGHT_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])1m([0-9]{1,2})(?:[^0-9]|$)").expect("height shorthand regex")
});

static HEIGHT_CM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{3})\s*cm\b").expect("height cm regex"));

static BUDGET_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]{2,3})\s*(?:-|đến|to)\s*([0-9]{2,3})\s*t")
        .expect("budget range regex")
});

static BUDGET_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+)\s*(?:triệu|tr)").expect("budget regex"));

const MILLION: u64 = 1_000_000;

/// Turns one free-text shopper message into a [`ParsedQuery`].
///
/// Parsing never fails: anything not recognised is left absent.
#[derive(Clone, Debug)]
pub struct QueryParser {
    budget_band_millions: u32,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryParser {
    pub fn new() -> Self {
        Self { budget_band_millions: DEFAULT_BUDGET_BAND_MILLIONS }
    }

    pub fn with_budget_band(budget_band_millions: u32) -> Self {
        Self { budget_band_millions }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::with_budget_band(config.budget_band_millions)
    }

    pub fn parse(&self, text: &str) -> ParsedQuery {
        let normalized = normalize_text(text);
        let mut query = ParsedQuery::default();
        if normalized.is_empty() {
            return query;
        }

        query.height_cm = extract_height(&normalized);
        if let Some((min, max)) = self.extract_budget(&normalized) {
            query.budget_min = Some(min);
            query.budget_max = Some(max);
        }
        query.purpose = extract_purpose(&normalized);
        query.is_beginner = extract_experience(&normalized);

        for rule in tags::FEATURE_RULES.iter().chain(tags::PART_MENTION_RULES) {
            if rule.matches(&normalized) {
                query.add_tag(rule.tag);
            }
        }
        if tags::contains_any(&normalized, tags::PART_SEARCH_PHRASES) {
            query.add_tag(tags::PART_SEARCH);
        }
        for rule in tags::MODEL_RULES {
            if rule.matches(&normalized) {
                query.add_tag(rule.tag);
            }
        }
        for brand in tags::BRANDS {
            if tags::contains_any(&normalized, brand.aliases) {
                query.add_brand(brand.canonical);
            }
        }

        add_derived_tags(&mut query);
        query
    }

    fn extract_budget(&self, text: &str) -> Option<(Decimal, Decimal)> {
        if let Some(captures) = BUDGET_RANGE.captures(text) {
            let min = millions(captures.get(1)?.as_str());
            let max = millions(captures.get(2)?.as_str());
            if let (Some(min), Some(max)) = (min, max) {
                return Some((Decimal::from(min), Decimal::from(max)));
            }
        }

        let captures = BUDGET_SINGLE.captures(text)?;
        let center = captures.get(1)?.as_str().parse::<u64>().ok()?;
        let band = u64::from(self.budget_band_millions);
        let min = center.saturating_sub(band).checked_mul(MILLION)?;
        let max = center.checked_add(band)?.checked_mul(MILLION)?;

        Some((Decimal::from(min), Decimal::from(max)))
    }
}

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

fn millions(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok()?.checked_mul(MILLION)
}

fn extract_height(text: &str) -> Option<u16> {
    if let Some(captures) = HEIGHT_SHORTHAND.captures(text) {
        let digits = captures.get(1)?.as_str();
        let value = digits.parse::<u16>().ok()?;
        let centimetres = if digits.len() == 1 { value * 10 } else { value };
        return Some(100 + centimetres);
    }

    let captures = HEIGHT_CM.captures(text)?;
    captures.get(1)?.as_str().parse::<u16>().ok()
}

fn extract_purpose(text: &str) -> Option<Purpose> {
    [
        (Purpose::City, tags::CITY_PHRASES),
        (Purpose::Delivery, tags::DELIVERY_PHRASES),
        (Purpose::Touring, tags::TOURING_PHRASES),
    ]
    .into_iter()
    .find(|(_, phrases)| tags::contains_any(text, phrases))
    .map(|(purpose, _)| purpose)
}

fn extract_experience(text: &str) -> Option<bool> {
    let mut is_beginner = None;
    if tags::contains_any(text, tags::BEGINNER_PHRASES) {
        is_beginner = Some(true);
    }
    // Experienced wording wins when a message carries both.
    if tags::contains_any(text, tags::EXPERIENCED_PHRASES) {
        is_beginner = Some(false);
    }
    is_beginner
}

fn add_derived_tags(query: &mut ParsedQuery) {
    if let Some(height_cm) = query.height_cm {
        query.add_tag(tags::height_bucket(height_cm));
    }
    if let Some(purpose) = query.purpose {
        query.add_tag(purpose.usage_tag());
    }
    match query.is_beginner {
        Some(true) => query.add_tag(tags::BEGINNER),
        Some(false) => query.add_tag(tags::EXPERIENCED),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use ridematch_core::query::Purpose;
    use ridematch_core::tags;
    use rust_decimal::Decimal;

    use super::QueryParser;

    #[test]
    fn parses_height_shorthand_and_centimetres() {
        let parser = QueryParser::new();

        assert_eq!(parser.parse("xe cho người cao 1m6").height_cm, Some(160));
        assert_eq!(parser.parse("em cao 1m58, nặng 50kg").height_cm, Some(158));
        assert_eq!(parser.parse("cao 170cm").height_cm, Some(170));
        assert_eq!(parser.parse("").height_cm, None);
    }

    #[test]
    fn height_tolerates_missing_space_after_word() {
        let parser = QueryParser::new();

        assert_eq!(parser.parse("cao1m6").height_cm, Some(160));
        assert_eq!(parser.parse("cao170cm").height_cm, Some(170));
        assert_eq!(parser.parse("mã 21m5").height_cm, None);
    }

    #[test]
    fn height_adds_bucket_tag() {
        let query = QueryParser::new().parse("mình cao 1m6");
        assert!(query.preferred_tags.contains(tags::HEIGHT_156_165));

        let tall = QueryParser::new().parse("cao 182 cm");
        assert_eq!(tall.height_cm, Some(182));
        assert!(tall.preferred_tags.contains(tags::HEIGHT_OVER_175));
    }

    #[test]
    fn parses_budget_range() {
        let query = QueryParser::new().parse("tầm 40-55tr");
        assert_eq!(query.budget_min, Some(Decimal::from(40_000_000)));
        assert_eq!(query.budget_max, Some(Decimal::from(55_000_000)));

        let worded = QueryParser::new().parse("ngân sách 30 đến 45 triệu");
        assert_eq!(worded.budget_min, Some(Decimal::from(30_000_000)));
        assert_eq!(worded.budget_max, Some(Decimal::from(45_000_000)));
    }

    #[test]
    fn single_budget_becomes_band() {
        let query = QueryParser::new().parse("khoảng 45 triệu");
        assert_eq!(query.budget_min, Some(Decimal::from(40_000_000)));
        assert_eq!(query.budget_max, Some(Decimal::from(50_000_000)));

        let wide = QueryParser::with_budget_band(10).parse("tầm 45tr");
        assert_eq!(wide.budget_min, Some(Decimal::from(35_000_000)));
        assert_eq!(wide.budget_max, Some(Decimal::from(55_000_000)));
    }

    #[test]
    fn small_single_budget_clamps_at_zero() {
        let query = QueryParser::new().parse("có 3 triệu thôi");
        assert_eq!(query.budget_min, Some(Decimal::ZERO));
        assert_eq!(query.budget_max, Some(Decimal::from(8_000_000)));
    }

    #[test]
    fn overflowing_budget_is_ignored() {
        let query = QueryParser::new().parse("99999999999999999999999 triệu");
        assert!(query.budget_min.is_none());
        assert!(query.budget_max.is_none());
    }

    #[test]
    fn first_purpose_category_wins() {
        let parser = QueryParser::new();

        let city = parser.parse("xe đi làm hằng ngày, thỉnh thoảng đi phượt");
        assert_eq!(city.purpose, Some(Purpose::City));
        assert!(city.preferred_tags.contains(tags::USAGE_CITY));
        assert!(!city.preferred_tags.contains(tags::USAGE_TOURING));

        assert_eq!(parser.parse("chạy giao hàng cả ngày").purpose, Some(Purpose::Delivery));
        assert_eq!(parser.parse("thích đi phượt").purpose, Some(Purpose::Touring));
        assert_eq!(parser.parse("xe màu đỏ").purpose, None);
    }

    #[test]
    fn experienced_signal_overrides_beginner() {
        let parser = QueryParser::new();

        let beginner = parser.parse("em mới tập lái");
        assert_eq!(beginner.is_beginner, Some(true));
        assert!(beginner.preferred_tags.contains(tags::BEGINNER));

        let both = parser.parse("mới tập nhưng thích xe thể thao");
        assert_eq!(both.is_beginner, Some(false));
        assert!(both.preferred_tags.contains(tags::EXPERIENCED));
        assert!(both.preferred_tags.contains(tags::SPORTY));
    }

    #[test]
    fn feature_tags_are_collected_together() {
        let query = QueryParser::new().parse("xe nhẹ, tiết kiệm xăng, kiểu dáng sang trọng");
        assert!(query.preferred_tags.contains(tags::LIGHTWEIGHT));
        assert!(query.preferred_tags.contains(tags::FUEL_SAVING));
        assert!(query.preferred_tags.contains(tags::PREMIUM));
    }

    #[test]
    fn brands_map_to_canonical_tokens() {
        let query = QueryParser::new().parse("Piaggio hay Honda thì tốt hơn?");
        let brands = query.preferred_brands.iter().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(brands, vec!["honda", "vespa"]);
    }

    #[test]
    fn part_requests_and_models_are_tagged() {
        let query = QueryParser::new().parse("cần thay nhớt cho Air Blade");
        assert!(query.preferred_tags.contains(tags::PART_OIL));
        assert!(query.preferred_tags.contains("model-air-blade"));
        assert!(query.is_part_search());

        let browsing = QueryParser::new().parse("shop có phụ kiện yamaha không");
        assert!(browsing.preferred_tags.contains(tags::PART_SEARCH));
        assert_eq!(browsing.part_tags().count(), 0);
    }

    #[test]
    fn blank_input_yields_empty_query() {
        assert!(QueryParser::new().parse("   ").is_empty());
    }

    #[test]
    fn parse_is_deterministic() {
        let parser = QueryParser::new();
        let text = "Em nữ cao 1m55, mới tập đi, tầm 30-40tr, thích Honda Vision đi học";

        assert_eq!(parser.parse(text), parser.parse(text));
    }
}
