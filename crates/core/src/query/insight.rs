use rust_decimal::Decimal;

use super::ParsedQuery;

pub const INSIGHT_PREFIX: &str = "AI hiểu: ";

/// Summarises what the advisor understood, or `None` when nothing is known.
///
/// Order is fixed: brands, models, budget, height, purpose.
pub fn build_insight_sentence(query: &ParsedQuery) -> Option<String> {
    let mut parts = Vec::new();

    if !query.preferred_brands.is_empty() {
        let brands =
            query.preferred_brands.iter().map(|brand| title_case(brand)).collect::<Vec<_>>();
        parts.push(format!("thương hiệu {}", brands.join(", ")));
    }

    let models = query.model_names();
    if !models.is_empty() {
        let models = models.iter().map(|model| title_case(model)).collect::<Vec<_>>();
        parts.push(format!("dòng xe {}", models.join(", ")));
    }

    match (query.budget_min, query.budget_max) {
        (Some(min), Some(max)) => {
            parts.push(format!("ngân sách từ {} đến {} triệu", millions(min), millions(max)))
        }
        (None, Some(max)) => parts.push(format!("ngân sách dưới {} triệu", millions(max))),
        (Some(min), None) => parts.push(format!("ngân sách trên {} triệu", millions(min))),
        (None, None) => {}
    }

    if let Some(height_cm) = query.height_cm {
        parts.push(format!("chiều cao {height_cm}cm"));
    }

    if let Some(purpose) = query.purpose {
        parts.push(format!("nhu cầu {}", purpose.label()));
    }

    if parts.is_empty() {
        return None;
    }

    Some(format!("{INSIGHT_PREFIX}{}", parts.join(", ")))
}

fn millions(amount: Decimal) -> String {
    (amount / Decimal::from(1_000_000)).normalize().to_string()
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::build_insight_sentence;
    use crate::query::{ParsedQuery, Purpose};

    #[test]
    fn empty_query_has_no_insight() {
        assert_eq!(build_insight_sentence(&ParsedQuery::default()), None);
    }

    #[test]
    fn feature_tags_alone_do_not_produce_an_insight() {
        let mut query = ParsedQuery::default();
        query.add_tag("lightweight");
        assert_eq!(build_insight_sentence(&query), None);
    }

    #[test]
    fn lists_fields_in_fixed_order() {
        let mut query = ParsedQuery {
            height_cm: Some(160),
            budget_min: Some(Decimal::from(40_000_000)),
            budget_max: Some(Decimal::from(55_000_000)),
            purpose: Some(Purpose::City),
            ..ParsedQuery::default()
        };
        query.add_brand("honda");
        query.add_tag("model-air-blade");

        assert_eq!(
            build_insight_sentence(&query).as_deref(),
            Some(
                "AI hiểu: thương hiệu Honda, dòng xe Air Blade, ngân sách từ 40 đến 55 triệu, \
                 chiều cao 160cm, nhu cầu đi lại trong phố"
            )
        );
    }

    #[test]
    fn budget_phrasing_depends_on_bounds() {
        let upper = ParsedQuery {
            budget_max: Some(Decimal::from(30_000_000)),
            ..ParsedQuery::default()
        };
        assert_eq!(
            build_insight_sentence(&upper).as_deref(),
            Some("AI hiểu: ngân sách dưới 30 triệu")
        );

        let lower = ParsedQuery {
            budget_min: Some(Decimal::from(42_500_000)),
            ..ParsedQuery::default()
        };
        assert_eq!(
            build_insight_sentence(&lower).as_deref(),
            Some("AI hiểu: ngân sách trên 42.5 triệu")
        );
    }
}
