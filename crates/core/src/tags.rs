//! Semantic tag vocabulary and the keyword tables that trigger each tag.
//!
//! Every phrase is lower-case; callers match against Unicode lower-cased text.

pub const PART_PREFIX: &str = "part-";
pub const MODEL_PREFIX: &str = "model-";

/// Marker for "show me parts" requests that name no specific part type.
pub const PART_SEARCH: &str = "search-parts";

pub const USAGE_CITY: &str = "usage-city";
pub const USAGE_DELIVERY: &str = "usage-delivery";
pub const USAGE_TOURING: &str = "usage-touring";

pub const BEGINNER: &str = "beginner";
pub const EXPERIENCED: &str = "experienced";

pub const LIGHTWEIGHT: &str = "lightweight";
pub const FUEL_SAVING: &str = "fuel-saving";
pub const SPORTY: &str = "sporty";
pub const PREMIUM: &str = "premium";

pub const HEIGHT_UNDER_156: &str = "height-under-156";
pub const HEIGHT_156_165: &str = "height-156-165";
pub const HEIGHT_166_175: &str = "height-166-175";
pub const HEIGHT_OVER_175: &str = "height-over-175";

pub const PART_OIL: &str = "part-oil";
pub const PART_TIRE: &str = "part-tire";
pub const PART_BRAKE: &str = "part-brake";
pub const PART_FILTER: &str = "part-filter";
pub const PART_CHAIN: &str = "part-chain";
pub const PART_BATTERY: &str = "part-battery";
pub const PART_MIRROR: &str = "part-mirror";
pub const PART_EV: &str = "part-ev";

/// A tag and the phrases that trigger it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeywordRule {
    pub tag: &'static str,
    pub phrases: &'static [&'static str],
}

impl KeywordRule {
    pub fn matches(&self, text: &str) -> bool {
        contains_any(text, self.phrases)
    }
}

/// Canonical brand token plus every spelling that maps onto it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrandAlias {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

pub const CITY_PHRASES: &[&str] = &[
    "đi phố",
    "trong phố",
    "thành phố",
    "đi làm",
    "đi học",
    "đi chợ",
    "hằng ngày",
    "hàng ngày",
    "city",
];

pub const DELIVERY_PHRASES: &[&str] = &[
    "giao hàng",
    "ship hàng",
    "shipper",
    "chạy grab",
    "chạy xe ôm",
    "xe ôm công nghệ",
    "giao đồ ăn",
    "chở hàng",
    "delivery",
];

pub const TOURING_PHRASES: &[&str] =
    &["đi phượt", "phượt", "đường dài", "đi xa", "đi tour", "du lịch", "touring"];

pub const BEGINNER_PHRASES: &[&str] = &[
    "mới tập",
    "mới học",
    "mới lái",
    "mới biết đi",
    "người mới",
    "lần đầu",
    "chưa quen",
    "chưa có kinh nghiệm",
    "beginner",
];

pub const EXPERIENCED_PHRASES: &[&str] = &[
    "thể thao",
    "mạnh mẽ",
    "tốc độ",
    "bốc",
    "phân khối lớn",
    "côn tay",
    "sporty",
    "lái lâu năm",
];

pub const FEATURE_RULES: &[KeywordRule] = &[
    KeywordRule {
        tag: LIGHTWEIGHT,
        phrases: &["nhẹ", "nhỏ gọn", "dễ điều khiển", "dễ lái", "dễ chạy", "lightweight"],
    },
    KeywordRule {
        tag: FUEL_SAVING,
        phrases: &[
            "tiết kiệm xăng",
            "tiết kiệm nhiên liệu",
            "ít hao xăng",
            "đỡ tốn xăng",
            "ăn ít xăng",
            "tiết kiệm",
        ],
    },
    KeywordRule {
        tag: SPORTY,
        phrases: &["thể thao", "mạnh mẽ", "tốc độ", "bốc", "côn tay", "sporty"],
    },
    KeywordRule {
        tag: PREMIUM,
        phrases: &["cao cấp", "sang trọng", "đẳng cấp", "xịn", "premium", "luxury"],
    },
];

/// Phrases a shopper uses when asking for a part type.
pub const PART_MENTION_RULES: &[KeywordRule] = &[
    KeywordRule { tag: PART_OIL, phrases: &["nhớt", "dầu máy", "dầu xe", "thay dầu"] },
    KeywordRule { tag: PART_TIRE, phrases: &["lốp", "vỏ xe", "săm", "ruột xe"] },
    KeywordRule { tag: PART_BRAKE, phrases: &["phanh", "thắng", "má phanh", "bố thắng"] },
    KeywordRule { tag: PART_FILTER, phrases: &["lọc gió", "lọc nhớt", "lọc xăng", "bộ lọc"] },
    KeywordRule {
        tag: PART_CHAIN,
        phrases: &["nhông xích", "nhông sên dĩa", "sên", "xích", "dây curoa", "curoa"],
    },
    KeywordRule { tag: PART_BATTERY, phrases: &["ắc quy", "bình điện", "bugi"] },
    KeywordRule { tag: PART_MIRROR, phrases: &["gương", "kính chiếu hậu", "kính chắn gió"] },
    KeywordRule {
        tag: PART_EV,
        phrases: &["phụ tùng xe điện", "pin xe điện", "sạc xe điện", "bộ sạc"],
    },
];

/// Product-name substrings used when no catalog item carries a part tag yet.
pub const PART_NAME_HINTS: &[KeywordRule] = &[
    KeywordRule { tag: PART_OIL, phrases: &["nhớt", "dầu"] },
    KeywordRule { tag: PART_TIRE, phrases: &["lốp", "vỏ", "săm"] },
    KeywordRule { tag: PART_BRAKE, phrases: &["phanh", "thắng", "má phanh"] },
    KeywordRule { tag: PART_FILTER, phrases: &["lọc"] },
    KeywordRule { tag: PART_CHAIN, phrases: &["nhông", "xích", "sên", "curoa"] },
    KeywordRule { tag: PART_BATTERY, phrases: &["ắc quy", "bình điện", "bugi"] },
    KeywordRule { tag: PART_MIRROR, phrases: &["gương", "kính"] },
    KeywordRule { tag: PART_EV, phrases: EV_PART_NAME_HINTS },
];

pub const PART_SEARCH_PHRASES: &[&str] =
    &["phụ tùng", "phụ kiện", "đồ chơi xe", "linh kiện", "accessories", "parts"];

/// Product-name fragments that mark electric-vehicle parts.
pub const EV_PART_NAME_HINTS: &[&str] =
    &["xe điện", "xe máy điện", "pin xe", "pin lithium", "bộ sạc", "sạc xe"];

pub const BRANDS: &[BrandAlias] = &[
    BrandAlias { canonical: "honda", aliases: &["honda"] },
    BrandAlias { canonical: "yamaha", aliases: &["yamaha"] },
    BrandAlias { canonical: "suzuki", aliases: &["suzuki"] },
    BrandAlias { canonical: "vespa", aliases: &["vespa", "piaggio"] },
    BrandAlias { canonical: "sym", aliases: &["sym"] },
    BrandAlias { canonical: "vinfast", aliases: &["vinfast", "vin fast"] },
    BrandAlias { canonical: "kymco", aliases: &["kymco"] },
    BrandAlias { canonical: "kawasaki", aliases: &["kawasaki"] },
    BrandAlias { canonical: "ducati", aliases: &["ducati"] },
];

pub const MODEL_RULES: &[KeywordRule] = &[
    KeywordRule { tag: "model-vision", phrases: &["vision"] },
    KeywordRule { tag: "model-air-blade", phrases: &["air blade", "airblade"] },
    KeywordRule { tag: "model-lead", phrases: &["lead"] },
    KeywordRule {
        tag: "model-sh",
        phrases: &["sh 125", "sh125", "sh 150", "sh150", "sh 160", "sh160", "xe sh"],
    },
    KeywordRule { tag: "model-wave", phrases: &["wave"] },
    KeywordRule { tag: "model-winner", phrases: &["winner"] },
    KeywordRule { tag: "model-exciter", phrases: &["exciter"] },
    KeywordRule { tag: "model-sirius", phrases: &["sirius"] },
    KeywordRule { tag: "model-janus", phrases: &["janus"] },
    KeywordRule { tag: "model-grande", phrases: &["grande"] },
    KeywordRule { tag: "model-raider", phrases: &["raider"] },
    KeywordRule { tag: "model-liberty", phrases: &["liberty"] },
    KeywordRule { tag: "model-primavera", phrases: &["primavera"] },
    KeywordRule { tag: "model-sprint", phrases: &["sprint"] },
    KeywordRule { tag: "model-klara", phrases: &["klara"] },
    KeywordRule { tag: "model-feliz", phrases: &["feliz"] },
];

pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase))
}

pub fn is_part_tag(tag: &str) -> bool {
    tag.starts_with(PART_PREFIX)
}

pub fn is_model_tag(tag: &str) -> bool {
    tag.starts_with(MODEL_PREFIX)
}

/// `model-air-blade` -> `air blade`.
pub fn model_name(tag: &str) -> Option<String> {
    tag.strip_prefix(MODEL_PREFIX)
        .filter(|slug| !slug.is_empty())
        .map(|slug| slug.replace('-', " "))
}

/// Maps a brand spelling (any case) onto its canonical token.
pub fn canonical_brand(name: &str) -> Option<&'static str> {
    let normalized = name.trim().to_lowercase();
    BRANDS
        .iter()
        .find(|brand| brand.aliases.iter().any(|alias| *alias == normalized))
        .map(|brand| brand.canonical)
}

/// Every spelling of a canonical brand, or the token itself for unknown brands.
pub fn brand_spellings(token: &str) -> Vec<&str> {
    BRANDS
        .iter()
        .find(|brand| brand.canonical == token)
        .map(|brand| brand.aliases.to_vec())
        .unwrap_or_else(|| vec![token])
}

/// Brand token used for comparisons; unknown brands fall back to their lower-cased name.
pub fn brand_token(name: &str) -> String {
    canonical_brand(name).map(str::to_string).unwrap_or_else(|| name.trim().to_lowercase())
}

pub fn height_bucket(height_cm: u16) -> &'static str {
    match height_cm {
        0..=155 => HEIGHT_UNDER_156,
        156..=165 => HEIGHT_156_165,
        166..=175 => HEIGHT_166_175,
        _ => HEIGHT_OVER_175,
    }
}

pub fn part_name_hints(tag: &str) -> &'static [&'static str] {
    PART_NAME_HINTS.iter().find(|rule| rule.tag == tag).map(|rule| rule.phrases).unwrap_or(&[])
}
