//! Static agronomic reference tables
//!
//! Yields are kilograms per square meter per season and prices are per
//! kilogram in local currency. Figures are coarse smallholder averages.

use std::sync::LazyLock;

use rust_decimal::Decimal;

/// How forgiving a crop is to grow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropDifficulty {
    /// Leafy greens and legumes
    Easy,
    Medium,
    /// Staple grains and tubers
    Hard,
}

/// Baseline figures for one crop
#[derive(Debug)]
pub struct CropReference {
    pub name: &'static str,
    /// Lowercase names and synonyms that resolve to this entry
    pub aliases: &'static [&'static str],
    pub yield_kg_per_sqm: Decimal,
    pub price_per_kg: Decimal,
    pub difficulty: CropDifficulty,
}

fn entry(
    name: &'static str,
    aliases: &'static [&'static str],
    yield_kg_per_sqm: Decimal,
    price_per_kg: Decimal,
    difficulty: CropDifficulty,
) -> CropReference {
    CropReference {
        name,
        aliases,
        yield_kg_per_sqm,
        price_per_kg,
        difficulty,
    }
}

/// Known crops; the first entry is the baseline for unknown types
pub static CROP_REFERENCES: LazyLock<Vec<CropReference>> = LazyLock::new(|| {
    use CropDifficulty::{Easy, Hard, Medium};

    vec![
        entry("rice", &["rice", "paddy"], Decimal::new(6, 1), Decimal::from(25), Hard),
        entry("wheat", &["wheat"], Decimal::new(45, 2), Decimal::from(22), Hard),
        entry("corn", &["corn", "maize"], Decimal::new(8, 1), Decimal::from(20), Medium),
        entry("tomato", &["tomato", "tomatoes"], Decimal::from(4), Decimal::from(15), Medium),
        entry("potato", &["potato", "potatoes"], Decimal::new(25, 1), Decimal::from(12), Hard),
        entry("onion", &["onion", "onions"], Decimal::new(25, 1), Decimal::from(18), Medium),
        entry("cotton", &["cotton"], Decimal::new(25, 2), Decimal::from(60), Medium),
        entry(
            "sugarcane",
            &["sugarcane", "sugar cane"],
            Decimal::from(7),
            Decimal::new(35, 1),
            Hard,
        ),
        entry(
            "soybean",
            &["soybean", "soybeans", "soya"],
            Decimal::new(3, 1),
            Decimal::from(40),
            Easy,
        ),
        entry("cabbage", &["cabbage"], Decimal::from(3), Decimal::from(10), Easy),
        entry("carrot", &["carrot", "carrots"], Decimal::new(25, 1), Decimal::from(20), Medium),
        entry("lettuce", &["lettuce"], Decimal::from(2), Decimal::from(30), Easy),
        entry("spinach", &["spinach"], Decimal::new(15, 1), Decimal::from(25), Easy),
        entry(
            "beans",
            &["beans", "bean", "green beans"],
            Decimal::ONE,
            Decimal::from(40),
            Easy,
        ),
        entry(
            "chickpea",
            &["chickpea", "chickpeas", "gram"],
            Decimal::new(2, 1),
            Decimal::from(55),
            Easy,
        ),
        entry(
            "groundnut",
            &["groundnut", "groundnuts", "peanut", "peanuts"],
            Decimal::new(3, 1),
            Decimal::from(50),
            Easy,
        ),
    ]
});

/// Entry used for crop types the table does not know
pub fn baseline_reference() -> &'static CropReference {
    &CROP_REFERENCES[0]
}

/// Look up a crop by name or synonym, case-insensitively
pub fn find_crop(crop_type: &str) -> Option<&'static CropReference> {
    let key = crop_type.trim().to_lowercase();
    CROP_REFERENCES
        .iter()
        .find(|r| r.aliases.iter().any(|alias| *alias == key))
}

/// Crop names recognised in free-text vision responses, in match priority
pub const AREA_CROP_VOCABULARY: &[&str] = &[
    "rice", "wheat", "corn", "maize", "tomato", "potato", "onion", "cotton", "sugarcane",
    "soybean", "cabbage", "carrot", "lettuce", "spinach", "beans",
];

/// Crop names recognised in free-text suggestion responses, in match priority
pub const SUGGESTION_CROP_VOCABULARY: &[&str] = &[
    "rice", "wheat", "corn", "maize", "tomato", "potato", "onion", "cotton", "sugarcane",
    "soybean", "chickpea", "groundnut", "mustard", "millet",
];
