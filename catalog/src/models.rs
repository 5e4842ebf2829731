//! Wire models for the catalog source and the canonical product record.
//!
//! The source reports the nutrition grade under two field names and the
//! image under three. `RawProduct` mirrors that wire shape exactly;
//! converting it into [`Product`] collapses each candidate chain into one
//! canonical field, so nothing downstream ever probes alternates.

use serde::{Deserialize, Serialize};

/// Record as returned by the listing and barcode endpoints.
#[derive(Debug, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub code: String,
    pub product_name: Option<String>,
    pub image_url: Option<String>,
    pub image_front_url: Option<String>,
    pub image_small_url: Option<String>,
    #[serde(default)]
    pub categories_tags: Vec<String>,
    pub nutrition_grades: Option<String>,
    pub nutrition_grade_fr: Option<String>,
    pub ingredients_text: Option<String>,
    pub brands: Option<String>,
    pub categories: Option<String>,
    pub labels: Option<String>,
    #[serde(default)]
    pub nutriments: Nutriments,
}

/// Normalized product record. Cart snapshots embed these, so the type is
/// serializable and round-trips through JSON unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brands: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(default, skip_serializing_if = "Nutriments::is_empty")]
    pub nutriments: Nutriments,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        Self {
            code: raw.code,
            name: non_empty(raw.product_name),
            image: non_empty(raw.image_url)
                .or_else(|| non_empty(raw.image_front_url))
                .or_else(|| non_empty(raw.image_small_url)),
            category_tags: raw.categories_tags,
            grade: non_empty(raw.nutrition_grades).or_else(|| non_empty(raw.nutrition_grade_fr)),
            ingredients: non_empty(raw.ingredients_text),
            brands: non_empty(raw.brands),
            categories: non_empty(raw.categories),
            labels: non_empty(raw.labels),
            nutriments: raw.nutriments,
        }
    }
}

// The source emits "" where it has no value; treat that the same as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Per-100g nutrient table, every field independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutriments {
    pub energy: Option<f64>,
    #[serde(rename = "energy-kcal")]
    pub energy_kcal: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub proteins: Option<f64>,
    pub salt: Option<f64>,
}

impl Nutriments {
    pub fn is_empty(&self) -> bool {
        self.energy.is_none()
            && self.energy_kcal.is_none()
            && self.fat.is_none()
            && self.carbohydrates.is_none()
            && self.proteins.is_none()
            && self.salt.is_none()
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub product: Option<RawProduct>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub tags: Vec<Category>,
}

/// One entry of the category list: tag plus optional display name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: Option<String>,
}

impl Category {
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_prefers_primary_field() {
        let raw: RawProduct =
            serde_json::from_str(r#"{"nutrition_grades":"a","nutrition_grade_fr":"c"}"#).unwrap();
        assert_eq!(Product::from(raw).grade.as_deref(), Some("a"));
    }

    #[test]
    fn grade_falls_back_past_empty_string() {
        let raw: RawProduct =
            serde_json::from_str(r#"{"nutrition_grades":"","nutrition_grade_fr":"b"}"#).unwrap();
        assert_eq!(Product::from(raw).grade.as_deref(), Some("b"));
    }

    #[test]
    fn grade_absent_when_both_fields_missing() {
        let raw: RawProduct = serde_json::from_str("{}").unwrap();
        assert_eq!(Product::from(raw).grade, None);
    }

    #[test]
    fn image_candidates_resolve_in_order() {
        let raw: RawProduct = serde_json::from_str(
            r#"{"image_url":"","image_front_url":"front.jpg","image_small_url":"small.jpg"}"#,
        )
        .unwrap();
        assert_eq!(Product::from(raw).image.as_deref(), Some("front.jpg"));
    }

    #[test]
    fn missing_code_decodes_as_empty_key() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"products":[{"product_name":"Oats"}]}"#).unwrap();
        let product = Product::from(response.products.into_iter().next().unwrap());
        assert_eq!(product.code, "");
        assert_eq!(product.name.as_deref(), Some("Oats"));
    }

    #[test]
    fn barcode_response_without_product_is_absent() {
        let response: ProductResponse =
            serde_json::from_str(r#"{"status":0,"status_verbose":"product not found"}"#).unwrap();
        assert!(response.product.is_none());
    }

    #[test]
    fn nutriments_decode_with_partial_table() {
        let raw: RawProduct =
            serde_json::from_str(r#"{"nutriments":{"energy":1500.0,"energy-kcal":360.0}}"#)
                .unwrap();
        let product = Product::from(raw);
        assert_eq!(product.nutriments.energy, Some(1500.0));
        assert_eq!(product.nutriments.energy_kcal, Some(360.0));
        assert_eq!(product.nutriments.fat, None);
    }

    #[test]
    fn category_label_falls_back_to_id() {
        let named = Category {
            id: "en:snacks".to_string(),
            name: Some("Snacks".to_string()),
        };
        let unnamed = Category {
            id: "en:beverages".to_string(),
            name: None,
        };
        assert_eq!(named.label(), "Snacks");
        assert_eq!(unnamed.label(), "en:beverages");
    }

    #[test]
    fn product_round_trips_through_json() {
        let raw: RawProduct = serde_json::from_str(
            r#"{"code":"123","product_name":"Granola","nutrition_grade_fr":"b","categories_tags":["en:cereals"],"nutriments":{"fat":4.2}}"#,
        )
        .unwrap();
        let product = Product::from(raw);
        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
