//! Chicken food-safety lookup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use super::{CapabilityDescriptor, CapabilityError, CapabilityHandler, InputSchema, Result};
use crate::error::Error;
use crate::protocol::CapabilityInput;

pub const CAPABILITY_NAME: &str = "chicken_food_safety_check";
pub const CAPABILITY_ENDPOINT: &str = "/a2a/chicken-food-safety";
pub const FOOD_ITEM_FIELD: &str = "food_item";

const DEFAULT_SAFE: &[&str] = &[
    "corn", "wheat", "oats", "barley", "rice", "quinoa", "millet",
    "lettuce", "spinach", "kale", "cabbage", "broccoli", "carrots",
    "peas", "green beans", "squash", "pumpkin", "cucumber",
    "tomatoes", "bell peppers", "zucchini", "sweet potato",
    "apples", "berries", "grapes", "melon", "banana",
    "chicken feed", "layer feed", "scratch grains",
    "sunflower seeds", "pumpkin seeds", "herbs", "clover",
];

const DEFAULT_UNSAFE: &[&str] = &[
    "chocolate", "avocado", "onions", "garlic", "mushrooms",
    "raw beans", "raw potatoes", "green tomatoes", "rhubarb",
    "apple seeds", "cherry pits", "caffeine", "alcohol",
    "moldy food", "salty snacks", "candy", "processed food",
];

/// Classification of a food item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SafetyStatus {
    Safe,
    Unsafe,
    Unknown,
}

impl SafetyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Unsafe => "unsafe",
            Self::Unknown => "unknown",
        }
    }

    /// `None` when the item is in neither table.
    pub fn is_safe(&self) -> Option<bool> {
        match self {
            Self::Safe => Some(true),
            Self::Unsafe => Some(false),
            Self::Unknown => None,
        }
    }
}

/// Result record returned for a food-safety check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodSafetyVerdict {
    pub food_item: String,
    pub is_safe: Option<bool>,
    pub status: SafetyStatus,
    pub message: String,
}

impl FoodSafetyVerdict {
    fn new(food_item: &str, status: SafetyStatus) -> Self {
        let message = match status {
            SafetyStatus::Safe => format!("{} is safe for chickens to eat.", food_item),
            SafetyStatus::Unsafe => {
                format!("{} is NOT safe for chickens and should be avoided.", food_item)
            }
            SafetyStatus::Unknown => format!(
                "Safety information for {} is not available. Please consult a veterinarian.",
                food_item
            ),
        };

        Self {
            food_item: food_item.to_string(),
            is_safe: status.is_safe(),
            status,
            message,
        }
    }
}

/// On-disk shape of a food table file.
#[derive(Debug, Deserialize)]
struct FoodTablesFile {
    safe: Vec<String>,
    #[serde(rename = "unsafe")]
    unsafe_foods: Vec<String>,
}

/// Immutable pair of disjoint food tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodTables {
    safe: HashSet<String>,
    unsafe_foods: HashSet<String>,
}

impl FoodTables {
    /// Build tables from raw entries. Entries are trimmed and lowercased;
    /// an item listed on both sides is a configuration error.
    pub fn new<S, U>(safe: S, unsafe_foods: U) -> crate::error::Result<Self>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        U: IntoIterator,
        U::Item: AsRef<str>,
    {
        let safe: HashSet<String> = safe.into_iter().map(|s| normalize(s.as_ref())).collect();
        let unsafe_foods: HashSet<String> =
            unsafe_foods.into_iter().map(|s| normalize(s.as_ref())).collect();

        let mut overlap: Vec<&String> = safe.intersection(&unsafe_foods).collect();
        if !overlap.is_empty() {
            overlap.sort();
            return Err(Error::Config(format!(
                "food tables overlap: {}",
                overlap.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            )));
        }

        Ok(Self { safe, unsafe_foods })
    }

    /// Load tables from a JSON file shaped `{"safe": [...], "unsafe": [...]}`.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: FoodTablesFile = serde_json::from_str(&content)?;
        let tables = Self::new(file.safe, file.unsafe_foods)?;

        tracing::debug!(
            "Loaded {} safe and {} unsafe foods from {}",
            tables.safe.len(),
            tables.unsafe_foods.len(),
            path.display()
        );
        Ok(tables)
    }

    pub fn classify(&self, food_item: &str) -> SafetyStatus {
        let key = normalize(food_item);
        if self.safe.contains(&key) {
            SafetyStatus::Safe
        } else if self.unsafe_foods.contains(&key) {
            SafetyStatus::Unsafe
        } else {
            SafetyStatus::Unknown
        }
    }
}

impl Default for FoodTables {
    fn default() -> Self {
        Self {
            safe: DEFAULT_SAFE.iter().map(|s| s.to_string()).collect(),
            unsafe_foods: DEFAULT_UNSAFE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn normalize(item: &str) -> String {
    item.trim().to_lowercase()
}

/// Handler for the `chicken_food_safety_check` capability.
pub struct FoodSafetyHandler {
    tables: FoodTables,
    descriptor: CapabilityDescriptor,
}

impl FoodSafetyHandler {
    pub fn new(tables: FoodTables) -> Self {
        Self {
            tables,
            descriptor: CapabilityDescriptor {
                name: CAPABILITY_NAME.to_string(),
                description: "Check if a food item is safe for chickens".to_string(),
                endpoint: CAPABILITY_ENDPOINT.to_string(),
                method: "POST".to_string(),
                input_schema: InputSchema::object()
                    .with_required_string(FOOD_ITEM_FIELD, "Name of the food item to check"),
            },
        }
    }

    /// Classify `food_item`, echoing the caller's spelling in the verdict.
    pub fn check(&self, food_item: &str) -> FoodSafetyVerdict {
        FoodSafetyVerdict::new(food_item, self.tables.classify(food_item))
    }
}

impl Default for FoodSafetyHandler {
    fn default() -> Self {
        Self::new(FoodTables::default())
    }
}

impl CapabilityHandler for FoodSafetyHandler {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    fn handle(&self, capability: &str, input: &CapabilityInput) -> Result<Value> {
        if capability != CAPABILITY_NAME {
            return Err(CapabilityError::Unsupported(capability.to_string()));
        }

        let food_item = input
            .get(FOOD_ITEM_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CapabilityError::InvalidInput(format!("'{}' must be a string", FOOD_ITEM_FIELD))
            })?;

        let verdict = self.check(food_item);
        serde_json::to_value(&verdict).map_err(|e| CapabilityError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn input(item: &str) -> CapabilityInput {
        let mut input = CapabilityInput::new();
        input.insert(FOOD_ITEM_FIELD.to_string(), json!(item));
        input
    }

    #[test]
    fn test_default_classification() {
        let handler = FoodSafetyHandler::default();

        let kale = handler.check("kale");
        assert_eq!(kale.status, SafetyStatus::Safe);
        assert_eq!(kale.is_safe, Some(true));
        assert_eq!(kale.message, "kale is safe for chickens to eat.");

        let chocolate = handler.check("chocolate");
        assert_eq!(chocolate.status, SafetyStatus::Unsafe);
        assert_eq!(chocolate.is_safe, Some(false));

        let durian = handler.check("durian");
        assert_eq!(durian.status, SafetyStatus::Unknown);
        assert_eq!(durian.is_safe, None);
        assert!(durian.message.contains("consult a veterinarian"));
    }

    #[test]
    fn test_matching_ignores_case_and_whitespace() {
        let handler = FoodSafetyHandler::default();
        for spelling in ["  Corn ", "CORN", "corn"] {
            let verdict = handler.check(spelling);
            assert_eq!(verdict.status, SafetyStatus::Safe, "{spelling:?}");
            assert_eq!(verdict.food_item, spelling);
        }
        assert_eq!(handler.check("Green Tomatoes").status, SafetyStatus::Unsafe);
    }

    #[test]
    fn test_default_tables_are_disjoint() {
        let rebuilt = FoodTables::new(DEFAULT_SAFE.iter(), DEFAULT_UNSAFE.iter()).unwrap();
        assert_eq!(rebuilt, FoodTables::default());
    }

    #[test]
    fn test_overlapping_tables_rejected() {
        let err = FoodTables::new(["corn", "Kale "], ["kale"]).unwrap_err();
        assert!(err.to_string().contains("kale"));
    }

    #[test]
    fn test_injected_tables() {
        let tables = FoodTables::new(["Durian"], ["corn"]).unwrap();
        let handler = FoodSafetyHandler::new(tables);
        assert_eq!(handler.check("durian").status, SafetyStatus::Safe);
        assert_eq!(handler.check("corn").status, SafetyStatus::Unsafe);
        assert_eq!(handler.check("kale").status, SafetyStatus::Unknown);
    }

    #[test]
    fn test_tables_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"safe": ["Mealworms"], "unsafe": ["raw beans"]}}"#).unwrap();

        let tables = FoodTables::from_file(file.path()).unwrap();
        assert_eq!(tables.classify("mealworms"), SafetyStatus::Safe);
        assert_eq!(tables.classify("corn"), SafetyStatus::Unknown);
    }

    #[test]
    fn test_handle_produces_result_record() {
        let handler = FoodSafetyHandler::default();
        let result = handler.handle(CAPABILITY_NAME, &input("durian")).unwrap();
        assert_eq!(result["food_item"], "durian");
        assert_eq!(result["is_safe"], Value::Null);
        assert_eq!(result["status"], "unknown");
    }

    #[test]
    fn test_handle_rejects_other_capabilities() {
        let handler = FoodSafetyHandler::default();
        let err = handler.handle("weather", &input("corn")).unwrap_err();
        assert_eq!(err, CapabilityError::Unsupported("weather".to_string()));

        let mut bad = CapabilityInput::new();
        bad.insert(FOOD_ITEM_FIELD.to_string(), json!(3));
        assert!(matches!(
            handler.handle(CAPABILITY_NAME, &bad),
            Err(CapabilityError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_descriptor_schema() {
        let handler = FoodSafetyHandler::default();
        let value = serde_json::to_value(handler.descriptor()).unwrap();
        assert_eq!(value["name"], CAPABILITY_NAME);
        assert_eq!(value["endpoint"], "/a2a/chicken-food-safety");
        assert_eq!(value["input_schema"]["type"], "object");
        assert_eq!(value["input_schema"]["required"], json!(["food_item"]));
        assert_eq!(value["input_schema"]["properties"]["food_item"]["type"], "string");
    }
}
