use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// US postal codes: 5 digits, optionally followed by a dash and 4 digits
static US_POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid postcode regex"));

/// Compass quadrant relative to New York City
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Direction {
    #[serde(rename = "NE")]
    #[strum(serialize = "NE")]
    Northeast,
    #[serde(rename = "NW")]
    #[strum(serialize = "NW")]
    Northwest,
    #[serde(rename = "SE")]
    #[strum(serialize = "SE")]
    Southeast,
    #[serde(rename = "SW")]
    #[strum(serialize = "SW")]
    Southwest,
}

/// Item entity - the document stored in MongoDB.
///
/// Field names are the persisted (snake_case) representation; the HTTP
/// boundary uses [`ItemResponse`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Item name, must appear in `users`
    pub name: String,
    /// US postcode the item was created with
    pub postcode: String,
    /// Latitude resolved from the postcode
    pub latitude: f64,
    /// Longitude resolved from the postcode
    pub longitude: f64,
    /// Compass quadrant relative to New York City
    pub direction_from_new_york: Direction,
    /// Optional title
    pub title: Option<String>,
    /// Associated user names
    pub users: Vec<String>,
    /// When the item becomes effective
    pub start_date: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new item (camelCase at the HTTP boundary)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_name_in_users))]
pub struct CreateItem {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(regex(path = *US_POSTCODE, message = "Invalid US postcode format"))]
    pub postcode: String,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(custom(function = validate_user_names))]
    pub users: Vec<String>,
    #[validate(custom(function = validate_start_date))]
    pub start_date: DateTime<Utc>,
}

/// DTO for partially updating an existing item.
///
/// Only the mutable fields are accepted; `postcode` and the derived geo
/// fields cannot change after creation.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_update_name_in_users))]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(custom(function = validate_user_names))]
    pub users: Option<Vec<String>>,
    #[validate(custom(function = validate_start_date))]
    pub start_date: Option<DateTime<Utc>>,
}

impl UpdateItem {
    /// True when no updatable field was provided.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.title.is_none()
            && self.users.is_none()
            && self.start_date.is_none()
    }
}

/// Item representation at the HTTP boundary (camelCase keys)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64,
    pub direction_from_new_york: Direction,
    pub title: Option<String>,
    pub users: Vec<String>,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            postcode: item.postcode,
            latitude: item.latitude,
            longitude: item.longitude,
            direction_from_new_york: item.direction_from_new_york,
            title: item.title,
            users: item.users,
            start_date: item.start_date,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl Item {
    /// Create a new item from a CreateItem DTO plus resolved geo data
    pub fn new(input: CreateItem, latitude: f64, longitude: f64, direction: Direction) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            postcode: input.postcode,
            latitude,
            longitude,
            direction_from_new_york: direction,
            title: input.title,
            users: input.users,
            start_date: input.start_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, refreshing `updated_at`
    pub fn apply_update(&mut self, update: UpdateItem) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(users) = update.users {
            self.users = users;
        }
        if let Some(start_date) = update.start_date {
            self.start_date = start_date;
        }
        self.updated_at = Utc::now();
    }
}

fn validate_user_names(users: &[String]) -> Result<(), ValidationError> {
    for user in users {
        if user.chars().count() > 50 {
            let mut err = ValidationError::new("length");
            err.message = Some("User names must be at most 50 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

fn validate_start_date(start_date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *start_date < Utc::now() + Duration::weeks(1) {
        let mut err = ValidationError::new("start_date");
        err.message = Some("Start date must be at least 1 week after the creation date".into());
        return Err(err);
    }
    Ok(())
}

fn validate_name_in_users(item: &CreateItem) -> Result<(), ValidationError> {
    if !item.users.contains(&item.name) {
        let mut err = ValidationError::new("name_in_users");
        err.message = Some("Name must be included in the users list".into());
        return Err(err);
    }
    Ok(())
}

fn validate_update_name_in_users(update: &UpdateItem) -> Result<(), ValidationError> {
    // Only checkable here when both fields are present; partial updates are
    // validated against the stored item in the service layer.
    if let (Some(name), Some(users)) = (&update.name, &update.users) {
        if !users.contains(name) {
            let mut err = ValidationError::new("name_in_users");
            err.message = Some("Name must be included in the users list".into());
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_create() -> CreateItem {
        CreateItem {
            name: "Test Item".to_string(),
            postcode: "10001".to_string(),
            title: Some("Test Title".to_string()),
            users: vec!["Test Item".to_string(), "User Two".to_string()],
            start_date: Utc::now() + Duration::weeks(2),
        }
    }

    fn sample_item() -> Item {
        Item::new(valid_create(), 40.7128, -74.0060, Direction::Northeast)
    }

    #[test]
    fn test_create_item_deserializes_camel_case() {
        let start = (Utc::now() + Duration::weeks(2)).to_rfc3339();
        let body = json!({
            "name": "Test Item",
            "postcode": "10001",
            "title": "Test Title",
            "users": ["Test Item", "User Two"],
            "startDate": start,
        });

        let input: CreateItem = serde_json::from_value(body).unwrap();
        assert_eq!(input.name, "Test Item");
        assert_eq!(input.users.len(), 2);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_valid_create_passes_validation() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_postcode_format_is_enforced() {
        let mut input = valid_create();
        input.postcode = "invalid".to_string();
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("postcode"));

        let mut input = valid_create();
        input.postcode = "10001-1234".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_name_length_is_enforced() {
        let mut input = valid_create();
        input.name = "x".repeat(51);
        input.users = vec![input.name.clone()];
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }

    #[test]
    fn test_user_name_length_is_enforced() {
        let mut input = valid_create();
        input.users.push("y".repeat(51));
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("users"));
    }

    #[test]
    fn test_start_date_must_be_a_week_out() {
        let mut input = valid_create();
        input.start_date = Utc::now() + Duration::days(2);
        let err = input.validate().unwrap_err();
        assert!(err.field_errors().contains_key("start_date"));
    }

    #[test]
    fn test_name_must_be_in_users() {
        let mut input = valid_create();
        input.users = vec!["Somebody Else".to_string()];
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_name_in_users_checked_when_both_present() {
        let update = UpdateItem {
            name: Some("New Name".to_string()),
            users: Some(vec!["Other".to_string()]),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateItem {
            name: Some("New Name".to_string()),
            users: Some(vec!["New Name".to_string()]),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateItem::default().is_empty());
        assert!(
            !UpdateItem {
                title: Some("t".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_item_response_uses_camel_case_keys() {
        let response = ItemResponse::from(sample_item());
        let value = serde_json::to_value(&response).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert!(keys.contains(&"directionFromNewYork"));
        assert!(keys.contains(&"startDate"));
        assert!(keys.contains(&"createdAt"));
        assert!(keys.contains(&"updatedAt"));
        for key in keys {
            assert!(!key.contains('_'), "snake_case key leaked: {}", key);
        }
    }

    #[test]
    fn test_direction_serializes_as_compass_code() {
        assert_eq!(
            serde_json::to_value(Direction::Northeast).unwrap(),
            json!("NE")
        );
        assert_eq!(Direction::Southwest.to_string(), "SW");
    }

    #[test]
    fn test_apply_update_merges_fields() {
        let mut item = sample_item();
        let created_at = item.created_at;
        let previous_update = item.updated_at;

        item.apply_update(UpdateItem {
            title: Some("New Title".to_string()),
            ..Default::default()
        });

        assert_eq!(item.title, Some("New Title".to_string()));
        assert_eq!(item.name, "Test Item");
        assert_eq!(item.created_at, created_at);
        assert!(item.updated_at >= previous_update);
    }
}
