use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::models::auth::UserProfile;

/// `{"status": "success", <key>: data, "message": ...}`
pub fn success<T: Serialize>(key: &str, data: T) -> Json<Value> {
    envelope(key, data, None)
}

pub fn success_with_message<T: Serialize>(key: &str, data: T, message: &str) -> Json<Value> {
    envelope(key, data, Some(message))
}

fn envelope<T: Serialize>(key: &str, data: T, message: Option<&str>) -> Json<Value> {
    let mut body = Map::new();
    body.insert("status".into(), Value::from("success"));
    body.insert(key.into(), serde_json::to_value(data).unwrap_or(Value::Null));
    body.insert("message".into(), message.map(Value::from).unwrap_or(Value::Null));
    Json(Value::Object(body))
}

#[derive(Serialize)]
pub struct UserCreatedResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    /// Only present when the password was generated server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_password: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub room_id: String,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub available: bool,
}
