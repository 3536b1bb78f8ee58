//! Turns a raw model completion into destination records.
//!
//! The completion is untrusted: it may be wrapped in markdown fences, wrapped
//! in an object under an arbitrary key, or carry loosely-typed fields. Minor
//! deviations are absorbed here; anything that cannot be brought into shape
//! rejects the whole batch.

use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{Destination, Hotel, NearbyPlace, DESTINATION_PLACEHOLDER_IMAGE},
};

/// Maximum number of destinations kept from a single completion
pub const MAX_DESTINATIONS: usize = 6;

const WRAPPER_KEY: &str = "destinations";

/// Parses a completion into at most [`MAX_DESTINATIONS`] destinations
///
/// Fewer than six destinations is not an error. Unparseable text, a non-array
/// payload, or a destination missing its name or rating fails with
/// [`AppError::InvalidResponseShape`].
pub fn normalize(raw: &str) -> AppResult<Vec<Destination>> {
    let parsed = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(strict_err) => {
            tracing::debug!(error = %strict_err, "Strict parse failed, stripping code fences");
            serde_json::from_str::<Value>(strip_code_fences(raw)).map_err(|e| {
                AppError::InvalidResponseShape(format!("completion is not valid JSON: {}", e))
            })?
        }
    };

    let candidates = match unwrap_candidate(parsed) {
        Value::Array(items) => items,
        other => {
            return Err(AppError::InvalidResponseShape(format!(
                "expected a destinations array, got {}",
                json_type(&other)
            )))
        }
    };

    if candidates.len() > MAX_DESTINATIONS {
        tracing::debug!(
            received = candidates.len(),
            kept = MAX_DESTINATIONS,
            "Truncating destinations"
        );
    }

    candidates
        .iter()
        .take(MAX_DESTINATIONS)
        .enumerate()
        .map(|(id, item)| destination_from_value(id, item))
        .collect()
}

/// Finds the destination list inside a parsed completion
fn unwrap_candidate(parsed: Value) -> Value {
    match parsed {
        Value::Object(mut object) => {
            if object.get(WRAPPER_KEY).is_some_and(|v| !is_falsy(v)) {
                return object.remove(WRAPPER_KEY).unwrap_or(Value::Null);
            }

            // Keys keep document order (serde_json preserve_order)
            let first = object.into_iter().next();
            tracing::warn!(
                key = first.as_ref().map(|(k, _)| k.as_str()).unwrap_or("<none>"),
                "Completion lacks a \"destinations\" key, using first value"
            );
            first.map(|(_, v)| v).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// `null`, `false`, `0` and `""` count as a missing wrapper value
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Removes a leading ``` or ```json fence and a trailing ``` fence
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn destination_from_value(id: usize, value: &Value) -> AppResult<Destination> {
    let object = value.as_object().ok_or_else(|| {
        AppError::InvalidResponseShape(format!(
            "destination {} is {}, expected an object",
            id,
            json_type(value)
        ))
    })?;

    let name = string_field(object, "name").ok_or_else(|| {
        AppError::InvalidResponseShape(format!("destination {} has no name", id))
    })?;
    let rating = number_field(object, "rating").ok_or_else(|| {
        AppError::InvalidResponseShape(format!("destination {} ({}) has no numeric rating", id, name))
    })?;

    Ok(Destination {
        id,
        name,
        region: string_field(object, "location").unwrap_or_default(),
        description: string_field(object, "description").unwrap_or_default(),
        budget_range: string_field(object, "budget").unwrap_or_default(),
        best_time_to_visit: string_field(object, "bestTime").unwrap_or_default(),
        rating: rating.clamp(0.0, 5.0),
        image_url: string_field(object, "imageUrl")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DESTINATION_PLACEHOLDER_IMAGE.to_string()),
        personalized_reason: string_field(object, "personalizedReason").unwrap_or_default(),
        nearby_places: objects(object, "nearbyPlaces").map(nearby_place_from_object).collect(),
        hotels: objects(object, "hotels").map(hotel_from_object).collect(),
    })
}

fn nearby_place_from_object(object: &Map<String, Value>) -> NearbyPlace {
    NearbyPlace {
        name: string_field(object, "name").unwrap_or_default(),
        distance_label: string_field(object, "distance").unwrap_or_default(),
        rating: number_field(object, "rating").unwrap_or(0.0),
        category: string_field(object, "type").unwrap_or_default(),
        image_url: string_field(object, "imageUrl").filter(|url| !url.trim().is_empty()),
    }
}

fn hotel_from_object(object: &Map<String, Value>) -> Hotel {
    let stars = number_field(object, "stars").unwrap_or(1.0);

    Hotel {
        name: string_field(object, "name").unwrap_or_default(),
        star_rating: stars.round().clamp(1.0, 5.0) as u8,
        price_per_night: number_field(object, "price").unwrap_or(0.0).max(0.0),
        rating: number_field(object, "rating").unwrap_or(0.0),
        image_url: string_field(object, "imageUrl").filter(|url| !url.trim().is_empty()),
        amenities: object
            .get("amenities")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        has_ac: bool_field(object, "ac"),
        has_wifi: bool_field(object, "wifi"),
        family_friendly: bool_field(object, "familyFriendly"),
    }
}

/// Object elements of an array field; absent or non-array fields yield nothing
fn objects<'a>(
    object: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    object
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers, or strings that parse as numbers ("4.5")
fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn bool_field(object: &Map<String, Value>, key: &str) -> bool {
    match object.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes"),
        _ => false,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
