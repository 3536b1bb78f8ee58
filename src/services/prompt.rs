use serde::Serialize;
use serde_json::{json, Value};

use crate::models::Preference;

/// Number of destinations every completion must contain
pub const DESTINATION_COUNT: usize = 6;

const SYSTEM_INSTRUCTION: &str = "You are a professional travel advisor. Provide diverse, \
    realistic destination recommendations that match the traveller's preferences. Image URLs \
    must match the type of place they illustrate and must not show people. You must respond \
    with a single valid JSON object and nothing else.";

/// Everything a completion provider needs to ask for recommendations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPayload {
    /// Fixed advisor instruction sent as the system message
    pub system: String,
    /// Preference-specific instruction sent as the user message
    pub user: String,
    /// Example of the JSON shape the completion must follow
    pub response_shape: Value,
}

/// Builds the completion prompt for a set of preferences
///
/// Pure and deterministic: the same preference always yields the same payload.
pub fn build_prompt(preference: &Preference) -> PromptPayload {
    let response_shape = response_shape();
    let interests = interests_line(preference);

    let scope = match &preference.region {
        Some(region) => format!("ONLY within {}", region),
        None => "anywhere in the world".to_string(),
    };

    let mut lines = vec![
        format!(
            "Based on the user's preferences, recommend exactly {} travel destinations {}.",
            DESTINATION_COUNT, scope
        ),
        String::new(),
        "User preferences:".to_string(),
        format!("- Destination type: {}", or_any(&preference.destination_type)),
    ];
    if let Some(region) = &preference.region {
        lines.push(format!("- Region: {}", region));
    }
    lines.extend([
        format!("- Budget (in USD): ${}", preference.budget_ceiling),
        format!("- Duration: {}", preference.duration_bucket),
        format!("- Number of people: {}", preference.party_size),
        format!(
            "- Travel month: {}",
            preference.travel_month.as_deref().unwrap_or("Any")
        ),
        format!("- Interests: {}", interests),
        String::new(),
        format!(
            "Return a JSON object with a key named \"destinations\" containing an array of exactly {} destination objects. Each destination object must have:",
            DESTINATION_COUNT
        ),
        "- name: destination name (e.g. \"Munnar, Kerala\")".to_string(),
        "- location: state or region (e.g. \"South India\")".to_string(),
        "- description: 1-2 sentence compelling description".to_string(),
        "- budget: budget range as a string (e.g. \"$1,200 – $2,500\")".to_string(),
        "- bestTime: best months to visit (e.g. \"September – March\")".to_string(),
        "- rating: number between 4.0 and 5.0".to_string(),
        "- imageUrl: a landscape photo URL that matches the destination type".to_string(),
        format!(
            "- personalizedReason: a short sentence (max 15 words) explaining why this destination is perfect for them, mentioning one or more of their interests ({})",
            interests
        ),
        "- nearbyPlaces: array of 3 objects, each with: name, distance (e.g. \"13 km\"), rating (number), type (e.g. \"Temple\", \"Beach\", \"Nature\", \"Wildlife\", \"History\"), imageUrl".to_string(),
        "- hotels: array of 3 objects, each with: name, stars (integer 1-5), price (number per night in USD), rating (number), imageUrl, amenities (array of strings), ac (boolean), wifi (boolean), familyFriendly (boolean)".to_string(),
        String::new(),
        "The response must follow this shape:".to_string(),
        response_shape.to_string(),
        String::new(),
    ]);

    let mut closing = String::from("IMPORTANT: ");
    if let Some(region) = &preference.region {
        closing.push_str(&format!("Recommend ONLY places in {}. ", region));
    }
    closing.push_str(
        "Return ONLY strictly valid raw JSON. Do not include markdown formatting, code blocks, or any other text.",
    );
    lines.push(closing);

    PromptPayload {
        system: SYSTEM_INSTRUCTION.to_string(),
        user: lines.join("\n"),
        response_shape,
    }
}

/// Interests as a flat comma-joined list, "General" when none were picked
fn interests_line(preference: &Preference) -> String {
    if preference.interests.is_empty() {
        "General".to_string()
    } else {
        preference
            .interests
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn or_any(value: &str) -> &str {
    if value.trim().is_empty() {
        "Any"
    } else {
        value
    }
}

fn response_shape() -> Value {
    json!({
        "destinations": [{
            "name": "string",
            "location": "string",
            "description": "string",
            "budget": "string",
            "bestTime": "string",
            "rating": 4.5,
            "imageUrl": "string",
            "personalizedReason": "string",
            "nearbyPlaces": [{
                "name": "string",
                "distance": "string",
                "rating": 4.5,
                "type": "string",
                "imageUrl": "string"
            }],
            "hotels": [{
                "name": "string",
                "stars": 4,
                "price": 120,
                "rating": 4.5,
                "imageUrl": "string",
                "amenities": ["string"],
                "ac": true,
                "wifi": true,
                "familyFriendly": true
            }]
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beach_preference() -> Preference {
        Preference::new("Beach", 5000, "4-7 days", "2").with_interests(["Food", "Nature"])
    }

    #[test]
    fn test_prompt_contains_preferences() {
        let payload = build_prompt(&beach_preference());

        assert!(payload.user.contains("Beach"));
        assert!(payload.user.contains("5000"));
        assert!(payload.user.contains("4-7 days"));
        assert!(payload.user.contains("Food, Nature"));
        assert!(payload.user.contains("exactly 6"));
        assert!(payload.user.contains("strictly valid"));
    }

    #[test]
    fn test_interest_order_is_deterministic() {
        let a = Preference::new("Beach", 5000, "4-7 days", "2").with_interests(["Nature", "Food"]);
        assert_eq!(build_prompt(&a), build_prompt(&beach_preference()));
    }

    #[test]
    fn test_region_confines_results() {
        let preference = beach_preference().with_region("Goa");
        let payload = build_prompt(&preference);

        assert!(payload.user.contains("ONLY within Goa"));
        assert!(payload.user.contains("Recommend ONLY places in Goa"));

        let unrestricted = build_prompt(&beach_preference());
        assert!(!unrestricted.user.contains("ONLY within"));
    }

    #[test]
    fn test_empty_fields_render_as_any_and_general() {
        let payload = build_prompt(&Preference::new("", 800, "1-3 days", "Solo"));
        assert!(payload.user.contains("- Destination type: Any"));
        assert!(payload.user.contains("- Travel month: Any"));
        assert!(payload.user.contains("- Interests: General"));
    }

    #[test]
    fn test_response_shape_names_every_field() {
        let payload = build_prompt(&beach_preference());
        let destination = &payload.response_shape["destinations"][0];

        for field in ["name", "location", "budget", "bestTime", "rating", "hotels"] {
            assert!(destination.get(field).is_some(), "missing {}", field);
        }
        for field in ["stars", "price", "ac", "wifi", "familyFriendly", "amenities"] {
            assert!(destination["hotels"][0].get(field).is_some(), "missing {}", field);
        }
        assert!(payload.user.contains(&payload.response_shape.to_string()));
    }
}
