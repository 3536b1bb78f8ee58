use serde::{Deserialize, Serialize};

/// Image shown when the model does not supply one for a destination
pub const DESTINATION_PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1564507592333-c60657eaa0af?auto=format&fit=crop&w=800&q=80";

/// A recommended destination, built by the response normalizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Position in the batch the destination arrived in
    pub id: usize,
    pub name: String,
    pub region: String,
    pub description: String,
    /// Free-form budget range, e.g. "$1,200 – $2,500"
    pub budget_range: String,
    pub best_time_to_visit: String,
    /// Between 0 and 5
    pub rating: f64,
    pub image_url: String,
    /// Short sentence tying the destination to the user's interests
    pub personalized_reason: String,
    pub nearby_places: Vec<NearbyPlace>,
    pub hotels: Vec<Hotel>,
}

/// A point of interest close to a destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlace {
    pub name: String,
    /// Display distance such as "13 km"
    pub distance_label: String,
    pub rating: f64,
    /// Temple, Beach, Nature, Wildlife, History, ...
    pub category: String,
    pub image_url: Option<String>,
}

/// A hotel listing attached to a destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    /// 1 to 5
    pub star_rating: u8,
    pub price_per_night: f64,
    pub rating: f64,
    pub image_url: Option<String>,
    /// Display order preserved; may contain duplicates
    pub amenities: Vec<String>,
    #[serde(rename = "hasAC")]
    pub has_ac: bool,
    pub has_wifi: bool,
    pub family_friendly: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotel_serializes_camel_case_flags() {
        let hotel = Hotel {
            name: "Sea View".to_string(),
            star_rating: 4,
            price_per_night: 120.0,
            rating: 4.3,
            image_url: None,
            amenities: vec!["Pool".to_string()],
            has_ac: true,
            has_wifi: false,
            family_friendly: true,
        };

        let json = serde_json::to_value(&hotel).unwrap();
        assert_eq!(json["hasAC"], true);
        assert_eq!(json["hasWifi"], false);
        assert_eq!(json["familyFriendly"], true);
        assert_eq!(json["pricePerNight"], 120.0);
        assert_eq!(json["starRating"], 4);
    }
}
