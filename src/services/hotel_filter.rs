use crate::models::Hotel;

/// Lowest value the price slider ever tops out at
pub const MIN_PRICE_CEILING: f64 = 500.0;

/// User-adjustable hotel filtering criteria
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotelConstraints {
    pub max_price: f64,
    pub min_rating: f64,
    pub require_ac: bool,
    pub require_wifi: bool,
    pub require_family_friendly: bool,
}

impl HotelConstraints {
    /// Constraints that let every hotel in the list through
    pub fn unrestricted(hotels: &[Hotel]) -> Self {
        Self {
            max_price: price_ceiling(hotels),
            min_rating: 0.0,
            require_ac: false,
            require_wifi: false,
            require_family_friendly: false,
        }
    }

    /// Whether a single hotel satisfies every constraint
    pub fn admits(&self, hotel: &Hotel) -> bool {
        hotel.price_per_night <= self.max_price
            && hotel.rating >= self.min_rating
            && (!self.require_ac || hotel.has_ac)
            && (!self.require_wifi || hotel.has_wifi)
            && (!self.require_family_friendly || hotel.family_friendly)
    }
}

/// Upper bound for the price control: never below 500, never below a real price
pub fn price_ceiling(hotels: &[Hotel]) -> f64 {
    hotels
        .iter()
        .map(|h| h.price_per_night)
        .fold(MIN_PRICE_CEILING, f64::max)
}

/// Returns the hotels that satisfy all constraints, in their original order
pub fn filter_hotels<'a>(hotels: &'a [Hotel], constraints: &HotelConstraints) -> Vec<&'a Hotel> {
    hotels.iter().filter(|h| constraints.admits(h)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(name: &str, price: f64, rating: f64, ac: bool, wifi: bool, family: bool) -> Hotel {
        Hotel {
            name: name.to_string(),
            star_rating: 3,
            price_per_night: price,
            rating,
            image_url: None,
            amenities: Vec::new(),
            has_ac: ac,
            has_wifi: wifi,
            family_friendly: family,
        }
    }

    fn sample() -> Vec<Hotel> {
        vec![
            hotel("Budget Inn", 60.0, 3.8, false, true, true),
            hotel("Palm Court", 150.0, 4.6, true, true, false),
            hotel("Lake Lodge", 95.0, 4.1, true, false, true),
            hotel("Hill Stay", 100.0, 4.0, true, true, true),
        ]
    }

    fn open(max_price: f64) -> HotelConstraints {
        HotelConstraints {
            max_price,
            min_rating: 0.0,
            require_ac: false,
            require_wifi: false,
            require_family_friendly: false,
        }
    }

    fn names(hotels: Vec<&Hotel>) -> Vec<&str> {
        hotels.into_iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_max_price_keeps_order() {
        let hotels = sample();
        let result = filter_hotels(&hotels, &open(100.0));
        assert_eq!(names(result), vec!["Budget Inn", "Lake Lodge", "Hill Stay"]);
    }

    #[test]
    fn test_require_ac_excludes_hotels_without_ac() {
        let hotels = sample();
        let constraints = HotelConstraints {
            require_ac: true,
            ..HotelConstraints::unrestricted(&hotels)
        };
        let result = filter_hotels(&hotels, &constraints);
        assert!(result.iter().all(|h| h.has_ac));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_all_constraints_combine() {
        let hotels = sample();
        let constraints = HotelConstraints {
            max_price: 120.0,
            min_rating: 4.0,
            require_ac: true,
            require_wifi: true,
            require_family_friendly: true,
        };
        assert_eq!(names(filter_hotels(&hotels, &constraints)), vec!["Hill Stay"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let hotels = sample();
        let constraints = HotelConstraints {
            min_rating: 5.0,
            ..open(1000.0)
        };
        assert!(filter_hotels(&hotels, &constraints).is_empty());
    }

    #[test]
    fn test_empty_list_stays_empty() {
        let constraints = HotelConstraints {
            require_ac: true,
            ..open(0.0)
        };
        assert!(filter_hotels(&[], &constraints).is_empty());
        assert!(filter_hotels(&[], &open(10_000.0)).is_empty());
    }

    #[test]
    fn test_price_ceiling() {
        assert_eq!(price_ceiling(&[]), 500.0);
        assert_eq!(price_ceiling(&sample()), 500.0);

        let mut hotels = sample();
        hotels.push(hotel("Royal Palace", 820.0, 4.9, true, true, true));
        assert_eq!(price_ceiling(&hotels), 820.0);
    }

    #[test]
    fn test_unrestricted_admits_everything() {
        let hotels = sample();
        let constraints = HotelConstraints::unrestricted(&hotels);
        assert_eq!(filter_hotels(&hotels, &constraints).len(), hotels.len());
    }
}
