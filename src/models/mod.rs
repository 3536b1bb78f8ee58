pub mod destination;
pub mod preference;

pub use destination::{Destination, Hotel, NearbyPlace, DESTINATION_PLACEHOLDER_IMAGE};
pub use preference::{Preference, PreferenceRequest};
