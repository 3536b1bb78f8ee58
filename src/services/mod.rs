pub mod hotel_filter;
pub mod normalizer;
pub mod prompt;
pub mod providers;
pub mod recommendations;

pub use hotel_filter::{filter_hotels, price_ceiling, HotelConstraints};
pub use normalizer::normalize;
pub use prompt::{build_prompt, PromptPayload};
pub use providers::{ChatCompletionProvider, CompletionProvider};
pub use recommendations::get_recommendations;
