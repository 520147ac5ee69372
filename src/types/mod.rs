pub mod itinerary;
pub mod request;

pub use itinerary::{DayRecord, ParsedItinerary};
pub use request::{GenerationRequest, GenerationResult};
