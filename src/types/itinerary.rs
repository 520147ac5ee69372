use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One normalized day of an itinerary.
///
/// Text fields are always present; an unknown section is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayRecord {
    /// 1-based position of the day within the itinerary
    pub day: u32,
    /// Morning activity (venue, timing, cost)
    #[serde(default)]
    pub morning: String,
    /// Afternoon activity (venue, timing, cost)
    #[serde(default)]
    pub afternoon: String,
    /// Evening activity (venue, timing, cost)
    #[serde(default)]
    pub evening: String,
    /// Restaurants or dishes worth trying that day
    #[serde(default)]
    pub food_recommendations: String,
    /// Neighborhood or lodging suggestion
    #[serde(default)]
    pub accommodation_info: String,
    /// Local transit advice
    #[serde(default)]
    pub transport_tips: String,
    /// Estimated spend for the day, never negative
    #[serde(default)]
    pub estimated_cost: f64,
}

impl DayRecord {
    pub fn new(day: u32) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    /// True when at least one of morning, afternoon or evening has content
    pub fn has_activity(&self) -> bool {
        !(self.morning.is_empty() && self.afternoon.is_empty() && self.evening.is_empty())
    }
}

/// Ordered day records recovered from a model response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParsedItinerary {
    /// Days in the order they were discovered, numbered 1..N
    pub days: Vec<DayRecord>,
}

impl ParsedItinerary {
    pub fn new(days: Vec<DayRecord>) -> Self {
        Self { days }
    }

    /// An empty itinerary means nothing usable could be recovered
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn total_estimated_cost(&self) -> f64 {
        self.days.iter().map(|day| day.estimated_cost).sum()
    }

    /// JSON schema describing the structured answer format
    pub fn json_schema() -> Value {
        let root = schemars::schema_for!(ParsedItinerary);
        serde_json::to_value(root).unwrap_or(Value::Null)
    }
}

impl From<Vec<DayRecord>> for ParsedItinerary {
    fn from(days: Vec<DayRecord>) -> Self {
        Self::new(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_activity_ignores_non_slot_fields() {
        let mut record = DayRecord::new(1);
        record.accommodation_info = "Stay in Baga".to_string();
        record.estimated_cost = 1200.0;
        assert!(!record.has_activity());

        record.evening = "Sunset at Chapora Fort".to_string();
        assert!(record.has_activity());
    }

    #[test]
    fn test_total_estimated_cost() {
        let mut first = DayRecord::new(1);
        first.estimated_cost = 1500.0;
        let mut second = DayRecord::new(2);
        second.estimated_cost = 2250.5;

        let itinerary = ParsedItinerary::new(vec![first, second]);
        assert_eq!(itinerary.len(), 2);
        assert!((itinerary.total_estimated_cost() - 3750.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_schema_describes_days() {
        let schema = ParsedItinerary::json_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["days"].is_object());
        assert!(schema["definitions"]["DayRecord"]["properties"]["morning"].is_object());
    }
}
