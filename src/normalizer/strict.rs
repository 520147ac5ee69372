use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::patterns;
use crate::types::DayRecord;

#[derive(Debug, Deserialize)]
struct StructuredItinerary {
    days: Vec<StructuredDay>,
}

/// A day object as a model writes it. Unknown keys (including the model's own
/// `day` number) are ignored.
#[derive(Debug, Deserialize)]
struct StructuredDay {
    #[serde(default, deserialize_with = "text_or_null")]
    morning: String,
    #[serde(default, deserialize_with = "text_or_null")]
    afternoon: String,
    #[serde(default, deserialize_with = "text_or_null")]
    evening: String,
    #[serde(default, deserialize_with = "text_or_null")]
    food_recommendations: String,
    #[serde(default, deserialize_with = "text_or_null")]
    accommodation_info: String,
    #[serde(default, deserialize_with = "text_or_null")]
    transport_tips: String,
    #[serde(default, deserialize_with = "lenient_cost")]
    estimated_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost")]
    estimated_cost_inr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_cost")]
    estimated_cost_usd: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CostValue {
    Number(f64),
    Text(String),
}

fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `1500`, `"1500"` or `"₹1,500"`; `null` and unreadable text count as absent
fn lenient_cost<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<CostValue>::deserialize(deserializer)? {
        Some(CostValue::Number(number)) => Some(number),
        Some(CostValue::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .or_else(|| patterns::extract_cost(&text)),
        None => None,
    };

    Ok(value.map(|value| if value.is_finite() { value.max(0.0) } else { 0.0 }))
}

impl StructuredDay {
    fn into_record(self, day: u32) -> DayRecord {
        DayRecord {
            day,
            morning: self.morning,
            afternoon: self.afternoon,
            evening: self.evening,
            food_recommendations: self.food_recommendations,
            accommodation_info: self.accommodation_info,
            transport_tips: self.transport_tips,
            estimated_cost: self
                .estimated_cost
                .or(self.estimated_cost_inr)
                .or(self.estimated_cost_usd)
                .unwrap_or_default(),
        }
    }
}

/// Decode the whole text as `{"days": [...]}`. Any syntax error, shape
/// mismatch or trailing content yields `None`.
pub fn decode(raw: &str) -> Option<Vec<DayRecord>> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let parsed: StructuredItinerary = match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            debug!(
                target: "itinerary::normalizer",
                path = %path,
                error = %err.inner(),
                "structured decode failed"
            );
            return None;
        }
    };

    if let Err(err) = deserializer.end() {
        debug!(
            target: "itinerary::normalizer",
            error = %err,
            "trailing content after structured itinerary"
        );
        return None;
    }

    let days = parsed
        .days
        .into_iter()
        .filter(|day| {
            !(day.morning.is_empty() && day.afternoon.is_empty() && day.evening.is_empty())
        })
        .enumerate()
        .map(|(idx, day)| day.into_record(idx as u32 + 1))
        .collect();

    Some(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_copies_fields_and_renumbers() {
        let raw = r#"{"days": [
            {"day": 7, "morning": "Fort", "afternoon": "Beach", "evening": "Market",
             "food_recommendations": "Fish thali", "accommodation_info": "Candolim",
             "transport_tips": "Scooter", "estimated_cost": 1800.5, "extra": true},
            {"day": 7, "evening": "Cruise"}
        ]}"#;

        let days = decode(raw).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].morning, "Fort");
        assert_eq!(days[0].transport_tips, "Scooter");
        assert_eq!(days[0].estimated_cost, 1800.5);
        assert_eq!(days[1].day, 2);
        assert_eq!(days[1].morning, "");
        assert_eq!(days[1].estimated_cost, 0.0);
    }

    #[test]
    fn test_decode_accepts_alternative_cost_keys_and_strings() {
        let raw = r#"{"days": [
            {"morning": "A", "estimated_cost_inr": "₹1,200"},
            {"morning": "B", "estimated_cost_usd": "45"},
            {"morning": "C", "estimated_cost": -10},
            {"morning": null, "evening": "D", "estimated_cost": "call ahead"}
        ]}"#;

        let days = decode(raw).unwrap();
        let costs: Vec<f64> = days.iter().map(|d| d.estimated_cost).collect();
        assert_eq!(costs, vec![1200.0, 45.0, 0.0, 0.0]);
        assert_eq!(days[3].morning, "");
    }

    #[test]
    fn test_decode_accepts_cost_keys_together() {
        let raw = r#"{"days": [
            {"morning": "Fort", "afternoon": "Beach", "evening": "Market",
             "estimated_cost": 1500, "estimated_cost_inr": 1500},
            {"morning": "Spa", "estimated_cost_inr": "n/a", "estimated_cost_usd": 30}
        ]}"#;

        let days = decode(raw).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].estimated_cost, 1500.0);
        assert_eq!(days[1].estimated_cost, 30.0);
    }

    #[test]
    fn test_decode_rejects_trailing_garbage() {
        assert!(decode(r#"{"days": [{"morning": "A"}]} and that's the plan!"#).is_none());
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(decode(r#"{"itinerary": []}"#).is_none());
        assert!(decode(r#"{"days": ["Morning: A"]}"#).is_none());
        assert!(decode(r#"[{"morning": "A"}]"#).is_none());
        assert!(decode("DAY 1\nMorning: A").is_none());
    }

    #[test]
    fn test_decode_drops_days_without_activity() {
        let raw = r#"{"days": [{"accommodation_info": "Hostel"}, {"afternoon": "Museum"}]}"#;
        let days = decode(raw).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].afternoon, "Museum");
    }
}
