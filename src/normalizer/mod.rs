//! Response normalization: turn raw model text into [`ParsedItinerary`].
//!
//! A strict JSON decode is tried first; if the text is not exactly a
//! `{"days": [...]}` document, the heuristic line parser takes over.
//! Normalization never fails. An empty itinerary is the "nothing usable"
//! signal and the caller decides what to do with it.

pub mod heuristic;
pub(crate) mod patterns;
pub mod strict;

pub use patterns::extract_cost;

use crate::types::ParsedItinerary;
use tracing::{debug, warn};

/// Which phase produced the itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizePhase {
    Strict,
    Heuristic,
}

/// Normalize raw model output into an ordered list of day records
pub fn normalize(raw: &str) -> ParsedItinerary {
    normalize_with_phase(raw).0
}

/// Like [`normalize`], also reporting which phase succeeded
pub fn normalize_with_phase(raw: &str) -> (ParsedItinerary, NormalizePhase) {
    if let Some(days) = strict::decode(raw) {
        debug!(
            target: "itinerary::normalizer",
            days = days.len(),
            "decoded structured itinerary"
        );
        return (ParsedItinerary::new(days), NormalizePhase::Strict);
    }

    let days = heuristic::parse(raw);
    if days.is_empty() {
        warn!(
            target: "itinerary::normalizer",
            response_len = raw.len(),
            "no day blocks could be recovered from response"
        );
    } else {
        debug!(
            target: "itinerary::normalizer",
            days = days.len(),
            "recovered itinerary from free-form text"
        );
    }

    (ParsedItinerary::new(days), NormalizePhase::Heuristic)
}
