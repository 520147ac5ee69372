//! itinerary-rs: request a travel itinerary from an LLM and turn the answer into day records
//!
//! The crate has two halves. A provider gateway ([`LlmProvider`]) hides which
//! backend (Groq, HuggingFace, Ollama) produced the text. A response
//! normalizer ([`normalize`]) turns that text, well-formed JSON or loose prose,
//! into a [`ParsedItinerary`] whose days are numbered 1..N.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use itinerary_rs::{GenerationRequest, ItineraryPlanner, ProviderSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ProviderSettings::from_env()?;
//!     let planner = ItineraryPlanner::from_settings(&settings)?;
//!
//!     let request = GenerationRequest::new(
//!         "You are an expert travel planner.",
//!         "Plan 3 days in Goa. Format each day as DAY n with Morning:/Afternoon:/Evening: lines.",
//!     );
//!     let itinerary = planner.plan(&request).await?;
//!     println!("{} days, total ₹{}", itinerary.len(), itinerary.total_estimated_cost());
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod normalizer;
pub mod providers;
pub(crate) mod services;
pub mod types;

pub use core::ItineraryPlanner;
pub use error::{GenerationError, Result};
pub use normalizer::{extract_cost, normalize, normalize_with_phase, NormalizePhase};
pub use providers::{
    build_provider, build_provider_named, GroqProvider, HuggingFaceProvider, LlmProvider,
    OllamaProvider, ProviderKind, ProviderSettings,
};
pub use types::{DayRecord, GenerationRequest, GenerationResult, ParsedItinerary};

#[cfg(feature = "cli")]
pub mod cli;
