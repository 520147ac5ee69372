use std::time::Instant;

use tracing::{info, warn};

use crate::{
    error::Result,
    normalizer::{normalize_with_phase, NormalizePhase},
    providers::{build_provider, LlmProvider, ProviderSettings},
    types::{GenerationRequest, GenerationResult, ParsedItinerary},
};

/// Runs one generation call and normalizes the answer.
///
/// The provider is injected, so a planner can be shared across concurrent
/// requests as long as the provider itself is (all bundled providers are).
#[derive(Debug)]
pub struct ItineraryPlanner {
    provider: Box<dyn LlmProvider>,
}

impl ItineraryPlanner {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn with_provider<P: LlmProvider + 'static>(provider: P) -> Self {
        Self::new(Box::new(provider))
    }

    /// Build the configured provider; misconfiguration fails here, not on first use
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self> {
        Ok(Self::new(build_provider(settings)?))
    }

    pub fn from_env() -> Result<Self> {
        Self::from_settings(&ProviderSettings::from_env()?)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// One generation call, no retries
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let start_time = Instant::now();
        info!(
            target: "itinerary::provider",
            provider = self.provider.name(),
            "generating itinerary"
        );

        let text = self.provider.generate_request(request).await?;

        info!(
            target: "itinerary::provider",
            provider = self.provider.name(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "generation finished"
        );
        Ok(GenerationResult::new(text, self.provider.name()))
    }

    /// Generate, then normalize. An empty itinerary is returned as is.
    pub async fn plan(&self, request: &GenerationRequest) -> Result<ParsedItinerary> {
        let result = self.generate(request).await?;
        let (itinerary, phase) = normalize_with_phase(&result.text);

        if itinerary.is_empty() {
            warn!(
                target: "itinerary::normalizer",
                provider = %result.provider,
                "response produced no usable itinerary days"
            );
        } else {
            info!(
                target: "itinerary::normalizer",
                days = itinerary.len(),
                total_cost = itinerary.total_estimated_cost(),
                structured = phase == NormalizePhase::Strict,
                "normalized itinerary"
            );
        }

        Ok(itinerary)
    }
}
