use std::time::Instant;

use crate::{
    error::AppResult,
    models::{Destination, Preference},
    services::{normalizer, prompt, providers::CompletionProvider},
};

/// Generates destination recommendations for a set of preferences
///
/// Builds the prompt, makes a single completion call and normalizes the reply.
/// Errors from any step are returned unchanged so the caller can tell a missing
/// credential from a transport failure from an unusable completion. Nothing is
/// retried.
pub async fn get_recommendations(
    provider: &dyn CompletionProvider,
    preference: &Preference,
) -> AppResult<Vec<Destination>> {
    let start = Instant::now();
    let payload = prompt::build_prompt(preference);

    tracing::info!(
        provider = provider.name(),
        destination_type = %preference.destination_type,
        region = preference.region.as_deref().unwrap_or("any"),
        prompt_len = payload.user.len(),
        "Requesting recommendations"
    );

    let raw = provider.complete(&payload).await.map_err(|e| {
        tracing::error!(error = %e, kind = ?e.kind(), "Completion failed");
        e
    })?;

    let destinations = normalizer::normalize(&raw).map_err(|e| {
        tracing::error!(error = %e, raw_len = raw.len(), "Completion could not be normalized");
        e
    })?;

    tracing::info!(
        destinations = destinations.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Recommendations generated"
    );

    Ok(destinations)
}
