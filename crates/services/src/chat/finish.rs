//! Finish-reason and usage normalization

use inference_providers::UsageMetadata;

use super::events::{FinishMetadata, UsagePayload};

/// Map an upstream finish reason to the downstream vocabulary
///
/// Upstream uses: "STOP", "MAX_TOKENS", "SAFETY", "RECITATION", "OTHER".
/// Unknown values pass through lower-cased, which also makes the mapping
/// idempotent: feeding an already-mapped value back in returns it unchanged.
pub fn map_finish_reason(reason: &str) -> String {
    match reason {
        "STOP" => "stop".to_string(),
        "MAX_TOKENS" => "length".to_string(),
        "SAFETY" | "RECITATION" => "content-filter".to_string(),
        "OTHER" => "other".to_string(),
        other => other.to_lowercase(),
    }
}

/// Normalize upstream usage metadata into the downstream payload
pub fn normalize_usage(usage: &UsageMetadata) -> UsagePayload {
    UsagePayload {
        prompt_tokens: usage.prompt_token_count,
        completion_tokens: usage.candidates_token_count,
        // totalTokens is a pass-through, never a local sum
        total_tokens: usage.total_token_count,
    }
}

/// Build the `finish` metadata from whatever the upstream reported.
/// Returns `None` when neither a finish reason nor usage arrived, so the
/// terminal event can omit the metadata key entirely.
pub fn build_finish_metadata(
    finish_reason: Option<&str>,
    usage: Option<&UsageMetadata>,
) -> Option<FinishMetadata> {
    if finish_reason.is_none() && usage.is_none() {
        return None;
    }
    Some(FinishMetadata {
        finish_reason: finish_reason.map(map_finish_reason),
        usage: usage.map(normalize_usage),
    })
}
