use super::DegradedReason;
use crate::core::GeneratedContent;

const CREDENTIAL_MISSING_NOTE: &str =
    "Example generation is disabled because no API credential is configured.";

const SERVICE_UNAVAILABLE_NOTE: &str =
    "The content service is currently unavailable, so a placeholder is shown.";

/// Deterministic substitute content for when the provider cannot deliver.
/// Pure: the same term and reason always produce the same card.
pub fn fallback_example(term: &str, reason: DegradedReason) -> GeneratedContent {
    let placeholder = format!("This is a placeholder sentence for \"{term}\".");

    GeneratedContent {
        original: placeholder.clone(),
        translation: placeholder,
        context: match reason {
            DegradedReason::CredentialMissing => CREDENTIAL_MISSING_NOTE,
            DegradedReason::ServiceUnavailable => SERVICE_UNAVAILABLE_NOTE,
        }
        .to_string(),
    }
}
