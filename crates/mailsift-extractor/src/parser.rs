//! Parse LLM output into job candidates

use crate::error::ExtractError;
use crate::types::JobCandidate;
use mailsift_domain::is_valid_title;
use serde_json::Value;
use tracing::{debug, warn};

/// Parse the service's JSON reply into validated job candidates.
///
/// Per-candidate problems (missing fields, sentinel titles) drop that
/// candidate only; a reply that is not a JSON array at all is an error.
pub fn parse_response(response: &str) -> Result<Vec<JobCandidate>, ExtractError> {
    // LLMs sometimes wrap JSON in markdown code blocks despite the prompt
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let listings = json
        .as_array()
        .ok_or_else(|| ExtractError::InvalidFormat("expected JSON array".to_string()))?;

    let mut candidates = Vec::new();
    for (idx, listing) in listings.iter().enumerate() {
        match parse_candidate(listing) {
            Ok(candidate) => {
                if !candidate.is_valid() {
                    debug!("Dropping candidate {} with sentinel title {:?}", idx, candidate.title);
                    continue;
                }
                candidates.push(candidate);
            }
            Err(e) => {
                warn!("Failed to parse candidate {}: {}", idx, e);
            }
        }
    }

    Ok(candidates)
}

/// Extract JSON from a reply, tolerating markdown code fences.
fn extract_json(response: &str) -> Result<String, ExtractError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractError::InvalidFormat("empty code block".to_string()));
        }

        // Skip the opening fence (``` or ```json) and the closing fence
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a single listing object.
fn parse_candidate(json: &Value) -> Result<JobCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "listing is not a JSON object".to_string())?;

    let title = obj
        .get("jobTitle")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing or invalid 'jobTitle'".to_string())?
        .trim()
        .to_string();

    // Company may legitimately be "n/a"; only the title gates validity.
    let organization = obj
        .get("company")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim()
        .to_string();

    let mut candidate = JobCandidate::new(title, organization);
    candidate.location = optional_field(obj.get("location"));
    candidate.url = optional_field(obj.get("link"));

    Ok(candidate)
}

/// An optional string field; absent, empty, and sentinel values all
/// collapse to `None`.
fn optional_field(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| is_valid_title(s))
        .map(str::to_string)
}
