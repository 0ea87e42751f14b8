//! Deterministic fallback extraction from known notification templates.
//!
//! Job boards send highly templated mail ("thank you for applying to
//! <Company>", "your application was viewed by <Company>"). When the LLM
//! tier is structurally unavailable, these rules recover what they can.
//!
//! The rules are deliberately conservative: a candidate is produced only
//! when both an organization phrase AND a title phrase match. Anything
//! less returns zero candidates - this tier never guesses.

use crate::error::ExtractError;
use crate::types::{Extraction, JobCandidate};
use crate::ExtractListings;
use mailsift_domain::{is_valid_title, RecordStatus};
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// One known template phrasing naming the organization.
struct ConfirmationRule {
    name: &'static str,
    org: Regex,
    status: RecordStatus,
}

/// Fallback tier: deterministic pattern rules over raw message text.
pub struct PatternExtractor {
    confirmations: Vec<ConfirmationRule>,
    title_hints: Vec<Regex>,
}

/// Fragment of an organization name as it appears in template phrasings:
/// starts with a letter, runs to sentence punctuation or end of line.
const ORG_FRAGMENT: &str = r"([A-Za-z][\w&',()./ -]{0,60}?)\s*(?:[.!\r\n]|$)";

impl PatternExtractor {
    /// Compile the template rules.
    pub fn new() -> Self {
        let confirmations = vec![
            ConfirmationRule {
                name: "thank-you-for-applying",
                org: regex(&format!(r"(?i)thank you for applying (?:to|at)\s+{ORG_FRAGMENT}")),
                status: RecordStatus::Applied,
            },
            ConfirmationRule {
                name: "application-sent",
                org: regex(&format!(r"(?i)your application was sent to\s+{ORG_FRAGMENT}")),
                status: RecordStatus::Applied,
            },
            ConfirmationRule {
                name: "application-viewed",
                org: regex(&format!(r"(?i)your application was viewed by\s+{ORG_FRAGMENT}")),
                status: RecordStatus::Applied,
            },
            ConfirmationRule {
                name: "application-received",
                org: regex(&format!(
                    r"(?i)we(?:'ve| have) received your application (?:to|at|for)\s+{ORG_FRAGMENT}"
                )),
                status: RecordStatus::Applied,
            },
        ];

        let title_hints = vec![
            regex(r"(?im)^\s*(?:position|role|job title)\s*[:\-]\s*(\S[^\r\n]{1,100}?)\s*$"),
            regex(r"(?i)for the\s+([^\r\n.,]{2,80}?)\s+(?:position|role|opening)"),
            regex(r"(?i)application for(?: the)?\s+([^\r\n.,]{2,80}?)\s+(?:position|role)"),
        ];

        Self {
            confirmations,
            title_hints,
        }
    }

    /// Run every rule against the body.
    fn scan(&self, body: &str) -> Vec<JobCandidate> {
        // A title phrase is required; without one there is nothing worth
        // recording and we refuse to fabricate.
        let Some(title) = self.find_title(body) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for rule in &self.confirmations {
            let Some(caps) = rule.org.captures(body) else {
                continue;
            };
            let organization = clean_fragment(caps.get(1).map_or("", |m| m.as_str()));
            if organization.is_empty() {
                continue;
            }
            if !seen.insert((title.to_lowercase(), organization.to_lowercase())) {
                continue;
            }

            debug!("Template rule '{}' matched organization {:?}", rule.name, organization);
            let mut candidate = JobCandidate::new(title.clone(), organization);
            candidate.status = rule.status;
            candidates.push(candidate);
        }

        candidates
    }

    /// First title phrase the hints recover, cleaned and validated.
    fn find_title(&self, body: &str) -> Option<String> {
        for hint in &self.title_hints {
            if let Some(caps) = hint.captures(body) {
                let title = clean_fragment(caps.get(1).map_or("", |m| m.as_str()));
                if is_valid_title(&title) {
                    return Some(title);
                }
            }
        }
        None
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractListings for PatternExtractor {
    async fn extract(&self, body: &str) -> Result<Extraction, ExtractError> {
        if body.trim().is_empty() {
            return Ok(Extraction::Empty);
        }
        Ok(Extraction::Listings(self.scan(body)))
    }
}

/// Compile a pattern known valid at build time.
fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Trim whitespace and dangling punctuation from a captured fragment.
fn clean_fragment(fragment: &str) -> String {
    fragment
        .trim()
        .trim_end_matches(['.', ',', '!', ';', ':'])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(body: &str) -> Vec<JobCandidate> {
        PatternExtractor::new().scan(body)
    }

    #[test]
    fn test_thank_you_template() {
        let body = "Thank you for applying to Initech.\n\
                    Position: Senior Backend Engineer\n\
                    We will review your application shortly.";

        let candidates = scan(body);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].organization, "Initech");
        assert_eq!(candidates[0].title, "Senior Backend Engineer");
        assert_eq!(candidates[0].status, RecordStatus::Applied);
    }

    #[test]
    fn test_application_viewed_template() {
        let body = "Good news! Your application was viewed by Acme Corp.\n\
                    You applied for the Data Analyst position on Monday.";

        let candidates = scan(body);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].organization, "Acme Corp");
        assert_eq!(candidates[0].title, "Data Analyst");
    }

    #[test]
    fn test_unknown_text_yields_nothing() {
        let candidates = scan("Weekly newsletter: ten tips for better resumes.");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_org_without_title_yields_nothing() {
        // Conservative: the organization alone is not enough.
        let candidates = scan("Thank you for applying to Initech.");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_title_without_org_yields_nothing() {
        let candidates = scan("Position: Staff Engineer\nSee attached description.");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_duplicate_phrasings_deduplicated() {
        let body = "Thank you for applying to Initech!\n\
                    We have received your application to Initech.\n\
                    Role: Platform Engineer";

        let candidates = scan(body);
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_body_is_empty_extraction() {
        let extractor = PatternExtractor::new();
        let outcome = extractor.extract("   \n\t ").await.unwrap();
        assert!(outcome.is_empty_body());
    }

    #[test]
    fn test_clean_fragment() {
        assert_eq!(clean_fragment("  Acme Corp.  "), "Acme Corp");
        assert_eq!(clean_fragment("Initech!"), "Initech");
        assert_eq!(clean_fragment(""), "");
    }
}
