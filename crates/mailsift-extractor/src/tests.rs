//! Engine-level tests across the tier boundary.

use crate::{ExtractListings, ExtractorConfig, TieredExtractor};
use mailsift_domain::RecordStatus;
use mailsift_llm::MockProvider;

#[tokio::test]
async fn test_primary_success() {
    let provider = MockProvider::new(
        r#"[{"jobTitle": "Backend Engineer", "company": "Acme", "location": "Remote", "link": "n/a"}]"#,
    );
    let extractor = TieredExtractor::with_primary(provider, ExtractorConfig::default());

    let outcome = extractor.extract("New openings this week…").await.unwrap();
    let listings = outcome.listings();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].title, "Backend Engineer");
    assert_eq!(listings[0].status, RecordStatus::New);
}

#[tokio::test]
async fn test_empty_body_short_circuits_provider() {
    let provider = MockProvider::new("[]");
    let count = provider.clone();
    let extractor = TieredExtractor::with_primary(provider, ExtractorConfig::default());

    let outcome = extractor.extract("  \n\t  ").await.unwrap();
    assert!(outcome.is_empty_body());
    assert_eq!(count.call_count(), 0);
}

#[tokio::test]
async fn test_zero_candidates_is_success_not_fallback() {
    // Primary answers with an empty array; the fallback must NOT run even
    // though the body matches a pattern template.
    let provider = MockProvider::new("[]");
    let extractor = TieredExtractor::with_primary(provider, ExtractorConfig::default());

    let body = "Thank you for applying to Initech.\nPosition: Staff Engineer";
    let outcome = extractor.extract(body).await.unwrap();
    assert!(outcome.listings().is_empty());
    assert!(!outcome.is_empty_body());
}

#[tokio::test]
async fn test_transient_failure_propagates() {
    let provider = MockProvider::erroring();
    let extractor = TieredExtractor::with_primary(provider, ExtractorConfig::default());

    let body = "Thank you for applying to Initech.\nPosition: Staff Engineer";
    let result = extractor.extract(body).await;
    assert!(result.is_err());
    assert!(!result.unwrap_err().is_structural());
}

#[tokio::test]
async fn test_unavailable_primary_engages_fallback() {
    let provider = MockProvider::unavailable();
    let extractor = TieredExtractor::with_primary(provider, ExtractorConfig::default());

    let body = "Thank you for applying to Initech.\nPosition: Staff Engineer";
    let outcome = extractor.extract(body).await.unwrap();
    let listings = outcome.listings();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].organization, "Initech");
    assert_eq!(listings[0].status, RecordStatus::Applied);
}

#[tokio::test]
async fn test_fallback_only_deployment() {
    let extractor = TieredExtractor::<MockProvider>::fallback_only();

    let body = "Your application was sent to Acme Corp.\nRole: Data Analyst";
    let outcome = extractor.extract(body).await.unwrap();
    assert_eq!(outcome.listings().len(), 1);

    // And stays conservative on unknown text
    let outcome = extractor.extract("Nothing job-shaped here.").await.unwrap();
    assert!(outcome.listings().is_empty());
}

#[tokio::test]
async fn test_body_too_long_rejected() {
    let provider = MockProvider::new("[]");
    let config = ExtractorConfig {
        max_body_length: 64,
        ..Default::default()
    };
    let extractor = TieredExtractor::with_primary(provider, config);

    let body = "x".repeat(100);
    let result = extractor.extract(&body).await;
    assert!(matches!(
        result,
        Err(crate::ExtractError::BodyTooLong(100, 64))
    ));
}

#[tokio::test]
async fn test_malformed_response_is_failure() {
    let provider = MockProvider::new("I could not find any jobs, sorry!");
    let extractor = TieredExtractor::with_primary(provider, ExtractorConfig::default());

    let result = extractor.extract("some body").await;
    assert!(matches!(result, Err(crate::ExtractError::InvalidFormat(_))));
}
