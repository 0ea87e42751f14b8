//! Candidate and outcome types for extraction

use mailsift_domain::{is_valid_title, RecordStatus};

/// An unvalidated job posting proposed by an extraction tier, before
/// quality filtering turns it into a ledger record.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCandidate {
    /// Proposed job title.
    pub title: String,

    /// Hiring organization. May be empty when the source omits it.
    pub organization: String,

    /// Posting location, when present.
    pub location: Option<String>,

    /// Link to the posting, when present.
    pub url: Option<String>,

    /// Status implied by the source template. The LLM tier always
    /// proposes `New`; pattern rules for application confirmations
    /// propose `Applied`.
    pub status: RecordStatus,
}

impl JobCandidate {
    /// A candidate with only a title and organization.
    pub fn new(title: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            organization: organization.into(),
            location: None,
            url: None,
            status: RecordStatus::New,
        }
    }

    /// Whether the candidate survives quality filtering.
    pub fn is_valid(&self) -> bool {
        is_valid_title(&self.title)
    }
}

/// Outcome of one extraction call.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The body was empty or whitespace-only; nothing to extract and
    /// nothing to record. Distinct from a failure.
    Empty,

    /// The body was analyzed; zero candidates is still a success.
    Listings(Vec<JobCandidate>),
}

impl Extraction {
    /// The surviving candidates; empty for [`Extraction::Empty`].
    pub fn listings(&self) -> &[JobCandidate] {
        match self {
            Extraction::Empty => &[],
            Extraction::Listings(candidates) => candidates,
        }
    }

    /// True when the body itself was blank.
    pub fn is_empty_body(&self) -> bool {
        matches!(self, Extraction::Empty)
    }
}
