//! LLM prompt for job posting extraction

/// Builds the extraction prompt for one email body.
pub struct PromptBuilder {
    body: String,
}

impl PromptBuilder {
    /// Create a prompt builder for the given body.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    /// Build the complete extraction prompt.
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nEmail body:\n---\n");
        prompt.push_str(&self.body);
        prompt.push_str("\n---\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract every job posting mentioned in the following email.
Each posting should follow this format:

{
  "jobTitle": "exact title of the position",
  "company": "hiring organization",
  "location": "city, region, or Remote",
  "link": "URL of the posting"
}

Rules:
- One object per distinct posting; job-alert digests often contain several
- Copy titles and company names verbatim from the email, do not rephrase
- Use "n/a" for a field the email does not state
- Ignore navigation links, unsubscribe footers, and promotional content
- If the email contains no job postings at all, return an empty array"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {
    "jobTitle": "…",
    "company": "…",
    "location": "…",
    "link": "…"
  }
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
