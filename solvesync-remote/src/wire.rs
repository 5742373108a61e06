//! Judge response decoding.
//!
//! The judge speaks GraphQL with camelCase fields and is loose about scalar
//! types (ids arrive as strings in one query and integers in another). These
//! structs absorb that and convert into the core records.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use solvesync_core::{
    ProblemMetadata, QuestionRef, SourceError, SubmissionDetail, SubmissionId, SubmissionLang,
    SubmissionSummary, TopicTag,
};

/// Substrings that mark a GraphQL error as a rejected session.
const AUTH_MARKERS: [&str; 3] = ["sign in", "login", "authenticated"];

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Map<String, Value>>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Decode `data.<field>` from a GraphQL response body.
///
/// Errors in the body win over data. A null or absent field is `NotFound`
/// with `what` as the message.
pub fn decode_field<T: DeserializeOwned>(
    body: &str,
    field: &str,
    what: &str,
) -> Result<T, SourceError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| SourceError::Decode(format!("response is not GraphQL JSON: {e}")))?;

    if let Some(err) = envelope.errors.as_deref().and_then(classify_errors) {
        return Err(err);
    }

    let value = envelope
        .data
        .and_then(|mut data| data.remove(field))
        .filter(|v| !v.is_null())
        .ok_or_else(|| SourceError::NotFound(what.to_string()))?;

    serde_json::from_value(value).map_err(|e| SourceError::Decode(format!("{field}: {e}")))
}

fn classify_errors(errors: &[GraphqlErrorEntry]) -> Option<SourceError> {
    let first = errors.first()?;
    let message = first
        .message
        .clone()
        .unwrap_or_else(|| "unknown error".to_string());
    Some(classify_message(message))
}

/// Map a GraphQL error message to the matching [`SourceError`].
pub fn classify_message(message: String) -> SourceError {
    let lower = message.to_lowercase();
    if AUTH_MARKERS.iter().any(|marker| lower.contains(marker)) {
        SourceError::AuthExpired
    } else {
        SourceError::Graphql(message)
    }
}

/// Map a non-success HTTP status from the judge.
pub fn status_error(code: u16, body: &str) -> SourceError {
    match code {
        401 | 403 => SourceError::AuthExpired,
        _ => SourceError::Transport(format!("HTTP {code}: {}", snippet(body))),
    }
}

pub(crate) fn snippet(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Accept a submission id only if it is a non-empty run of ASCII digits.
pub fn numeric_id(raw: &str) -> Result<u64, SourceError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SourceError::Decode(format!(
            "submission id {raw:?} is not numeric"
        )));
    }
    raw.parse()
        .map_err(|_| SourceError::Decode(format!("submission id {raw:?} is out of range")))
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListPayload {
    #[serde(default)]
    submissions: Vec<WireSummary>,
}

impl SubmissionListPayload {
    pub fn into_summaries(self) -> Result<Vec<SubmissionSummary>, SourceError> {
        self.submissions
            .into_iter()
            .map(WireSummary::into_summary)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSummary {
    id: Scalar,
    title: String,
    title_slug: String,
    status_display: String,
    lang: String,
    #[serde(default)]
    timestamp: Option<Scalar>,
    #[serde(default)]
    runtime: Option<String>,
    #[serde(default)]
    memory: Option<String>,
}

impl WireSummary {
    fn into_summary(self) -> Result<SubmissionSummary, SourceError> {
        let id = self.id.into_text();
        numeric_id(&id)?;
        Ok(SubmissionSummary {
            id: SubmissionId(id),
            title: self.title,
            title_slug: self.title_slug,
            status_display: self.status_display,
            lang: self.lang,
            timestamp: self.timestamp.map(Scalar::into_text),
            runtime: self.runtime,
            memory: self.memory,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDetail {
    id: Scalar,
    code: String,
    timestamp: Scalar,
    #[serde(default)]
    runtime_display: Option<String>,
    #[serde(default)]
    runtime_percentile: Option<f64>,
    #[serde(default)]
    memory_display: Option<String>,
    #[serde(default)]
    memory_percentile: Option<f64>,
    lang: WireLang,
    question: WireQuestionRef,
    #[serde(default)]
    topic_tags: Option<Vec<TopicTag>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLang {
    name: String,
    verbose_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuestionRef {
    question_id: Scalar,
    title_slug: String,
}

impl WireDetail {
    pub fn into_detail(self) -> Result<SubmissionDetail, SourceError> {
        let id = self.id.into_text();
        numeric_id(&id)?;
        let raw_ts = self.timestamp.into_text();
        let timestamp = raw_ts
            .parse::<i64>()
            .map_err(|_| SourceError::Decode(format!("timestamp {raw_ts:?} is not an integer")))?;
        Ok(SubmissionDetail {
            id: SubmissionId(id),
            code: self.code,
            timestamp,
            lang: SubmissionLang {
                name: self.lang.name,
                verbose_name: self.lang.verbose_name,
            },
            runtime_display: self.runtime_display,
            runtime_percentile: self.runtime_percentile,
            memory_display: self.memory_display,
            memory_percentile: self.memory_percentile,
            question: QuestionRef {
                question_id: self.question.question_id.into_text(),
                title_slug: self.question.title_slug,
            },
            topic_tags: self.topic_tags,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireQuestion {
    question_id: Scalar,
    question_frontend_id: Scalar,
    title: String,
    title_slug: String,
    #[serde(default)]
    content: Option<String>,
    difficulty: String,
    #[serde(default)]
    topic_tags: Option<Vec<TopicTag>>,
}

impl From<WireQuestion> for ProblemMetadata {
    fn from(q: WireQuestion) -> Self {
        ProblemMetadata {
            question_id: q.question_id.into_text(),
            frontend_id: q.question_frontend_id.into_text(),
            title: q.title,
            title_slug: q.title_slug,
            content: q.content,
            difficulty: q.difficulty,
            topic_tags: q.topic_tags.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("You must sign in first", true)]
    #[case("User is not LOGIN", true)]
    #[case("Not authenticated", true)]
    #[case("Submission does not exist.", false)]
    fn message_classification(#[case] message: &str, #[case] auth: bool) {
        let err = classify_message(message.to_string());
        assert_eq!(err == SourceError::AuthExpired, auth, "{message}");
    }

    #[rstest]
    #[case(401)]
    #[case(403)]
    fn rejected_session_statuses(#[case] code: u16) {
        assert_eq!(status_error(code, ""), SourceError::AuthExpired);
    }

    #[test]
    fn other_statuses_are_transport() {
        let err = status_error(502, "bad gateway");
        assert_eq!(err, SourceError::Transport("HTTP 502: bad gateway".to_string()));
    }

    #[test]
    fn numeric_ids_only() {
        assert_eq!(numeric_id("1203948").unwrap(), 1_203_948);
        assert!(matches!(numeric_id(""), Err(SourceError::Decode(_))));
        assert!(matches!(numeric_id("12a"), Err(SourceError::Decode(_))));
        assert!(matches!(numeric_id("-5"), Err(SourceError::Decode(_))));
    }

    #[test]
    fn errors_take_precedence_over_data() {
        let body = r#"{"data":{"question":null},"errors":[{"message":"please login"}]}"#;
        let err = decode_field::<WireQuestion>(body, "question", "q").unwrap_err();
        assert_eq!(err, SourceError::AuthExpired);
    }

    #[test]
    fn null_field_is_not_found() {
        let body = r#"{"data":{"question":null}}"#;
        let err = decode_field::<WireQuestion>(body, "question", "problem two-sum").unwrap_err();
        assert_eq!(err, SourceError::NotFound("problem two-sum".to_string()));
    }

    #[test]
    fn non_json_body_is_decode_error() {
        let err = decode_field::<WireQuestion>("<html>", "question", "q").unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        assert_eq!(snippet(&long).chars().count(), 200);
        assert_eq!(snippet("short"), "short");
    }
}
