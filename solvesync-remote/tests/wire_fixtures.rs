//! Decode captured judge responses into core records.

use solvesync_core::{SourceError, SubmissionId};
use solvesync_remote::wire::{self, SubmissionListPayload, WireDetail, WireQuestion};

const LIST: &str = r#"{
  "data": {
    "submissionList": {
      "hasNext": true,
      "submissions": [
        {"id": "1203948", "title": "Two Sum", "titleSlug": "two-sum", "timestamp": "1709640000",
         "statusDisplay": "Accepted", "lang": "rust", "runtime": "0 ms", "memory": "2.2 MB"},
        {"id": "1203947", "title": "Two Sum", "titleSlug": "two-sum", "timestamp": "1709639000",
         "statusDisplay": "Wrong Answer", "lang": "rust", "runtime": "N/A", "memory": null}
      ]
    }
  }
}"#;

const DETAIL: &str = r#"{
  "data": {
    "submissionDetails": {
      "id": 1203948,
      "code": "impl Solution {}\r\n",
      "timestamp": 1709640000,
      "statusCode": 10,
      "runtimeDisplay": "0 ms",
      "runtimePercentile": 100.0,
      "memoryDisplay": "2.2 MB",
      "memoryPercentile": null,
      "lang": {"name": "rust", "verboseName": "Rust"},
      "question": {"questionId": "1", "titleSlug": "two-sum"},
      "topicTags": [{"name": "Array", "slug": "array"}]
    }
  }
}"#;

const QUESTION: &str = r#"{
  "data": {
    "question": {
      "questionId": "1",
      "questionFrontendId": "1",
      "title": "Two Sum",
      "titleSlug": "two-sum",
      "content": "<p>Given an array...</p>",
      "difficulty": "Easy",
      "topicTags": [{"name": "Array", "slug": "array"}, {"name": "Hash Table", "slug": "hash-table"}]
    }
  }
}"#;

#[test]
fn submission_list_decodes_in_order() {
    let payload: SubmissionListPayload =
        wire::decode_field(LIST, "submissionList", "list").unwrap();
    let summaries = payload.into_summaries().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, SubmissionId::from("1203948"));
    assert!(summaries[0].is_accepted());
    assert!(!summaries[1].is_accepted());
    assert_eq!(summaries[1].memory, None);
    assert_eq!(summaries[0].timestamp.as_deref(), Some("1709640000"));
}

#[test]
fn non_numeric_list_id_is_a_decode_error() {
    let body = LIST.replace("\"1203947\"", "\"x-1\"");
    let payload: SubmissionListPayload =
        wire::decode_field(&body, "submissionList", "list").unwrap();
    assert!(matches!(payload.into_summaries(), Err(SourceError::Decode(_))));
}

#[test]
fn submission_detail_accepts_integer_scalars() {
    let wire: WireDetail = wire::decode_field(DETAIL, "submissionDetails", "s").unwrap();
    let detail = wire.into_detail().unwrap();
    assert_eq!(detail.id, SubmissionId::from("1203948"));
    assert_eq!(detail.timestamp, 1_709_640_000);
    assert_eq!(detail.lang.verbose_name, "Rust");
    assert_eq!(detail.runtime_percentile, Some(100.0));
    assert_eq!(detail.memory_percentile, None);
    assert_eq!(detail.question.title_slug, "two-sum");
    assert_eq!(detail.topic_tags.map(|t| t.len()), Some(1));
}

#[test]
fn question_maps_to_problem_metadata() {
    let wire: WireQuestion = wire::decode_field(QUESTION, "question", "q").unwrap();
    let problem: solvesync_core::ProblemMetadata = wire.into();
    assert_eq!(problem.frontend_id, "1");
    assert_eq!(problem.difficulty, "Easy");
    assert_eq!(problem.topic_tags.len(), 2);
}

#[test]
fn missing_submission_is_not_found() {
    let body = r#"{"data": {"submissionDetails": null}}"#;
    let err = wire::decode_field::<WireDetail>(body, "submissionDetails", "submission 9").unwrap_err();
    assert_eq!(err, SourceError::NotFound("submission 9".to_string()));
}

#[test]
fn sign_in_error_with_ok_status_is_auth_expired() {
    let body = r#"{"errors": [{"message": "You must Sign In to view this submission"}], "data": null}"#;
    let err = wire::decode_field::<WireDetail>(body, "submissionDetails", "s").unwrap_err();
    assert_eq!(err, SourceError::AuthExpired);
}

#[test]
fn other_graphql_error_is_reported_verbatim() {
    let body = r#"{"errors": [{"message": "Variable $id got invalid value"}]}"#;
    let err = wire::decode_field::<WireDetail>(body, "submissionDetails", "s").unwrap_err();
    assert_eq!(err, SourceError::Graphql("Variable $id got invalid value".to_string()));
}
