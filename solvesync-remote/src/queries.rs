//! GraphQL documents sent to the judge.

pub const SUBMISSION_LIST: &str = r#"
query submissionList($offset: Int!, $limit: Int!, $slug: String) {
  submissionList(offset: $offset, limit: $limit, questionSlug: $slug) {
    submissions {
      id
      title
      titleSlug
      timestamp
      statusDisplay
      lang
      runtime
      memory
    }
  }
}
"#;

pub const SUBMISSION_DETAILS: &str = r#"
query submissionDetails($id: Int!) {
  submissionDetails(submissionId: $id) {
    id
    code
    timestamp
    runtimeDisplay
    runtimePercentile
    memoryDisplay
    memoryPercentile
    lang {
      name
      verboseName
    }
    question {
      questionId
      titleSlug
    }
    topicTags {
      name
      slug
    }
  }
}
"#;

pub const QUESTION: &str = r#"
query question($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    content
    difficulty
    topicTags {
      name
      slug
    }
  }
}
"#;
