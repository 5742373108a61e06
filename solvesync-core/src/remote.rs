//! Capability traits the sync orchestrator is written against.
//!
//! Concrete adapters live in `solvesync-remote` (judge + repository) and
//! `solvesync-renderer` (transform); tests supply in-memory fakes.

use crate::error::{SourceError, StoreError, TransformError};
use crate::types::{
    CommitId, FileSet, Identity, ProblemMetadata, SubmissionDetail, SubmissionId,
    SubmissionSummary,
};

/// Read side of the online judge.
pub trait SourceReader {
    /// One page of the most recent submissions, newest first.
    fn list_recent(&self, offset: u32, limit: u32) -> Result<Vec<SubmissionSummary>, SourceError>;

    fn submission_detail(&self, id: &SubmissionId) -> Result<SubmissionDetail, SourceError>;

    fn problem(&self, title_slug: &str) -> Result<ProblemMetadata, SourceError>;
}

/// Destination repository.
pub trait StoreClient {
    /// Content of `path` at the branch tip, or [`StoreError::NotFound`].
    fn read_file(&self, path: &str) -> Result<String, StoreError>;

    /// Write every entry of `files` as one new revision.
    ///
    /// Implementations must be atomic: either the branch advances to a commit
    /// containing all of `files`, or it does not move at all.
    fn commit_files(&self, files: &FileSet, message: &str) -> Result<CommitId, StoreError>;
}

/// Pure mapping from one synced submission to the files it contributes.
pub trait ItemTransform {
    fn build_files(
        &self,
        detail: &SubmissionDetail,
        problem: &ProblemMetadata,
        identity: &Identity,
    ) -> Result<FileSet, TransformError>;
}

impl<T: SourceReader + ?Sized> SourceReader for &T {
    fn list_recent(&self, offset: u32, limit: u32) -> Result<Vec<SubmissionSummary>, SourceError> {
        (**self).list_recent(offset, limit)
    }

    fn submission_detail(&self, id: &SubmissionId) -> Result<SubmissionDetail, SourceError> {
        (**self).submission_detail(id)
    }

    fn problem(&self, title_slug: &str) -> Result<ProblemMetadata, SourceError> {
        (**self).problem(title_slug)
    }
}

impl<T: StoreClient + ?Sized> StoreClient for &T {
    fn read_file(&self, path: &str) -> Result<String, StoreError> {
        (**self).read_file(path)
    }

    fn commit_files(&self, files: &FileSet, message: &str) -> Result<CommitId, StoreError> {
        (**self).commit_files(files, message)
    }
}

impl<T: ItemTransform + ?Sized> ItemTransform for &T {
    fn build_files(
        &self,
        detail: &SubmissionDetail,
        problem: &ProblemMetadata,
        identity: &Identity,
    ) -> Result<FileSet, TransformError> {
        (**self).build_files(detail, problem, identity)
    }
}
