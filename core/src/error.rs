use thiserror::Error;

use crate::model::task::TaskId;

/// Everything that can go wrong inside the task store.
///
/// Missing data that is expected to be missing (no photo picked yet, no
/// positioning metadata, no device fix) is not an error; those cases flow
/// through the APIs as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HuntError {
    /// The caller addressed a task that does not exist. Identifiers come
    /// from the store's own listing, so hitting this is a bug in the caller,
    /// not a user-facing condition.
    #[error("no task with id {0}")]
    TaskNotFound(TaskId),

    /// Upload was requested for a task that has no photo attached.
    #[error("task {0} has no photo attached")]
    PhotoMissing(TaskId),

    /// An upload for this task is already running. The first upload keeps
    /// going; the caller should wait for it rather than retry.
    #[error("an upload for task {0} is already in flight")]
    UploadInFlight(TaskId),

    /// The attached photo has already been uploaded.
    #[error("task {0} has already been uploaded")]
    AlreadyUploaded(TaskId),

    /// The transport gave up on the payload. The task stays completed and
    /// not uploaded, so the upload can be retried.
    #[error("upload for task {task} failed: {reason}")]
    UploadFailed { task: TaskId, reason: String },
}
