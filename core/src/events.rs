use crate::model::task::TaskId;

/// Change notification emitted by the task store.
///
/// Events carry the task id and the kind of change, never task data;
/// observers re-read current state from the store when they react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskEvent {
    pub task: TaskId,
    pub change: TaskChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskChange {
    /// A photo was attached, completing the task (or replacing a previous
    /// submission).
    Completed,
    /// The attached photo finished uploading.
    Uploaded,
}
