use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HuntError;
use crate::model::geo::GeoCoordinate;
use crate::model::photo::Photo;

/// Stable, opaque identifier of a task. Tasks are always addressed by id,
/// never by list position, so identifiers stay valid however a presentation
/// layer orders or filters its rows.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The photo attachment recorded when a task is completed.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub photo: Photo,
    /// Location resolved at acquisition time. `None` means no location was
    /// available, which is a perfectly normal outcome.
    pub location: Option<GeoCoordinate>,
    pub attached_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(photo: Photo, location: Option<GeoCoordinate>) -> Self {
        Self {
            photo,
            location,
            attached_at: Utc::now(),
        }
    }
}

/// Completion and upload state of a task.
///
/// `uploaded` only exists inside `Completed`, so an uploaded task has a
/// photo attached by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    Open,
    Completed {
        submission: Submission,
        uploaded: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub state: TaskState,
}

impl Task {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: description.into(),
            created_at: Utc::now(),
            state: TaskState::Open,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, TaskState::Completed { .. })
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self.state, TaskState::Completed { uploaded: true, .. })
    }

    pub fn submission(&self) -> Option<&Submission> {
        match &self.state {
            TaskState::Completed { submission, .. } => Some(submission),
            TaskState::Open => None,
        }
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.submission().map(|s| &s.photo)
    }

    pub fn location(&self) -> Option<GeoCoordinate> {
        self.submission().and_then(|s| s.location)
    }

    /// Attaches (or replaces) the submission and marks the task completed.
    /// Replacing the photo on an already uploaded task clears `uploaded`;
    /// the new photo has not been sent anywhere yet.
    pub fn attach_submission(&mut self, submission: Submission) {
        self.state = TaskState::Completed {
            submission,
            uploaded: false,
        };
    }

    /// Marks the attached photo as uploaded.
    pub fn mark_uploaded(&mut self) -> Result<(), HuntError> {
        match &mut self.state {
            TaskState::Open => Err(HuntError::PhotoMissing(self.id)),
            TaskState::Completed { uploaded, .. } => {
                if *uploaded {
                    Err(HuntError::AlreadyUploaded(self.id))
                } else {
                    *uploaded = true;
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(bytes: &'static [u8]) -> Submission {
        Submission::new(Photo::from_camera(bytes), None)
    }

    #[test]
    fn new_task_starts_open() {
        let task = Task::new("Capture a sunset", "Take a photo of the sunset");
        assert!(!task.is_completed());
        assert!(!task.is_uploaded());
        assert!(task.submission().is_none());
        assert!(task.photo().is_none());
        assert_eq!(task.location(), None);
    }

    #[test]
    fn attach_completes_the_task() {
        let mut task = Task::new("Spot a squirrel", "Take a photo of a squirrel");
        let location = GeoCoordinate::new(35.0, 139.0);
        task.attach_submission(Submission::new(Photo::from_library(vec![0xFFu8; 4]), Some(location)));

        assert!(task.is_completed());
        assert!(!task.is_uploaded());
        assert_eq!(task.location(), Some(location));
        assert_eq!(task.photo().map(|p| p.len()), Some(4));
    }

    #[test]
    fn mark_uploaded_requires_a_photo() {
        let mut task = Task::new("Find a red flower", "Take a photo of a red flower");
        assert_eq!(task.mark_uploaded(), Err(HuntError::PhotoMissing(task.id)));
    }

    #[test]
    fn mark_uploaded_is_one_shot() {
        let mut task = Task::new("Find a red flower", "Take a photo of a red flower");
        task.attach_submission(submission(b"img"));

        assert_eq!(task.mark_uploaded(), Ok(()));
        assert!(task.is_uploaded());
        assert_eq!(task.mark_uploaded(), Err(HuntError::AlreadyUploaded(task.id)));
    }

    #[test]
    fn reattach_clears_the_uploaded_flag() {
        let mut task = Task::new("Capture a sunset", "Take a photo of the sunset");
        task.attach_submission(submission(b"first"));
        task.mark_uploaded().unwrap();

        task.attach_submission(submission(b"second"));
        assert!(task.is_completed());
        assert!(!task.is_uploaded());
        assert_eq!(task.photo().map(|p| p.data().to_vec()), Some(b"second".to_vec()));
    }

    #[test]
    fn task_ids_are_unique() {
        let a = Task::new("a", "a");
        let b = Task::new("b", "b");
        assert_ne!(a.id, b.id);
    }
}
