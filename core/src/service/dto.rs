use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::geo::GeoCoordinate;
use crate::model::photo::PhotoSource;
use crate::model::task::{Task, TaskId, TaskState};

/// Flattened task snapshot for presentation layers.
///
/// Raw photo bytes never travel to the UI; only their size and provenance
/// do.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskDto {
    pub id: TaskId,
    pub title: String,
    pub description: String,

    // Flattened state fields for UI
    pub completed: bool,
    pub uploaded: bool,
    pub location: Option<GeoCoordinate>,
    pub photo_size: Option<usize>,
    pub photo_source: Option<PhotoSource>,
    pub attached_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl TaskDto {
    pub fn from_entity(task: &Task) -> Self {
        let (completed, uploaded, location, photo_size, photo_source, attached_at) =
            match &task.state {
                TaskState::Open => (false, false, None, None, None, None),
                TaskState::Completed {
                    submission,
                    uploaded,
                } => (
                    true,
                    *uploaded,
                    submission.location,
                    Some(submission.photo.len()),
                    Some(submission.photo.source()),
                    Some(submission.attached_at),
                ),
            };

        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            completed,
            uploaded,
            location,
            photo_size,
            photo_source,
            attached_at,
            created_at: task.created_at,
        }
    }
}
