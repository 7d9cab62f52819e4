//! The hunt itself: an ordered, fixed set of tasks and their legal state
//! transitions.

use std::collections::HashSet;

use tracing::info;

use crate::error::HuntError;
use crate::model::geo::GeoCoordinate;
use crate::model::photo::Photo;
use crate::model::task::{Submission, Task, TaskId, TaskState};

/// Ordered collection of scavenger hunt tasks.
///
/// The task set is fixed at construction; operations mutate task state in
/// place and never insert or remove entries, so iteration order is stable
/// for the whole session. Upload bookkeeping (`uploading`) is transient and
/// deliberately kept out of [`TaskState`].
#[derive(Debug)]
pub struct Hunt {
    tasks: Vec<Task>,
    uploading: HashSet<TaskId>,
}

impl Hunt {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            uploading: HashSet::new(),
        }
    }

    /// The sample hunt the app ships with.
    pub fn sample() -> Self {
        Self::new(vec![
            Task::new("Find a red flower", "Take a photo of a red flower"),
            Task::new("Capture a sunset", "Take a photo of the sunset"),
            Task::new("Spot a squirrel", "Take a photo of a squirrel"),
        ])
    }

    /// All tasks, in their fixed presentation order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: TaskId) -> Result<&Task, HuntError> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(HuntError::TaskNotFound(id))
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, HuntError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(HuntError::TaskNotFound(id))
    }

    /// Whether an upload for this task is currently in flight.
    pub fn is_uploading(&self, id: TaskId) -> bool {
        self.uploading.contains(&id)
    }

    /// Attaches a photo (and the location resolved for it, when there is
    /// one) to a task, marking it completed. Re-attaching replaces the
    /// previous submission; replacing the photo of an uploaded task resets
    /// its uploaded flag. Rejected while an upload for the task is in
    /// flight. Preconditions are checked before any state changes.
    pub fn complete_task(
        &mut self,
        id: TaskId,
        photo: Photo,
        location: Option<GeoCoordinate>,
    ) -> Result<(), HuntError> {
        if self.uploading.contains(&id) {
            return Err(HuntError::UploadInFlight(id));
        }
        let task = self.task_mut(id)?;
        let replaced = task.is_completed();
        task.attach_submission(Submission::new(photo, location));
        info!(
            task = %id,
            replaced,
            has_location = task.location().is_some(),
            "task completed"
        );
        Ok(())
    }

    /// Claims the upload slot for a task and hands back the payload to
    /// send. At most one upload per task can be in flight at a time.
    pub fn begin_upload(&mut self, id: TaskId) -> Result<Photo, HuntError> {
        if self.uploading.contains(&id) {
            return Err(HuntError::UploadInFlight(id));
        }
        let photo = match &self.task(id)?.state {
            TaskState::Open => return Err(HuntError::PhotoMissing(id)),
            TaskState::Completed { uploaded: true, .. } => {
                return Err(HuntError::AlreadyUploaded(id))
            }
            TaskState::Completed { submission, .. } => submission.photo.clone(),
        };
        self.uploading.insert(id);
        Ok(photo)
    }

    /// Records a successful upload and releases the task's upload slot.
    pub fn finish_upload(&mut self, id: TaskId) -> Result<(), HuntError> {
        self.task_mut(id)?.mark_uploaded()?;
        self.uploading.remove(&id);
        info!(task = %id, "task uploaded");
        Ok(())
    }

    /// Releases the upload slot without marking anything uploaded, for a
    /// failed or cancelled transfer. Safe to call when no upload is in
    /// flight.
    pub fn abort_upload(&mut self, id: TaskId) {
        self.uploading.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> Photo {
        Photo::from_camera(vec![0xAAu8; 8])
    }

    fn completed_hunt_task() -> (Hunt, TaskId) {
        let mut hunt = Hunt::sample();
        let id = hunt.tasks()[0].id;
        hunt.complete_task(id, photo(), None).unwrap();
        (hunt, id)
    }

    #[test]
    fn sample_hunt_has_three_open_tasks_in_order() {
        let hunt = Hunt::sample();
        assert_eq!(hunt.len(), 3);
        let titles: Vec<&str> = hunt.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Find a red flower", "Capture a sunset", "Spot a squirrel"]
        );
        assert!(hunt.tasks().iter().all(|t| !t.is_completed()));
    }

    #[test]
    fn complete_attaches_photo_and_location() {
        let mut hunt = Hunt::sample();
        let id = hunt.tasks()[1].id;
        let here = GeoCoordinate::new(35.6581, 139.7017);

        hunt.complete_task(id, photo(), Some(here)).unwrap();

        let task = hunt.task(id).unwrap();
        assert!(task.is_completed());
        assert!(!task.is_uploaded());
        assert_eq!(task.location(), Some(here));
    }

    #[test]
    fn complete_without_location_is_fine() {
        let (hunt, id) = completed_hunt_task();
        let task = hunt.task(id).unwrap();
        assert!(task.is_completed());
        assert_eq!(task.location(), None);
    }

    #[test]
    fn unknown_id_is_rejected_without_changes() {
        let mut hunt = Hunt::sample();
        let ghost = TaskId::new();

        assert_eq!(
            hunt.complete_task(ghost, photo(), None),
            Err(HuntError::TaskNotFound(ghost))
        );
        assert_eq!(
            hunt.begin_upload(ghost),
            Err(HuntError::TaskNotFound(ghost))
        );
        assert!(hunt.tasks().iter().all(|t| !t.is_completed()));
    }

    #[test]
    fn upload_requires_an_attached_photo() {
        let mut hunt = Hunt::sample();
        let id = hunt.tasks()[0].id;
        assert_eq!(hunt.begin_upload(id), Err(HuntError::PhotoMissing(id)));
        assert!(!hunt.is_uploading(id));
    }

    #[test]
    fn at_most_one_upload_per_task() {
        let (mut hunt, id) = completed_hunt_task();

        hunt.begin_upload(id).unwrap();
        assert!(hunt.is_uploading(id));
        assert_eq!(hunt.begin_upload(id), Err(HuntError::UploadInFlight(id)));
    }

    #[test]
    fn uploads_of_different_tasks_may_interleave() {
        let mut hunt = Hunt::sample();
        let first = hunt.tasks()[0].id;
        let second = hunt.tasks()[1].id;
        hunt.complete_task(first, photo(), None).unwrap();
        hunt.complete_task(second, photo(), None).unwrap();

        hunt.begin_upload(first).unwrap();
        hunt.begin_upload(second).unwrap();
        assert!(hunt.is_uploading(first));
        assert!(hunt.is_uploading(second));
    }

    #[test]
    fn reattach_is_rejected_while_uploading() {
        let (mut hunt, id) = completed_hunt_task();
        hunt.begin_upload(id).unwrap();

        let err = hunt.complete_task(id, Photo::from_library(vec![1u8]), None);
        assert_eq!(err, Err(HuntError::UploadInFlight(id)));
        // The original submission is untouched.
        assert_eq!(hunt.task(id).unwrap().photo().map(|p| p.len()), Some(8));
    }

    #[test]
    fn finish_marks_uploaded_and_releases_the_slot() {
        let (mut hunt, id) = completed_hunt_task();
        hunt.begin_upload(id).unwrap();

        hunt.finish_upload(id).unwrap();

        let task = hunt.task(id).unwrap();
        assert!(task.is_uploaded());
        assert!(!hunt.is_uploading(id));
    }

    #[test]
    fn uploaded_tasks_cannot_upload_again() {
        let (mut hunt, id) = completed_hunt_task();
        hunt.begin_upload(id).unwrap();
        hunt.finish_upload(id).unwrap();

        assert_eq!(hunt.begin_upload(id), Err(HuntError::AlreadyUploaded(id)));
    }

    #[test]
    fn abort_releases_the_slot_for_a_retry() {
        let (mut hunt, id) = completed_hunt_task();
        hunt.begin_upload(id).unwrap();

        hunt.abort_upload(id);

        assert!(!hunt.is_uploading(id));
        assert!(!hunt.task(id).unwrap().is_uploaded());
        hunt.begin_upload(id).unwrap();
    }

    #[test]
    fn abort_without_upload_is_a_no_op() {
        let (mut hunt, id) = completed_hunt_task();
        hunt.abort_upload(id);
        assert!(hunt.task(id).unwrap().is_completed());
    }

    #[test]
    fn reattach_after_upload_resets_the_uploaded_flag() {
        let (mut hunt, id) = completed_hunt_task();
        hunt.begin_upload(id).unwrap();
        hunt.finish_upload(id).unwrap();

        hunt.complete_task(id, Photo::from_library(vec![1u8, 2, 3]), None)
            .unwrap();

        let task = hunt.task(id).unwrap();
        assert!(task.is_completed());
        assert!(!task.is_uploaded());
        assert_eq!(task.photo().map(|p| p.len()), Some(3));
    }

    #[test]
    fn order_is_stable_across_mutations() {
        let mut hunt = Hunt::sample();
        let ids: Vec<TaskId> = hunt.tasks().iter().map(|t| t.id).collect();

        hunt.complete_task(ids[2], photo(), None).unwrap();
        hunt.complete_task(ids[0], photo(), None).unwrap();
        hunt.begin_upload(ids[2]).unwrap();
        hunt.finish_upload(ids[2]).unwrap();

        let after: Vec<TaskId> = hunt.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn uploaded_always_implies_completed() {
        let (mut hunt, id) = completed_hunt_task();
        hunt.begin_upload(id).unwrap();
        hunt.finish_upload(id).unwrap();

        for task in hunt.tasks() {
            assert!(!task.is_uploaded() || task.is_completed());
        }
    }
}
