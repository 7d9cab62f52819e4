//! Shared front of the task store: serialization of mutations, change
//! notifications and the asynchronous upload flow.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::HuntError;
use crate::events::{TaskChange, TaskEvent};
use crate::model::geo::GeoCoordinate;
use crate::model::photo::Photo;
use crate::model::task::TaskId;
use crate::service::dto::TaskDto;
use crate::store::Hunt;
use crate::upload::UploadTransport;

/// Observers that fall this far behind start losing events; they re-read
/// the full task list when that happens.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Thread-safe task store service.
///
/// All state lives behind a single lock that is never held across an await.
/// The upload flow claims its slot, runs the transport unlocked, then
/// re-acquires the lock to apply the outcome, so observers only ever see
/// states from before or after a transition, never a half-applied one.
pub struct HuntService<T: UploadTransport> {
    hunt: Mutex<Hunt>,
    transport: T,
    events: broadcast::Sender<TaskEvent>,
}

impl<T: UploadTransport> HuntService<T> {
    pub fn new(hunt: Hunt, transport: T) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            hunt: Mutex::new(hunt),
            transport,
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Hunt> {
        self.hunt.lock().expect("hunt state mutex poisoned")
    }

    /// Change notifications for presentation observers.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.events.subscribe()
    }

    fn notify(&self, task: TaskId, change: TaskChange) {
        // No observers is fine; the store does not depend on them.
        let _ = self.events.send(TaskEvent { task, change });
    }

    /// Snapshot of every task, in presentation order.
    pub fn tasks(&self) -> Vec<TaskDto> {
        self.lock().tasks().iter().map(TaskDto::from_entity).collect()
    }

    /// Snapshot of a single task.
    pub fn task(&self, id: TaskId) -> Result<TaskDto, HuntError> {
        self.lock().task(id).map(TaskDto::from_entity)
    }

    /// Whether an upload for this task is currently in flight.
    pub fn is_uploading(&self, id: TaskId) -> bool {
        self.lock().is_uploading(id)
    }

    /// Attaches a photo and its resolved location to a task, completing it.
    /// Observers are notified after the transition is applied.
    pub fn complete_task(
        &self,
        id: TaskId,
        photo: Photo,
        location: Option<GeoCoordinate>,
    ) -> Result<TaskDto, HuntError> {
        let dto = {
            let mut hunt = self.lock();
            hunt.complete_task(id, photo, location)?;
            hunt.task(id).map(TaskDto::from_entity)?
        };
        self.notify(id, TaskChange::Completed);
        Ok(dto)
    }

    /// Uploads a completed task's photo and resolves once the transport is
    /// done (two simulated seconds with the default transport).
    ///
    /// At most one upload per task runs at a time; a concurrent call for
    /// the same task gets [`HuntError::UploadInFlight`] and the first
    /// upload proceeds untouched, so the uploaded notification fires
    /// exactly once. Dropping the returned future cancels the upload and
    /// releases the task's slot.
    pub async fn upload_task(&self, id: TaskId) -> Result<(), HuntError> {
        let photo = self.lock().begin_upload(id)?;
        info!(task = %id, bytes = photo.len(), "upload started");

        let mut slot = UploadSlot {
            service: self,
            id,
            armed: true,
        };
        let outcome = self.transport.upload(&photo).await;
        slot.armed = false;

        let mut hunt = self.lock();
        match outcome {
            Ok(()) => {
                hunt.finish_upload(id)?;
                drop(hunt);
                self.notify(id, TaskChange::Uploaded);
                Ok(())
            }
            Err(err) => {
                hunt.abort_upload(id);
                drop(hunt);
                warn!(task = %id, error = %err, "upload failed");
                Err(HuntError::UploadFailed {
                    task: id,
                    reason: err.to_string(),
                })
            }
        }
    }
}

/// Releases a task's upload slot when the upload future is dropped
/// mid-flight, so a cancelled upload never leaves the task stuck.
struct UploadSlot<'a, T: UploadTransport> {
    service: &'a HuntService<T>,
    id: TaskId,
    armed: bool,
}

impl<T: UploadTransport> Drop for UploadSlot<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.service.lock().abort_upload(self.id);
            info!(task = %self.id, "upload cancelled");
        }
    }
}
