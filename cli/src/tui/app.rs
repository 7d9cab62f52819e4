use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ratatui::widgets::TableState;
use snaphunt_core::{
    HuntError, HuntService, LocationResolver, LocationWatch, Photo, PhotoSource,
    SimulatedUploadTransport, TaskDto, TaskEvent, TaskId,
};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

pub enum InputMode {
    Normal,
    /// Typing a file path for the library pick flow.
    AttachPath,
    /// Typing a file path for the camera capture flow.
    CapturePath,
}

/// An upload running on the async runtime.
struct PendingUpload {
    task: TaskId,
    handle: JoinHandle<Result<(), HuntError>>,
}

pub struct App {
    rt: Handle,
    service: Arc<HuntService<SimulatedUploadTransport>>,
    resolver: LocationResolver<LocationWatch>,
    events: broadcast::Receiver<TaskEvent>,
    pending: Option<PendingUpload>,
    pub tasks: Vec<TaskDto>,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
}

impl App {
    pub fn new(
        rt: Handle,
        service: Arc<HuntService<SimulatedUploadTransport>>,
        resolver: LocationResolver<LocationWatch>,
    ) -> App {
        let events = service.subscribe();
        let tasks = service.tasks();
        let mut state = TableState::default();
        if !tasks.is_empty() {
            state.select(Some(0));
        }
        App {
            rt,
            service,
            resolver,
            events,
            pending: None,
            tasks,
            state,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
        }
    }

    pub fn next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.tasks.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.tasks.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.tasks.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&TaskDto> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Id of the task whose upload is currently running, if any.
    pub fn uploading_task(&self) -> Option<TaskId> {
        self.pending.as_ref().map(|p| p.task)
    }

    /// Applies queued change notifications and finished uploads. Runs once
    /// per poll tick.
    pub fn tick(&mut self) {
        let mut dirty = false;
        loop {
            match self.events.try_recv() {
                Ok(_) => dirty = true,
                Err(broadcast::error::TryRecvError::Lagged(_)) => dirty = true,
                Err(_) => break,
            }
        }

        if self.pending.as_ref().is_some_and(|p| p.handle.is_finished()) {
            if let Some(pending) = self.pending.take() {
                match self.rt.block_on(pending.handle) {
                    Ok(Ok(())) => self.status = Some("Photo uploaded".to_string()),
                    Ok(Err(err)) => self.status = Some(format!("Upload failed: {err}")),
                    Err(err) if err.is_cancelled() => {
                        self.status = Some("Upload cancelled".to_string())
                    }
                    Err(err) => self.status = Some(format!("Upload crashed: {err}")),
                }
                dirty = true;
            }
        }

        if dirty {
            self.reload_tasks();
        }
    }

    fn reload_tasks(&mut self) {
        self.tasks = self.service.tasks();
        if self.tasks.is_empty() {
            self.state.select(None);
        } else if self.state.selected().is_none() {
            self.state.select(Some(0));
        }
    }

    pub fn enter_attach_mode(&mut self) {
        if self.selected().is_some() {
            self.input_mode = InputMode::AttachPath;
            self.input.clear();
            self.cursor_position = 0;
        }
    }

    pub fn enter_capture_mode(&mut self) {
        if self.selected().is_some() {
            self.input_mode = InputMode::CapturePath;
            self.input.clear();
            self.cursor_position = 0;
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self
            .input
            .chars()
            .take(self.cursor_position)
            .map(|c| c.len_utf8())
            .sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Confirms the typed path, attaching the photo via the flow the mode
    /// was entered for. An empty path backs out, like an abandoned picker.
    pub fn submit_path(&mut self) {
        if self.input.trim().is_empty() {
            self.exit_input_mode();
            return;
        }

        let source = match self.input_mode {
            InputMode::AttachPath => PhotoSource::Library,
            InputMode::CapturePath => PhotoSource::Camera,
            InputMode::Normal => return,
        };
        let path = self.input.trim().to_string();

        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();

        self.attach_photo(Path::new(&path), source);
    }

    fn attach_photo(&mut self, path: &Path, source: PhotoSource) {
        let id = match self.selected() {
            Some(task) => task.id,
            None => return,
        };

        match load_photo(path, source) {
            Ok(photo) => {
                let location = self.resolver.resolve(&photo);
                match self.service.complete_task(id, photo, location) {
                    Ok(dto) => {
                        self.status = Some(match dto.location {
                            Some(c) => format!("Photo attached ({c})"),
                            None => "Photo attached (no location)".to_string(),
                        });
                        self.reload_tasks();
                    }
                    Err(err) => self.status = Some(err.to_string()),
                }
            }
            Err(err) => self.status = Some(format!("{err:#}")),
        }
    }

    /// Starts uploading the selected task's photo on the async runtime.
    pub fn upload_selected(&mut self) {
        let task = match self.selected() {
            Some(task) => task.clone(),
            None => return,
        };
        if !task.completed {
            self.status = Some("Attach a photo first".to_string());
            return;
        }
        if task.uploaded {
            self.status = Some("Already uploaded".to_string());
            return;
        }
        if self.pending.is_some() {
            self.status = Some("Another upload is still running".to_string());
            return;
        }

        let id = task.id;
        let service = Arc::clone(&self.service);
        let handle = self.rt.spawn(async move { service.upload_task(id).await });
        self.pending = Some(PendingUpload { task: id, handle });
        self.status = Some("Uploading...".to_string());
    }

    /// Cancels any in-flight upload. Called when the session closes.
    pub fn shutdown(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}

/// Reads an image payload from disk for the given acquisition flow.
fn load_photo(path: &Path, source: PhotoSource) -> Result<Photo> {
    let data =
        std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    Ok(match source {
        PhotoSource::Library => Photo::from_library(data),
        PhotoSource::Camera => Photo::from_camera(data),
    })
}
