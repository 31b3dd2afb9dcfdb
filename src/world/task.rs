//! Background work handles polled from the scheduler tick
//!
//! A task runs on its own named thread. Completion is checked without
//! blocking; the result is moved out of the thread the first time it is seen
//! finished. Dropping a task joins a thread that is still running, so memory
//! handed to the task is never released underneath it.

use crate::io::error::{Result, WorldError};
use std::thread::{self, JoinHandle};
use tracing::error;

enum TaskState<T> {
    Running(JoinHandle<T>),
    Finished(T),
    Failed,
    Taken,
}

/// Handle to one piece of background work
pub struct Task<T> {
    name: String,
    state: TaskState<T>,
}

impl<T: Send + 'static> Task<T> {
    /// Start `work` on a new named thread
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to create the thread.
    pub fn spawn<F>(name: impl Into<String>, work: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let name = name.into();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(work)
            .map_err(|source| WorldError::TaskSpawn {
                task: name.clone(),
                source,
            })?;
        Ok(Self {
            name,
            state: TaskState::Running(handle),
        })
    }
}

impl<T> Task<T> {
    /// Task name, also used as the thread name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-blocking completion check
    ///
    /// Returns whether the task has stopped running, whatever the outcome.
    pub fn poll(&mut self) -> bool {
        let finished = match &self.state {
            TaskState::Running(handle) => handle.is_finished(),
            TaskState::Finished(_) | TaskState::Failed | TaskState::Taken => true,
        };
        if finished {
            self.collect();
        }
        finished
    }

    /// Block until the task stops running
    pub fn join(&mut self) {
        self.collect();
    }

    /// Whether the task panicked
    pub const fn failed(&self) -> bool {
        matches!(self.state, TaskState::Failed)
    }

    /// Move the result out once the task has finished successfully
    pub fn take(&mut self) -> Option<T> {
        if !matches!(self.state, TaskState::Finished(_)) {
            return None;
        }
        match std::mem::replace(&mut self.state, TaskState::Taken) {
            TaskState::Finished(value) => Some(value),
            other => {
                self.state = other;
                None
            }
        }
    }

    fn collect(&mut self) {
        if !matches!(self.state, TaskState::Running(_)) {
            return;
        }
        if let TaskState::Running(handle) = std::mem::replace(&mut self.state, TaskState::Failed)
        {
            match handle.join() {
                Ok(value) => self.state = TaskState::Finished(value),
                Err(_) => error!(task = %self.name, "task panicked"),
            }
        }
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.collect();
    }
}
