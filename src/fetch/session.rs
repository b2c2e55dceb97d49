//! One-time lazy initialization of a shared session resource.
//!
//! The guard lock is held only across the Uninitialized -> Ready | Failed
//! transition, never across individual fetches; once the session exists
//! all callers share it without contention. An initialization error is
//! sticky and re-surfaced to every later caller instead of being retried
//! silently.

use std::sync::{Arc, Mutex};

use crate::error::FetchError;

enum SessionState<T> {
    Uninitialized,
    Ready(Arc<T>),
    Failed(String),
}

pub struct SharedSession<T> {
    state: Mutex<SessionState<T>>,
}

impl<T> Default for SharedSession<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(SessionState::Uninitialized),
        }
    }
}

impl<T> SharedSession<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared session, initializing it on the first call.
    /// Under N concurrent first calls exactly one `init` runs; the rest
    /// wait on the guard and observe the result.
    pub fn get_or_init<F>(&self, init: F) -> Result<Arc<T>, FetchError>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let mut state = self.state.lock().unwrap();

        match &*state {
            SessionState::Ready(session) => Ok(session.clone()),
            SessionState::Failed(msg) => Err(FetchError::NotInitialized(msg.clone())),
            SessionState::Uninitialized => match init() {
                Ok(session) => {
                    let session = Arc::new(session);
                    *state = SessionState::Ready(session.clone());
                    Ok(session)
                }
                Err(err) => {
                    let msg = err.to_string();
                    log::error!("session initialization failed: {msg}");
                    *state = SessionState::Failed(msg.clone());
                    Err(FetchError::NotInitialized(msg))
                }
            },
        }
    }
}
