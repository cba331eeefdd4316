//! Script session: the single open script buffer.
//!
//! Covers directory listing, loading, save-on-edit and execution with
//! captured output. Only one execution runs at a time; a second request
//! while one is in flight is refused. Saves of a path reach the host in edit
//! order, with superseded edits skipped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use hostctl_common::{ScriptOutput, ScriptTreeNode};
use tokio::task::JoinHandle;

use crate::application::ports::CommandBridge;
use crate::application::services::bridge_client::BridgeClient;
use crate::domain::{BridgeError, ScriptError, ScriptSessionState};

/// Clears one boolean of the session state when dropped.
struct FlagGuard<'a> {
    state: &'a Mutex<ScriptSessionState>,
    flag: fn(&mut ScriptSessionState) -> &mut bool,
}

impl<'a> FlagGuard<'a> {
    fn raise(
        state: &'a Mutex<ScriptSessionState>,
        flag: fn(&mut ScriptSessionState) -> &mut bool,
    ) -> Self {
        *flag(&mut state.lock().unwrap_or_else(PoisonError::into_inner)) = true;
        Self { state, flag }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        *(self.flag)(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner)) = false;
    }
}

// ── Save lane ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct PendingSaves {
    revision: u64,
    by_path: HashMap<String, (u64, String)>,
}

/// Orders script saves. Every edit gets a revision; a flush sends the newest
/// content queued for its path and skips anything already overtaken.
#[derive(Default)]
struct SaveLane {
    pending: Mutex<PendingSaves>,
    /// Last revision the host accepted, per path. Held across the send.
    saved: tokio::sync::Mutex<HashMap<String, u64>>,
}

impl SaveLane {
    fn push(&self, path: &str, code: String) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.revision += 1;
        let revision = pending.revision;
        pending.by_path.insert(path.to_string(), (revision, code));
    }

    async fn flush<B: CommandBridge>(
        &self,
        client: &BridgeClient<B>,
        path: &str,
    ) -> Result<(), BridgeError> {
        let mut saved = self.saved.lock().await;
        let next = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .by_path
            .get(path)
            .cloned();
        let Some((revision, code)) = next else {
            return Ok(());
        };
        if saved.get(path).is_some_and(|&done| done >= revision) {
            return Ok(());
        }

        client.save_script(&code, path).await?;
        saved.insert(path.to_string(), revision);

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if pending.by_path.get(path).is_some_and(|(r, _)| *r == revision) {
            pending.by_path.remove(path);
        }
        Ok(())
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct ScriptSession<B> {
    client: Arc<BridgeClient<B>>,
    state: Mutex<ScriptSessionState>,
    saves: Arc<SaveLane>,
}

impl<B: CommandBridge + 'static> ScriptSession<B> {
    #[must_use]
    pub fn new(client: Arc<BridgeClient<B>>) -> Self {
        Self {
            client,
            state: Mutex::new(ScriptSessionState::default()),
            saves: Arc::new(SaveLane::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ScriptSessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the whole session state.
    #[must_use]
    pub fn state(&self) -> ScriptSessionState {
        self.lock().clone()
    }

    #[must_use]
    pub fn buffer(&self) -> String {
        self.lock().buffer.clone()
    }

    #[must_use]
    pub fn language(&self) -> String {
        self.lock().language.clone()
    }

    #[must_use]
    pub fn active_file_path(&self) -> String {
        self.lock().active_file_path.clone()
    }

    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.lock().executing
    }

    #[must_use]
    pub fn is_directory_loading(&self) -> bool {
        self.lock().directory_loading
    }

    #[must_use]
    pub fn last_run_failed(&self) -> bool {
        self.lock().last_run_failed
    }

    /// List one level of the host's script directory.
    ///
    /// # Errors
    ///
    /// Returns the host failure.
    pub async fn list_directory(&self, path: &str) -> Result<Vec<ScriptTreeNode>> {
        let _loading = FlagGuard::raise(&self.state, |s| &mut s.directory_loading);
        let nodes = self.client.load_scripts_in_directory(path).await?;
        Ok(nodes)
    }

    /// Open `path`: it becomes the active file, and its content the buffer.
    ///
    /// The active path is switched before the host is asked for the content
    /// and stays switched if that fails.
    ///
    /// # Errors
    ///
    /// Returns the host failure.
    pub async fn load_file(&self, path: &str) -> Result<String> {
        self.lock().open(path);
        match self.client.load_script(path).await {
            Ok(content) => {
                self.lock().buffer.clone_from(&content);
                Ok(content)
            }
            Err(err) => {
                tracing::error!(path = %path, error = %err, "failed to load script");
                Err(err.into())
            }
        }
    }

    /// Replace the buffer and save it to the active file in the background.
    ///
    /// Nothing is saved when no file is active or no runtime is available.
    /// The returned handle resolves once the save attempt is over; a failed
    /// save is only logged. Rapid edits are coalesced: the host may never see
    /// an intermediate buffer, but never sees an older one after a newer one.
    pub fn set_buffer(&self, content: impl Into<String>) -> Option<JoinHandle<()>> {
        let content = content.into();
        let runtime = tokio::runtime::Handle::try_current().ok();
        let path = {
            let mut state = self.lock();
            state.buffer.clone_from(&content);
            if !state.active_file_path.is_empty() && runtime.is_some() {
                self.saves.push(&state.active_file_path, content);
            }
            state.active_file_path.clone()
        };
        if path.is_empty() {
            return None;
        }
        let Some(runtime) = runtime else {
            tracing::warn!(path = %path, "no async runtime; script not saved");
            return None;
        };
        let client = Arc::clone(&self.client);
        let saves = Arc::clone(&self.saves);
        Some(runtime.spawn(async move {
            if let Err(err) = saves.flush(&client, &path).await {
                tracing::warn!(path = %path, error = %err, "failed to save script");
            }
        }))
    }

    /// Save the buffer to the active file and wait for the host.
    ///
    /// # Errors
    ///
    /// `ScriptError::NoActiveScript` when no file is open, or the host failure.
    pub async fn save(&self) -> Result<()> {
        let path = {
            let state = self.lock();
            if state.active_file_path.is_empty() {
                return Err(ScriptError::NoActiveScript.into());
            }
            self.saves.push(&state.active_file_path, state.buffer.clone());
            state.active_file_path.clone()
        };
        self.saves.flush(&self.client, &path).await?;
        Ok(())
    }

    /// Run the buffer as inline code in the language of the active file.
    ///
    /// # Errors
    ///
    /// `ScriptError::NoCode` for an empty buffer, `AlreadyExecuting` while a
    /// run is in flight, or the host failure (which sets `last_run_failed`).
    pub async fn execute(&self) -> Result<ScriptOutput> {
        let (code, language) = {
            let mut state = self.lock();
            if state.buffer.is_empty() {
                return Err(ScriptError::NoCode.into());
            }
            if state.executing {
                return Err(ScriptError::AlreadyExecuting.into());
            }
            state.begin_run();
            (state.buffer.clone(), state.language.clone())
        };
        let _running = FlagGuard {
            state: &self.state,
            flag: |s| &mut s.executing,
        };
        let result = self.client.execute_code(&code, &language).await;
        self.finish_run(result)
    }

    /// Run the active file on the host.
    ///
    /// # Errors
    ///
    /// `ScriptError::NoActiveScript` when no file is open, `AlreadyExecuting`
    /// while a run is in flight, or the host failure.
    pub async fn execute_active_file(&self) -> Result<ScriptOutput> {
        let path = {
            let mut state = self.lock();
            if state.active_file_path.is_empty() {
                return Err(ScriptError::NoActiveScript.into());
            }
            if state.executing {
                return Err(ScriptError::AlreadyExecuting.into());
            }
            state.begin_run();
            state.active_file_path.clone()
        };
        let _running = FlagGuard {
            state: &self.state,
            flag: |s| &mut s.executing,
        };
        let result = self.client.execute_script(&path).await;
        self.finish_run(result)
    }

    fn finish_run(&self, result: Result<ScriptOutput, BridgeError>) -> Result<ScriptOutput> {
        let mut state = self.lock();
        state.executing = false;
        match result {
            Ok(output) => {
                state.record_output(output.clone());
                Ok(output)
            }
            Err(err) => {
                state.last_run_failed = true;
                drop(state);
                tracing::error!(error = %err, "failed to execute script");
                Err(err.into())
            }
        }
    }
}
