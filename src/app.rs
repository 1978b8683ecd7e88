use crate::analysis::Insights;
use crate::config::Config;
use crate::diary_entry::{DiaryEntry, EntryId, Mood};
use crate::diary_state::DiaryState;
use crate::editor::{CompositionId, EditorState};
use crate::error::{ActionError, AnalysisError, AuthError, SaveError, ShareError};
use crate::notify::Toasts;
use crate::services::{Draft, Services};
use crate::session::{AuthForm, AuthMethod, Credentials, Session, SignUpDetails};
use crate::share::SharePayload;
use crate::view::{active_view, View};
use chrono::{DateTime, Local};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(u64);

/// Result of a dispatched action, delivered back to the event loop.
#[derive(Debug)]
pub enum Completion {
    Auth {
        task: TaskId,
        method: AuthMethod,
        result: Result<(), AuthError>,
    },
    Save {
        task: TaskId,
        composition: CompositionId,
        draft: Draft,
        auto: bool,
        result: Result<(), SaveError>,
    },
    Analysis {
        task: TaskId,
        composition: CompositionId,
        result: Result<Mood, AnalysisError>,
    },
    Export {
        task: TaskId,
        result: Result<(), ShareError>,
    },
}

pub type CompletionReceiver = mpsc::UnboundedReceiver<Completion>;

struct InFlight {
    id: TaskId,
    handle: JoinHandle<()>,
}

impl InFlight {
    fn is(&self, task: TaskId) -> bool {
        self.id == task
    }
}

/// Application state and the actions that change it. Owns the session, the
/// entry store and the editor; the screen is derived from them.
pub struct App {
    services: Services,
    session: Session,
    entries: DiaryState,
    editor: EditorState,
    last_saved: Option<DateTime<Local>>,

    pub auth_form: AuthForm,
    pub selected: usize,
    pub toasts: Toasts,

    autosave_interval: Option<Duration>,
    last_autosave: Instant,

    auth_task: Option<InFlight>,
    save_task: Option<InFlight>,
    /// A manual save requested while another save was running.
    manual_save_pending: bool,
    analysis_task: Option<InFlight>,
    export_task: Option<InFlight>,
    next_task: u64,
    completions: mpsc::UnboundedSender<Completion>,

    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: &Config,
        services: Services,
        entries: DiaryState,
    ) -> (Self, CompletionReceiver) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let app = App {
            services,
            session: Session::default(),
            entries,
            editor: EditorState::default(),
            last_saved: None,
            auth_form: AuthForm::default(),
            selected: 0,
            toasts: Toasts::new(config.toast_duration()),
            autosave_interval: config.autosave_interval(),
            last_autosave: Instant::now(),
            auth_task: None,
            save_task: None,
            manual_save_pending: false,
            analysis_task: None,
            export_task: None,
            next_task: 0,
            completions,
            should_quit: false,
        };
        (app, receiver)
    }

    pub fn view(&self) -> View {
        active_view(&self.session, &self.editor)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn entries(&self) -> &DiaryState {
        &self.entries
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorState {
        &mut self.editor
    }

    pub fn last_saved(&self) -> Option<DateTime<Local>> {
        self.last_saved
    }

    pub fn is_authenticating(&self) -> bool {
        self.auth_task.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.save_task.is_some()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_task.is_some()
    }

    pub fn is_exporting(&self) -> bool {
        self.export_task.is_some()
    }

    /// Insights for the open entry, once it has been analyzed.
    pub fn insights(&self) -> Option<Insights> {
        self.editor
            .analysis_visible()
            .then(|| Insights::for_text(self.editor.content(), self.editor.mood()))
    }

    pub fn selected_entry(&self) -> Option<&DiaryEntry> {
        self.entries.get_entries().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn spawn<F>(&mut self, action: impl FnOnce(TaskId) -> F) -> InFlight
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let id = TaskId(self.next_task);
        self.next_task += 1;
        let completions = self.completions.clone();
        let future = action(id);
        let handle = tokio::spawn(async move {
            // The receiver only goes away when the app is shutting down.
            let _ = completions.send(future.await);
        });
        InFlight { id, handle }
    }

    // ---- auth ----

    fn ensure_auth_idle(&self) -> Result<(), ActionError> {
        if self.auth_task.is_some() {
            return Err(ActionError::Busy("sign-in"));
        }
        Ok(())
    }

    pub fn login(&mut self, credentials: Credentials) -> Result<(), ActionError> {
        self.ensure_auth_idle()?;
        info!("Dispatching login");
        let auth = self.services.auth.clone();
        let task = self.spawn(move |task| async move {
            let result = auth.login(&credentials).await;
            Completion::Auth {
                task,
                method: AuthMethod::Login,
                result,
            }
        });
        self.auth_task = Some(task);
        Ok(())
    }

    pub fn sign_up(&mut self, details: SignUpDetails) -> Result<(), ActionError> {
        self.ensure_auth_idle()?;
        info!("Dispatching sign up");
        let auth = self.services.auth.clone();
        let task = self.spawn(move |task| async move {
            let result = auth.sign_up(&details).await;
            Completion::Auth {
                task,
                method: AuthMethod::SignUp,
                result,
            }
        });
        self.auth_task = Some(task);
        Ok(())
    }

    pub fn login_with_google(&mut self) -> Result<(), ActionError> {
        self.ensure_auth_idle()?;
        info!("Dispatching identity provider login");
        let identity = self.services.identity.clone();
        let task = self.spawn(move |task| async move {
            let result = identity.authenticate().await.map(|identity| {
                debug!(name = ?identity.display_name, "Identity provider accepted sign-in");
            });
            Completion::Auth {
                task,
                method: AuthMethod::Google,
                result,
            }
        });
        self.auth_task = Some(task);
        Ok(())
    }

    /// Signs in immediately, without any service call.
    pub fn login_as_guest(&mut self) -> Result<(), ActionError> {
        self.ensure_auth_idle()?;
        self.finish_auth(AuthMethod::Guest);
        Ok(())
    }

    fn finish_auth(&mut self, method: AuthMethod) {
        self.session.authenticate();
        if self.editor.is_composing() {
            self.editor.close();
        }
        self.selected = 0;
        info!(?method, "Signed in");
        self.toasts.success(method.success_message());
    }

    // ---- composer ----

    fn ensure_authenticated(&self) -> Result<(), ActionError> {
        if !self.session.is_authenticated() {
            return Err(ActionError::NotAuthenticated);
        }
        Ok(())
    }

    fn ensure_composing(&self) -> Result<(), ActionError> {
        self.ensure_authenticated()?;
        if !self.editor.is_composing() {
            return Err(ActionError::NotComposing);
        }
        Ok(())
    }

    /// Abort work tied to the current composition.
    fn cancel_editor_tasks(&mut self) {
        for task in [self.save_task.take(), self.analysis_task.take()]
            .into_iter()
            .flatten()
        {
            debug!(task = task.id.0, "Aborting editor task");
            task.handle.abort();
        }
        self.manual_save_pending = false;
    }

    pub fn start_new_entry(&mut self) -> Result<(), ActionError> {
        self.ensure_authenticated()?;
        self.cancel_editor_tasks();
        self.editor.start_new();
        self.last_autosave = Instant::now();
        Ok(())
    }

    pub fn open_entry(&mut self, id: &EntryId) -> Result<(), ActionError> {
        self.ensure_authenticated()?;
        let entry = self.entries.get_entry(id)?.clone();
        self.cancel_editor_tasks();
        self.editor.load(&entry);
        self.last_autosave = Instant::now();
        debug!(%id, "Opened entry");
        Ok(())
    }

    /// Leave the composer, discarding unsaved changes.
    pub fn close_composer(&mut self) -> Result<(), ActionError> {
        self.ensure_composing()?;
        self.cancel_editor_tasks();
        self.editor.close();
        Ok(())
    }

    /// Autosaves never overlap another save. A manual save that arrives
    /// while one is running is remembered and settled when it finishes.
    pub fn save(&mut self, auto: bool) -> Result<(), ActionError> {
        self.ensure_composing()?;
        if self.editor.content().trim().is_empty() {
            return Err(ActionError::EmptyEntry);
        }
        if self.save_task.is_some() {
            if auto {
                return Err(ActionError::Busy("save"));
            }
            debug!("Queued manual save behind running save");
            self.manual_save_pending = true;
            return Ok(());
        }
        let draft = Draft {
            content: self.editor.content().to_string(),
            mood: self.editor.mood(),
        };
        let composition = self.editor.composition();
        debug!(auto, "Dispatching save");
        let sink = self.services.entries.clone();
        let task = self.spawn(move |task| async move {
            let result = sink.save(&draft).await;
            Completion::Save {
                task,
                composition,
                draft,
                auto,
                result,
            }
        });
        self.save_task = Some(task);
        Ok(())
    }

    pub fn analyze(&mut self) -> Result<(), ActionError> {
        self.ensure_composing()?;
        if self.analysis_task.is_some() {
            return Err(ActionError::Busy("analysis"));
        }
        let content = self.editor.content().to_string();
        let composition = self.editor.composition();
        debug!(chars = content.chars().count(), "Dispatching analysis");
        let analyzer = self.services.analyzer.clone();
        let task = self.spawn(move |task| async move {
            let result = analyzer.analyze(&content).await;
            Completion::Analysis {
                task,
                composition,
                result,
            }
        });
        self.analysis_task = Some(task);
        Ok(())
    }

    pub fn export_entry(&mut self) -> Result<(), ActionError> {
        self.ensure_composing()?;
        if self.export_task.is_some() {
            return Err(ActionError::Busy("export"));
        }
        let payload =
            SharePayload::for_entry(self.editor.content(), self.editor.mood(), Local::now());
        debug!(title = %payload.title, "Dispatching export");
        let target = self.services.share.clone();
        let task = self.spawn(move |task| async move {
            let result = target.share(&payload).await;
            Completion::Export { task, result }
        });
        self.export_task = Some(task);
        Ok(())
    }

    pub fn delete_entry(&mut self, id: &EntryId) -> Result<(), ActionError> {
        self.ensure_authenticated()?;
        self.entries.delete_entry(id)?;
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
        info!(%id, "Deleted entry");
        self.toasts.success("Entry deleted");
        Ok(())
    }

    // ---- completions ----

    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Auth {
                task,
                method,
                result,
            } => {
                if !self.auth_task.as_ref().is_some_and(|t| t.is(task)) {
                    debug!(task = task.0, "Ignoring unknown auth completion");
                    return;
                }
                self.auth_task = None;
                match result {
                    Ok(()) => self.finish_auth(method),
                    Err(e) => {
                        warn!(?method, error = %e, "Sign-in failed");
                        self.toasts.error(method.failure_message());
                    }
                }
            }
            Completion::Save {
                task,
                composition,
                draft,
                auto,
                result,
            } => {
                let owned = self.save_task.as_ref().is_some_and(|t| t.is(task));
                if owned {
                    self.save_task = None;
                }
                if !self.is_current(composition) {
                    debug!(task = task.0, "Discarding stale save");
                    return;
                }
                let queued = owned && std::mem::take(&mut self.manual_save_pending);
                if !queued || !auto || result.is_err() {
                    self.finish_save(draft, auto, result);
                } else if self.editor.content() == draft.content {
                    // The autosave already stored what the user asked for.
                    self.finish_save(draft, false, result);
                } else {
                    self.finish_save(draft, true, result);
                    if let Err(e) = self.save(false) {
                        warn!(error = %e, "Queued save not dispatched");
                        self.toasts.error("Failed to save entry");
                    }
                }
            }
            Completion::Analysis {
                task,
                composition,
                result,
            } => {
                if self.analysis_task.as_ref().is_some_and(|t| t.is(task)) {
                    self.analysis_task = None;
                }
                if !self.is_current(composition) {
                    debug!(task = task.0, "Discarding stale analysis");
                    return;
                }
                match result {
                    Ok(mood) => {
                        debug!(%mood, "Analysis finished");
                        self.editor.apply_analysis(mood);
                    }
                    Err(e) => {
                        warn!(error = %e, "Analysis failed");
                        self.toasts.error("Analysis failed");
                    }
                }
            }
            Completion::Export { task, result } => {
                if self.export_task.as_ref().is_some_and(|t| t.is(task)) {
                    self.export_task = None;
                }
                match result {
                    Ok(()) => self.toasts.success("Entry exported successfully!"),
                    Err(e) => {
                        warn!(error = %e, "Export failed");
                        self.toasts.error("Failed to export entry");
                    }
                }
            }
        }
    }

    fn is_current(&self, composition: CompositionId) -> bool {
        self.editor.is_composing() && self.editor.composition() == composition
    }

    fn finish_save(&mut self, draft: Draft, auto: bool, result: Result<(), SaveError>) {
        let stored = result.and_then(|()| {
            let unchanged = self.editor.content() == draft.content;
            let id = self.entries.add_entry(DiaryEntry::new(draft.content, draft.mood))?;
            Ok((id, unchanged))
        });
        match stored {
            Ok((id, unchanged)) => {
                self.last_saved = Some(Local::now());
                if unchanged {
                    self.editor.mark_saved();
                }
                info!(%id, from = ?self.editor.opened_from(), auto, "Saved entry");
                if !auto {
                    self.toasts.success("Entry saved successfully!");
                    self.editor.close();
                    self.selected = 0;
                }
            }
            Err(e) => {
                warn!(error = %e, auto, "Save failed");
                self.toasts.error("Failed to save entry");
            }
        }
    }

    /// Periodic housekeeping: expire toasts and fire autosave when due.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.expire(now);

        let Some(interval) = self.autosave_interval else {
            return;
        };
        if !self.editor.is_composing() || now.duration_since(self.last_autosave) < interval {
            return;
        }
        self.last_autosave = now;
        if self.editor.is_dirty() {
            if let Err(e) = self.save(true) {
                debug!(error = %e, "Skipped autosave");
            }
        }
    }
}
