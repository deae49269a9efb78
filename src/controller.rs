use crate::collaborator::Collaborator;
use crate::event::AppEvent;
use crate::journal::store::{LogStore, StoragePort};
use crate::journal::{derive_view, ChatMessage, JournalLog, SectionKey, ViewState};
use chrono::NaiveDate;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    AnalysisFailed { message: String },
}

impl Alert {
    pub fn message(&self) -> &str {
        match self {
            Self::AnalysisFailed { message } => message,
        }
    }
}

/// Owns the journal store and session state; every user intent goes through here.
pub struct SessionController<S: StoragePort> {
    store: LogStore<S>,
    collaborator: Arc<dyn Collaborator>,
    runtime_handle: Handle,
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
    current_date: NaiveDate,
    view: ViewState,
    is_loading: bool,
    alert: Option<Alert>,
}

impl<S: StoragePort> SessionController<S> {
    pub fn new(
        store: LogStore<S>,
        collaborator: Arc<dyn Collaborator>,
        runtime_handle: Handle,
        today: NaiveDate,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let view = derive_view(store.find(today));
        Self {
            store,
            collaborator,
            runtime_handle,
            tx,
            rx,
            current_date: today,
            view,
            is_loading: false,
            alert: None,
        }
    }

    pub fn logs(&self) -> &[JournalLog] {
        self.store.logs()
    }

    pub fn history(&self) -> Vec<&JournalLog> {
        self.store.history()
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn current_log(&self) -> Option<&JournalLog> {
        self.store.find(self.current_date)
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.view = derive_view(self.store.find(date));
        debug!(%date, view = ?self.view, "date selected");
    }

    /// Any edit reopens the entry; analysis and chat are kept.
    pub fn change_section(&mut self, key: SectionKey, text: &str) {
        self.store.update(self.current_date, |log| {
            *log.sections.get_mut(key) = text.to_string();
            log.completed = false;
        });
    }

    pub fn save(&mut self) {
        self.store.update(self.current_date, |log| log.completed = true);
        self.view = ViewState::Success;
        info!(date = %self.current_date, "journal saved");
    }

    pub fn back(&mut self) {
        self.view = ViewState::Editing;
    }

    pub fn analyze(&mut self) {
        let date = self.current_date;
        let Some(log) = self.store.find(date) else {
            return;
        };
        let sections = log.sections.clone();

        self.is_loading = true;
        let collaborator = Arc::clone(&self.collaborator);
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            let outcome = collaborator.analyze(&sections).await;
            let _ = tx.send(AppEvent::AnalysisSettled { date, outcome });
        });
    }

    /// The user's message is appended right away; the reply follows when the
    /// call settles.
    pub fn send_message(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let date = self.current_date;
        let Some(log) = self.store.find(date) else {
            return;
        };
        let history = log.chat_history.clone();
        let message = text.to_string();

        self.store
            .update(date, |log| log.chat_history.push(ChatMessage::user(message.clone())));

        self.is_loading = true;
        let collaborator = Arc::clone(&self.collaborator);
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            let outcome = collaborator.converse(&history, &message).await;
            let _ = tx.send(AppEvent::ReplySettled { date, outcome });
        });
    }

    /// Applies every settled AI call without blocking. Returns how many were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.apply_event(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        applied
    }

    /// Blocks until one AI call settles and applies it.
    #[cfg(test)]
    pub fn wait_for_settlement(&mut self, timeout: std::time::Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.apply_event(event);
                true
            }
            Err(_) => false,
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        self.is_loading = false;
        match event {
            AppEvent::AnalysisSettled { date, outcome } => match outcome {
                Ok(text) => {
                    self.store.update(date, |log| {
                        log.chat_history = vec![ChatMessage::model(text)];
                        log.is_analyzed = true;
                        log.completed = true;
                    });
                    if date == self.current_date {
                        self.view = ViewState::Chat;
                    }
                    info!(%date, "journal analyzed");
                }
                Err(err) => {
                    error!(%date, "analysis failed: {err}");
                    self.alert = Some(Alert::AnalysisFailed {
                        message: format!(
                            "Analysis failed, please check your network connection. ({err})"
                        ),
                    });
                }
            },
            AppEvent::ReplySettled { date, outcome } => match outcome {
                Ok(text) => {
                    self.store
                        .update(date, |log| log.chat_history.push(ChatMessage::model(text)));
                }
                Err(err) => {
                    error!(%date, "chat failed: {err}");
                }
            },
        }
    }
}
