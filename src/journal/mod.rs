use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod store;

/// The five fixed prompts of a daily entry, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    Happy,
    Fulfilling,
    Improvement,
    Reflection,
    Gratitude,
}

impl SectionKey {
    pub const ALL: [SectionKey; 5] = [
        SectionKey::Happy,
        SectionKey::Fulfilling,
        SectionKey::Improvement,
        SectionKey::Reflection,
        SectionKey::Gratitude,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Happy => "What made me happy",
            Self::Fulfilling => "What felt fulfilling",
            Self::Improvement => "What I could do better",
            Self::Reflection => "Reflections",
            Self::Gratitude => "Gratitude",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Happy => "Note the small joys that made you smile today...",
            Self::Fulfilling => "Which moments made you feel you had grown?",
            Self::Improvement => "What would you do differently if today started over?",
            Self::Reflection => "Any insight or idea that suddenly came to mind?",
            Self::Gratitude => "Who would you like to thank? Maybe yourself...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct JournalSections {
    #[serde(default)]
    pub happy: String,
    #[serde(default)]
    pub fulfilling: String,
    #[serde(default)]
    pub improvement: String,
    #[serde(default)]
    pub reflection: String,
    #[serde(default)]
    pub gratitude: String,
}

impl JournalSections {
    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Happy => &self.happy,
            SectionKey::Fulfilling => &self.fulfilling,
            SectionKey::Improvement => &self.improvement,
            SectionKey::Reflection => &self.reflection,
            SectionKey::Gratitude => &self.gratitude,
        }
    }

    pub fn get_mut(&mut self, key: SectionKey) -> &mut String {
        match key {
            SectionKey::Happy => &mut self.happy,
            SectionKey::Fulfilling => &mut self.fulfilling,
            SectionKey::Improvement => &mut self.improvement,
            SectionKey::Reflection => &mut self.reflection,
            SectionKey::Gratitude => &mut self.gratitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// One entry per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub sections: JournalSections,
    #[serde(default)]
    pub is_analyzed: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

impl JournalLog {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sections: JournalSections::default(),
            is_analyzed: false,
            completed: false,
            chat_history: Vec::new(),
        }
    }

    pub fn status(&self) -> LogStatus {
        if self.is_analyzed {
            LogStatus::Analyzed
        } else if self.completed {
            LogStatus::Completed
        } else {
            LogStatus::InProgress
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Analyzed,
    Completed,
    InProgress,
}

impl LogStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Analyzed => "Analyzed",
            Self::Completed => "Completed",
            Self::InProgress => "In progress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Editing,
    Success,
    Chat,
}

/// Which view a freshly selected date opens in. Called on date selection only;
/// log mutations never re-derive the view.
pub fn derive_view(log: Option<&JournalLog>) -> ViewState {
    match log {
        Some(log) if log.is_analyzed => ViewState::Chat,
        Some(log) if log.completed => ViewState::Success,
        _ => ViewState::Editing,
    }
}
