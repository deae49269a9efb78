use crate::journal::{ChatMessage, JournalSections, SectionKey};
use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;

pub use gemini::GeminiClient;

pub const ANALYSIS_FALLBACK: &str =
    "Sorry, something went wrong during the analysis. Please try again later.";
pub const REPLY_FALLBACK: &str = "The AI is unable to respond right now.";

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("no API key configured (set API_KEY or MINDFUL_GEMINI__API_KEY)")]
    MissingApiKey,
}

/// The AI side of a journal: one-shot analysis of an entry, then free chat.
///
/// Implementations hold no conversation state; `converse` always receives the
/// full prior transcript.
#[async_trait]
pub trait Collaborator: Send + Sync {
    async fn analyze(&self, sections: &JournalSections) -> Result<String, CollaboratorError>;

    async fn converse(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, CollaboratorError>;
}

pub fn system_instruction() -> &'static str {
    "You are a professional and warm counsellor and life coach.
Your task is to analyse the user's daily journal and talk with them about it.
The journal has five parts: what made me happy, what felt fulfilling, what I could do better, reflections, and gratitude.
Offer thoughtful insight, encouragement and constructive suggestions based on what they wrote.
Keep your replies empathetic, concise and inspiring.
When the user shares a journal for analysis for the first time, begin with a short and warm overall summary of the whole entry."
}

pub fn analysis_prompt(sections: &JournalSections) -> String {
    let mut prompt = String::from("Here is my journal for today:\n");
    for (index, key) in SectionKey::ALL.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {}: {}\n",
            index + 1,
            key.title(),
            sections.get(*key)
        ));
    }
    prompt.push_str("\nPlease analyse how I am doing and give me some feedback.");
    prompt
}
