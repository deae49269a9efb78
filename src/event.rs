use crate::collaborator::CollaboratorError;
use chrono::NaiveDate;

/// Outcomes of AI calls, delivered back to the UI thread. Each carries the
/// date that was current when the call started.
#[derive(Debug)]
pub enum AppEvent {
    AnalysisSettled {
        date: NaiveDate,
        outcome: Result<String, CollaboratorError>,
    },
    ReplySettled {
        date: NaiveDate,
        outcome: Result<String, CollaboratorError>,
    },
}
