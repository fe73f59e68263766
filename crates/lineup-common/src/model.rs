use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters of an underlying error kept in an outcome.
pub const MAX_REASON_CHARS: usize = 50;

/// One track to add to the playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackRequest {
    pub artist_name: String,
    pub track_title: String,
}

impl TrackRequest {
    pub fn new(artist_name: impl Into<String>, track_title: impl Into<String>) -> Self {
        Self {
            artist_name: artist_name.into(),
            track_title: track_title.into(),
        }
    }

    /// `"<artist> - <title>"`, the form used in reports.
    pub fn label(&self) -> String {
        format!("{} - {}", self.artist_name, self.track_title)
    }
}

/// Destination playlist, identified by its display name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTarget {
    pub name: String,
}

impl PlaylistTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The steps of one add-to-playlist action, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Navigate,
    ResolveResult,
    OpenContextMenu,
    AddToPlaylist,
    SelectPlaylist,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Navigate => "navigate",
            Step::ResolveResult => "resolve result",
            Step::OpenContextMenu => "open context menu",
            Step::AddToPlaylist => "add to playlist",
            Step::SelectPlaylist => "select playlist",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OutcomeKind {
    Added,
    /// No search result could be resolved. Expected for catalog misses.
    NotFound,
    Timeout {
        step: Step,
    },
    InteractionFailed {
        step: Step,
        reason: String,
    },
}

/// Terminal classification of one executor invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The request exactly as received, original title included.
    pub request: TrackRequest,
    /// Title with featured-artist style annotations removed.
    pub cleaned_title: String,
    pub kind: OutcomeKind,
}

impl ActionOutcome {
    pub fn added(request: TrackRequest, cleaned_title: String) -> Self {
        Self {
            request,
            cleaned_title,
            kind: OutcomeKind::Added,
        }
    }

    pub fn not_found(request: TrackRequest, cleaned_title: String) -> Self {
        Self {
            request,
            cleaned_title,
            kind: OutcomeKind::NotFound,
        }
    }

    pub fn timeout(request: TrackRequest, cleaned_title: String, step: Step) -> Self {
        Self {
            request,
            cleaned_title,
            kind: OutcomeKind::Timeout { step },
        }
    }

    pub fn interaction_failed(
        request: TrackRequest,
        cleaned_title: String,
        step: Step,
        reason: impl AsRef<str>,
    ) -> Self {
        Self {
            request,
            cleaned_title,
            kind: OutcomeKind::InteractionFailed {
                step,
                reason: truncate_reason(reason.as_ref()),
            },
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self.kind, OutcomeKind::Added)
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let artist = &self.request.artist_name;
        match &self.kind {
            OutcomeKind::Added => write!(f, "Added: {} - {}", artist, self.cleaned_title),
            OutcomeKind::NotFound => {
                write!(f, "No results found for: {}", self.request.label())
            }
            OutcomeKind::Timeout { step } => {
                write!(f, "Timeout ({}): {}", step, self.request.label())
            }
            OutcomeKind::InteractionFailed { step, reason } => write!(
                f,
                "Failed ({}): {} ({})",
                step,
                self.request.label(),
                reason
            ),
        }
    }
}

/// Cut an error message down to [`MAX_REASON_CHARS`] characters.
pub fn truncate_reason(reason: &str) -> String {
    reason.chars().take(MAX_REASON_CHARS).collect()
}

/// Aggregate of one batch run. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success_count: usize,
    pub failure_count: usize,
    /// Failed requests in the order they were processed.
    pub failures: Vec<TrackRequest>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of the next processed item.
    pub fn record(&mut self, outcome: &ActionOutcome) {
        if outcome.is_added() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
            self.failures.push(outcome.request.clone());
        }
    }

    pub fn processed(&self) -> usize {
        self.success_count + self.failure_count
    }
}

/// One record of the playlist data file.
///
/// Only `artist_name` and `track_name` are required; files written by older tools
/// may carry nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub artist_name: String,
    #[serde(default)]
    pub artist_id: u64,
    pub track_name: String,
    #[serde(default)]
    pub track_id: u64,
    #[serde(default = "default_album")]
    pub album: String,
    /// Seconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub tier: u8,
}

fn default_album() -> String {
    "Unknown".to_string()
}

impl PlaylistEntry {
    pub fn to_request(&self) -> TrackRequest {
        TrackRequest::new(&self.artist_name, &self.track_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str) -> TrackRequest {
        TrackRequest::new("X", title)
    }

    #[test]
    fn test_record_counts_and_order() {
        let mut result = BatchResult::new();
        result.record(&ActionOutcome::added(request("a"), "a".into()));
        result.record(&ActionOutcome::not_found(request("b"), "b".into()));
        result.record(&ActionOutcome::timeout(
            request("c"),
            "c".into(),
            Step::AddToPlaylist,
        ));

        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 2);
        assert_eq!(result.processed(), 3);
        assert_eq!(result.failures, vec![request("b"), request("c")]);
    }

    #[test]
    fn test_reason_is_truncated_on_char_boundary() {
        let long = "é".repeat(80);
        let outcome =
            ActionOutcome::interaction_failed(request("t"), "t".into(), Step::SelectPlaylist, &long);
        match outcome.kind {
            OutcomeKind::InteractionFailed { reason, .. } => {
                assert_eq!(reason.chars().count(), MAX_REASON_CHARS)
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(
            TrackRequest::new("Don Toliver", "After Party").label(),
            "Don Toliver - After Party"
        );
    }

    #[test]
    fn test_entry_minimal_record() {
        let entry: PlaylistEntry =
            serde_json::from_str(r#"{"artist_name":"Che","track_name":"Miss Me"}"#).unwrap();
        assert_eq!(entry.album, "Unknown");
        assert_eq!(entry.tier, 0);
        assert_eq!(entry.to_request(), TrackRequest::new("Che", "Miss Me"));
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ActionOutcome::added(request("Song (feat. Y)"), "Song".into());
        assert_eq!(outcome.to_string(), "Added: X - Song");
    }
}
