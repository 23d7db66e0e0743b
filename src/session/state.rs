use serde::Serialize;
use std::fmt;

/// Where a simulation session currently stands.
///
/// `Idle -> Uploading -> Connecting -> Connected` is driven by the controller itself.
/// Everything after `Connected` is reconciled from status events sent by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SessionState {
    #[default]
    Idle,
    Uploading,
    Connecting,
    Connected,
    Running,
    Paused,
    Replaying,
    Ended,
}

impl SessionState {
    /// The state the engine reports through `action`, if the action is recognized.
    pub fn on_status(self, action: &StatusAction) -> SessionState {
        action.target_state().unwrap_or(self)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An action announced on the status topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusAction {
    Start,
    Replay,
    Pause,
    Resume,
    Terminate,
    End,
    /// Anything else. Forwarded to the message sink verbatim.
    Other(String),
}

impl StatusAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "start" => StatusAction::Start,
            "replay" => StatusAction::Replay,
            "pause" => StatusAction::Pause,
            "resume" => StatusAction::Resume,
            "terminate" => StatusAction::Terminate,
            "end" => StatusAction::End,
            other => StatusAction::Other(other.to_string()),
        }
    }

    pub fn target_state(&self) -> Option<SessionState> {
        match self {
            StatusAction::Start | StatusAction::Resume => Some(SessionState::Running),
            StatusAction::Replay => Some(SessionState::Replaying),
            StatusAction::Pause => Some(SessionState::Paused),
            StatusAction::Terminate | StatusAction::End => Some(SessionState::Ended),
            StatusAction::Other(_) => None,
        }
    }

    /// The user-visible message for this action.
    pub fn message(&self) -> &str {
        match self {
            StatusAction::Start => "Simulation started",
            StatusAction::Replay => "Replaying simulation",
            StatusAction::Pause => "Simulation paused",
            StatusAction::Resume => "Simulation resumed",
            StatusAction::Terminate | StatusAction::End => "Simulation ended",
            StatusAction::Other(raw) => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_actions_move_state() {
        let state = SessionState::Connected;
        let state = state.on_status(&StatusAction::parse("start"));
        assert_eq!(state, SessionState::Running);
        let state = state.on_status(&StatusAction::parse("pause"));
        assert_eq!(state, SessionState::Paused);
        let state = state.on_status(&StatusAction::parse("resume"));
        assert_eq!(state, SessionState::Running);
        let state = state.on_status(&StatusAction::parse("replay"));
        assert_eq!(state, SessionState::Replaying);
        assert_eq!(
            state.on_status(&StatusAction::parse("terminate")),
            SessionState::Ended
        );
        assert_eq!(state.on_status(&StatusAction::parse("end")), SessionState::Ended);
    }

    #[test]
    fn unknown_action_keeps_state_and_echoes() {
        let action = StatusAction::parse("unknown-thing");
        assert_eq!(SessionState::Paused.on_status(&action), SessionState::Paused);
        assert_eq!(action.message(), "unknown-thing");
    }
}
