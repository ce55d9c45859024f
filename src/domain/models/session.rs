use super::ConversationHistory;
use super::ModelDescriptor;

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Unknown,
}

impl From<bool> for ConnectionStatus {
    fn from(alive: bool) -> Self {
        if alive {
            return ConnectionStatus::Connected;
        }

        return ConnectionStatus::Disconnected;
    }
}

pub struct SessionState {
    pub current_model: Option<ModelDescriptor>,
    pub history: ConversationHistory,
    pub connection_status: ConnectionStatus,
}

impl Default for SessionState {
    fn default() -> SessionState {
        return SessionState {
            current_model: None,
            history: ConversationHistory::default(),
            connection_status: ConnectionStatus::Unknown,
        };
    }
}
