use super::MessageType;

/// A unit of response text produced while consuming a generation request.
/// `done` marks protocol completion, nothing is read past it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamChunk {
    pub text: String,
    pub done: bool,
    pub mtype: MessageType,
}

impl StreamChunk {
    pub fn new(text: &str, done: bool) -> StreamChunk {
        return StreamChunk {
            text: text.to_string(),
            done,
            mtype: MessageType::Normal,
        };
    }

    /// Terminal chunk carrying an error marker instead of model text.
    pub fn error(text: &str) -> StreamChunk {
        return StreamChunk {
            text: text.to_string(),
            done: true,
            mtype: MessageType::Error,
        };
    }

    /// Non-terminal chunk surfacing a problem with a single record.
    pub fn warning(text: &str) -> StreamChunk {
        return StreamChunk {
            text: text.to_string(),
            done: false,
            mtype: MessageType::Warning,
        };
    }

    pub fn is_model_text(&self) -> bool {
        return self.mtype == MessageType::Normal;
    }
}
