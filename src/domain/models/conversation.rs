#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use super::Speaker;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: &str) -> Turn {
        return Turn {
            speaker,
            text: text.to_string(),
        };
    }
}

/// Ordered log of turns for the running session. Insertion order is the order
/// the turns are replayed to the model on every request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn push(&mut self, speaker: Speaker, text: &str) {
        self.turns.push(Turn::new(speaker, text));
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        return &self.turns;
    }

    pub fn len(&self) -> usize {
        return self.turns.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.turns.is_empty();
    }

    pub fn to_prompt(&self) -> String {
        return self
            .turns
            .iter()
            .map(|turn| {
                return format!("{}: {}", turn.speaker, turn.text);
            })
            .collect::<Vec<String>>()
            .join("\n");
    }
}
