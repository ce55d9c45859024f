#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum Speaker {
    User,
    Assistant,
}
