#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum MessageType {
    Normal,
    Info,
    Warning,
    Error,
}
