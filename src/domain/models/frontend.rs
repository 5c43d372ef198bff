/// Which front-end the TUI starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Frontend {
    /// Walks through the instructions file one step at a time.
    Steps,
    /// Runs a single free-text instruction.
    Prompt,
}
