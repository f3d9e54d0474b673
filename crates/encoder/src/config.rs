use crate::memory_model::MemoryModelKind;

/// Logic written by `(set-logic ...)` unless configured otherwise.
pub const DEFAULT_LOGIC: &str = "ALL";

/// Encoder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Which memory model to encode.
    pub model: MemoryModelKind,
    /// Fold constant structure and drop trivially true constraints.
    pub simplify: bool,
    /// Precede each assertion with a `;; <label> @ event <id>` comment.
    pub annotate: bool,
    /// SMT-LIB logic for rendered scripts.
    pub logic: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model: MemoryModelKind::default(),
            simplify: true,
            annotate: false,
            logic: DEFAULT_LOGIC.to_string(),
        }
    }
}

impl EncoderConfig {
    pub fn new(model: MemoryModelKind) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    pub fn with_simplify(mut self, simplify: bool) -> Self {
        self.simplify = simplify;
        self
    }

    pub fn with_annotations(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn with_logic(mut self, logic: impl Into<String>) -> Self {
        self.logic = logic.into();
        self
    }
}
