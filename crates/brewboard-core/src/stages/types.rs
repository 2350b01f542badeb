use serde::Serialize;

/// One step of the voice pipeline as shown by the processing indicator.
///
/// The indicator cycles through these on a timer; it does not track the
/// real speech-to-text / model / text-to-speech progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Listening,
    Transcribing,
    Thinking,
    Responding,
    Appending,
}

impl PipelineStage {
    /// Display order. The indicator wraps from the last back to the first.
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Listening,
        PipelineStage::Transcribing,
        PipelineStage::Thinking,
        PipelineStage::Responding,
        PipelineStage::Appending,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn icon(self) -> &'static str {
        match self {
            PipelineStage::Listening => "🎤",
            PipelineStage::Transcribing => "📝",
            PipelineStage::Thinking => "🧠",
            PipelineStage::Responding => "🗣️",
            PipelineStage::Appending => "💬",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Listening => "Listening to your voice...",
            PipelineStage::Transcribing => "Converting speech to text...",
            PipelineStage::Thinking => "Thinking...",
            PipelineStage::Responding => "Generating response...",
            PipelineStage::Appending => "Adding to chat...",
        }
    }

    /// Accent color name for renderers.
    pub fn color(self) -> &'static str {
        match self {
            PipelineStage::Listening => "blue",
            PipelineStage::Transcribing => "green",
            PipelineStage::Thinking => "purple",
            PipelineStage::Responding => "orange",
            PipelineStage::Appending => "amber",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}
