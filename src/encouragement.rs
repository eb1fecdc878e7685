use log::warn;
use serde::Deserialize;

/// Emotion labels the classification backend emits. Labels arrive as Korean
/// strings on the wire; anything unrecognized maps to `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Surprise,
    Disgust,
    Fear,
    Unknown,
}

impl Emotion {
    pub fn from_label(label: &str) -> Self {
        match label {
            "기쁨" => Emotion::Joy,
            "슬픔" => Emotion::Sadness,
            "분노" => Emotion::Anger,
            "놀람" => Emotion::Surprise,
            "혐오" => Emotion::Disgust,
            "두려움" => Emotion::Fear,
            _ => Emotion::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Joy => "기쁨",
            Emotion::Sadness => "슬픔",
            Emotion::Anger => "분노",
            Emotion::Surprise => "놀람",
            Emotion::Disgust => "혐오",
            Emotion::Fear => "두려움",
            Emotion::Unknown => "알 수 없음",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Emotion::Joy => "😊",
            Emotion::Sadness => "😔",
            Emotion::Anger => "😡",
            Emotion::Surprise => "😮",
            Emotion::Disgust => "🤢",
            Emotion::Fear => "😨",
            Emotion::Unknown => "❓",
        }
    }
}

/// The backend's `encouragement` field is either a bare sentence or a
/// JSON-encoded `{sentence, source}` object. The shape is decided once here,
/// at ingestion, and never re-sniffed downstream.
#[derive(Clone, Debug, PartialEq)]
pub enum Encouragement {
    Plain(String),
    Structured { sentence: String, source: String },
}

#[derive(Deserialize)]
struct EmbeddedQuote {
    sentence: Option<String>,
    source: Option<String>,
}

impl Encouragement {
    /// Ingest the raw field. A payload that looks like embedded JSON but
    /// fails to parse is logged and kept verbatim as `Plain`; the raw text is
    /// always a safe display value.
    pub fn ingest(raw: &str, fallback_source: &str) -> Self {
        if raw.starts_with('{') {
            match serde_json::from_str::<EmbeddedQuote>(raw) {
                Ok(parsed) => {
                    return Encouragement::Structured {
                        sentence: parsed.sentence.unwrap_or_else(|| raw.to_owned()),
                        source: parsed.source.unwrap_or_else(|| fallback_source.to_owned()),
                    };
                }
                Err(e) => {
                    warn!("encouragement payload looked structured but did not parse: {e}");
                }
            }
        }

        if fallback_source.is_empty() {
            Encouragement::Plain(raw.to_owned())
        } else {
            Encouragement::Structured {
                sentence: raw.to_owned(),
                source: fallback_source.to_owned(),
            }
        }
    }

    /// The sentence the user transcribes.
    pub fn sentence(&self) -> &str {
        match self {
            Encouragement::Plain(s) => s,
            Encouragement::Structured { sentence, .. } => sentence,
        }
    }

    /// Attribution line, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            Encouragement::Plain(_) => None,
            Encouragement::Structured { source, .. } => {
                if source.is_empty() {
                    None
                } else {
                    Some(source)
                }
            }
        }
    }
}

/// One classified mood submission: the detected emotion and the quotation to
/// transcribe.
#[derive(Clone, Debug)]
pub struct MoodReading {
    pub emotion: Emotion,
    pub encouragement: Encouragement,
}
