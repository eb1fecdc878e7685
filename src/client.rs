use crate::encouragement::{Emotion, Encouragement, MoodReading};
use serde::Deserialize;
use std::time::Duration;

/// Response of `POST /api/mood`. `encouragement` may be a bare sentence or a
/// JSON-encoded `{sentence, source}` string; ingestion decides once.
#[derive(Clone, Debug, Deserialize)]
pub struct MoodResponse {
    pub emotion: String,
    pub encouragement: String,
    #[serde(default)]
    pub source: String,
}

impl MoodResponse {
    pub fn into_reading(self) -> MoodReading {
        MoodReading {
            emotion: Emotion::from_label(&self.emotion),
            encouragement: Encouragement::ingest(&self.encouragement, &self.source),
        }
    }
}

/// One row of `GET /api/contents_by_emotion/<emotion>`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Quote {
    pub sentence: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

impl Quote {
    /// Attribution the way the backend formats it: "title, author".
    pub fn source(&self) -> String {
        if self.title.is_empty() {
            String::new()
        } else {
            format!("{}, {}", self.title, self.author)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("문장을 입력해주세요!")]
    EmptyInput,
    #[error("{0}")]
    Backend(String),
    #[error("unexpected backend status {0}")]
    Status(u16),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Seam between the UI and the emotion/quotation services. The production
/// implementation talks HTTP; the canned one keeps the app usable offline
/// and the tests network-free.
pub trait MoodBackend {
    /// Classify free text and return a consoling quotation for it.
    fn analyze(&self, text: &str) -> Result<MoodResponse, ClientError>;

    /// All quotations stored for one emotion, in backend order.
    fn quotes_by_emotion(&self, emotion: Emotion) -> Result<Vec<Quote>, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn fail_from(response: reqwest::blocking::Response) -> ClientError {
        let status = response.status().as_u16();
        match response.json::<ErrorBody>() {
            Ok(body) => ClientError::Backend(body.error),
            Err(_) => ClientError::Status(status),
        }
    }
}

impl MoodBackend for HttpBackend {
    fn analyze(&self, text: &str) -> Result<MoodResponse, ClientError> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyInput);
        }

        let response = self
            .client
            .post(format!("{}/api/mood", self.base_url))
            .json(&serde_json::json!({ "text": text }))
            .send()?;

        if !response.status().is_success() {
            return Err(Self::fail_from(response));
        }
        Ok(response.json::<MoodResponse>()?)
    }

    fn quotes_by_emotion(&self, emotion: Emotion) -> Result<Vec<Quote>, ClientError> {
        let response = self
            .client
            .get(format!(
                "{}/api/contents_by_emotion/{}",
                self.base_url,
                emotion.label()
            ))
            .send()?;

        if !response.status().is_success() {
            return Err(Self::fail_from(response));
        }
        Ok(response.json::<Vec<Quote>>()?)
    }
}

/// Built-in quotations, one shelf per emotion. (sentence, title, author)
const CANNED: &[(Emotion, &[(&str, &str, &str)])] = &[
    (
        Emotion::Joy,
        &[
            ("기쁨은 나눌수록 커진다.", "탈무드", "유대 경전"),
            ("오늘의 웃음이 내일의 힘이 된다.", "격언집", "미상"),
            ("행복은 습관이다. 그것을 몸에 지니라.", "허버드 어록", "엘버트 허버드"),
        ],
    ),
    (
        Emotion::Sadness,
        &[
            ("바람이 분다, 살아야겠다.", "해변의 묘지", "폴 발레리"),
            ("이 또한 지나가리라.", "전해지는 이야기", "미상"),
            ("눈물은 마음이 하는 말이다.", "격언집", "미상"),
        ],
    ),
    (
        Emotion::Anger,
        &[
            ("분노는 바람과 같아서 지나가면 고요해진다.", "격언집", "미상"),
            ("화가 날 때는 열을 세고, 아주 화가 날 때는 백을 세라.", "어록", "토머스 제퍼슨"),
        ],
    ),
    (
        Emotion::Surprise,
        &[
            ("놀라움은 지혜의 시작이다.", "대화편", "소크라테스"),
            ("예상 밖의 일이 삶을 풍요롭게 한다.", "격언집", "미상"),
        ],
    ),
    (
        Emotion::Disgust,
        &[
            ("마음을 비우면 세상이 달리 보인다.", "격언집", "미상"),
            ("싫은 것에서 배우는 것이 가장 크다.", "어록", "미상"),
        ],
    ),
    (
        Emotion::Fear,
        &[
            ("두려움은 맞서는 순간 절반이 된다.", "격언집", "미상"),
            ("용기란 두려움이 없는 것이 아니라 두려움을 이기는 것이다.", "어록", "넬슨 만델라"),
        ],
    ),
    (
        Emotion::Unknown,
        &[
            ("오늘 하루도 정말 수고했어요.", "위로의 말", "미상"),
            ("천천히 가도 괜찮다, 멈추지만 않는다면.", "논어 풀이", "공자"),
        ],
    ),
];

/// Offline substitute for the hosted services: keyword classification plus
/// the built-in shelves above.
#[derive(Default)]
pub struct CannedBackend;

impl CannedBackend {
    fn classify(text: &str) -> Emotion {
        const KEYWORDS: &[(Emotion, &[&str])] = &[
            (Emotion::Joy, &["기쁘", "좋", "행복", "신나", "즐거"]),
            (Emotion::Sadness, &["슬프", "우울", "눈물", "외로", "피곤"]),
            (Emotion::Anger, &["화", "짜증", "분노", "억울"]),
            (Emotion::Fear, &["무서", "불안", "두려", "걱정"]),
            (Emotion::Surprise, &["놀라", "깜짝", "당황"]),
            (Emotion::Disgust, &["싫", "역겹", "지긋지긋"]),
        ];

        for (emotion, words) in KEYWORDS {
            if words.iter().any(|w| text.contains(w)) {
                return *emotion;
            }
        }
        Emotion::Unknown
    }

    fn shelf(emotion: Emotion) -> &'static [(&'static str, &'static str, &'static str)] {
        CANNED
            .iter()
            .find(|(e, _)| *e == emotion)
            .map(|(_, rows)| *rows)
            .unwrap_or_default()
    }
}

impl MoodBackend for CannedBackend {
    fn analyze(&self, text: &str) -> Result<MoodResponse, ClientError> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyInput);
        }

        use rand::seq::SliceRandom;
        let emotion = Self::classify(text);
        let shelf = Self::shelf(emotion);
        let (sentence, title, author) = shelf
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(("오늘 하루도 정말 수고했어요.", "", ""));

        Ok(MoodResponse {
            emotion: emotion.label().to_owned(),
            encouragement: sentence.to_owned(),
            source: if title.is_empty() {
                String::new()
            } else {
                format!("{title}, {author}")
            },
        })
    }

    fn quotes_by_emotion(&self, emotion: Emotion) -> Result<Vec<Quote>, ClientError> {
        Ok(Self::shelf(emotion)
            .iter()
            .map(|(sentence, title, author)| Quote {
                sentence: (*sentence).to_owned(),
                title: (*title).to_owned(),
                author: (*author).to_owned(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn canned_backend_rejects_blank_input() {
        let backend = CannedBackend;
        assert_matches!(backend.analyze("   "), Err(ClientError::EmptyInput));
        assert_matches!(backend.analyze(""), Err(ClientError::EmptyInput));
    }

    #[test]
    fn canned_backend_classifies_by_keyword() {
        assert_eq!(CannedBackend::classify("오늘은 너무 슬프다"), Emotion::Sadness);
        assert_eq!(CannedBackend::classify("정말 행복한 하루"), Emotion::Joy);
        assert_eq!(CannedBackend::classify("내일이 불안해요"), Emotion::Fear);
        assert_eq!(CannedBackend::classify("그냥 그런 날"), Emotion::Unknown);
    }

    #[test]
    fn canned_backend_always_returns_a_sentence() {
        let backend = CannedBackend;
        let response = backend.analyze("피곤한 하루였어요").unwrap();
        assert!(!response.encouragement.is_empty());
        assert_eq!(response.emotion, Emotion::Sadness.label());
    }

    #[test]
    fn canned_shelves_exist_for_every_emotion() {
        let backend = CannedBackend;
        for emotion in [
            Emotion::Joy,
            Emotion::Sadness,
            Emotion::Anger,
            Emotion::Surprise,
            Emotion::Disgust,
            Emotion::Fear,
            Emotion::Unknown,
        ] {
            let quotes = backend.quotes_by_emotion(emotion).unwrap();
            assert!(!quotes.is_empty(), "no shelf for {emotion}");
        }
    }

    #[test]
    fn quote_source_formats_like_the_backend() {
        let quote = Quote {
            sentence: "문장".into(),
            title: "책".into(),
            author: "지은이".into(),
        };
        assert_eq!(quote.source(), "책, 지은이");

        let untitled = Quote {
            sentence: "문장".into(),
            title: String::new(),
            author: "지은이".into(),
        };
        assert_eq!(untitled.source(), "");
    }

    #[test]
    fn mood_response_ingests_into_reading() {
        let response = MoodResponse {
            emotion: "슬픔".into(),
            encouragement: r#"{"sentence": "이 또한 지나가리라.", "source": "미상"}"#.into(),
            source: String::new(),
        };
        let reading = response.into_reading();
        assert_eq!(reading.emotion, Emotion::Sadness);
        assert_eq!(reading.encouragement.sentence(), "이 또한 지나가리라.");
        assert_eq!(reading.encouragement.source(), Some("미상"));
    }

    #[test]
    fn wire_types_tolerate_missing_fields() {
        let quote: Quote = serde_json::from_str(r#"{"sentence": "s"}"#).unwrap();
        assert_eq!(quote.title, "");
        let response: MoodResponse =
            serde_json::from_str(r#"{"emotion": "기쁨", "encouragement": "e"}"#).unwrap();
        assert_eq!(response.source, "");
    }
}
