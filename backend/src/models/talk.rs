//! # Talk Wire Models
//!
//! The JSON shapes exchanged with clients for talks and their speakers.
//! These are separate from the records in [`crate::db`]: a
//! client only ever refers to a speaker by id, and a PUT body may omit any
//! field it does not want to change.
//!
//! ## Example JSON
//!
//! ```json
//! {
//!     "talkId": 1,
//!     "title": "Entity Framework From Scratch",
//!     "abstract": "Entity Framework from scratch in an hour. Probably cover it all",
//!     "level": 100,
//!     "speaker": {
//!         "speakerId": 1,
//!         "firstName": "Shawn",
//!         "lastName": "Wildermuth"
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// A talk as seen by API clients.
///
/// On input every field is optional. `talkId` is ignored on input; the id
/// always comes from the URL or from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkModel {
    #[serde(default)]
    pub talk_id: i32,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,

    #[serde(default)]
    pub level: Option<i32>,

    /// On input, a reference by `speakerId`; on output, the full speaker
    /// when it was loaded.
    #[serde(default)]
    pub speaker: Option<SpeakerModel>,
}

/// A speaker as seen by API clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerModel {
    pub speaker_id: i32,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub middle_name: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub company_url: Option<String>,

    #[serde(default)]
    pub blog_url: Option<String>,

    #[serde(default)]
    pub twitter: Option<String>,

    #[serde(default)]
    pub github: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_body_deserializes() {
        let model: TalkModel = serde_json::from_value(json!({ "level": 300 })).unwrap();
        assert_eq!(model.level, Some(300));
        assert!(model.title.is_none());
        assert!(model.abstract_text.is_none());
        assert!(model.speaker.is_none());
    }

    #[test]
    fn test_speaker_reference_by_id_only() {
        let model: TalkModel = serde_json::from_value(json!({
            "title": "Rust for C# Developers",
            "abstract": "Ownership explained with familiar examples.",
            "speaker": { "speakerId": 2 }
        }))
        .unwrap();

        let speaker = model.speaker.unwrap();
        assert_eq!(speaker.speaker_id, 2);
        assert!(speaker.first_name.is_none());
    }

    #[test]
    fn test_serializes_camel_case_with_abstract_key() {
        let model = TalkModel {
            talk_id: 7,
            title: Some("Title".to_string()),
            abstract_text: Some("Body".to_string()),
            level: Some(200),
            speaker: None,
        };

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["talkId"], 7);
        assert_eq!(value["abstract"], "Body");
        assert!(value.get("abstractText").is_none());
    }
}
