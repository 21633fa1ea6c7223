//! # Mapper
//!
//! Field-by-field conversions between the wire models in
//! [`crate::models`] and the records in [`crate::db`].
//!
//! | Direction | Function |
//! |-----------|----------|
//! | record -> wire | `TalkModel::from(&Talk)`, `SpeakerModel::from(&Speaker)` |
//! | wire -> new record | `Talk::try_from(&TalkModel)` |
//! | wire overlay onto record | [`merge_into`] |
//!
//! Camp and speaker are never taken from the wire model: the endpoint
//! resolves them through the repository and attaches them itself.

use thiserror::Error;

use crate::db::{Speaker, Talk};
use crate::models::{SpeakerModel, TalkModel};

/// Level given to new talks that do not specify one.
pub const DEFAULT_LEVEL: i32 = 100;

/// Errors converting a wire model into a record.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MappingError {
    /// A field required for a new record was absent.
    #[error("The {0} field is required.")]
    MissingField(&'static str),
}

impl From<&Speaker> for SpeakerModel {
    fn from(speaker: &Speaker) -> Self {
        Self {
            speaker_id: speaker.speaker_id,
            first_name: Some(speaker.first_name.clone()),
            last_name: Some(speaker.last_name.clone()),
            middle_name: speaker.middle_name.clone(),
            company: speaker.company.clone(),
            company_url: speaker.company_url.clone(),
            blog_url: speaker.blog_url.clone(),
            twitter: speaker.twitter.clone(),
            github: speaker.github.clone(),
        }
    }
}

impl From<&Talk> for TalkModel {
    fn from(talk: &Talk) -> Self {
        Self {
            talk_id: talk.talk_id,
            title: Some(talk.title.clone()),
            abstract_text: Some(talk.abstract_text.clone()),
            level: Some(talk.level),
            speaker: talk.speaker.as_ref().map(SpeakerModel::from),
        }
    }
}

impl TryFrom<&TalkModel> for Talk {
    type Error = MappingError;

    /// Build an unsaved talk. Camp and speaker are left empty.
    fn try_from(model: &TalkModel) -> Result<Self, Self::Error> {
        let title = model
            .title
            .clone()
            .ok_or(MappingError::MissingField("title"))?;
        let abstract_text = model
            .abstract_text
            .clone()
            .ok_or(MappingError::MissingField("abstract"))?;

        Ok(Talk {
            talk_id: 0,
            title,
            abstract_text,
            level: model.level.unwrap_or(DEFAULT_LEVEL),
            camp: None,
            speaker: None,
        })
    }
}

/// Overlay the fields present in `model` onto `talk`.
///
/// Absent fields leave the record untouched. The id, camp and speaker are
/// never changed here.
pub fn merge_into(model: &TalkModel, talk: &mut Talk) {
    if let Some(title) = &model.title {
        talk.title = title.clone();
    }
    if let Some(abstract_text) = &model.abstract_text {
        talk.abstract_text = abstract_text.clone();
    }
    if let Some(level) = model.level {
        talk.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_talk() -> Talk {
        Talk {
            talk_id: 12,
            title: "Writing Sample Data Made Easy".to_string(),
            abstract_text: "Thinking of good sample data examples is tiring.".to_string(),
            level: 200,
            camp: None,
            speaker: Some(Speaker {
                speaker_id: 2,
                first_name: "Resa".to_string(),
                last_name: "Wildermuth".to_string(),
                middle_name: None,
                company: Some("Wilder Minds LLC".to_string()),
                company_url: None,
                blog_url: None,
                twitter: Some("resawildermuth".to_string()),
                github: None,
            }),
        }
    }

    #[test]
    fn test_talk_to_model_expands_speaker() {
        let model = TalkModel::from(&stored_talk());

        assert_eq!(model.talk_id, 12);
        assert_eq!(model.level, Some(200));
        let speaker = model.speaker.unwrap();
        assert_eq!(speaker.speaker_id, 2);
        assert_eq!(speaker.first_name.as_deref(), Some("Resa"));
        assert_eq!(speaker.twitter.as_deref(), Some("resawildermuth"));
    }

    #[test]
    fn test_talk_without_loaded_speaker_maps_to_none() {
        let mut talk = stored_talk();
        talk.speaker = None;
        assert!(TalkModel::from(&talk).speaker.is_none());
    }

    #[test]
    fn test_new_talk_ignores_wire_id_and_speaker() {
        let model = TalkModel {
            talk_id: 99,
            title: Some("Rust on the Server".to_string()),
            abstract_text: Some("Actix, Postgres and a lot of enums.".to_string()),
            level: None,
            speaker: Some(SpeakerModel {
                speaker_id: 1,
                ..Default::default()
            }),
        };

        let talk = Talk::try_from(&model).unwrap();
        assert_eq!(talk.talk_id, 0);
        assert_eq!(talk.level, DEFAULT_LEVEL);
        assert!(talk.speaker.is_none());
        assert!(talk.camp.is_none());
    }

    #[test]
    fn test_new_talk_requires_title_and_abstract() {
        let no_title = TalkModel {
            abstract_text: Some("Body".to_string()),
            ..Default::default()
        };
        assert_eq!(Talk::try_from(&no_title), Err(MappingError::MissingField("title")));

        let no_abstract = TalkModel {
            title: Some("Title".to_string()),
            ..Default::default()
        };
        assert_eq!(Talk::try_from(&no_abstract), Err(MappingError::MissingField("abstract")));
    }

    #[test]
    fn test_merge_only_overlays_present_fields() {
        let mut talk = stored_talk();
        let patch = TalkModel {
            talk_id: 500,
            level: Some(300),
            ..Default::default()
        };

        merge_into(&patch, &mut talk);

        assert_eq!(talk.talk_id, 12);
        assert_eq!(talk.level, 300);
        assert_eq!(talk.title, "Writing Sample Data Made Easy");
        assert_eq!(talk.abstract_text, "Thinking of good sample data examples is tiring.");
        assert_eq!(talk.speaker.map(|s| s.speaker_id), Some(2));
    }
}
