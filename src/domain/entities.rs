//! Domain entities: the three-level outline

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a topic. Opaque: generated ids are uuids, loaded ids are
    /// whatever the seed carried (e.g. the topic name).
    TopicId
);
opaque_id!(
    /// Identifier of a subtopic.
    SubtopicId
);
opaque_id!(
    /// Identifier of a question.
    QuestionId
);

/// Leaf of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
}

/// Second level: owns an ordered list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub id: SubtopicId,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Top level: owns an ordered list of subtopics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
}

impl Question {
    pub fn new(id: QuestionId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl Subtopic {
    /// Fresh subtopic with no questions.
    pub fn new(id: SubtopicId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            questions: Vec::new(),
        }
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub(crate) fn question_mut(&mut self, id: &QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| &q.id == id)
    }
}

impl Topic {
    /// Fresh topic with no subtopics.
    pub fn new(id: TopicId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            subtopics: Vec::new(),
        }
    }

    pub fn subtopic(&self, id: &SubtopicId) -> Option<&Subtopic> {
        self.subtopics.iter().find(|s| &s.id == id)
    }

    pub(crate) fn subtopic_mut(&mut self, id: &SubtopicId) -> Option<&mut Subtopic> {
        self.subtopics.iter_mut().find(|s| &s.id == id)
    }

    pub fn subtopic_ids(&self) -> Vec<SubtopicId> {
        self.subtopics.iter().map(|s| s.id.clone()).collect()
    }

    /// Number of questions across all subtopics.
    pub fn question_count(&self) -> usize {
        self.subtopics.iter().map(|s| s.questions.len()).sum()
    }
}

/// The whole outline: an ordered sequence of topics.
///
/// Containment is strict: every subtopic lives inside exactly one topic and
/// every question inside exactly one subtopic, so dropping a node drops its
/// subtree with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub topics: Vec<Topic>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_topics(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn topic(&self, id: &TopicId) -> Option<&Topic> {
        self.topics.iter().find(|t| &t.id == id)
    }

    pub(crate) fn topic_mut(&mut self, id: &TopicId) -> Option<&mut Topic> {
        self.topics.iter_mut().find(|t| &t.id == id)
    }

    pub fn position_of_topic(&self, id: &TopicId) -> Option<usize> {
        self.topics.iter().position(|t| &t.id == id)
    }

    pub fn topic_ids(&self) -> Vec<TopicId> {
        self.topics.iter().map(|t| t.id.clone()).collect()
    }

    pub fn subtopic_count(&self) -> usize {
        self.topics.iter().map(|t| t.subtopics.len()).sum()
    }

    pub fn question_count(&self) -> usize {
        self.topics.iter().map(Topic::question_count).sum()
    }

    /// Whether any topic holds a subtopic with this id.
    pub fn contains_subtopic(&self, id: &SubtopicId) -> bool {
        self.topics.iter().any(|t| t.subtopic(id).is_some())
    }

    /// Whether any subtopic holds a question with this id.
    pub fn contains_question(&self, id: &QuestionId) -> bool {
        self.topics
            .iter()
            .flat_map(|t| &t.subtopics)
            .any(|s| s.question(id).is_some())
    }

    /// Check that ids are unique within each kind.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut topics = HashSet::new();
        let mut subtopics = HashSet::new();
        let mut questions = HashSet::new();

        for topic in &self.topics {
            if !topics.insert(topic.id.as_str()) {
                return Err(DomainError::DuplicateId {
                    kind: "topic",
                    id: topic.id.to_string(),
                });
            }
            for sub in &topic.subtopics {
                if !subtopics.insert(sub.id.as_str()) {
                    return Err(DomainError::DuplicateId {
                        kind: "subtopic",
                        id: sub.id.to_string(),
                    });
                }
                for q in &sub.questions {
                    if !questions.insert(q.id.as_str()) {
                        return Err(DomainError::DuplicateId {
                            kind: "question",
                            id: q.id.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Forest {
        let mut arrays = Topic::new("t1".into(), "Arrays");
        let mut easy = Subtopic::new("s1".into(), "Easy");
        easy.questions.push(Question::new("q1".into(), "Two Sum"));
        easy.questions.push(Question::new("q2".into(), "Best Time"));
        arrays.subtopics.push(easy);
        arrays.subtopics.push(Subtopic::new("s2".into(), "Hard"));
        Forest::from_topics(vec![arrays, Topic::new("t2".into(), "Graphs")])
    }

    #[test]
    fn given_sample_forest_when_counting_then_sums_all_levels() {
        let forest = sample();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.subtopic_count(), 2);
        assert_eq!(forest.question_count(), 2);
    }

    #[test]
    fn given_unique_ids_when_validating_then_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn given_duplicate_question_id_across_subtopics_when_validating_then_rejects() {
        let mut forest = sample();
        forest.topics[0].subtopics[1]
            .questions
            .push(Question::new("q1".into(), "Copy"));

        let err = forest.validate().unwrap_err();
        assert!(matches!(err, DomainError::DuplicateId { kind: "question", .. }));
    }

    #[test]
    fn given_same_string_in_different_kinds_when_validating_then_ok() {
        let mut topic = Topic::new("Arrays".into(), "Arrays");
        topic.subtopics.push(Subtopic::new("Arrays".into(), "Questions"));
        assert!(Forest::from_topics(vec![topic]).validate().is_ok());
    }

    #[test]
    fn given_forest_when_serialized_then_uses_plain_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[0]["id"], "t1");
        assert_eq!(json[0]["subtopics"][0]["questions"][0]["title"], "Two Sum");
    }
}
