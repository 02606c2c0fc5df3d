//! Id generation for newly created nodes

use uuid::Uuid;

use crate::domain::entities::{QuestionId, SubtopicId, TopicId};

/// Source of fresh node ids.
///
/// Implementations must never hand out the same value twice for a kind.
pub trait IdGenerator: Send {
    fn next_topic_id(&mut self) -> TopicId;
    fn next_subtopic_id(&mut self) -> SubtopicId;
    fn next_question_id(&mut self) -> QuestionId;
}

/// Random v4 uuids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_topic_id(&mut self) -> TopicId {
        TopicId::new(Uuid::new_v4().to_string())
    }

    fn next_subtopic_id(&mut self) -> SubtopicId {
        SubtopicId::new(Uuid::new_v4().to_string())
    }

    fn next_question_id(&mut self) -> QuestionId {
        QuestionId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic ids: `t-1`, `s-1`, `q-1`, ...
///
/// Counters only ever grow, so ids of deleted nodes are not handed out again.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    topics: u64,
    subtopics: u64,
    questions: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_topic_id(&mut self) -> TopicId {
        self.topics += 1;
        TopicId::new(format!("t-{}", self.topics))
    }

    fn next_subtopic_id(&mut self) -> SubtopicId {
        self.subtopics += 1;
        SubtopicId::new(format!("s-{}", self.subtopics))
    }

    fn next_question_id(&mut self) -> QuestionId {
        self.questions += 1;
        QuestionId::new(format!("q-{}", self.questions))
    }
}
