//! Outline store: the owned, single-writer state container
//!
//! Holds the current forest and applies commands to it synchronously. A
//! rejected operation returns the reason and leaves the forest untouched;
//! callers that only care about the resulting state may ignore it.

use tracing::{debug, instrument};

use crate::domain::command;
use crate::domain::{
    Applied, Command, DomainResult, Forest, IdGenerator, Question, QuestionId, Subtopic,
    SubtopicId, Topic, TopicId, UuidIds,
};

pub struct OutlineStore {
    forest: Forest,
    ids: Box<dyn IdGenerator>,
}

impl Default for OutlineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutlineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineStore")
            .field("forest", &self.forest)
            .finish_non_exhaustive()
    }
}

impl OutlineStore {
    /// Empty store generating uuid ids.
    pub fn new() -> Self {
        Self::with_ids(Box::new(UuidIds))
    }

    pub fn with_ids(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            forest: Forest::new(),
            ids,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn snapshot(&self) -> Forest {
        self.forest.clone()
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }

    pub fn len(&self) -> usize {
        self.forest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.forest.question_count()
    }

    pub fn topic(&self, topic: &TopicId) -> Option<&Topic> {
        self.forest.topic(topic)
    }

    pub fn subtopic(&self, topic: &TopicId, subtopic: &SubtopicId) -> Option<&Subtopic> {
        self.topic(topic)?.subtopic(subtopic)
    }

    pub fn question(
        &self,
        topic: &TopicId,
        subtopic: &SubtopicId,
        question: &QuestionId,
    ) -> Option<&Question> {
        self.subtopic(topic, subtopic)?.question(question)
    }

    pub fn position_of_topic(&self, topic: &TopicId) -> Option<usize> {
        self.forest.position_of_topic(topic)
    }

    /// Apply one command. On `Err` the forest is exactly as before the call.
    #[instrument(level = "debug", skip(self, command), fields(op = command.name()))]
    pub fn apply(&mut self, command: Command) -> DomainResult<Applied> {
        let result = command.apply(&mut self.forest, self.ids.as_mut());
        log_outcome(&result);
        result
    }

    #[instrument(level = "debug", skip(self, title))]
    pub fn add_topic(&mut self, title: impl Into<String>) -> TopicId {
        let id = command::add_topic(&mut self.forest, self.ids.as_mut(), title.into());
        debug!(%id, "topic added");
        id
    }

    pub fn delete_topic(&mut self, topic: &TopicId) -> DomainResult<()> {
        self.apply(Command::DeleteTopic {
            topic: topic.clone(),
        })
        .map(drop)
    }

    #[instrument(level = "debug", skip(self, title))]
    pub fn add_subtopic(
        &mut self,
        topic: &TopicId,
        title: impl Into<String>,
    ) -> DomainResult<SubtopicId> {
        let result = command::add_subtopic(&mut self.forest, self.ids.as_mut(), topic, title.into());
        log_outcome(&result);
        result
    }

    pub fn delete_subtopic(&mut self, topic: &TopicId, subtopic: &SubtopicId) -> DomainResult<()> {
        self.apply(Command::DeleteSubtopic {
            topic: topic.clone(),
            subtopic: subtopic.clone(),
        })
        .map(drop)
    }

    #[instrument(level = "debug", skip(self, title))]
    pub fn add_question(
        &mut self,
        topic: &TopicId,
        subtopic: &SubtopicId,
        title: impl Into<String>,
    ) -> DomainResult<QuestionId> {
        let result = command::add_question(
            &mut self.forest,
            self.ids.as_mut(),
            topic,
            subtopic,
            title.into(),
        );
        log_outcome(&result);
        result
    }

    pub fn delete_question(
        &mut self,
        topic: &TopicId,
        subtopic: &SubtopicId,
        question: &QuestionId,
    ) -> DomainResult<()> {
        self.apply(Command::DeleteQuestion {
            topic: topic.clone(),
            subtopic: subtopic.clone(),
            question: question.clone(),
        })
        .map(drop)
    }

    pub fn edit_topic(&mut self, topic: &TopicId, title: impl Into<String>) -> DomainResult<()> {
        self.apply(Command::EditTopic {
            topic: topic.clone(),
            title: title.into(),
        })
        .map(drop)
    }

    pub fn edit_subtopic(
        &mut self,
        topic: &TopicId,
        subtopic: &SubtopicId,
        title: impl Into<String>,
    ) -> DomainResult<()> {
        self.apply(Command::EditSubtopic {
            topic: topic.clone(),
            subtopic: subtopic.clone(),
            title: title.into(),
        })
        .map(drop)
    }

    pub fn edit_question(
        &mut self,
        topic: &TopicId,
        subtopic: &SubtopicId,
        question: &QuestionId,
        title: impl Into<String>,
    ) -> DomainResult<()> {
        self.apply(Command::EditQuestion {
            topic: topic.clone(),
            subtopic: subtopic.clone(),
            question: question.clone(),
            title: title.into(),
        })
        .map(drop)
    }

    /// Replace the top-level order. `order` must hold exactly the current topic ids.
    pub fn reorder_topics(&mut self, order: Vec<TopicId>) -> DomainResult<()> {
        self.apply(Command::ReorderTopics { order }).map(drop)
    }

    /// Replace one topic's subtopic order. `order` must hold exactly its current subtopic ids.
    pub fn reorder_subtopics(&mut self, topic: &TopicId, order: Vec<SubtopicId>) -> DomainResult<()> {
        self.apply(Command::ReorderSubtopics {
            topic: topic.clone(),
            order,
        })
        .map(drop)
    }

    pub fn move_topic(&mut self, from: usize, to: usize) -> DomainResult<()> {
        self.apply(Command::MoveTopic { from, to }).map(drop)
    }

    pub fn move_subtopic(&mut self, topic: &TopicId, from: usize, to: usize) -> DomainResult<()> {
        self.apply(Command::MoveSubtopic {
            topic: topic.clone(),
            from,
            to,
        })
        .map(drop)
    }

    /// Replace the whole forest. Rejected if ids repeat within a kind.
    pub fn load_forest(&mut self, forest: Forest) -> DomainResult<()> {
        self.apply(Command::LoadForest { forest }).map(drop)
    }
}

fn log_outcome<T: std::fmt::Debug>(result: &DomainResult<T>) {
    match result {
        Ok(applied) => debug!(?applied, "applied"),
        Err(e) => debug!(error = %e, "rejected, forest unchanged"),
    }
}
