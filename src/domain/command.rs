//! # Outline commands
//!
//! The complete mutation surface of the outline, as data.
//!
//! ## Semantics
//!
//! - Every command is validated against the forest before anything is
//!   touched, so a rejected command leaves the forest exactly as it was.
//! - Adds append at the end of the target sequence with a fresh id and no
//!   children.
//! - Deletes remove the whole subtree; sibling order is preserved.
//! - Edits replace the title only. Titles are not validated here.
//! - Reorders take the complete new order as ids and must name exactly the
//!   current members.
//! - Loading replaces everything.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    Forest, Question, QuestionId, Subtopic, SubtopicId, Topic, TopicId,
};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::IdGenerator;
use crate::domain::reorder::move_within;

/// A single store operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    AddTopic {
        title: String,
    },
    DeleteTopic {
        topic: TopicId,
    },
    AddSubtopic {
        topic: TopicId,
        title: String,
    },
    DeleteSubtopic {
        topic: TopicId,
        subtopic: SubtopicId,
    },
    AddQuestion {
        topic: TopicId,
        subtopic: SubtopicId,
        title: String,
    },
    DeleteQuestion {
        topic: TopicId,
        subtopic: SubtopicId,
        question: QuestionId,
    },
    EditTopic {
        topic: TopicId,
        title: String,
    },
    EditSubtopic {
        topic: TopicId,
        subtopic: SubtopicId,
        title: String,
    },
    EditQuestion {
        topic: TopicId,
        subtopic: SubtopicId,
        question: QuestionId,
        title: String,
    },
    ReorderTopics {
        order: Vec<TopicId>,
    },
    ReorderSubtopics {
        topic: TopicId,
        order: Vec<SubtopicId>,
    },
    /// Index-based drag move of a topic.
    MoveTopic {
        from: usize,
        to: usize,
    },
    /// Index-based drag move of a subtopic within its topic.
    MoveSubtopic {
        topic: TopicId,
        from: usize,
        to: usize,
    },
    LoadForest {
        forest: Forest,
    },
}

/// What an applied command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    TopicAdded(TopicId),
    SubtopicAdded(SubtopicId),
    QuestionAdded(QuestionId),
    Changed,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddTopic { .. } => "add_topic",
            Command::DeleteTopic { .. } => "delete_topic",
            Command::AddSubtopic { .. } => "add_subtopic",
            Command::DeleteSubtopic { .. } => "delete_subtopic",
            Command::AddQuestion { .. } => "add_question",
            Command::DeleteQuestion { .. } => "delete_question",
            Command::EditTopic { .. } => "edit_topic",
            Command::EditSubtopic { .. } => "edit_subtopic",
            Command::EditQuestion { .. } => "edit_question",
            Command::ReorderTopics { .. } => "reorder_topics",
            Command::ReorderSubtopics { .. } => "reorder_subtopics",
            Command::MoveTopic { .. } => "move_topic",
            Command::MoveSubtopic { .. } => "move_subtopic",
            Command::LoadForest { .. } => "load_forest",
        }
    }

    /// Apply to `forest` in place. On `Err` the forest is unchanged.
    pub fn apply(self, forest: &mut Forest, ids: &mut dyn IdGenerator) -> DomainResult<Applied> {
        match self {
            Command::AddTopic { title } => Ok(Applied::TopicAdded(add_topic(forest, ids, title))),

            Command::DeleteTopic { topic } => {
                let idx = forest
                    .position_of_topic(&topic)
                    .ok_or_else(|| unknown_topic(&topic))?;
                forest.topics.remove(idx);
                Ok(Applied::Changed)
            }

            Command::AddSubtopic { topic, title } => {
                add_subtopic(forest, ids, &topic, title).map(Applied::SubtopicAdded)
            }

            Command::DeleteSubtopic { topic, subtopic } => {
                let target = find_topic(forest, &topic)?;
                let idx = target
                    .subtopics
                    .iter()
                    .position(|s| s.id == subtopic)
                    .ok_or_else(|| unknown_subtopic(&topic, &subtopic))?;
                target.subtopics.remove(idx);
                Ok(Applied::Changed)
            }

            Command::AddQuestion {
                topic,
                subtopic,
                title,
            } => add_question(forest, ids, &topic, &subtopic, title).map(Applied::QuestionAdded),

            Command::DeleteQuestion {
                topic,
                subtopic,
                question,
            } => {
                let target = find_subtopic(forest, &topic, &subtopic)?;
                let idx = target
                    .questions
                    .iter()
                    .position(|q| q.id == question)
                    .ok_or_else(|| unknown_question(&topic, &subtopic, &question))?;
                target.questions.remove(idx);
                Ok(Applied::Changed)
            }

            Command::EditTopic { topic, title } => {
                find_topic(forest, &topic)?.title = title;
                Ok(Applied::Changed)
            }

            Command::EditSubtopic {
                topic,
                subtopic,
                title,
            } => {
                find_subtopic(forest, &topic, &subtopic)?.title = title;
                Ok(Applied::Changed)
            }

            Command::EditQuestion {
                topic,
                subtopic,
                question,
                title,
            } => {
                let target = find_subtopic(forest, &topic, &subtopic)?
                    .question_mut(&question)
                    .ok_or_else(|| unknown_question(&topic, &subtopic, &question))?;
                target.title = title;
                Ok(Applied::Changed)
            }

            Command::ReorderTopics { order } => {
                let current = forest.topic_ids();
                let indices = permutation_indices(&current, &order, "topic")?;
                reorder_by(&mut forest.topics, &indices);
                Ok(Applied::Changed)
            }

            Command::ReorderSubtopics { topic, order } => {
                let target = find_topic(forest, &topic)?;
                let current = target.subtopic_ids();
                let indices = permutation_indices(&current, &order, "subtopic")?;
                reorder_by(&mut target.subtopics, &indices);
                Ok(Applied::Changed)
            }

            Command::MoveTopic { from, to } => {
                let len = forest.topics.len();
                if !move_within(&mut forest.topics, from, to) {
                    return Err(DomainError::IndexOutOfRange { from, to, len });
                }
                Ok(Applied::Changed)
            }

            Command::MoveSubtopic { topic, from, to } => {
                let target = find_topic(forest, &topic)?;
                let len = target.subtopics.len();
                if !move_within(&mut target.subtopics, from, to) {
                    return Err(DomainError::IndexOutOfRange { from, to, len });
                }
                Ok(Applied::Changed)
            }

            Command::LoadForest { forest: loaded } => {
                loaded.validate()?;
                *forest = loaded;
                Ok(Applied::Changed)
            }
        }
    }
}

impl Forest {
    /// Value-level form of [`Command::apply`]: returns the forest after the
    /// command, or an unchanged copy if the command was rejected.
    pub fn with(&self, command: Command, ids: &mut dyn IdGenerator) -> Forest {
        let mut next = self.clone();
        match command.apply(&mut next, ids) {
            Ok(_) => next,
            Err(_) => self.clone(),
        }
    }
}

/// Append a new, empty topic.
pub fn add_topic(forest: &mut Forest, ids: &mut dyn IdGenerator, title: String) -> TopicId {
    let id = unused_id(|| ids.next_topic_id(), |id| forest.topic(id).is_some());
    forest.topics.push(Topic::new(id.clone(), title));
    id
}

/// Append a new, empty subtopic to `topic`.
pub fn add_subtopic(
    forest: &mut Forest,
    ids: &mut dyn IdGenerator,
    topic: &TopicId,
    title: String,
) -> DomainResult<SubtopicId> {
    if forest.topic(topic).is_none() {
        return Err(unknown_topic(topic));
    }
    let id = unused_id(|| ids.next_subtopic_id(), |id| forest.contains_subtopic(id));
    find_topic(forest, topic)?
        .subtopics
        .push(Subtopic::new(id.clone(), title));
    Ok(id)
}

/// Append a new question to `topic`/`subtopic`.
pub fn add_question(
    forest: &mut Forest,
    ids: &mut dyn IdGenerator,
    topic: &TopicId,
    subtopic: &SubtopicId,
    title: String,
) -> DomainResult<QuestionId> {
    find_subtopic(forest, topic, subtopic)?;
    let id = unused_id(|| ids.next_question_id(), |id| forest.contains_question(id));
    find_subtopic(forest, topic, subtopic)?
        .questions
        .push(Question::new(id.clone(), title));
    Ok(id)
}

/// Draw ids until one is not already in the forest. Loaded forests may carry
/// ids a generator would also produce.
fn unused_id<Id>(mut next: impl FnMut() -> Id, taken: impl Fn(&Id) -> bool) -> Id {
    loop {
        let id = next();
        if !taken(&id) {
            return id;
        }
    }
}

fn unknown_topic(topic: &TopicId) -> DomainError {
    DomainError::UnknownTopic(topic.to_string())
}

fn unknown_subtopic(topic: &TopicId, subtopic: &SubtopicId) -> DomainError {
    DomainError::UnknownSubtopic {
        topic: topic.to_string(),
        subtopic: subtopic.to_string(),
    }
}

fn unknown_question(topic: &TopicId, subtopic: &SubtopicId, question: &QuestionId) -> DomainError {
    DomainError::UnknownQuestion {
        topic: topic.to_string(),
        subtopic: subtopic.to_string(),
        question: question.to_string(),
    }
}

fn find_topic<'a>(forest: &'a mut Forest, topic: &TopicId) -> DomainResult<&'a mut Topic> {
    forest.topic_mut(topic).ok_or_else(|| unknown_topic(topic))
}

fn find_subtopic<'a>(
    forest: &'a mut Forest,
    topic: &TopicId,
    subtopic: &SubtopicId,
) -> DomainResult<&'a mut Subtopic> {
    find_topic(forest, topic)?
        .subtopic_mut(subtopic)
        .ok_or_else(|| unknown_subtopic(topic, subtopic))
}

/// Map `wanted` onto positions in `current`, requiring both to hold exactly
/// the same ids.
fn permutation_indices<Id>(current: &[Id], wanted: &[Id], kind: &'static str) -> DomainResult<Vec<usize>>
where
    Id: Eq + Hash + Display,
{
    if current.len() != wanted.len() {
        return Err(DomainError::NotAPermutation {
            kind,
            reason: format!("expected {} ids, got {}", current.len(), wanted.len()),
        });
    }

    let positions: HashMap<&Id, usize> = current.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let mut taken = vec![false; current.len()];
    let mut indices = Vec::with_capacity(wanted.len());

    for id in wanted {
        let idx = *positions.get(id).ok_or_else(|| DomainError::NotAPermutation {
            kind,
            reason: format!("unknown id {}", id),
        })?;
        if std::mem::replace(&mut taken[idx], true) {
            return Err(DomainError::NotAPermutation {
                kind,
                reason: format!("duplicate id {}", id),
            });
        }
        indices.push(idx);
    }
    Ok(indices)
}

fn reorder_by<T>(items: &mut Vec<T>, indices: &[usize]) {
    let mut slots: Vec<Option<T>> = std::mem::take(items).into_iter().map(Some).collect();
    *items = indices.iter().filter_map(|&i| slots[i].take()).collect();
}
