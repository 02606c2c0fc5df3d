//! Bulk-load adapter
//!
//! Shapes the public sheet payload into a forest and loads it into the store
//! once at startup. The steps are kept separate and named:
//!
//! 1. [`decode`]: JSON text into typed [`SheetResponse`]
//! 2. [`group_by_topic`]: normalize each raw question and bucket it by topic
//! 3. [`wrap_in_synthetic_subtopic`]: one topic per bucket, holding a single
//!    `"Questions"` subtopic
//! 4. [`bootstrap`]: fetch, transform, `load_forest`; failures are logged and
//!    leave the forest empty

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::store::OutlineStore;
use crate::domain::{
    Forest, IdGenerator, Question, QuestionId, Subtopic, SubtopicId, Topic, TopicId, UuidIds,
};
use crate::infrastructure::traits::SeedSource;

/// Topic used for questions without one.
pub const DEFAULT_TOPIC: &str = "General";
/// Title used for questions without one.
pub const UNTITLED: &str = "Untitled";
/// Title of the single subtopic created per loaded topic.
pub const SYNTHETIC_SUBTOPIC_TITLE: &str = "Questions";
/// Appended to the topic name to form the synthetic subtopic's id.
pub const SYNTHETIC_SUBTOPIC_SUFFIX: &str = "-sub";

#[derive(Debug, Clone, Deserialize)]
pub struct SheetResponse {
    pub data: SheetData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetData {
    pub questions: Vec<RawQuestion>,
}

/// One question as delivered by the sheet endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "_id", default)]
    pub id: Option<RawField>,
    #[serde(default)]
    pub topic: Option<RawField>,
    #[serde(rename = "questionTitle", default)]
    pub question_title: Option<RawField>,
    #[serde(default)]
    pub title: Option<RawField>,
}

/// A loosely typed payload field. Usually a string, sometimes a number; any
/// other JSON value is accepted so one odd element cannot fail the payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(serde_json::Number),
    Other(serde_json::Value),
}

impl RawField {
    /// The field as text, or `None` when it should count as absent: empty
    /// strings, zero, `false` and structured values.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawField::Text(s) if !s.is_empty() => Some(s.clone()),
            RawField::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            RawField::Other(serde_json::Value::Bool(true)) => Some("true".to_string()),
            _ => None,
        }
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

/// Questions sharing a topic name, in payload order.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup {
    pub name: String,
    pub questions: Vec<Question>,
}

/// Result of a bootstrap attempt, for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Loaded { topics: usize, questions: usize },
    /// The store already had content; nothing was fetched.
    Skipped,
    Failed(String),
}

fn present(field: &Option<RawField>) -> Option<String> {
    field.as_ref().and_then(RawField::as_text)
}

impl RawQuestion {
    /// `topic`, else [`DEFAULT_TOPIC`]. See [`RawField::as_text`] for what counts as absent.
    pub fn topic_name(&self) -> String {
        present(&self.topic).unwrap_or_else(|| DEFAULT_TOPIC.to_string())
    }

    /// `questionTitle`, else `title`, else [`UNTITLED`].
    pub fn display_title(&self) -> String {
        present(&self.question_title)
            .or_else(|| present(&self.title))
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// `_id` rendered as a string, else a freshly generated id.
    pub fn resolve_id(&self, ids: &mut dyn IdGenerator) -> QuestionId {
        present(&self.id)
            .map(QuestionId::new)
            .unwrap_or_else(|| ids.next_question_id())
    }
}

/// Parse the endpoint's JSON body.
pub fn decode(payload: &str) -> ApplicationResult<SheetResponse> {
    serde_json::from_str(payload).map_err(|e| ApplicationError::SeedDecode {
        message: e.to_string(),
    })
}

/// Normalize raw questions and group them by topic, in order of first appearance.
///
/// A question id seen before is replaced with a fresh one so the loaded
/// forest keeps question ids unique.
pub fn group_by_topic(raw: Vec<RawQuestion>, ids: &mut dyn IdGenerator) -> Vec<TopicGroup> {
    let mut groups: Vec<TopicGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<QuestionId> = HashSet::new();

    for item in raw {
        let mut id = item.resolve_id(ids);
        if !seen.insert(id.clone()) {
            let fresh = ids.next_question_id();
            warn!(duplicate = %id, replacement = %fresh, "duplicate question id in seed");
            seen.insert(fresh.clone());
            id = fresh;
        }
        let question = Question::new(id, item.display_title());

        let name = item.topic_name();
        let slot = match index.get(&name) {
            Some(&slot) => slot,
            None => {
                groups.push(TopicGroup {
                    name: name.clone(),
                    questions: Vec::new(),
                });
                index.insert(name, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].questions.push(question);
    }
    groups
}

/// Turn a group into a topic named after it, holding one synthetic
/// `"Questions"` subtopic with all of the group's questions.
pub fn wrap_in_synthetic_subtopic(group: TopicGroup) -> Topic {
    let subtopic = Subtopic {
        id: SubtopicId::new(format!("{}{}", group.name, SYNTHETIC_SUBTOPIC_SUFFIX)),
        title: SYNTHETIC_SUBTOPIC_TITLE.to_string(),
        questions: group.questions,
    };
    Topic {
        id: TopicId::new(group.name.clone()),
        title: group.name,
        subtopics: vec![subtopic],
    }
}

/// Full transform from payload to forest.
pub fn into_forest(response: SheetResponse, ids: &mut dyn IdGenerator) -> Forest {
    let topics = group_by_topic(response.data.questions, ids)
        .into_iter()
        .map(wrap_in_synthetic_subtopic)
        .collect();
    Forest::from_topics(topics)
}

/// Seed an empty store from `source`.
///
/// Runs only when the store has no topics. On any failure the error is
/// logged, the store stays empty and nothing is retried.
#[instrument(level = "debug", skip(store, source), fields(source = %source.describe()))]
pub fn bootstrap(store: &mut OutlineStore, source: &dyn SeedSource) -> SeedOutcome {
    if !store.is_empty() {
        debug!(topics = store.len(), "store already populated, skipping seed");
        return SeedOutcome::Skipped;
    }

    match fetch_forest(source) {
        Ok(forest) => {
            let topics = forest.len();
            let questions = forest.question_count();
            match store.load_forest(forest) {
                Ok(()) => {
                    info!(topics, questions, "seed loaded");
                    SeedOutcome::Loaded { topics, questions }
                }
                Err(e) => {
                    error!("Error loading seed: {}", e);
                    SeedOutcome::Failed(e.to_string())
                }
            }
        }
        Err(e) => {
            error!("Error fetching data: {}", e);
            SeedOutcome::Failed(e.to_string())
        }
    }
}

fn fetch_forest(source: &dyn SeedSource) -> ApplicationResult<Forest> {
    let payload = source.fetch()?;
    debug!(bytes = payload.len(), "seed payload received");
    let response = decode(&payload)?;
    Ok(into_forest(response, &mut UuidIds))
}
