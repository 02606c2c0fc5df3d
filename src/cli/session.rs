//! Interactive editing session
//!
//! A line-oriented stand-in for the sheet's UI: each input line is one user
//! action, resolved against what is currently shown and turned into exactly
//! one store call. Nodes are addressed by their displayed 1-based position
//! (`2`, `2.1`, `2.1.3`).

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, instrument};

use crate::application::{drop_subtopic, drop_topic, DragEnd, OutlineStore, TreeConvert};
use crate::domain::{Forest, QuestionId, SubtopicId, TopicId};
use crate::infrastructure::{InfraError, InfraResult};

/// Position of a node as displayed, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Topic(usize),
    Subtopic(usize, usize),
    Question(usize, usize, usize),
}

impl FromStr for Locator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('.')
            .map(|p| match p.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(format!("invalid position '{s}', expected e.g. 2, 2.1 or 2.1.3")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [t] => Ok(Locator::Topic(*t)),
            [t, s] => Ok(Locator::Subtopic(*t, *s)),
            [t, s, q] => Ok(Locator::Question(*t, *s, *q)),
            _ => Err(format!("invalid position '{s}', at most three levels")),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Topic(t) => write!(f, "{t}"),
            Locator::Subtopic(t, s) => write!(f, "{t}.{s}"),
            Locator::Question(t, s, q) => write!(f, "{t}.{s}.{q}"),
        }
    }
}

/// A locator resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Topic(TopicId),
    Subtopic(TopicId, SubtopicId),
    Question(TopicId, SubtopicId, QuestionId),
}

impl Locator {
    /// Look the position up in `forest`; `None` if nothing is shown there,
    /// including a zero position.
    pub fn resolve(&self, forest: &Forest) -> Option<Target> {
        let (t, rest) = match *self {
            Locator::Topic(t) => (t, None),
            Locator::Subtopic(t, s) => (t, Some((s, None))),
            Locator::Question(t, s, q) => (t, Some((s, Some(q)))),
        };
        let topic = forest.topics.get(t.checked_sub(1)?)?;
        let Some((s, q)) = rest else {
            return Some(Target::Topic(topic.id.clone()));
        };
        let sub = topic.subtopics.get(s.checked_sub(1)?)?;
        let Some(q) = q else {
            return Some(Target::Subtopic(topic.id.clone(), sub.id.clone()));
        };
        let question = sub.questions.get(q.checked_sub(1)?)?;
        Some(Target::Question(
            topic.id.clone(),
            sub.id.clone(),
            question.id.clone(),
        ))
    }
}

#[derive(Parser, Debug)]
#[command(name = "session", no_binary_name = true)]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SessionCommand {
    /// Append a topic: add-topic <title>
    AddTopic {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        title: Vec<String>,
    },
    /// Append a subtopic: add-sub <topic> <title>
    AddSub {
        topic: Locator,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        title: Vec<String>,
    },
    /// Append a question: add-q <topic.sub> <title>
    AddQ {
        subtopic: Locator,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        title: Vec<String>,
    },
    /// Rename: edit <path> <title>
    Edit {
        path: Locator,
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        title: Vec<String>,
    },
    /// Delete with everything below: rm <path>
    Rm { path: Locator },
    /// Drag a topic or subtopic onto the item at <position>: move <path> <position>
    Move { path: Locator, position: usize },
    /// Print the sheet
    Show,
    /// List commands
    Help,
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }
    let command = SessionLine::try_parse_from(tokens)
        .map_err(|e| e.to_string().trim_end().to_string())?
        .command;
    Ok(Some(with_raw_title(command, line)))
}

/// Text of `line` after its first `words` whitespace-separated tokens.
fn remainder_after(line: &str, words: usize) -> String {
    let mut rest = line.trim_start();
    for _ in 0..words {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest.to_string()
}

/// Swap clap's split title words for the raw rest of the line, so inner
/// spacing reaches the store as typed.
fn with_raw_title(command: SessionCommand, line: &str) -> SessionCommand {
    match command {
        SessionCommand::AddTopic { .. } => SessionCommand::AddTopic {
            title: vec![remainder_after(line, 1)],
        },
        SessionCommand::AddSub { topic, .. } => SessionCommand::AddSub {
            topic,
            title: vec![remainder_after(line, 2)],
        },
        SessionCommand::AddQ { subtopic, .. } => SessionCommand::AddQ {
            subtopic,
            title: vec![remainder_after(line, 2)],
        },
        SessionCommand::Edit { path, .. } => SessionCommand::Edit {
            path,
            title: vec![remainder_after(line, 2)],
        },
        other => other,
    }
}

/// Titles are checked here, before the store is called; the store itself
/// accepts any string.
fn validated_title(words: &[String]) -> Result<String, String> {
    let title = words.join(" ");
    if title.trim().is_empty() {
        return Err("title must not be empty".to_string());
    }
    Ok(title)
}

/// Run the read-execute loop until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    store: &mut OutlineStore,
    input: R,
    out: &mut W,
) -> InfraResult<()> {
    render(store, out)?;
    for line in input.lines() {
        let line = line.map_err(|e| InfraError::io("read session input", e))?;
        match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                if execute(store, command, out)? == Flow::Quit {
                    break;
                }
            }
            Err(message) => writeln!(out, "{}: {}", "Warning".yellow(), message)
                .map_err(|e| InfraError::io("write session output", e))?,
        }
    }
    Ok(())
}

fn render<W: Write>(store: &OutlineStore, out: &mut W) -> InfraResult<()> {
    write!(out, "{}", store.forest().to_tree_string())
        .map_err(|e| InfraError::io("write session output", e))
}

/// Execute one command against the store and report the result to `out`.
#[instrument(level = "debug", skip(store, out))]
pub fn execute<W: Write>(
    store: &mut OutlineStore,
    command: SessionCommand,
    out: &mut W,
) -> InfraResult<Flow> {
    let outcome = match command {
        SessionCommand::Show => {
            render(store, out)?;
            return Ok(Flow::Continue);
        }
        SessionCommand::Help => {
            let help = SessionLine::command().render_help();
            writeln!(out, "{help}").map_err(|e| InfraError::io("write session output", e))?;
            return Ok(Flow::Continue);
        }
        SessionCommand::Quit => return Ok(Flow::Quit),
        SessionCommand::AddTopic { title } => add_topic(store, &title),
        SessionCommand::AddSub { topic, title } => add_subtopic(store, topic, &title),
        SessionCommand::AddQ { subtopic, title } => add_question(store, subtopic, &title),
        SessionCommand::Edit { path, title } => edit(store, path, &title),
        SessionCommand::Rm { path } => remove(store, path),
        SessionCommand::Move { path, position } => drag(store, path, position),
    };

    match outcome {
        Ok(message) => writeln!(out, "{} {}", "✓".green(), message),
        Err(message) => writeln!(out, "{}: {}", "Warning".yellow(), message),
    }
    .map_err(|e| InfraError::io("write session output", e))?;
    Ok(Flow::Continue)
}

type Feedback = Result<String, String>;

fn not_found(path: Locator) -> String {
    format!("nothing at position {path}")
}

fn add_topic(store: &mut OutlineStore, title: &[String]) -> Feedback {
    let title = validated_title(title)?;
    store.add_topic(title.clone());
    Ok(format!("added topic {} '{}'", store.len(), title))
}

fn add_subtopic(store: &mut OutlineStore, at: Locator, title: &[String]) -> Feedback {
    let title = validated_title(title)?;
    let Some(Target::Topic(topic)) = at.resolve(store.forest()) else {
        return Err(format!("{at} is not a topic position"));
    };
    store.add_subtopic(&topic, title.clone()).map_err(|e| e.to_string())?;
    Ok(format!("added subtopic '{title}' to {at}"))
}

fn add_question(store: &mut OutlineStore, at: Locator, title: &[String]) -> Feedback {
    let title = validated_title(title)?;
    let Some(Target::Subtopic(topic, sub)) = at.resolve(store.forest()) else {
        return Err(format!("{at} is not a subtopic position"));
    };
    store
        .add_question(&topic, &sub, title.clone())
        .map_err(|e| e.to_string())?;
    Ok(format!("added question '{title}' to {at}"))
}

fn edit(store: &mut OutlineStore, at: Locator, title: &[String]) -> Feedback {
    let title = validated_title(title)?;
    let result = match at.resolve(store.forest()).ok_or_else(|| not_found(at))? {
        Target::Topic(t) => store.edit_topic(&t, title.clone()),
        Target::Subtopic(t, s) => store.edit_subtopic(&t, &s, title.clone()),
        Target::Question(t, s, q) => store.edit_question(&t, &s, &q, title.clone()),
    };
    result.map_err(|e| e.to_string())?;
    Ok(format!("renamed {at} to '{title}'"))
}

fn remove(store: &mut OutlineStore, at: Locator) -> Feedback {
    let result = match at.resolve(store.forest()).ok_or_else(|| not_found(at))? {
        Target::Topic(t) => store.delete_topic(&t),
        Target::Subtopic(t, s) => store.delete_subtopic(&t, &s),
        Target::Question(t, s, q) => store.delete_question(&t, &s, &q),
    };
    result.map_err(|e| e.to_string())?;
    Ok(format!("deleted {at}"))
}

/// Simulate a drag: the item at `at` is dropped over whatever currently sits
/// at `position` in the same list. A position outside the list is a drop
/// outside any slot and moves nothing.
fn drag(store: &mut OutlineStore, at: Locator, position: usize) -> Feedback {
    let moved = match at.resolve(store.forest()).ok_or_else(|| not_found(at))? {
        Target::Topic(active) => {
            let over = position
                .checked_sub(1)
                .and_then(|i| store.forest().topics.get(i))
                .map(|t| t.id.clone());
            drop_topic(store, &DragEnd::new(active, over))
        }
        Target::Subtopic(topic, active) => {
            let over = store.topic(&topic).and_then(|t| {
                position
                    .checked_sub(1)
                    .and_then(|i| t.subtopics.get(i))
                    .map(|s| s.id.clone())
            });
            drop_subtopic(store, &topic, &DragEnd::new(active, over))
        }
        Target::Question(..) => return Err("questions cannot be reordered".to_string()),
    }
    .map_err(|e| e.to_string())?;

    debug!(%at, position, moved, "drag handled");
    if moved {
        Ok(format!("moved {at} to position {position}"))
    } else {
        Ok("nothing moved".to_string())
    }
}
