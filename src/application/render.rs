//! Tree view of the outline
//!
//! Labels carry 1-based positions (`2`, `2.1`, `2.1.3`) so a reader can
//! refer back to nodes by where they are shown.

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Forest, Subtopic, Topic};

pub trait TreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeConvert for Forest {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        if self.is_empty() {
            return Tree::new("Empty sheet".to_string());
        }
        let leaves: Vec<_> = self
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| topic_tree(i + 1, topic))
            .collect();
        Tree::new(format!(
            "Sheet ({} topics, {} questions)",
            self.len(),
            self.question_count()
        ))
        .with_leaves(leaves)
    }
}

fn topic_tree(pos: usize, topic: &Topic) -> Tree<String> {
    let leaves: Vec<_> = topic
        .subtopics
        .iter()
        .enumerate()
        .map(|(i, sub)| subtopic_tree(&format!("{}.{}", pos, i + 1), sub))
        .collect();
    Tree::new(format!("{} {}", pos, topic.title)).with_leaves(leaves)
}

fn subtopic_tree(path: &str, sub: &Subtopic) -> Tree<String> {
    let leaves: Vec<_> = sub
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| Tree::new(format!("{}.{} {}", path, i + 1, q.title)))
        .collect();
    Tree::new(format!("{} {}", path, sub.title)).with_leaves(leaves)
}
