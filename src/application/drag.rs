//! Drag gesture resolution
//!
//! Turns the end of a drag (the dragged item and whatever it was dropped
//! over) into a full permutation for the store's reorder calls. A gesture that
//! cannot be resolved produces no reorder call at all.

use tracing::debug;

use crate::application::store::OutlineStore;
use crate::domain::{array_move, DomainResult, SubtopicId, TopicId};

/// End of a drag gesture: the dragged item and the slot it was dropped over,
/// if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd<Id> {
    pub active: Id,
    pub over: Option<Id>,
}

impl<Id> DragEnd<Id> {
    pub fn new(active: Id, over: Option<Id>) -> Self {
        Self { active, over }
    }
}

/// Compute the new order for a drop, or `None` if nothing should change.
///
/// `None` when the drop target is missing, equals the dragged item, or
/// either id is not part of `current`.
pub fn plan_reorder<Id: Clone + PartialEq>(current: &[Id], drag: &DragEnd<Id>) -> Option<Vec<Id>> {
    let over = drag.over.as_ref()?;
    if *over == drag.active {
        return None;
    }
    let from = current.iter().position(|id| *id == drag.active)?;
    let to = current.iter().position(|id| id == over)?;
    array_move(current, from, to)
}

/// Resolve a topic drop and reorder the store. Returns whether a reorder call was issued.
pub fn drop_topic(store: &mut OutlineStore, drag: &DragEnd<TopicId>) -> DomainResult<bool> {
    let Some(order) = plan_reorder(&store.forest().topic_ids(), drag) else {
        debug!(?drag, "topic drop not resolved, no reorder");
        return Ok(false);
    };
    store.reorder_topics(order)?;
    Ok(true)
}

/// Resolve a subtopic drop inside `topic` and reorder the store.
pub fn drop_subtopic(
    store: &mut OutlineStore,
    topic: &TopicId,
    drag: &DragEnd<SubtopicId>,
) -> DomainResult<bool> {
    let Some(current) = store.topic(topic).map(|t| t.subtopic_ids()) else {
        debug!(%topic, "subtopic drop in unknown topic, no reorder");
        return Ok(false);
    };
    let Some(order) = plan_reorder(&current, drag) else {
        debug!(?drag, "subtopic drop not resolved, no reorder");
        return Ok(false);
    };
    store.reorder_subtopics(topic, order)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd() -> Vec<&'static str> {
        vec!["A", "B", "C", "D"]
    }

    #[test]
    fn given_drop_over_earlier_item_when_planning_then_moves_before_it() {
        let plan = plan_reorder(&abcd(), &DragEnd::new("C", Some("A")));
        assert_eq!(plan, Some(vec!["C", "A", "B", "D"]));
    }

    #[test]
    fn given_drop_over_later_item_when_planning_then_takes_its_slot() {
        let plan = plan_reorder(&abcd(), &DragEnd::new("A", Some("C")));
        assert_eq!(plan, Some(vec!["B", "C", "A", "D"]));
    }

    #[test]
    fn given_drop_outside_any_slot_when_planning_then_none() {
        assert_eq!(plan_reorder(&abcd(), &DragEnd::new("A", None)), None);
    }

    #[test]
    fn given_drop_onto_itself_when_planning_then_none() {
        assert_eq!(plan_reorder(&abcd(), &DragEnd::new("B", Some("B"))), None);
    }

    #[test]
    fn given_unknown_ids_when_planning_then_none() {
        assert_eq!(plan_reorder(&abcd(), &DragEnd::new("X", Some("A"))), None);
        assert_eq!(plan_reorder(&abcd(), &DragEnd::new("A", Some("X"))), None);
    }
}
