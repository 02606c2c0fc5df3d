//! Tests for the bulk-load adapter and startup bootstrap

use std::fs;
use std::sync::Arc;

use rstest::rstest;
use tempfile::tempdir;

use qsheet::application::seed::{decode, into_forest, SYNTHETIC_SUBTOPIC_TITLE};
use qsheet::application::{bootstrap, OutlineStore, SeedOutcome};
use qsheet::config::{IdScheme, Settings};
use qsheet::domain::{SequentialIds, TopicId};
use qsheet::infrastructure::di::ServiceContainer;
use qsheet::infrastructure::traits::{FileSeedSource, SeedSource, StaticSeedSource};
use qsheet::util::testing;

const PAYLOAD: &str = r#"{
  "data": {
    "sheet": { "name": "SDE Sheet" },
    "questions": [
      { "_id": "q1", "topic": "Arrays", "questionTitle": "Two Sum", "difficulty": "Easy" },
      { "_id": "q2", "topic": "Graphs", "title": "BFS" },
      { "_id": "q3", "topic": "Arrays", "questionTitle": "", "title": "Kadane" },
      { "_id": 4, "questionTitle": "FizzBuzz" },
      { "topic": "Graphs" }
    ]
  }
}"#;

fn sequential_store() -> OutlineStore {
    OutlineStore::with_ids(Box::new(SequentialIds::new()))
}

#[test]
fn given_payload_when_shaping_then_topics_in_first_appearance_order() {
    testing::init_test_setup();
    let forest = into_forest(decode(PAYLOAD).unwrap(), &mut SequentialIds::new());

    let names: Vec<_> = forest.topics.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(names, vec!["Arrays", "Graphs", "General"]);
    assert_eq!(forest.question_count(), 5);
}

#[test]
fn given_payload_when_shaping_then_each_topic_has_one_synthetic_subtopic() {
    let forest = into_forest(decode(PAYLOAD).unwrap(), &mut SequentialIds::new());

    for topic in &forest.topics {
        assert_eq!(topic.id.as_str(), topic.title);
        assert_eq!(topic.subtopics.len(), 1);
        assert_eq!(topic.subtopics[0].title, SYNTHETIC_SUBTOPIC_TITLE);
        assert_eq!(topic.subtopics[0].id.as_str(), format!("{}-sub", topic.title));
    }
}

#[test]
fn given_payload_when_shaping_then_titles_and_ids_fall_back() {
    let forest = into_forest(decode(PAYLOAD).unwrap(), &mut SequentialIds::new());

    let arrays = &forest.topics[0].subtopics[0].questions;
    assert_eq!(arrays[0].title, "Two Sum");
    assert_eq!(arrays[0].id.as_str(), "q1");
    assert_eq!(arrays[1].title, "Kadane");

    let graphs = &forest.topics[1].subtopics[0].questions;
    assert_eq!(graphs[1].title, "Untitled");
    assert_eq!(graphs[1].id.as_str(), "q-1");

    let general = &forest.topics[2].subtopics[0].questions;
    assert_eq!(general[0].id.as_str(), "4");
}

#[test]
fn given_empty_store_when_bootstrapping_then_forest_loaded() {
    testing::init_test_setup();
    let mut store = sequential_store();

    let outcome = bootstrap(&mut store, &StaticSeedSource::new(PAYLOAD));

    assert_eq!(outcome, SeedOutcome::Loaded { topics: 3, questions: 5 });
    assert_eq!(store.len(), 3);
    assert!(store.topic(&TopicId::from("Arrays")).is_some());
}

#[test]
fn given_loaded_seed_when_editing_then_store_behaves_normally() {
    let mut store = sequential_store();
    bootstrap(&mut store, &StaticSeedSource::new(PAYLOAD));

    let arrays = TopicId::from("Arrays");
    let sub = store.add_subtopic(&arrays, "Hard").unwrap();
    store.add_question(&arrays, &sub, "Trapping Rain Water").unwrap();

    assert_eq!(store.topic(&arrays).unwrap().subtopics.len(), 2);
    assert_eq!(store.question_count(), 6);
}

#[test]
fn given_populated_store_when_bootstrapping_then_skipped() {
    let mut store = sequential_store();
    store.add_topic("Mine");
    let before = store.snapshot();

    let outcome = bootstrap(&mut store, &StaticSeedSource::new(PAYLOAD));

    assert_eq!(outcome, SeedOutcome::Skipped);
    assert_eq!(store.forest(), &before);
}

#[rstest]
#[case::not_json("<html>502 Bad Gateway</html>")]
#[case::missing_data(r#"{"status": "ok"}"#)]
#[case::missing_questions(r#"{"data": {}}"#)]
#[case::questions_not_a_list(r#"{"data": {"questions": 3}}"#)]
fn given_malformed_payload_when_bootstrapping_then_failed_and_empty(#[case] payload: &str) {
    testing::init_test_setup();
    let mut store = sequential_store();

    let outcome = bootstrap(&mut store, &StaticSeedSource::new(payload));

    assert!(matches!(outcome, SeedOutcome::Failed(_)));
    assert!(store.is_empty());
}

#[test]
fn given_empty_question_list_when_bootstrapping_then_loaded_empty() {
    let mut store = sequential_store();

    let outcome = bootstrap(&mut store, &StaticSeedSource::new(r#"{"data":{"questions":[]}}"#));

    assert_eq!(outcome, SeedOutcome::Loaded { topics: 0, questions: 0 });
    assert!(store.is_empty());
}

#[test]
fn given_seed_file_when_bootstrapping_then_loaded_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sheet.json");
    fs::write(&path, PAYLOAD).unwrap();
    let mut store = sequential_store();

    let outcome = bootstrap(&mut store, &FileSeedSource::new(&path));

    assert_eq!(outcome, SeedOutcome::Loaded { topics: 3, questions: 5 });
}

#[test]
fn given_missing_seed_file_when_bootstrapping_then_failed_and_empty() {
    let dir = tempdir().unwrap();
    let mut store = sequential_store();

    let outcome = bootstrap(&mut store, &FileSeedSource::new(dir.path().join("absent.json")));

    assert!(matches!(outcome, SeedOutcome::Failed(ref msg) if msg.contains("absent.json")));
    assert!(store.is_empty());
}

#[test]
fn given_container_with_seed_when_bootstrapping_twice_then_second_skipped() {
    let settings = Settings {
        id_scheme: IdScheme::Sequential,
        ..Settings::default()
    };
    let seed: Arc<dyn SeedSource> = Arc::new(StaticSeedSource::new(PAYLOAD));
    let mut container = ServiceContainer::with_deps(settings, Some(seed));

    assert!(matches!(container.bootstrap(), SeedOutcome::Loaded { .. }));
    assert_eq!(container.bootstrap(), SeedOutcome::Skipped);
    assert_eq!(container.store().len(), 3);
}

#[test]
fn given_container_without_seed_when_bootstrapping_then_store_empty() {
    let mut container = ServiceContainer::with_deps(Settings::default(), None);

    assert_eq!(container.bootstrap(), SeedOutcome::Skipped);
    assert!(container.store().is_empty());
}

#[test]
fn given_non_string_topic_when_bootstrapping_then_rest_of_payload_loads() {
    testing::init_test_setup();
    let payload = r#"{"data":{"questions":[
        {"_id":"q1","topic":"Arrays","title":"Two Sum"},
        {"_id":"q2","topic":7,"title":"Numbered"},
        {"_id":"q3","topic":{"name":"Graphs"},"title":"Nested"}
    ]}}"#;
    let mut store = sequential_store();

    let outcome = bootstrap(&mut store, &StaticSeedSource::new(payload));

    assert_eq!(outcome, SeedOutcome::Loaded { topics: 3, questions: 3 });
    let names: Vec<_> = store.forest().topics.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(names, vec!["Arrays", "7", "General"]);
}
