use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use super::support::MockBackend;
use crate::core::error::ReportError;
use crate::core::history::HistoryStore;
use crate::core::report::pipeline::{AdvisoryKind, PipelineEvent, ReportPipeline};
use crate::core::report::{GenerationOptions, image_prompt};

async fn history() -> HistoryStore {
    let db = Connection::open_in_memory().expect("in-memory db");
    let store = HistoryStore::new(Arc::new(Mutex::new(db)));
    store.initialize().await.expect("init history");
    store
}

#[tokio::test]
async fn full_run_with_one_image_failure_still_completes_and_persists() {
    let backend = MockBackend::with_outline(&["Intro", "History", "Conclusion"])
        .failing_image("History");
    let store = history().await;

    let outcome = ReportPipeline::new(&backend, &store)
        .run("Test Topic", &GenerationOptions::default(), None)
        .await
        .unwrap();

    let report = &outcome.report;
    assert_eq!(report.topic, "Test Topic");
    assert_eq!(report.sections.len(), 3);
    for (section, title) in report.sections.iter().zip(["Intro", "History", "Conclusion"]) {
        assert_eq!(section.title, title);
        assert!(!section.content.is_empty());
    }

    assert!(!report.sections[0].is_placeholder);
    assert!(report.sections[1].is_placeholder);
    assert!(!report.sections[2].is_placeholder);
    assert!(!report.sections[1].image_url.is_empty());
    assert_eq!(
        report.sections[1].image_prompt.as_deref(),
        Some(image_prompt("Test Topic", "History").as_str())
    );

    // Exactly one advisory for the whole run.
    let advisory = outcome.advisory.expect("one advisory");
    assert_eq!(advisory.failed_sections, 1);

    let stored = store.list().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], *report);
}

#[tokio::test]
async fn clean_run_raises_no_advisory() {
    let backend = MockBackend::with_outline(&["A", "B"]);
    let store = history().await;

    let outcome = ReportPipeline::new(&backend, &store)
        .run("Topic", &GenerationOptions::default(), None)
        .await
        .unwrap();

    assert!(outcome.advisory.is_none());
    assert!(outcome.report.sections.iter().all(|s| !s.is_placeholder));
}

#[tokio::test]
async fn empty_outline_aborts_without_persisting() {
    let backend = MockBackend::with_outline(&[]);
    let store = history().await;

    let err = ReportPipeline::new(&backend, &store)
        .run("Topic", &GenerationOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::EmptyOutline));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn outline_backend_failure_is_distinct_from_empty_outline() {
    let backend = MockBackend::with_failing_outline("model overloaded");
    let store = history().await;

    let err = ReportPipeline::new(&backend, &store)
        .run("Topic", &GenerationOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Backend(_)));
    assert!(err.to_string().contains("model overloaded"));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn content_failure_mid_run_aborts_and_persists_nothing() {
    let backend = MockBackend::with_outline(&["First", "Second", "Third"])
        .failing_content("Second");
    let store = history().await;

    let err = ReportPipeline::new(&backend, &store)
        .run("Topic", &GenerationOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::Backend(_)));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn events_arrive_incrementally_in_outline_order() {
    let backend = MockBackend::with_outline(&["One", "Two"]);
    let store = history().await;
    let (tx, mut rx) = mpsc::channel::<PipelineEvent>(32);

    ReportPipeline::new(&backend, &store)
        .run("Topic", &GenerationOptions::default(), Some(tx))
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(events.len(), 6); // outline + 2 * (started, completed) + completed

    let PipelineEvent::OutlineReady { titles, .. } = &events[0] else {
        panic!("expected outline_ready first, got {:?}", events[0]);
    };
    assert_eq!(titles, &["One", "Two"]);

    // Each completion carries the snapshot up to and including its section.
    let PipelineEvent::SectionCompleted { index, report, .. } = &events[2] else {
        panic!("expected section_completed, got {:?}", events[2]);
    };
    assert_eq!(*index, 0);
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.sections[0].title, "One");

    let PipelineEvent::SectionCompleted { index, report, .. } = &events[4] else {
        panic!("expected section_completed, got {:?}", events[4]);
    };
    assert_eq!(*index, 1);
    assert_eq!(report.sections.len(), 2);

    assert!(matches!(events[5], PipelineEvent::Completed { .. }));
}

#[tokio::test]
async fn advisory_classifies_billing_error_body() {
    let backend = MockBackend::with_outline(&["Solo"])
        .failing_image("Solo")
        .image_error_body(r#"{"error": {"message": "billing account not configured"}}"#);
    let store = history().await;

    let outcome = ReportPipeline::new(&backend, &store)
        .run("Topic", &GenerationOptions::default(), None)
        .await
        .unwrap();

    let advisory = outcome.advisory.unwrap();
    assert_eq!(advisory.kind, AdvisoryKind::Billing);
    assert_eq!(advisory.detail, "billing account not configured");
}

#[tokio::test]
async fn dropped_progress_receiver_does_not_fail_the_run() {
    let backend = MockBackend::with_outline(&["A", "B", "C"]);
    let store = history().await;
    let (tx, rx) = mpsc::channel::<PipelineEvent>(1);
    drop(rx);

    let outcome = ReportPipeline::new(&backend, &store)
        .run("Topic", &GenerationOptions::default(), Some(tx))
        .await
        .unwrap();
    assert_eq!(outcome.report.sections.len(), 3);
}
