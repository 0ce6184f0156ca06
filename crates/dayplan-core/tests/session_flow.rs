//! End-to-end session flows through the public engine API.

use std::sync::Arc;

use async_trait::async_trait;
use dayplan_core::{Action, Engine, EngineError, KeyboardId};
use dayplan_planner::Completion;
use dayplan_store::{PlanArchive, PrefsSource, SessionStore, StoreError};

/// Completion stub that would sort whatever it is given, if it were asked.
struct EchoCompletion;

#[async_trait]
impl Completion for EchoCompletion {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> dayplan_planner::Result<String> {
        Ok("[]".to_string())
    }
}

fn engine() -> (Engine<EchoCompletion>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let engine = Engine::new(
        Arc::new(SessionStore::new()),
        PrefsSource::new(dir.path()),
        PlanArchive::new(dir.path()),
        EchoCompletion,
        None,
    );
    (engine, dir)
}

#[tokio::test]
async fn collect_estimate_and_finish() {
    let (engine, _dir) = engine();
    let owner = 1001;

    engine.start_list(owner).await;
    engine.handle_text(owner, "Buy milk").await.unwrap();

    engine
        .handle_action(owner, Action::AddTaskWithTime)
        .await
        .unwrap();
    engine.handle_text(owner, "Call mom").await.unwrap();
    engine.handle_text(owner, "30 minutes").await.unwrap();

    let reply = engine.handle_action(owner, Action::FinishList).await.unwrap();
    assert!(reply.text.contains("1. Buy milk"));
    assert!(reply.text.contains("2. Call mom ⏱️ 30 minutes"));
    assert_eq!(reply.keyboard, KeyboardId::None);

    // The session no longer exists: appending fails.
    let err = engine.handle_text(owner, "anything").await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Store(StoreError::NoActiveSession)
    ));
}

#[tokio::test]
async fn removing_a_bad_index_leaves_the_list_alone() {
    let (engine, _dir) = engine();
    let owner = 1002;

    engine.start_list(owner).await;
    engine.handle_text(owner, "only task").await.unwrap();

    let err = engine
        .handle_action(owner, Action::ConfirmRemove(5))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Store(StoreError::IndexOutOfRange { index: 5, len: 1 })
    ));

    let reply = engine.handle_action(owner, Action::ShowList).await.unwrap();
    assert!(reply.text.contains("1. only task"));
}

#[tokio::test]
async fn planning_an_empty_list_is_rejected() {
    let (engine, _dir) = engine();
    let owner = 1003;

    engine.start_list(owner).await;
    let err = engine.build_plan(owner).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Store(StoreError::NoActiveSession)
    ));
}

#[tokio::test]
async fn owners_do_not_share_sessions() {
    let (engine, _dir) = engine();

    engine.start_list(1).await;
    engine.start_list(2).await;
    engine.handle_text(1, "mine").await.unwrap();
    engine.handle_text(2, "yours").await.unwrap();

    let reply = engine.handle_action(1, Action::ShowList).await.unwrap();
    assert!(reply.text.contains("mine"));
    assert!(!reply.text.contains("yours"));

    // Finishing one owner's list leaves the other's untouched.
    engine.handle_action(1, Action::FinishList).await.unwrap();
    let reply = engine.handle_action(2, Action::ShowList).await.unwrap();
    assert!(reply.text.contains("yours"));
}
