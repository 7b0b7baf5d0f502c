//! Full turn-loop scenarios through the session use cases.

use std::sync::Arc;

use taleturn_domain::{
    Action, ActionDescription, DicePolicy, DiceType, OutcomeTier, SessionSetup,
};

use chrono::{TimeZone, Utc};

use super::{EchoLlm, TestAppBuilder, UnreachableLlm};
use crate::app::{App, Repositories};
use crate::infrastructure::clock::{FixedClock, SeededRandom};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{ActionRepo, SessionRepo};
use crate::infrastructure::sqlite::SqliteSessionStore;
use crate::use_cases::session::TurnError;

fn setup() -> SessionSetup {
    SessionSetup::parse("Dark fantasy", "Hard", "Rogue").unwrap()
}

fn describe(text: &str) -> ActionDescription {
    ActionDescription::new(text).unwrap()
}

#[tokio::test]
async fn echo_narrator_first_turn() {
    let llm = Arc::new(EchoLlm::default());
    let test = TestAppBuilder::new().with_llm(llm.clone()).build();
    let sessions = &test.app.use_cases.session;

    let session = sessions.create.execute(setup()).await.unwrap();
    assert!(session.initial_scenario().contains("Theme: Dark fantasy"));
    assert!(session.initial_scenario().contains("Player Class: Rogue"));

    let action = sessions
        .execute_action
        .execute(session.token(), "d6", describe("open the door"))
        .await
        .unwrap();

    assert_eq!(action.order(), 1);
    assert_eq!(action.dice_type(), DiceType::D6);
    assert!((1..=6).contains(&action.dice_result()));
    assert!(action.narration().contains("open the door"));
    assert!(action.narration().contains(action.outcome().label()));
    assert!(action
        .narration()
        .contains(&format!("Initial Scenario: {}", session.initial_scenario())));
    assert_eq!(llm.calls(), 2);

    let view = sessions
        .get_view
        .execute(session.token())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.actions, vec![action.clone()]);
    assert_eq!(view.session.current_context(), action.narration());
    assert_eq!(view.session.initial_scenario(), session.initial_scenario());
}

#[tokio::test]
async fn sequential_turns_are_numbered_without_gaps() {
    let test = TestAppBuilder::new().build();
    let sessions = &test.app.use_cases.session;
    let session = sessions.create.execute(setup()).await.unwrap();

    for (i, dice) in ["d4", "d8", "d10", "d12", "d20"].iter().enumerate() {
        let action = sessions
            .execute_action
            .execute(session.token(), dice, describe(&format!("step {}", i + 1)))
            .await
            .unwrap();
        assert_eq!(action.order() as usize, i + 1);
    }

    let view = sessions
        .get_view
        .execute(session.token())
        .await
        .unwrap()
        .unwrap();
    let orders: Vec<u32> = view.actions.iter().map(Action::order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    assert_eq!(view.session.action_count(), 5);
}

#[tokio::test]
async fn each_turn_sees_all_prior_turns_in_order() {
    let test = TestAppBuilder::new().build();
    let sessions = &test.app.use_cases.session;
    let session = sessions.create.execute(setup()).await.unwrap();

    let mut narrations = Vec::new();
    for n in 1..=3 {
        let action = sessions
            .execute_action
            .execute(session.token(), "d20", describe(&format!("move number {}", n)))
            .await
            .unwrap();
        narrations.push(action.narration().to_string());
    }

    // Turn 3 was narrated from a context holding turns 1 and 2.
    let third = &narrations[2];
    let first_entry = third.find("1. Action: move number 1").unwrap();
    let second_entry = third.find("2. Action: move number 2").unwrap();
    assert!(first_entry < second_entry);
    assert!(!third.contains("3. Action:"));

    let turns = test.store.list_for_session(session.token()).await.unwrap();
    assert!(third.contains(&format!(
        "Roll: {} on a d20",
        turns[1].dice_result()
    )));
}

#[tokio::test]
async fn fixed_roll_classifies_outcome() {
    let test = TestAppBuilder::new().with_fixed_roll(16).build();
    let sessions = &test.app.use_cases.session;
    let session = sessions.create.execute(setup()).await.unwrap();

    let action = sessions
        .execute_action
        .execute(session.token(), "d20", describe("leap the chasm"))
        .await
        .unwrap();

    assert_eq!(action.dice_result(), 16);
    assert_eq!(action.outcome(), OutcomeTier::CriticalSuccess);
    assert!(action.narration().contains("Critical Success (spectacular action)"));
}

#[tokio::test]
async fn unreachable_narrator_still_persists_everything() {
    let test = TestAppBuilder::new()
        .with_llm(Arc::new(UnreachableLlm))
        .build();
    let sessions = &test.app.use_cases.session;

    let session = sessions.create.execute(setup()).await.unwrap();
    assert!(!session.initial_scenario().trim().is_empty());

    let action = sessions
        .execute_action
        .execute(session.token(), "d6", describe("open the door"))
        .await
        .unwrap();
    assert!(!action.narration().trim().is_empty());

    let view = sessions
        .get_view
        .execute(session.token())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.actions.len(), 1);
    assert_eq!(view.actions[0].narration(), action.narration());
}

#[tokio::test]
async fn unknown_dice_under_each_policy() {
    let lenient = TestAppBuilder::new().build();
    let session = lenient
        .app
        .use_cases
        .session
        .create
        .execute(setup())
        .await
        .unwrap();
    let action = lenient
        .app
        .use_cases
        .session
        .execute_action
        .execute(session.token(), "coin", describe("flip it"))
        .await
        .unwrap();
    assert_eq!(action.dice_type(), DiceType::D20);

    let strict = TestAppBuilder::new()
        .with_config(EngineConfig {
            dice_policy: DicePolicy::Strict,
            ..EngineConfig::default()
        })
        .build();
    let session = strict
        .app
        .use_cases
        .session
        .create
        .execute(setup())
        .await
        .unwrap();
    let err = strict
        .app
        .use_cases
        .session
        .execute_action
        .execute(session.token(), "coin", describe("flip it"))
        .await
        .unwrap_err();
    assert!(matches!(err, TurnError::InvalidDice(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_turns_on_one_session_get_distinct_orders() {
    let test = TestAppBuilder::new().build();
    let session = test
        .app
        .use_cases
        .session
        .create
        .execute(setup())
        .await
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = Arc::clone(&test.app);
            let token = session.token().clone();
            tokio::spawn(async move {
                app.use_cases
                    .session
                    .execute_action
                    .execute(&token, "d6", describe(&format!("racer {}", i)))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let turns = test.store.list_for_session(session.token()).await.unwrap();
    let orders: Vec<u32> = turns.iter().map(Action::order).collect();
    assert_eq!(orders, (1..=8).collect::<Vec<u32>>());
}

#[tokio::test]
async fn sessions_are_independent() {
    let test = TestAppBuilder::new().build();
    let sessions = &test.app.use_cases.session;
    let a = sessions.create.execute(setup()).await.unwrap();
    let b = sessions.create.execute(setup()).await.unwrap();
    assert_ne!(a.token(), b.token());

    sessions
        .execute_action
        .execute(a.token(), "d6", describe("only in a"))
        .await
        .unwrap();
    let first_in_b = sessions
        .execute_action
        .execute(b.token(), "d6", describe("only in b"))
        .await
        .unwrap();

    assert_eq!(first_in_b.order(), 1);
    assert!(!first_in_b.narration().contains("only in a"));
    assert_eq!(test.store.session_count(), 2);
}

async fn seeded_sqlite_app(path: &str) -> (App, Arc<SqliteSessionStore>) {
    let store = Arc::new(SqliteSessionStore::new(path).await.unwrap());
    let app = App::new(
        Repositories::shared(store.clone()),
        Arc::new(EchoLlm::default()),
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap())),
        Arc::new(SeededRandom::new(42)),
        &EngineConfig::default(),
    );
    (app, store)
}

#[tokio::test]
async fn restarted_seeded_app_keeps_existing_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.db");
    let path = path.to_string_lossy();

    let first = {
        let (app, _store) = seeded_sqlite_app(&path).await;
        let sessions = &app.use_cases.session;
        let session = sessions
            .create
            .execute(SessionSetup::parse("Pirates", "Normal", "Navigator").unwrap())
            .await
            .unwrap();
        sessions
            .execute_action
            .execute(session.token(), "d20", describe("raise the sails"))
            .await
            .unwrap();
        session
    };

    let (app, store) = seeded_sqlite_app(&path).await;
    let second = app
        .use_cases
        .session
        .create
        .execute(SessionSetup::parse("Space horror", "Hard", "Engineer").unwrap())
        .await
        .unwrap();

    assert_ne!(first.token(), second.token());

    let kept = store.get(first.token()).await.unwrap().unwrap();
    assert_eq!(kept.theme().as_str(), "Pirates");
    assert_eq!(kept.initial_scenario(), first.initial_scenario());
    assert_eq!(store.list_for_session(first.token()).await.unwrap().len(), 1);

    let fresh = store.get(second.token()).await.unwrap().unwrap();
    assert_eq!(fresh.theme().as_str(), "Space horror");
    assert!(store.list_for_session(second.token()).await.unwrap().is_empty());
}
