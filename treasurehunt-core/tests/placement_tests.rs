// File: treasurehunt-core/tests/placement_tests.rs

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use treasurehunt_core::cache::TreasureCache;
use treasurehunt_core::models::{BlockLocation, PlacementOutcome};
use treasurehunt_core::repositories::TreasureStore;
use treasurehunt_core::services::PlacementCoordinator;
use treasurehunt_core::test_utils::helpers::{player, RecordingHost};
use test_utils::{default_messages, resolve, unavailable, MockRepo};

const TIMEOUT: Duration = Duration::from_secs(30);

fn coordinator(repo: MockRepo, host: &Arc<RecordingHost>) -> (Arc<PlacementCoordinator>, Arc<TreasureCache>) {
    let cache = Arc::new(TreasureCache::new());
    let coordinator = Arc::new(PlacementCoordinator::new(
        TreasureStore::new(Arc::new(repo)),
        Arc::clone(&cache),
        host.clone(),
        default_messages(),
        Handle::current(),
    ));
    (coordinator, cache)
}

fn accepting_repo() -> MockRepo {
    let mut repo = MockRepo::new();
    repo.expect_upsert_treasure().returning(|_| Ok(()));
    repo
}

fn spot() -> BlockLocation {
    BlockLocation::new("world", 10, 64, 20)
}

#[tokio::test(start_paused = true)]
async fn test_begin_placement_shows_countdown() {
    let host = RecordingHost::new();
    let (coordinator, _) = coordinator(MockRepo::new(), &host);
    let admin = player("Admin");

    let _expiry = coordinator.begin_placement(&admin, "chest1", "give %player% diamond 1", TIMEOUT);

    assert!(coordinator.is_pending(admin.id));
    let pending = coordinator.pending_for(admin.id).expect("pending entry");
    assert_eq!(pending.treasure_id, "chest1");
    assert_eq!(pending.command, "give %player% diamond 1");

    let titles = host.titles_for(&admin);
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0].2, 30);
    assert_eq!(
        host.last_message_for(&admin),
        Some(resolve("create.info-message", &[("seconds", "30")]))
    );
}

#[tokio::test(start_paused = true)]
async fn test_click_before_timeout_places_and_disarms_expiry() {
    let host = RecordingHost::new();
    let (coordinator, cache) = coordinator(accepting_repo(), &host);
    let admin = player("Admin");

    let expiry = coordinator.begin_placement(&admin, "chest1", "give %player% diamond 1", TIMEOUT);
    tokio::time::advance(Duration::from_secs(5)).await;

    let placing = coordinator
        .on_world_interaction(&admin, &spot())
        .expect("click should be consumed by placement");
    let outcome = placing.await.expect("placement task");

    match outcome {
        PlacementOutcome::Placed(treasure) => {
            assert_eq!(treasure.treasure_id, "chest1");
            assert_eq!(treasure.location, spot());
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(!coordinator.is_pending(admin.id));
    assert!(cache.lookup_by_location("world", 10, 64, 20).is_some());
    assert_eq!(
        host.last_message_for(&admin),
        Some(resolve(
            "create.success",
            &[("id", "chest1"), ("world", "world"), ("x", "10"), ("y", "64"), ("z", "20")],
        ))
    );

    // timer still fires, but finds nothing left to expire
    assert_eq!(expiry.await.expect("expiry task"), None);
    let timeout_text = resolve("create.timeout", &[]);
    assert!(!host.messages_for(&admin).contains(&timeout_text));
    assert_eq!(host.cleared_titles_for(&admin), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_before_click_expires_and_ignores_click() {
    let host = RecordingHost::new();
    // no upsert expectation: a store write here would panic the mock
    let (coordinator, cache) = coordinator(MockRepo::new(), &host);
    let admin = player("Admin");

    let expiry = coordinator.begin_placement(&admin, "chest1", "say hi", TIMEOUT);
    tokio::time::advance(TIMEOUT + Duration::from_secs(1)).await;

    assert_eq!(
        expiry.await.expect("expiry task"),
        Some(PlacementOutcome::Expired { treasure_id: "chest1".to_string() })
    );
    assert!(!coordinator.is_pending(admin.id));
    assert_eq!(host.last_message_for(&admin), Some(resolve("create.timeout", &[])));

    assert!(coordinator.on_world_interaction(&admin, &spot()).is_none());
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_click_and_timer_racing_yield_one_outcome() {
    let host = RecordingHost::new();
    let (coordinator, _) = coordinator(accepting_repo(), &host);
    let admin = player("Admin");

    let expiry = coordinator.begin_placement(&admin, "chest1", "say hi", TIMEOUT);
    tokio::time::advance(TIMEOUT).await;

    // timer and click are both ready now
    let click = {
        let coordinator = Arc::clone(&coordinator);
        let admin = admin.clone();
        tokio::spawn(async move {
            match coordinator.on_world_interaction(&admin, &spot()) {
                Some(placing) => Some(placing.await.expect("placement task")),
                None => None,
            }
        })
    };

    let expired = expiry.await.expect("expiry task");
    let placed = click.await.expect("click task");

    let terminal = [expired.is_some(), placed.is_some()];
    assert_eq!(terminal.iter().filter(|t| **t).count(), 1, "expired={:?} placed={:?}", expired, placed);
    assert!(!coordinator.is_pending(admin.id));
}

#[tokio::test(start_paused = true)]
async fn test_newer_request_is_not_expired_by_older_timer() {
    let host = RecordingHost::new();
    let (coordinator, _) = coordinator(MockRepo::new(), &host);
    let admin = player("Admin");

    let first = coordinator.begin_placement(&admin, "chest1", "say one", Duration::from_secs(10));
    tokio::time::advance(Duration::from_secs(5)).await;
    let second = coordinator.begin_placement(&admin, "chest2", "say two", Duration::from_secs(10));

    assert_eq!(first.await.expect("first timer"), None);
    let pending = coordinator.pending_for(admin.id).expect("second request still pending");
    assert_eq!(pending.treasure_id, "chest2");

    assert_eq!(
        second.await.expect("second timer"),
        Some(PlacementOutcome::Expired { treasure_id: "chest2".to_string() })
    );
    assert!(!coordinator.is_pending(admin.id));
}

#[tokio::test(start_paused = true)]
async fn test_failed_store_write_still_clears_pending() {
    let host = RecordingHost::new();
    let mut repo = MockRepo::new();
    repo.expect_upsert_treasure().times(1).returning(|_| Err(unavailable()));
    let (coordinator, cache) = coordinator(repo, &host);
    let admin = player("Admin");

    let _expiry = coordinator.begin_placement(&admin, "chest1", "say hi", TIMEOUT);
    let outcome = coordinator
        .on_world_interaction(&admin, &spot())
        .expect("click should be consumed by placement")
        .await
        .expect("placement task");

    assert_eq!(outcome, PlacementOutcome::Failed { treasure_id: "chest1".to_string() });
    assert!(!coordinator.is_pending(admin.id));
    assert!(cache.is_empty());
    assert_eq!(host.last_message_for(&admin), Some(resolve("create.error", &[])));
    assert_eq!(host.cleared_titles_for(&admin), 1);
}

#[tokio::test(start_paused = true)]
async fn test_other_players_clicks_are_ignored() {
    let host = RecordingHost::new();
    let (coordinator, _) = coordinator(MockRepo::new(), &host);
    let admin = player("Admin");
    let bystander = player("Bystander");

    let _expiry = coordinator.begin_placement(&admin, "chest1", "say hi", TIMEOUT);

    assert!(coordinator.on_world_interaction(&bystander, &spot()).is_none());
    assert!(coordinator.is_pending(admin.id));
}
