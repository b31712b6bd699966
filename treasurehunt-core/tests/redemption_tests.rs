// File: treasurehunt-core/tests/redemption_tests.rs

mod test_utils;

use std::sync::Arc;
use futures_util::future::join_all;
use treasurehunt_core::Error;
use treasurehunt_core::cache::TreasureCache;
use treasurehunt_core::models::ClaimOutcome;
use treasurehunt_core::repositories::TreasureStore;
use treasurehunt_core::services::{RedemptionEngine, TreasureService};
use treasurehunt_core::test_utils::helpers::{create_memory_store, player, RecordingHost};
use test_utils::{chest, default_messages, resolve, unavailable, MockRepo};

async fn engine_with_chest(
    host: &Arc<RecordingHost>,
) -> Result<(Arc<RedemptionEngine>, TreasureStore, Arc<TreasureCache>), Error> {
    let store = create_memory_store().await?;
    let cache = Arc::new(TreasureCache::new());
    let treasure = chest("chest1", 10, 64, 20);
    assert!(store.upsert_treasure(treasure.clone()).await);
    cache.put(treasure);

    let engine = Arc::new(RedemptionEngine::new(
        store.clone(),
        Arc::clone(&cache),
        host.clone(),
        default_messages(),
    ));
    Ok((engine, store, cache))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redeem_succeeds_exactly_once() -> Result<(), Error> {
    let host = RecordingHost::new();
    let (engine, store, _) = engine_with_chest(&host).await?;
    let alice = player("Alice");

    let attempts = (0..16).map(|_| {
        let engine = Arc::clone(&engine);
        let alice = alice.clone();
        tokio::spawn(async move { engine.redeem(&alice, "chest1").await })
    });
    let results = join_all(attempts).await;

    let successes = results
        .into_iter()
        .map(|r| r.expect("redeem task"))
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
    assert_eq!(host.dispatched(), vec!["give Alice diamond 1".to_string()]);
    assert_eq!(store.list_players_for_treasure("chest1").await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_redeem_unknown_treasure_records_nothing() -> Result<(), Error> {
    let host = RecordingHost::new();
    let (engine, store, _) = engine_with_chest(&host).await?;
    let alice = player("Alice");

    assert!(!engine.redeem(&alice, "ghost").await);
    assert!(!store.is_redeemed(alice.id, "ghost").await);
    assert!(host.dispatched().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_claim_then_claim_again() -> Result<(), Error> {
    let host = RecordingHost::new();
    let (engine, _, cache) = engine_with_chest(&host).await?;
    let alice = player("Alice");
    let treasure = cache.lookup_by_id("chest1").expect("cached chest");

    assert_eq!(
        engine.claim(&alice, &treasure).await,
        ClaimOutcome::Claimed { treasure_id: "chest1".to_string() }
    );
    assert_eq!(host.last_message_for(&alice), Some(resolve("claim.success", &[("id", "chest1")])));
    assert!(engine.is_redeemed(alice.id, "chest1").await);

    assert_eq!(
        engine.claim(&alice, &treasure).await,
        ClaimOutcome::AlreadyClaimed { treasure_id: "chest1".to_string() }
    );
    assert_eq!(host.last_message_for(&alice), Some(resolve("claim.already-claimed", &[])));
    assert_eq!(host.dispatched().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unredeem_allows_a_second_claim() -> Result<(), Error> {
    let host = RecordingHost::new();
    let (engine, _, _) = engine_with_chest(&host).await?;
    let alice = player("Alice");

    assert!(engine.redeem(&alice, "chest1").await);
    assert!(engine.unredeem(alice.id, "chest1").await);
    assert!(!engine.unredeem(alice.id, "chest1").await);
    assert!(engine.redeem(&alice, "chest1").await);
    assert_eq!(host.dispatched().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_list_redeemers_falls_back_to_uuid() -> Result<(), Error> {
    let host = RecordingHost::new();
    let (engine, _, _) = engine_with_chest(&host).await?;
    let known = player("Known");
    let stranger = player("Stranger");
    host.remember(&known);

    assert!(engine.redeem(&known, "chest1").await);
    assert!(engine.redeem(&stranger, "chest1").await);

    assert_eq!(
        engine.list_redeemers("chest1").await,
        vec!["Known".to_string(), stranger.id.to_string()]
    );
    assert_eq!(engine.list_redeemed(known.id).await, vec!["chest1".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_deleting_treasure_clears_cache_and_redeemers() -> Result<(), Error> {
    let host = RecordingHost::new();
    let (engine, store, cache) = engine_with_chest(&host).await?;
    let treasures = TreasureService::new(store, Arc::clone(&cache));
    let alice = player("Alice");
    assert!(engine.redeem(&alice, "chest1").await);

    assert!(treasures.delete_treasure("chest1").await.is_deleted());
    assert!(cache.lookup_by_location("world", 10, 64, 20).is_none());
    assert!(cache.lookup_by_id("chest1").is_none());
    assert!(engine.list_redeemers("chest1").await.is_empty());
    assert!(!engine.redeem(&alice, "chest1").await);
    Ok(())
}

#[tokio::test]
async fn test_redeem_between_store_delete_and_cache_remove() -> Result<(), Error> {
    let host = RecordingHost::new();
    let (engine, store, cache) = engine_with_chest(&host).await?;
    let alice = player("Alice");

    // store delete committed, cache entry not yet dropped
    assert!(store.delete_treasure("chest1").await.is_deleted());
    assert!(cache.lookup_by_id("chest1").is_some());

    assert!(!engine.redeem(&alice, "chest1").await);
    assert!(host.dispatched().is_empty());
    assert!(store.list_players_for_treasure("chest1").await.is_empty());
    assert!(store.list_redeemed_for_player(alice.id).await.is_empty());

    // a re-created treasure with the same id is still unclaimed
    assert!(store.upsert_treasure(chest("chest1", 10, 64, 20)).await);
    assert!(!engine.is_redeemed(alice.id, "chest1").await);
    assert!(engine.redeem(&alice, "chest1").await);
    assert_eq!(host.dispatched(), vec!["give Alice diamond 1".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_store_failure_never_dispatches() {
    let mut repo = MockRepo::new();
    repo.expect_is_redeemed().returning(|_, _| Err(unavailable()));
    repo.expect_add_redemption().returning(|_, _| Err(unavailable()));
    repo.expect_list_redemptions_for_treasure().returning(|_| Err(unavailable()));

    let host = RecordingHost::new();
    let cache = Arc::new(TreasureCache::new());
    cache.put(chest("chest1", 10, 64, 20));
    let engine = RedemptionEngine::new(
        TreasureStore::new(Arc::new(repo)),
        Arc::clone(&cache),
        host.clone(),
        default_messages(),
    );
    let alice = player("Alice");
    let treasure = cache.lookup_by_id("chest1").expect("cached chest");

    assert_eq!(
        engine.claim(&alice, &treasure).await,
        ClaimOutcome::Failed { treasure_id: "chest1".to_string() }
    );
    assert_eq!(host.last_message_for(&alice), Some(resolve("claim.failed", &[])));
    assert!(host.dispatched().is_empty());
    assert!(engine.list_redeemers("chest1").await.is_empty());
}
