//! Multi-context behavior: fan-out, ordering, reactions, reload.

use std::time::Duration;

use nexachat::store::{BlobStore, DurableStore, MemoryStore, SqliteStore, DEFAULT_STORAGE_KEY};
use nexachat::{ChatConfig, ChatContext};
use nexachat_testkit::{init_tracing, pump_all, text_message, texts, TestNetwork};

#[tokio::test]
async fn empty_send_is_noop() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;
    let mut bob = net.context("Bob").await?;

    assert_eq!(alice.send("Alice", Some(""), None).await?, None);
    assert_eq!(bob.pump().await?, 0);

    assert!(alice.messages().is_empty());
    assert!(bob.messages().is_empty());
    Ok(())
}

#[tokio::test]
async fn local_sends_keep_send_order() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;

    for text in ["m1", "m2", "m3"] {
        alice.say(text).await?;
    }

    assert_eq!(texts(&alice), vec!["m1", "m2", "m3"]);
    Ok(())
}

#[tokio::test]
async fn send_fans_out_without_echo() -> anyhow::Result<()> {
    init_tracing();
    let net = TestNetwork::new();
    let mut contexts = net.contexts(3).await?;

    contexts[0].send("User0", Some("hello"), None).await?;
    let applied = pump_all(&mut contexts).await?;

    assert_eq!(applied, 2);
    for ctx in &contexts {
        assert_eq!(ctx.messages(), &[text_message("User0", "hello")]);
    }
    Ok(())
}

#[tokio::test]
async fn receiver_persists_remote_messages() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let bob_storage = MemoryStore::new();
    let mut alice = net.context("Alice").await?;
    let mut bob = net.context_with_store("Bob", bob_storage.clone()).await?;

    alice.say("persist me").await?;
    bob.pump().await?;

    let saved = DurableStore::new(bob_storage).load().await?;
    assert_eq!(saved, vec![text_message("Alice", "persist me")]);
    Ok(())
}

#[tokio::test]
async fn image_messages_cross_the_bus() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;
    let mut bob = net.context("Bob").await?;

    let image = "data:image/png;base64,iVBORw0KGgo=";
    alice.send("Alice", None, Some(image)).await?;
    bob.pump().await?;

    let got = &bob.messages()[0];
    assert_eq!(got.text, None);
    assert_eq!(got.image.as_deref(), Some(image));
    Ok(())
}

#[tokio::test]
async fn concurrent_sends_order_by_receipt() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;
    let mut bob = net.context("Bob").await?;

    // Both send before either hears the other.
    alice.say("from alice").await?;
    bob.say("from bob").await?;

    alice.pump().await?;
    bob.pump().await?;

    assert_eq!(texts(&alice), vec!["from alice", "from bob"]);
    assert_eq!(texts(&bob), vec!["from bob", "from alice"]);
    Ok(())
}

#[tokio::test]
async fn reactions_stay_local() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;
    let mut bob = net.context("Bob").await?;

    alice.say("react to me").await?;
    bob.pump().await?;

    alice.react(0, "❤️").await?;
    bob.pump().await?;

    assert_eq!(alice.messages()[0].reactions, vec!["❤️"]);
    assert!(bob.messages()[0].reactions.is_empty());
    Ok(())
}

#[tokio::test]
async fn out_of_range_reaction_leaves_log_unchanged() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let storage = MemoryStore::new();
    let mut alice = net.context_with_store("Alice", storage.clone()).await?;
    alice.say("only one").await?;
    let before = storage.get_blob(DEFAULT_STORAGE_KEY).await?;

    let err = alice.react(1, "x").await.unwrap_err();

    assert!(err.is_out_of_range());
    assert!(alice.messages()[0].reactions.is_empty());
    assert_eq!(storage.get_blob(DEFAULT_STORAGE_KEY).await?, before);
    Ok(())
}

#[tokio::test]
async fn scenario_send_react_reload() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let storage = MemoryStore::new();
    let mut ctx = net.context_with_store("Alice", storage.clone()).await?;

    ctx.send("Alice", Some("hi"), None).await?;
    assert_eq!(ctx.messages(), &[text_message("Alice", "hi")]);
    assert_eq!(ctx.messages()[0].image, None);

    ctx.react(0, "👍").await?;
    assert_eq!(ctx.messages()[0].reactions, vec!["👍"]);

    let snapshot = ctx.messages().to_vec();
    drop(ctx);

    let reopened = net.context_with_store("Alice", storage).await?;
    assert_eq!(reopened.messages(), snapshot.as_slice());
    Ok(())
}

#[tokio::test]
async fn late_joiner_catches_up_by_reload() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let shared = MemoryStore::new();
    let mut alice = net.context_with_store("Alice", shared.clone()).await?;

    alice.say("sent while bob was away").await?;

    let mut bob = net.context_with_store("Bob", shared).await?;
    assert_eq!(bob.pump().await?, 0);
    assert_eq!(texts(&bob), vec!["sent while bob was away"]);

    bob.reload().await?;
    assert_eq!(bob.messages(), alice.messages());
    Ok(())
}

#[tokio::test]
async fn closed_context_misses_messages() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;
    let bob = net.context("Bob").await?;
    drop(bob);

    alice.say("nobody listening").await?;

    let mut carol = net.context("Carol").await?;
    assert_eq!(carol.pump().await?, 0);
    assert!(carol.messages().is_empty());
    Ok(())
}

#[tokio::test]
async fn channels_do_not_mix() -> anyhow::Result<()> {
    let room_a = TestNetwork::on_channel("room-a");
    let mut alice = room_a.context("Alice").await?;

    // Same hub, different channel name.
    let config = ChatConfig {
        channel_name: "room-b".to_string(),
        ..ChatConfig::default()
    };
    let mut bob = ChatContext::join(config, MemoryStore::new(), &room_a.hub).await?;

    alice.say("only room a").await?;
    assert_eq!(bob.pump().await?, 0);
    Ok(())
}

#[tokio::test]
async fn resubscribe_drops_undelivered_payloads() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;
    let mut bob = net.context("Bob").await?;

    alice.say("one").await?;
    bob.resubscribe().await?;
    alice.say("two").await?;

    assert_eq!(bob.pump().await?, 1);
    assert_eq!(texts(&bob), vec!["two"]);
    Ok(())
}

#[tokio::test]
async fn run_applies_messages_as_they_arrive() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let mut alice = net.context("Alice").await?;
    let mut bob = net.context("Bob").await?;
    let mut changes = bob.watch();

    alice.say("one").await?;
    alice.say("two").await?;

    // The subscription stays open, so run only returns on timeout.
    let outcome = tokio::time::timeout(Duration::from_millis(50), bob.run()).await;
    assert!(outcome.is_err());

    assert_eq!(texts(&bob), vec!["one", "two"]);
    assert_eq!(*changes.borrow_and_update(), 2);
    assert!(bob.is_subscribed());
    Ok(())
}

#[tokio::test]
async fn corrupt_history_starts_empty() -> anyhow::Result<()> {
    let net = TestNetwork::new();
    let storage = MemoryStore::new();
    storage.put_blob(DEFAULT_STORAGE_KEY, "{\"broken\":").await?;

    let mut ctx = net.context_with_store("Alice", storage.clone()).await?;
    assert!(ctx.messages().is_empty());
    assert!(ctx.recovered_from().is_some());

    ctx.say("fresh start").await?;
    let saved = DurableStore::new(storage).load().await?;
    assert_eq!(saved.len(), 1);
    Ok(())
}

#[tokio::test]
async fn sqlite_backed_contexts_share_history() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("chat.db");
    let net = TestNetwork::new();

    let mut alice = ChatContext::join(net.config.clone(), SqliteStore::open(&path)?, &net.hub)
        .await?
        .with_author("Alice");
    alice.say("stored in sqlite").await?;
    alice.react(0, "👍").await?;
    let expected = alice.messages().to_vec();
    drop(alice);

    let reopened = ChatContext::join(net.config.clone(), SqliteStore::open(&path)?, &net.hub).await?;
    assert_eq!(reopened.messages(), expected.as_slice());
    Ok(())
}
