//! End-to-end round flow: guard, cache reuse, state machine outcomes.

use quiz_core::testing::MockTransport;
use quiz_core::{EntryDecision, GameRound, RoundConfig, RoundState, Session};
use tmdb::Client;
use tokio_util::sync::CancellationToken;

/// Two stubbed pages sharing id 1: three distinct movies overall.
fn stub_small_catalog(transport: &MockTransport) {
    transport.stub_catalog_page(1, &[(1, "The Godfather"), (2, "Seven Samurai")]);
    transport.stub_catalog_page(2, &[(1, "The Godfather"), (3, "City Lights")]);
    transport.stub_images(1, &["/godfather-1.jpg", "/godfather-2.jpg"]);
    transport.stub_images(2, &["/samurai-1.jpg"]);
}

fn small_config() -> RoundConfig {
    RoundConfig::new().with_page_count(2).with_round_size(24)
}

#[tokio::test]
async fn missing_identity_redirects_without_network_work() {
    let client = Client::new(MockTransport::new());
    let session = Session::new();
    let mut round = GameRound::new(small_config());

    let decision = round
        .start(&session, &client, &CancellationToken::new())
        .await;

    assert_eq!(decision, EntryDecision::Redirect);
    assert!(matches!(round.state(), RoundState::Idle));
    assert_eq!(client.transport().call_count(), 0);
}

#[tokio::test]
async fn happy_path_reaches_ready_and_records_total() {
    let transport = MockTransport::new();
    stub_small_catalog(&transport);

    let client = Client::new(transport);
    let session = Session::new();
    session.sign_in("Alice").unwrap();

    let mut round = GameRound::new(small_config());
    let decision = round
        .start(&session, &client, &CancellationToken::new())
        .await;

    assert_eq!(decision, EntryDecision::Allow);
    let selection = round.state().selection().expect("round should be ready");
    // Three distinct movies, requested 24: clamped to the corpus size.
    assert_eq!(selection.len(), 3);
    assert_eq!(session.round_total(), Some(3));

    let godfather = selection.iter().find(|item| item.id == 1).unwrap();
    assert_eq!(godfather.backdrop_paths, vec!["/godfather-1.jpg", "/godfather-2.jpg"]);
    let chaplin = selection.iter().find(|item| item.id == 3).unwrap();
    assert!(chaplin.backdrop_paths.is_empty());
}

#[tokio::test]
async fn second_round_reuses_cached_corpus() {
    let transport = MockTransport::new();
    stub_small_catalog(&transport);

    let client = Client::new(transport);
    let session = Session::new();
    session.sign_in("Alice").unwrap();
    let cancel = CancellationToken::new();

    let mut first = GameRound::new(small_config());
    first.start(&session, &client, &cancel).await;
    let calls_after_first = client.transport().call_count();

    let mut second = GameRound::new(small_config());
    second.start(&session, &client, &cancel).await;

    assert!(second.state().selection().is_some());
    assert_eq!(
        client.transport().call_count(),
        calls_after_first,
        "second round must not touch the network"
    );
}

#[tokio::test]
async fn concurrent_builds_aggregate_once() {
    let transport = MockTransport::new();
    stub_small_catalog(&transport);

    let client = Client::new(transport);
    let session = Session::new();
    let cancel = CancellationToken::new();

    let (first, second) = tokio::join!(
        session.cache().get_or_build(&client, 2, &cancel),
        session.cache().get_or_build(&client, 2, &cancel),
    );

    assert_eq!(first.unwrap().len(), 3);
    assert_eq!(second.unwrap().len(), 3);
    assert_eq!(
        client.transport().catalog_page_calls(),
        2,
        "the second caller must await the first build, not start its own"
    );
}

#[tokio::test]
async fn mid_run_failure_is_terminal_and_leaves_cache_unset() {
    let transport = MockTransport::new();
    transport.stub_catalog_page(1, &[(1, "A")]);
    transport.fail_catalog_page(2);
    transport.stub_catalog_page(3, &[(3, "C")]);

    let client = Client::new(transport);
    let session = Session::new();
    session.sign_in("Alice").unwrap();

    let mut round = GameRound::new(RoundConfig::new().with_page_count(3));
    round
        .start(&session, &client, &CancellationToken::new())
        .await;

    assert!(round.state().failure().is_some());
    assert!(
        !session.cache().is_populated(),
        "a partial corpus must never be cached"
    );
    assert!(session.round_total().is_none());
}

#[tokio::test]
async fn empty_catalog_surfaces_as_empty_state() {
    // Nothing stubbed: every page reads as an empty result list.
    let client = Client::new(MockTransport::new());
    let session = Session::new();
    session.sign_in("Alice").unwrap();

    let mut round = GameRound::new(small_config());
    round
        .start(&session, &client, &CancellationToken::new())
        .await;

    assert!(matches!(round.state(), RoundState::Empty));
}

#[tokio::test]
async fn empty_corpus_is_refetched_on_the_next_round() {
    let client = Client::new(MockTransport::new());
    let session = Session::new();
    session.sign_in("Alice").unwrap();
    let cancel = CancellationToken::new();

    let mut first = GameRound::new(small_config());
    first.start(&session, &client, &cancel).await;
    assert!(matches!(first.state(), RoundState::Empty));
    let calls_after_first = client.transport().catalog_page_calls();

    let mut second = GameRound::new(small_config());
    second.start(&session, &client, &cancel).await;

    assert_eq!(
        client.transport().catalog_page_calls(),
        calls_after_first * 2,
        "an empty corpus is not a cache hit"
    );
}

#[tokio::test]
async fn reset_invalidates_cache_and_identity() {
    let transport = MockTransport::new();
    stub_small_catalog(&transport);

    let client = Client::new(transport);
    let session = Session::new();
    session.sign_in("Alice").unwrap();
    let cancel = CancellationToken::new();

    let mut round = GameRound::new(small_config());
    round.start(&session, &client, &cancel).await;
    assert!(session.cache().is_populated());

    session.reset();
    assert!(!session.cache().is_populated());

    // Without a fresh sign-in the guard refuses entry again.
    let mut next = GameRound::new(small_config());
    let decision = next.start(&session, &client, &cancel).await;
    assert_eq!(decision, EntryDecision::Redirect);

    session.sign_in("Bob").unwrap();
    next.start(&session, &client, &cancel).await;
    assert!(next.state().selection().is_some());
    assert_eq!(
        client.transport().catalog_page_calls(),
        4,
        "reset must force a re-aggregation"
    );
}

#[tokio::test]
async fn cancellation_discards_the_round() {
    let transport = MockTransport::new();
    stub_small_catalog(&transport);

    let client = Client::new(transport);
    let session = Session::new();
    session.sign_in("Alice").unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut round = GameRound::new(small_config());
    let decision = round.start(&session, &client, &cancel).await;

    assert_eq!(decision, EntryDecision::Allow);
    assert!(matches!(round.state(), RoundState::Idle));
    assert!(!session.cache().is_populated());
    assert!(session.round_total().is_none());
}
