//! Integration tests for `SqliteStore` and the engine built on top of it,
//! against an in-memory database.

use std::sync::Arc;

use ludz_core::{
  Error,
  catalog::{Catalog, Tier},
  draw::Randomizer,
  egg::{EGG_FORFEIT_DESCRIPTION, EggGate, LEVEL3_FORFEIT},
  event::{EventFilter, EventKind, NewEvent},
  ledger::Ledger,
  participant::NewParticipant,
  roster::{BulkOutcome, Roster},
  score::{Scorer, leaderboard_etag},
  store::{StagStore, StoreError},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> Arc<SqliteStore> {
  Arc::new(
    SqliteStore::open_in_memory()
      .await
      .expect("in-memory store"),
  )
}

struct Engine {
  store:  Arc<SqliteStore>,
  roster: Roster<SqliteStore>,
  ledger: Ledger<SqliteStore>,
  scorer: Scorer<SqliteStore>,
}

async fn engine() -> Engine {
  let store = store().await;
  Engine {
    roster: Roster::new(store.clone()),
    ledger: Ledger::new(store.clone()),
    scorer: Scorer::new(store.clone()),
    store,
  }
}

async fn ledger_len(store: &SqliteStore) -> usize {
  store.select_events(EventFilter::default()).await.unwrap().len()
}

// ─── Raw store ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_participant() {
  let s = store().await;
  let p = s
    .insert_participant(NewParticipant { name: "Max".into(), codename: "Wolf".into() })
    .await
    .unwrap();

  let fetched = s.get_participant(p.participant_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Max");
  assert_eq!(fetched.codename, "Wolf");

  assert!(s.get_participant(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_codename_is_a_conflict_at_the_store() {
  let s = store().await;
  s.insert_participant(NewParticipant { name: "Max".into(), codename: "Wolf".into() })
    .await
    .unwrap();
  let err = s
    .insert_participant(NewParticipant { name: "Otto".into(), codename: "Wolf".into() })
    .await
    .unwrap_err();
  assert!(err.is_conflict(), "{err}");
  assert!(matches!(Error::from_store(err), Error::Conflict(_)));
}

#[tokio::test]
async fn events_come_back_in_append_order_with_filters() {
  let e = engine().await;
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();
  let otto = e.roster.register_participant("Otto", "Bear").await.unwrap();
  let pub_a = e.roster.register_pub("Augustiner").await.unwrap();

  let descriptions = ["one", "two", "three", "four"];
  for (i, d) in descriptions.iter().enumerate() {
    let who = if i % 2 == 0 { max.participant_id } else { otto.participant_id };
    let mut input = NewEvent::challenge(who, *d);
    if i >= 2 {
      input = input.at_pub(pub_a.pub_id);
    }
    e.ledger.record_event(input).await.unwrap();
  }

  let all = e.ledger.all_events().await.unwrap();
  let order: Vec<_> = all.iter().map(|ev| ev.description.as_str()).collect();
  assert_eq!(order, descriptions);

  let maxs = e.ledger.events_for(max.participant_id, None).await.unwrap();
  assert_eq!(maxs.iter().map(|ev| ev.description.as_str()).collect::<Vec<_>>(), ["one", "three"]);

  let at_pub = e.ledger.events_for(max.participant_id, Some(pub_a.pub_id)).await.unwrap();
  assert_eq!(at_pub.len(), 1);
  assert_eq!(at_pub[0].description, "three");

  let filter = EventFilter { participant_id: None, pub_id: Some(pub_a.pub_id) };
  let selected = e.store.select_events(filter).await.unwrap();
  assert_eq!(selected.len(), 2);
  assert!(all.iter().filter(|ev| filter.matches(ev)).eq(selected.iter()));
}

#[tokio::test]
async fn egg_put_is_an_upsert() {
  let s = store().await;
  assert!(s.get_egg(LEVEL3_FORFEIT.to_owned()).await.unwrap().is_none());

  let gate = EggGate::new(s.clone());
  gate.set(LEVEL3_FORFEIT, true).await.unwrap();
  gate.set(LEVEL3_FORFEIT, false).await.unwrap();

  let egg = s.get_egg(LEVEL3_FORFEIT.to_owned()).await.unwrap().unwrap();
  assert!(!egg.solved);
}

// ─── Roster ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_list_round_trip() {
  let e = engine().await;
  let entry = NewParticipant::parse_line("Max ; Wolf", ';').unwrap();
  e.roster.register_participant(&entry.name, &entry.codename).await.unwrap();

  let listed = e.roster.list_participants().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].name, "Max");
  assert_eq!(listed[0].codename, "Wolf");

  let dup = NewParticipant::parse_line("Otto ; Wolf", ';').unwrap();
  let err = e.roster.register_participant(&dup.name, &dup.codename).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
  assert_eq!(e.roster.list_participants().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_name_rejected() {
  let e = engine().await;
  e.roster.register_participant("Max", "Wolf").await.unwrap();
  let err = e.roster.register_participant("  Max ", "Fox").await.unwrap_err();
  assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn blank_registrations_are_invalid() {
  let e = engine().await;
  assert!(matches!(
    e.roster.register_participant("   ", "Wolf").await,
    Err(Error::InvalidArgument(_))
  ));
  assert!(matches!(
    e.roster.register_participant("Max", "").await,
    Err(Error::InvalidArgument(_))
  ));
  assert!(matches!(e.roster.register_pub(" \t").await, Err(Error::InvalidArgument(_))));
  assert!(e.roster.list_participants().await.unwrap().is_empty());
  assert!(e.roster.list_pubs().await.unwrap().is_empty());
}

#[tokio::test]
async fn bulk_register_mixed_lines() {
  let e = engine().await;
  let outcome = e
    .roster
    .bulk_register("A;B\nno-delimiter\n ; \n", ';')
    .await
    .unwrap();
  assert_eq!(outcome, BulkOutcome { registered: 1, skipped: 2 });

  let listed = e.roster.list_participants().await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].name, "A");
  assert_eq!(listed[0].codename, "B");
}

#[tokio::test]
async fn bulk_register_skips_duplicates_and_honours_delimiter() {
  let e = engine().await;
  e.roster.register_participant("Max", "Wolf").await.unwrap();

  let outcome = e
    .roster
    .bulk_register("Otto | Bear\n\nMax | Hawk\nJonas | Wolf\nLena;Owl", '|')
    .await
    .unwrap();
  assert_eq!(outcome, BulkOutcome { registered: 1, skipped: 3 });
  assert_eq!(e.roster.list_participants().await.unwrap().len(), 2);
}

#[tokio::test]
async fn participants_listed_by_codename() {
  let e = engine().await;
  e.roster.register_participant("Zed", "Aardvark").await.unwrap();
  e.roster.register_participant("Amy", "Zebra").await.unwrap();
  e.roster.register_participant("Kai", "Mole").await.unwrap();

  let codenames: Vec<_> = e
    .roster
    .list_participants()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.codename)
    .collect();
  assert_eq!(codenames, ["Aardvark", "Mole", "Zebra"]);
}

#[tokio::test]
async fn pub_rules_append_with_duplicates() {
  let e = engine().await;
  let venue = e.roster.register_pub(" Hofbräuhaus ").await.unwrap();
  assert_eq!(venue.name, "Hofbräuhaus");

  e.roster.add_pub_rule(venue.pub_id, "Silent Cheers").await.unwrap();
  e.roster.add_pub_rule(venue.pub_id, "Left-Hand Rule").await.unwrap();
  e.roster.add_pub_rule(venue.pub_id, "Silent Cheers").await.unwrap();

  let rules: Vec<_> = e
    .roster
    .pub_rules(venue.pub_id)
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.text)
    .collect();
  assert_eq!(rules, ["Silent Cheers", "Left-Hand Rule", "Silent Cheers"]);
}

#[tokio::test]
async fn pub_rule_for_unknown_pub_is_not_found() {
  let e = engine().await;
  let err = e.roster.add_pub_rule(Uuid::new_v4(), "Silent Cheers").await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert!(matches!(e.roster.pub_rules(Uuid::new_v4()).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn rolled_pub_rule_comes_from_catalog() {
  let e = engine().await;
  let venue = e.roster.register_pub("Augustiner").await.unwrap();
  let randomizer = Randomizer::with_seed(Arc::new(Catalog::builtin()), 3);

  let text = randomizer.draw_pub_rule().unwrap();
  let rule = e.roster.add_pub_rule(venue.pub_id, &text).await.unwrap();
  assert!(randomizer.catalog().pub_rules().contains(&rule.text));
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_participant_is_not_found_and_appends_nothing() {
  let e = engine().await;
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();
  e.ledger
    .record_event(NewEvent::challenge(max.participant_id, "Sing"))
    .await
    .unwrap();
  let before = ledger_len(&e.store).await;

  let err = e
    .ledger
    .record_event(NewEvent::forfeit(Uuid::new_v4(), Tier::Tier1, "Shot"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert_eq!(ledger_len(&e.store).await, before);
}

#[tokio::test]
async fn unknown_pub_is_not_found_and_appends_nothing() {
  let e = engine().await;
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();

  let err = e
    .ledger
    .record_event(NewEvent::challenge(max.participant_id, "Sing").at_pub(Uuid::new_v4()))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert_eq!(ledger_len(&e.store).await, 0);
}

#[tokio::test]
async fn forfeit_without_tier_is_invalid() {
  let e = engine().await;
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();

  let mut input = NewEvent::forfeit(max.participant_id, Tier::Tier2, "Hat");
  input.tier = None;
  let err = e.ledger.record_event(input).await.unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));

  let err = e
    .ledger
    .record_event(NewEvent::challenge(max.participant_id, "   "))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));
  assert_eq!(ledger_len(&e.store).await, 0);
}

#[tokio::test]
async fn challenge_tier_is_dropped() {
  let e = engine().await;
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();

  let mut input = NewEvent::challenge(max.participant_id, "Accent Round");
  input.tier = Some(Tier::Tier3);
  let event = e.ledger.record_event(input).await.unwrap();
  assert_eq!(event.kind, EventKind::Challenge);
  assert!(event.tier.is_none());

  let stored = e.ledger.events_for(max.participant_id, None).await.unwrap();
  assert_eq!(stored, [event]);
  assert_eq!(e.scorer.score(max.participant_id).await.unwrap(), 0);
}

// ─── Scorer ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn score_sums_tier_weights() {
  let e = engine().await;
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();

  for tier in [Tier::Tier1, Tier::Tier1, Tier::Tier3] {
    e.ledger
      .record_event(NewEvent::forfeit(max.participant_id, tier, "Forfeit"))
      .await
      .unwrap();
  }
  e.ledger
    .record_event(NewEvent::challenge(max.participant_id, "Silent Selfie"))
    .await
    .unwrap();

  assert_eq!(e.scorer.score(max.participant_id).await.unwrap(), 11);

  let history = e.scorer.history(max.participant_id).await.unwrap();
  assert_eq!(history.forfeits.len(), 3);
  assert_eq!(history.challenges.len(), 1);
  assert_eq!(
    history.forfeits.iter().map(|f| f.tier).collect::<Vec<_>>(),
    [Some(Tier::Tier1), Some(Tier::Tier1), Some(Tier::Tier3)]
  );
}

#[tokio::test]
async fn leaderboard_orders_and_is_repeatable() {
  let e = engine().await;
  let a = e.roster.register_participant("Anna", "A").await.unwrap();
  let b = e.roster.register_participant("Ben", "B").await.unwrap();
  let c = e.roster.register_participant("Carl", "C").await.unwrap();
  let d = e.roster.register_participant("Dora", "D").await.unwrap();

  let forfeits = [
    (&a, Tier::Tier2),
    (&a, Tier::Tier1),
    (&a, Tier::Tier1),
    (&b, Tier::Tier3),
    (&c, Tier::Tier2),
    (&c, Tier::Tier2),
    (&c, Tier::Tier2),
  ];
  for (p, tier) in forfeits {
    e.ledger
      .record_event(NewEvent::forfeit(p.participant_id, tier, "Forfeit"))
      .await
      .unwrap();
  }
  e.ledger
    .record_event(NewEvent::challenge(d.participant_id, "Mystery Round"))
    .await
    .unwrap();

  let participants = e.roster.list_participants().await.unwrap();
  let first = e.scorer.leaderboard(&participants).await.unwrap();
  let order: Vec<_> = first.iter().map(|s| (s.codename.as_str(), s.score)).collect();
  assert_eq!(order, [("B", 9), ("C", 9), ("A", 5), ("D", 0)]);

  let second = e.scorer.leaderboard(&participants).await.unwrap();
  assert_eq!(first, second);
  assert_eq!(leaderboard_etag(&first), leaderboard_etag(&second));
}

#[tokio::test]
async fn full_roll_flow() {
  let e = engine().await;
  let randomizer = Randomizer::with_seed(Arc::new(Catalog::builtin()), 11);
  e.roster.bulk_register("Max;Wolf\nOtto;Bear", ';').await.unwrap();
  let venue = e.roster.register_pub("Augustiner").await.unwrap();

  let participants = e.roster.list_participants().await.unwrap();
  let victim = randomizer.pick_participant(&participants).unwrap();
  let challenge = randomizer.draw_challenge().unwrap();
  e.ledger
    .record_event(NewEvent::challenge(victim.participant_id, challenge).at_pub(venue.pub_id))
    .await
    .unwrap();

  let entry = randomizer.draw_forfeit(Tier::Tier2).unwrap();
  e.ledger
    .record_event(NewEvent::forfeit(victim.participant_id, entry.tier, entry.summary()))
    .await
    .unwrap();

  let board = e.scorer.leaderboard(&participants).await.unwrap();
  assert_eq!(board[0].participant_id, victim.participant_id);
  assert_eq!(board[0].score, 3);
  assert_eq!(board[1].score, 0);
}

// ─── Easter egg ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn egg_unlocks_once() {
  let s = store().await;
  let gate = EggGate::new(s.clone());

  assert!(!gate.status(LEVEL3_FORFEIT).await.unwrap().solved);
  gate.unlock(LEVEL3_FORFEIT).await.unwrap();
  assert!(gate.status(LEVEL3_FORFEIT).await.unwrap().solved);
  assert!(matches!(gate.unlock(LEVEL3_FORFEIT).await, Err(Error::Conflict(_))));

  // Admin reset re-arms it.
  gate.set(LEVEL3_FORFEIT, false).await.unwrap();
  gate.unlock(LEVEL3_FORFEIT).await.unwrap();
}

#[tokio::test]
async fn concurrent_unlocks_admit_exactly_one() {
  let s = store().await;
  let gate = EggGate::new(s.clone());

  let (first, second) =
    tokio::join!(gate.unlock(LEVEL3_FORFEIT), gate.unlock(LEVEL3_FORFEIT));
  let winners = [&first, &second].iter().filter(|r| r.is_ok()).count();
  assert_eq!(winners, 1, "first={first:?} second={second:?}");
  assert!(
    matches!(first, Err(Error::Conflict(_))) || matches!(second, Err(Error::Conflict(_)))
  );
  assert!(gate.status(LEVEL3_FORFEIT).await.unwrap().solved);
}

#[tokio::test]
async fn concurrent_claims_award_one_forfeit() {
  let e = engine().await;
  let gate = EggGate::new(e.store.clone());
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();
  let otto = e.roster.register_participant("Otto", "Bear").await.unwrap();

  let (a, b) = tokio::join!(
    gate.claim(LEVEL3_FORFEIT, max.participant_id),
    gate.claim(LEVEL3_FORFEIT, otto.participant_id),
  );
  assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);

  let events = e.ledger.all_events().await.unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].kind, EventKind::Forfeit);
  assert_eq!(events[0].tier, Some(Tier::Tier3));
  assert_eq!(events[0].description, EGG_FORFEIT_DESCRIPTION);
}

#[tokio::test]
async fn failed_claim_writes_nothing() {
  let e = engine().await;
  let gate = EggGate::new(e.store.clone());
  let max = e.roster.register_participant("Max", "Wolf").await.unwrap();

  let unknown = gate.claim(LEVEL3_FORFEIT, Uuid::new_v4()).await;
  assert!(matches!(unknown, Err(Error::NotFound(_))));
  assert!(!gate.status(LEVEL3_FORFEIT).await.unwrap().solved);

  gate.set(LEVEL3_FORFEIT, true).await.unwrap();
  let solved = gate.claim(LEVEL3_FORFEIT, max.participant_id).await;
  assert!(matches!(solved, Err(Error::Conflict(_))));
  assert!(e.ledger.all_events().await.unwrap().is_empty());
}
