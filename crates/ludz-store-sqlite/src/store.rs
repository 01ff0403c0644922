//! [`SqliteStore`], the SQLite implementation of [`StagStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ludz_core::{
  egg::EasterEgg,
  event::{Event, EventFilter, NewEvent},
  participant::{NewParticipant, Participant, Pub, PubRule},
  store::StagStore,
};

use crate::{
  Result,
  encode::{
    RawEvent, RawParticipant, RawPub, RawPubRule, encode_dt, encode_kind, encode_tier,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Ludz store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StagStore impl ──────────────────────────────────────────────────────────

impl StagStore for SqliteStore {
  type Error = crate::Error;

  // ── Participants ──────────────────────────────────────────────────────────

  async fn insert_participant(&self, input: NewParticipant) -> Result<Participant> {
    let participant = Participant {
      participant_id: Uuid::new_v4(),
      name:           input.name,
      codename:       input.codename,
      created_at:     Utc::now(),
    };

    let id_str   = encode_uuid(participant.participant_id);
    let name     = participant.name.clone();
    let codename = participant.codename.clone();
    let at_str   = encode_dt(participant.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO participants (participant_id, name, codename, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, codename, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(participant)
  }

  async fn get_participant(&self, id: Uuid) -> Result<Option<Participant>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawParticipant> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM participants WHERE participant_id = ?1",
              RawParticipant::COLUMNS
            ),
            rusqlite::params![id_str],
            RawParticipant::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawParticipant::into_participant).transpose()
  }

  async fn list_participants(&self) -> Result<Vec<Participant>> {
    let raws: Vec<RawParticipant> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {} FROM participants", RawParticipant::COLUMNS))?;
        let rows = stmt
          .query_map([], RawParticipant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawParticipant::into_participant).collect()
  }

  // ── Pubs ──────────────────────────────────────────────────────────────────

  async fn insert_pub(&self, name: String) -> Result<Pub> {
    let venue = Pub { pub_id: Uuid::new_v4(), name, created_at: Utc::now() };

    let id_str = encode_uuid(venue.pub_id);
    let name   = venue.name.clone();
    let at_str = encode_dt(venue.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pubs (pub_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(venue)
  }

  async fn get_pub(&self, id: Uuid) -> Result<Option<Pub>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPub> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM pubs WHERE pub_id = ?1", RawPub::COLUMNS),
            rusqlite::params![id_str],
            RawPub::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPub::into_pub).transpose()
  }

  async fn list_pubs(&self) -> Result<Vec<Pub>> {
    let raws: Vec<RawPub> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {} FROM pubs", RawPub::COLUMNS))?;
        let rows = stmt
          .query_map([], RawPub::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPub::into_pub).collect()
  }

  // ── Pub rules ─────────────────────────────────────────────────────────────

  async fn insert_pub_rule(&self, pub_id: Uuid, text: String) -> Result<PubRule> {
    let rule = PubRule { rule_id: Uuid::new_v4(), pub_id, text, recorded_at: Utc::now() };

    let rule_id_str = encode_uuid(rule.rule_id);
    let pub_id_str  = encode_uuid(pub_id);
    let text        = rule.text.clone();
    let at_str      = encode_dt(rule.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pub_rules (rule_id, pub_id, text, recorded_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![rule_id_str, pub_id_str, text, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(rule)
  }

  async fn select_pub_rules(&self, pub_id: Uuid) -> Result<Vec<PubRule>> {
    let pub_id_str = encode_uuid(pub_id);

    let raws: Vec<RawPubRule> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT rule_id, pub_id, text, recorded_at
           FROM pub_rules WHERE pub_id = ?1 ORDER BY seq",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pub_id_str], |row| {
            Ok(RawPubRule {
              rule_id:     row.get(0)?,
              pub_id:      row.get(1)?,
              text:        row.get(2)?,
              recorded_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPubRule::into_rule).collect()
  }

  // ── Events (append-only) ──────────────────────────────────────────────────

  async fn insert_event(&self, input: NewEvent) -> Result<Event> {
    let (event, row) = EventRow::new(input);
    self
      .conn
      .call(move |conn| {
        row.insert(conn)?;
        Ok(())
      })
      .await?;
    Ok(event)
  }

  async fn select_events(&self, filter: EventFilter) -> Result<Vec<Event>> {
    let participant_str = filter.participant_id.map(encode_uuid);
    let pub_str         = filter.pub_id.map(encode_uuid);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM events
           WHERE (?1 IS NULL OR participant_id = ?1)
             AND (?2 IS NULL OR pub_id = ?2)
           ORDER BY seq",
          RawEvent::COLUMNS
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![participant_str, pub_str],
            RawEvent::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  // ── Easter eggs ───────────────────────────────────────────────────────────

  async fn get_egg(&self, name: String) -> Result<Option<EasterEgg>> {
    let egg = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT name, solved FROM easter_eggs WHERE name = ?1",
            rusqlite::params![name],
            |row| Ok(EasterEgg { name: row.get(0)?, solved: row.get(1)? }),
          )
          .optional()?)
      })
      .await?;

    Ok(egg)
  }

  async fn put_egg(&self, egg: EasterEgg) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO easter_eggs (name, solved) VALUES (?1, ?2)
           ON CONFLICT(name) DO UPDATE SET solved = excluded.solved",
          rusqlite::params![egg.name, egg.solved],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn unlock_egg(&self, name: String) -> Result<bool> {
    Ok(self.conn.call(move |conn| Ok(flip_egg(conn, &name)?)).await?)
  }

  async fn unlock_egg_with_event(
    &self,
    name: String,
    reward: NewEvent,
  ) -> Result<Option<Event>> {
    let (event, row) = EventRow::new(reward);
    let flipped = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !flip_egg(&tx, &name)? {
          return Ok(false);
        }
        row.insert(&tx)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(flipped.then_some(event))
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Set `solved` only where it is not already set; `true` if a row changed.
fn flip_egg(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<bool> {
  let changed = conn.execute(
    "INSERT INTO easter_eggs (name, solved) VALUES (?1, 1)
     ON CONFLICT(name) DO UPDATE SET solved = 1 WHERE easter_eggs.solved = 0",
    rusqlite::params![name],
  )?;
  Ok(changed == 1)
}

/// An event encoded for the `events` table.
struct EventRow {
  event_id:       String,
  participant_id: String,
  pub_id:         Option<String>,
  kind:           &'static str,
  tier:           Option<i64>,
  description:    String,
  recorded_at:    String,
}

impl EventRow {
  /// Stamp `input` with an id and the current time.
  fn new(input: NewEvent) -> (Event, Self) {
    let event = Event {
      event_id:       Uuid::new_v4(),
      participant_id: input.participant_id,
      pub_id:         input.pub_id,
      kind:           input.kind,
      tier:           input.tier,
      description:    input.description,
      recorded_at:    Utc::now(),
    };
    let row = Self {
      event_id:       encode_uuid(event.event_id),
      participant_id: encode_uuid(event.participant_id),
      pub_id:         event.pub_id.map(encode_uuid),
      kind:           encode_kind(event.kind),
      tier:           event.tier.map(encode_tier),
      description:    event.description.clone(),
      recorded_at:    encode_dt(event.recorded_at),
    };
    (event, row)
  }

  fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute(
      "INSERT INTO events (
         event_id, participant_id, pub_id, kind, tier, description, recorded_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
      rusqlite::params![
        self.event_id,
        self.participant_id,
        self.pub_id,
        self.kind,
        self.tier,
        self.description,
        self.recorded_at,
      ],
    )?;
    Ok(())
  }
}
