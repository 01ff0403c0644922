//! Plain-text rendering of API results, and codename lookup.

use anyhow::{Result, bail};
use ludz_core::{
  event::Event,
  participant::{Participant, Pub, PubRule},
  score::{History, Standing},
};
use uuid::Uuid;

/// Find a participant by UUID or codename (case-insensitive).
pub fn find_participant(participants: &[Participant], key: &str) -> Result<Uuid> {
  let key = key.trim();
  if let Ok(id) = key.parse::<Uuid>() {
    return Ok(id);
  }
  match participants.iter().find(|p| p.codename.eq_ignore_ascii_case(key)) {
    Some(p) => Ok(p.participant_id),
    None => bail!("no participant with codename {key:?}"),
  }
}

/// Find a pub by UUID or name (case-insensitive). The first match wins when
/// names repeat.
pub fn find_pub(pubs: &[Pub], key: &str) -> Result<Uuid> {
  let key = key.trim();
  if let Ok(id) = key.parse::<Uuid>() {
    return Ok(id);
  }
  match pubs.iter().find(|p| p.name.eq_ignore_ascii_case(key)) {
    Some(p) => Ok(p.pub_id),
    None => bail!("no pub named {key:?}"),
  }
}

pub fn participant_line(p: &Participant) -> String {
  format!("{:<16} {}", p.codename, p.name)
}

pub fn event_line(event: &Event) -> String {
  let when = event.recorded_at.format("%H:%M");
  match event.tier {
    Some(tier) => format!("{when}  [{tier}] {}", event.description),
    None => format!("{when}  {}", event.description),
  }
}

pub fn leaderboard(standings: &[Standing]) -> String {
  standings
    .iter()
    .enumerate()
    .map(|(i, s)| format!("{:>2}. {:<16} {:>4}", i + 1, s.codename, s.score))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn history(history: &History, score: u32) -> String {
  let mut out = vec![format!("Score: {score}"), String::new(), "Forfeits:".to_owned()];
  if history.forfeits.is_empty() {
    out.push("  (none)".to_owned());
  }
  out.extend(history.forfeits.iter().map(|e| format!("  {}", event_line(e))));
  out.push(String::new());
  out.push("Challenges:".to_owned());
  if history.challenges.is_empty() {
    out.push("  (none)".to_owned());
  }
  out.extend(history.challenges.iter().map(|e| format!("  {}", event_line(e))));
  out.join("\n")
}

/// Every pub followed by its rules, in the order given.
pub fn rules_overview(pubs: &[(Pub, Vec<PubRule>)]) -> String {
  if pubs.is_empty() {
    return "(no pubs)".to_owned();
  }
  let mut out = Vec::new();
  for (venue, rules) in pubs {
    out.push(format!("{}:", venue.name));
    if rules.is_empty() {
      out.push("  (no rules)".to_owned());
    }
    out.extend(rules.iter().map(|r| format!("  - {}", r.text)));
  }
  out.join("\n")
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use ludz_core::{catalog::Tier, event::EventKind};

  use super::*;

  fn participant(codename: &str) -> Participant {
    Participant {
      participant_id: Uuid::new_v4(),
      name:           "Max".to_owned(),
      codename:       codename.to_owned(),
      created_at:     Utc::now(),
    }
  }

  fn forfeit(description: &str) -> Event {
    Event {
      event_id:       Uuid::new_v4(),
      participant_id: Uuid::new_v4(),
      pub_id:         None,
      kind:           EventKind::Forfeit,
      tier:           Some(Tier::Tier2),
      description:    description.to_owned(),
      recorded_at:    Utc.with_ymd_and_hms(2024, 6, 1, 21, 5, 0).unwrap(),
    }
  }

  #[test]
  fn finds_by_codename_or_uuid() {
    let people = vec![participant("Wolf"), participant("Bear")];
    assert_eq!(find_participant(&people, "bear").unwrap(), people[1].participant_id);

    let id = Uuid::new_v4();
    assert_eq!(find_participant(&people, &id.to_string()).unwrap(), id);

    assert!(find_participant(&people, "Fox").is_err());
  }

  #[test]
  fn renders_event_with_tier() {
    assert_eq!(event_line(&forfeit("Hat")), "21:05  [tier2] Hat");
  }

  #[test]
  fn renders_leaderboard_in_given_order() {
    let rows = vec![
      Standing { participant_id: Uuid::new_v4(), codename: "B".into(), score: 9 },
      Standing { participant_id: Uuid::new_v4(), codename: "A".into(), score: 5 },
    ];
    let text = leaderboard(&rows);
    let lines: Vec<_> = text.lines().collect();
    assert!(lines[0].starts_with(" 1. B"));
    assert!(lines[1].starts_with(" 2. A"));
  }

  fn venue(name: &str) -> Pub {
    Pub { pub_id: Uuid::new_v4(), name: name.to_owned(), created_at: Utc::now() }
  }

  #[test]
  fn overview_lists_every_pub_with_its_rules() {
    let augustiner = venue("Augustiner");
    let rule = PubRule {
      rule_id:     Uuid::new_v4(),
      pub_id:      augustiner.pub_id,
      text:        "No phones".to_owned(),
      recorded_at: Utc::now(),
    };
    let text = rules_overview(&[(augustiner, vec![rule]), (venue("Hofbräuhaus"), vec![])]);
    assert_eq!(text, "Augustiner:\n  - No phones\nHofbräuhaus:\n  (no rules)");
    assert_eq!(rules_overview(&[]), "(no pubs)");
  }

  #[test]
  fn empty_history_says_none() {
    let text = history(&History::default(), 0);
    assert!(text.starts_with("Score: 0"));
    assert_eq!(text.matches("(none)").count(), 2);
  }
}
