//! The catalog: static tables of hourly challenges, tiered forfeits and
//! standard pub rules.
//!
//! Catalog content is configuration: it is built or loaded once at process
//! start and never mutated afterwards. Callers share it behind an `Arc`.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Tier ────────────────────────────────────────────────────────────────────

/// Forfeit severity class.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
  /// Light.
  Tier1,
  /// Medium.
  Tier2,
  /// Trials.
  Tier3,
}

impl Tier {
  pub const ALL: [Tier; 3] = [Tier::Tier1, Tier::Tier2, Tier::Tier3];

  /// Numeric level, 1 through 3.
  pub fn level(self) -> u8 {
    match self {
      Self::Tier1 => 1,
      Self::Tier2 => 2,
      Self::Tier3 => 3,
    }
  }

  pub fn from_level(level: u8) -> Result<Self> {
    match level {
      1 => Ok(Self::Tier1),
      2 => Ok(Self::Tier2),
      3 => Ok(Self::Tier3),
      other => Err(Error::InvalidArgument(format!("unknown tier: {other}"))),
    }
  }

  /// Human-readable label for dashboards.
  pub fn label(self) -> &'static str {
    match self {
      Self::Tier1 => "Tier 1 (Light)",
      Self::Tier2 => "Tier 2 (Medium)",
      Self::Tier3 => "Tier 3 (Trials)",
    }
  }
}

impl fmt::Display for Tier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "tier{}", self.level())
  }
}

/// Accepts `"1"`, `"tier1"`, `"tier_1"` and `"Tier 1"` (case-insensitive).
impl FromStr for Tier {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let lowered = s.trim().to_ascii_lowercase();
    let digits = lowered
      .strip_prefix("tier")
      .unwrap_or(&lowered)
      .trim_start_matches(['_', ' ']);
    digits
      .parse::<u8>()
      .map_err(|_| Error::InvalidArgument(format!("unknown tier: {s:?}")))
      .and_then(Self::from_level)
  }
}

// ─── Weights ─────────────────────────────────────────────────────────────────

/// Points awarded per completed forfeit of each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWeights {
  pub tier1: u32,
  pub tier2: u32,
  pub tier3: u32,
}

impl TierWeights {
  /// 1 / 3 / 9.
  pub const CANONICAL: TierWeights = TierWeights { tier1: 1, tier2: 3, tier3: 9 };

  pub fn weight(&self, tier: Tier) -> u32 {
    match tier {
      Tier::Tier1 => self.tier1,
      Tier::Tier2 => self.tier2,
      Tier::Tier3 => self.tier3,
    }
  }
}

impl Default for TierWeights {
  fn default() -> Self { Self::CANONICAL }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// One forfeit definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub tier:        Tier,
  pub title:       String,
  pub description: String,
}

impl CatalogEntry {
  /// The text persisted as an event description: `"<title>: <description>"`.
  pub fn summary(&self) -> String {
    format!("{}: {}", self.title, self.description)
  }
}

/// On-disk shape of a forfeit entry; the tier comes from the enclosing list.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForfeitDef {
  title:       String,
  description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ForfeitTiers {
  #[serde(default)]
  tier1: Vec<ForfeitDef>,
  #[serde(default)]
  tier2: Vec<ForfeitDef>,
  #[serde(default)]
  tier3: Vec<ForfeitDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
  #[serde(default)]
  challenges: Vec<String>,
  #[serde(default)]
  forfeits:   ForfeitTiers,
  #[serde(default)]
  pub_rules:  Vec<String>,
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// The full set of drawable content for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
  challenges: Vec<String>,
  tier1:      Vec<CatalogEntry>,
  tier2:      Vec<CatalogEntry>,
  tier3:      Vec<CatalogEntry>,
  pub_rules:  Vec<String>,
}

impl Catalog {
  /// Hourly challenges, in definition order.
  pub fn challenges(&self) -> &[String] { &self.challenges }

  /// Forfeits of one tier, in definition order.
  pub fn forfeits(&self, tier: Tier) -> &[CatalogEntry] {
    match tier {
      Tier::Tier1 => &self.tier1,
      Tier::Tier2 => &self.tier2,
      Tier::Tier3 => &self.tier3,
    }
  }

  pub fn pub_rules(&self) -> &[String] { &self.pub_rules }

  /// Parse a catalog from its JSON form:
  ///
  /// ```json
  /// { "challenges": ["..."],
  ///   "forfeits": { "tier1": [{"title": "...", "description": "..."}], ... },
  ///   "pub_rules": ["..."] }
  /// ```
  pub fn from_json(json: &str) -> Result<Self> {
    let file: CatalogFile = serde_json::from_str(json)?;
    Ok(Self::from_file(file))
  }

  /// Read a JSON catalog from disk.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
      Error::InvalidArgument(format!("cannot read catalog {}: {e}", path.display()))
    })?;
    Self::from_json(&raw)
  }

  fn from_file(file: CatalogFile) -> Self {
    let entries = |tier: Tier, defs: Vec<ForfeitDef>| {
      defs
        .into_iter()
        .map(|d| CatalogEntry { tier, title: d.title, description: d.description })
        .collect()
    };
    Self {
      challenges: file.challenges,
      tier1:      entries(Tier::Tier1, file.forfeits.tier1),
      tier2:      entries(Tier::Tier2, file.forfeits.tier2),
      tier3:      entries(Tier::Tier3, file.forfeits.tier3),
      pub_rules:  file.pub_rules,
    }
  }

  /// The stock content for the Munich stag night.
  pub fn builtin() -> Self {
    let defs = |pairs: &[(&str, &str)]| {
      pairs
        .iter()
        .map(|(t, d)| ForfeitDef { title: (*t).to_owned(), description: (*d).to_owned() })
        .collect()
    };
    let strings = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect();

    Self::from_file(CatalogFile {
      challenges: strings(BUILTIN_CHALLENGES),
      forfeits:   ForfeitTiers {
        tier1: defs(BUILTIN_TIER1),
        tier2: defs(BUILTIN_TIER2),
        tier3: defs(BUILTIN_TIER3),
      },
      pub_rules:  strings(BUILTIN_PUB_RULES),
    })
  }
}

impl Default for Catalog {
  fn default() -> Self { Self::builtin() }
}

// ─── Stock content ───────────────────────────────────────────────────────────

const BUILTIN_CHALLENGES: &[&str] = &[
  "Mystery Round: One person secretly orders a random drink for another.",
  "Lost in Translation: One person orders the next round using mime only.",
  "Accent Round: Everyone speaks in the same accent for one drink.",
  "The Stag’s Shadow: Copy the groom’s body language for 10 minutes.",
  "Silent Selfie: Take a group photo in silence. Laugh or speak → drink.",
  "Cheers in Foreign: Pick a language and use it for the next toast.",
];

const BUILTIN_TIER1: &[(&str, &str)] = &[
  ("The Whisper of Glass", "Do a shot. The group chooses what."),
  ("Pints Out for Harambe", "Pour your drink out. You stay dry until the next bar."),
  ("The Bitter Swap", "Swap drinks with someone else, even if half-finished."),
  ("The Burden of Coin", "Buy a round for two random people in the group."),
  (
    "The Tongue of Strangers",
    "Speak only in German until your next drink arrives. Fail, drink again.",
  ),
];

const BUILTIN_TIER2: &[(&str, &str)] = &[
  ("The Crown of Fools", "Wear a stupid hat, glasses, or accessory the group provides."),
  ("The Shackled Bond", "Be handcuffed (or tied) to another member for 20 minutes."),
  ("The Tangled Path", "Tie your shoelaces together until the next bar."),
  ("The Servant’s Load", "Carry the stag’s shoes in your hands until the next venue."),
  (
    "The Herald of Kings",
    "Introduce yourself to the next bartender as 'The King of Bavaria.'",
  ),
  ("The High-Five Herald", "Get strangers to high-five you outside the next bar."),
  ("The Voice of the Silver Screen", "Speak only in movie quotes for 10 minutes."),
];

const BUILTIN_TIER3: &[(&str, &str)] = &[
  ("Trial by Fire", "Eat a ghost pepper or insanely hot wing. No drink for 2 minutes."),
  ("Trial by Water", "Down a pint of water while the group pours more on you."),
  (
    "Trial by Earth",
    "Lick something grim but safe (classic: armpit). Outdoors? Eat a handful of grass.",
  ),
  (
    "Trial by Air",
    "Stand on a chair or table and give a dramatic toast in your best Shakespearean voice.",
  ),
];

const BUILTIN_PUB_RULES: &[&str] = &[
  "Code Names Only: Everyone must pick a codename. Using a real name = sip penalty.",
  "Foreign Drinks Rule: Drinks must be referred to in a foreign language. Break = sip.",
  "Stag’s Word is Law: Groom can invent a 30-min rule. Break = sip.",
  "The Banned Word Game: Pick a word for the night. Slip = sip.",
  "Left-Hand Rule: Drinks in left hand only. Right hand = sip.",
  "Story Chain: Build a story together; break character = sip.",
  "Silent Cheers: All toasts are silent; speaking = sip.",
];
