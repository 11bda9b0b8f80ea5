//! Domain types for pokemon summaries and details.
//!
//! These are the shapes the cache persists and the UI consumes, decoupled
//! from the raw API payloads in `api_types`.

use serde::{Deserialize, Serialize};

/// Lightweight listing record from the paginated list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
  pub id: u32,
  /// Canonical lowercase name, unique upstream.
  pub name: String,
  /// Official artwork URL.
  pub image: String,
}

/// One entry in a pokemon's type sequence. Order is significant: the first
/// slot is the primary type used for visual theming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
  pub name: String,
}

/// A base stat value, e.g. `hp: 35`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
  pub name: String,
  pub base_stat: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityEntry {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
  pub name: String,
}

/// Reference to the species record for a pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRef {
  pub name: String,
  pub url: String,
}

/// Full record for one pokemon.
///
/// A detail with `partial == true` was synthesized from a [`PokemonSummary`]
/// while the real record is still being fetched; its sequences are empty and
/// its scalar extras are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
  pub id: u32,
  pub name: String,
  pub image: String,
  #[serde(default)]
  pub types: Vec<TypeSlot>,
  #[serde(default)]
  pub stats: Vec<StatEntry>,
  #[serde(default)]
  pub abilities: Vec<AbilityEntry>,
  #[serde(default)]
  pub moves: Vec<MoveEntry>,
  pub height: Option<u32>,
  pub weight: Option<u32>,
  pub species: Option<SpeciesRef>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub partial: bool,
}

impl PokemonDetail {
  /// Synthesize a placeholder detail from a listing summary. The caller is
  /// expected to kick off a background upgrade to the real record.
  pub fn from_summary(summary: &PokemonSummary) -> Self {
    Self {
      id: summary.id,
      name: summary.name.clone(),
      image: summary.image.clone(),
      types: Vec::new(),
      stats: Vec::new(),
      abilities: Vec::new(),
      moves: Vec::new(),
      height: None,
      weight: None,
      species: None,
      partial: true,
    }
  }

  /// The first type slot, used for card/modal theming.
  pub fn primary_type(&self) -> Option<&str> {
    self.types.first().map(|t| t.name.as_str())
  }
}

/// How a caller identifies a pokemon: numeric id or canonical name.
///
/// Parsing normalizes up front so every lookup path agrees: numeric strings
/// become ids (so `"25"` matches the same record as `25`), names are
/// lowercased (upstream names are lowercase and matching is
/// case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
  Id(u32),
  Name(String),
}

impl Lookup {
  pub fn parse(raw: &str) -> Self {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
      Ok(id) => Lookup::Id(id),
      Err(_) => Lookup::Name(trimmed.to_lowercase()),
    }
  }

  /// Key for the single-flight registry and the request path segment.
  pub fn key(&self) -> String {
    match self {
      Lookup::Id(id) => id.to_string(),
      Lookup::Name(name) => name.clone(),
    }
  }
}

impl From<u32> for Lookup {
  fn from(id: u32) -> Self {
    Lookup::Id(id)
  }
}

impl From<&str> for Lookup {
  fn from(raw: &str) -> Self {
    Lookup::parse(raw)
  }
}

impl From<String> for Lookup {
  fn from(raw: String) -> Self {
    Lookup::parse(&raw)
  }
}

impl std::fmt::Display for Lookup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Lookup::Id(id) => write!(f, "#{}", id),
      Lookup::Name(name) => f.write_str(name),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lookup_parses_numeric_strings_as_ids() {
    assert_eq!(Lookup::parse("25"), Lookup::Id(25));
    assert_eq!(Lookup::parse(" 7 "), Lookup::Id(7));
  }

  #[test]
  fn lookup_lowercases_names() {
    assert_eq!(Lookup::parse("Pikachu"), Lookup::Name("pikachu".into()));
  }

  #[test]
  fn partial_flag_not_serialized_when_false() {
    let summary = PokemonSummary {
      id: 1,
      name: "bulbasaur".into(),
      image: "https://example.com/1.png".into(),
    };
    let mut detail = PokemonDetail::from_summary(&summary);
    detail.partial = false;

    let json = serde_json::to_value(&detail).unwrap();
    assert!(json.get("partial").is_none());

    detail.partial = true;
    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json.get("partial"), Some(&serde_json::Value::Bool(true)));
  }
}
