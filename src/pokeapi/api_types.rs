//! Serde-deserializable types matching raw PokeAPI responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on what the cache and UI need.

use serde::Deserialize;

use super::types::{
  AbilityEntry, MoveEntry, PokemonDetail, PokemonSummary, SpeciesRef, StatEntry, TypeSlot,
};

// ============================================================================
// List endpoint (`/pokemon?offset=&limit=`)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPage {
  #[serde(default)]
  pub results: Vec<ApiPageEntry>,
}

/// One entry in a page listing. Carries no id; it has to be extracted from
/// the trailing segment of the reference URL.
#[derive(Debug, Deserialize)]
pub struct ApiPageEntry {
  pub name: String,
  pub url: String,
}

impl ApiPageEntry {
  /// Numeric id from the trailing path segment of the reference URL,
  /// e.g. `https://pokeapi.co/api/v2/pokemon/25/` -> 25.
  pub fn entity_id(&self) -> Option<u32> {
    let parsed = url::Url::parse(&self.url).ok()?;
    parsed
      .path_segments()?
      .rev()
      .find(|segment| !segment.is_empty())?
      .parse()
      .ok()
  }

  pub fn into_summary(self, artwork_base: &str) -> Option<PokemonSummary> {
    let id = self.entity_id()?;
    Some(PokemonSummary {
      id,
      name: self.name,
      image: artwork_url(artwork_base, id),
    })
  }
}

/// Official artwork URL for an id, from the fixed sprite repository template.
pub fn artwork_url(artwork_base: &str, id: u32) -> String {
  format!("{}/{}.png", artwork_base.trim_end_matches('/'), id)
}

// ============================================================================
// Detail endpoint (`/pokemon/{idOrName}`)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiNamedRef {
  pub name: String,
  #[serde(default)]
  pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiTypeSlot {
  #[serde(rename = "type")]
  pub kind: ApiNamedRef,
}

#[derive(Debug, Deserialize)]
pub struct ApiStatSlot {
  pub base_stat: u32,
  pub stat: ApiNamedRef,
}

#[derive(Debug, Deserialize)]
pub struct ApiAbilitySlot {
  pub ability: ApiNamedRef,
}

#[derive(Debug, Deserialize)]
pub struct ApiMoveSlot {
  #[serde(rename = "move")]
  pub entry: ApiNamedRef,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiArtwork {
  pub front_default: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiOtherSprites {
  #[serde(rename = "official-artwork", default)]
  pub official_artwork: ApiArtwork,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiSprites {
  #[serde(default)]
  pub other: ApiOtherSprites,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemon {
  pub id: u32,
  pub name: String,
  #[serde(default)]
  pub sprites: ApiSprites,
  #[serde(default)]
  pub types: Vec<ApiTypeSlot>,
  #[serde(default)]
  pub stats: Vec<ApiStatSlot>,
  #[serde(default)]
  pub abilities: Vec<ApiAbilitySlot>,
  #[serde(default)]
  pub moves: Vec<ApiMoveSlot>,
  pub height: Option<u32>,
  pub weight: Option<u32>,
  pub species: Option<ApiNamedRef>,
}

impl ApiPokemon {
  pub fn into_detail(self, artwork_base: &str) -> PokemonDetail {
    let image = self
      .sprites
      .other
      .official_artwork
      .front_default
      .unwrap_or_else(|| artwork_url(artwork_base, self.id));

    PokemonDetail {
      id: self.id,
      name: self.name,
      image,
      types: self
        .types
        .into_iter()
        .map(|t| TypeSlot { name: t.kind.name })
        .collect(),
      stats: self
        .stats
        .into_iter()
        .map(|s| StatEntry {
          name: s.stat.name,
          base_stat: s.base_stat,
        })
        .collect(),
      abilities: self
        .abilities
        .into_iter()
        .map(|a| AbilityEntry {
          name: a.ability.name,
        })
        .collect(),
      moves: self
        .moves
        .into_iter()
        .map(|m| MoveEntry { name: m.entry.name })
        .collect(),
      height: self.height,
      weight: self.weight,
      species: self.species.map(|s| SpeciesRef {
        name: s.name,
        url: s.url,
      }),
      partial: false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn entity_id_from_trailing_segment() {
    let entry = ApiPageEntry {
      name: "pikachu".into(),
      url: "https://pokeapi.co/api/v2/pokemon/25/".into(),
    };
    assert_eq!(entry.entity_id(), Some(25));
  }

  #[test]
  fn entity_id_without_trailing_slash() {
    let entry = ApiPageEntry {
      name: "pikachu".into(),
      url: "https://pokeapi.co/api/v2/pokemon/25".into(),
    };
    assert_eq!(entry.entity_id(), Some(25));
  }

  #[test]
  fn entity_id_rejects_garbage() {
    let entry = ApiPageEntry {
      name: "broken".into(),
      url: "https://pokeapi.co/api/v2/pokemon/not-a-number/".into(),
    };
    assert_eq!(entry.entity_id(), None);
  }

  #[test]
  fn into_detail_falls_back_to_templated_artwork() {
    let raw: ApiPokemon = serde_json::from_value(serde_json::json!({
      "id": 7,
      "name": "squirtle",
      "types": [{ "slot": 1, "type": { "name": "water", "url": "" } }],
      "stats": [],
      "abilities": [],
      "moves": [],
      "height": 5,
      "weight": 90
    }))
    .unwrap();

    let detail = raw.into_detail("https://sprites.example/artwork");
    assert_eq!(detail.image, "https://sprites.example/artwork/7.png");
    assert_eq!(detail.primary_type(), Some("water"));
    assert!(!detail.partial);
  }
}
