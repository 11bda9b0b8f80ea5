//! HTTP client for the PokeAPI, normalizing raw payloads into domain types.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{DexError, Result};

use super::api_types::{ApiPage, ApiPokemon};
use super::types::{Lookup, PokemonDetail, PokemonSummary};
use super::PokeApi;

/// PokeAPI client wrapper
#[derive(Clone)]
pub struct PokeClient {
  http: reqwest::Client,
  base_url: String,
  artwork_base: String,
}

impl PokeClient {
  pub fn new(config: &ApiConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      base_url: config.base_url.trim_end_matches('/').to_string(),
      artwork_base: config.artwork_url.trim_end_matches('/').to_string(),
    }
  }

  async fn get(&self, path: &str) -> Result<reqwest::Response> {
    let url = format!("{}{}", self.base_url, path);
    debug!(%url, "GET");
    self
      .http
      .get(&url)
      .send()
      .await
      .map_err(|e| DexError::Network(e.to_string()))
  }
}

#[async_trait]
impl PokeApi for PokeClient {
  /// Fetch one page from the listing endpoint.
  async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<PokemonSummary>> {
    let response = self
      .get(&format!("/pokemon?offset={}&limit={}", offset, limit))
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(DexError::Network(format!(
        "list request failed with status {}",
        status
      )));
    }

    let page: ApiPage = response
      .json()
      .await
      .map_err(|e| DexError::Network(format!("failed to parse page listing: {}", e)))?;

    // Entries whose reference URL carries no numeric id are unusable and
    // silently dropped.
    Ok(
      page
        .results
        .into_iter()
        .filter_map(|entry| entry.into_summary(&self.artwork_base))
        .collect(),
    )
  }

  /// Fetch one full record by numeric id or canonical name.
  async fn fetch_detail(&self, lookup: &Lookup) -> Result<PokemonDetail> {
    let response = self.get(&format!("/pokemon/{}", lookup.key())).await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
      return Err(DexError::NotFound(lookup.key()));
    }
    if !status.is_success() {
      return Err(DexError::Network(format!(
        "detail request for {} failed with status {}",
        lookup, status
      )));
    }

    let raw: ApiPokemon = response
      .json()
      .await
      .map_err(|e| DexError::Network(format!("failed to parse detail for {}: {}", lookup, e)))?;

    Ok(raw.into_detail(&self.artwork_base))
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  fn test_client(server: &MockServer) -> PokeClient {
    PokeClient::new(&ApiConfig {
      base_url: server.uri(),
      artwork_url: "https://sprites.example/artwork".into(),
    })
  }

  fn page_json() -> serde_json::Value {
    serde_json::json!({
      "count": 1302,
      "results": [
        { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" },
        { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/" }
      ]
    })
  }

  fn pikachu_json() -> serde_json::Value {
    serde_json::json!({
      "id": 25,
      "name": "pikachu",
      "sprites": {
        "other": {
          "official-artwork": { "front_default": "https://art.example/25.png" }
        }
      },
      "types": [{ "slot": 1, "type": { "name": "electric", "url": "" } }],
      "stats": [
        { "base_stat": 35, "stat": { "name": "hp", "url": "" } },
        { "base_stat": 90, "stat": { "name": "speed", "url": "" } }
      ],
      "abilities": [{ "ability": { "name": "static", "url": "" } }],
      "moves": [{ "move": { "name": "thunder-shock", "url": "" } }],
      "height": 4,
      "weight": 60,
      "species": { "name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/" }
    })
  }

  #[tokio::test]
  async fn fetch_page_extracts_ids_and_templates_artwork() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/pokemon"))
      .and(query_param("offset", "0"))
      .and(query_param("limit", "20"))
      .respond_with(ResponseTemplate::new(200).set_body_json(page_json()))
      .mount(&server)
      .await;

    let page = test_client(&server).fetch_page(0, 20).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, 1);
    assert_eq!(page[0].name, "bulbasaur");
    assert_eq!(page[0].image, "https://sprites.example/artwork/1.png");
    assert_eq!(page[1].id, 2);
  }

  #[tokio::test]
  async fn fetch_page_propagates_non_success_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/pokemon"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let err = test_client(&server).fetch_page(0, 20).await.unwrap_err();
    assert!(matches!(err, DexError::Network(_)));
  }

  #[tokio::test]
  async fn fetch_detail_uses_official_artwork() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/pokemon/25"))
      .respond_with(ResponseTemplate::new(200).set_body_json(pikachu_json()))
      .mount(&server)
      .await;

    let detail = test_client(&server)
      .fetch_detail(&Lookup::Id(25))
      .await
      .unwrap();

    assert_eq!(detail.id, 25);
    assert_eq!(detail.image, "https://art.example/25.png");
    assert_eq!(detail.primary_type(), Some("electric"));
    assert_eq!(detail.stats[0].base_stat, 35);
    assert_eq!(detail.moves[0].name, "thunder-shock");
    assert!(!detail.partial);
  }

  #[tokio::test]
  async fn fetch_detail_by_name_lowercases_the_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/pokemon/pikachu"))
      .respond_with(ResponseTemplate::new(200).set_body_json(pikachu_json()))
      .mount(&server)
      .await;

    let detail = test_client(&server)
      .fetch_detail(&Lookup::parse("Pikachu"))
      .await
      .unwrap();
    assert_eq!(detail.name, "pikachu");
  }

  #[tokio::test]
  async fn fetch_detail_maps_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/pokemon/missingno"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let err = test_client(&server)
      .fetch_detail(&Lookup::parse("missingno"))
      .await
      .unwrap_err();
    assert_eq!(err, DexError::NotFound("missingno".into()));
  }
}
