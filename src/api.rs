//! PokeAPI catalog client

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::state::{Ability, BaseStat, DetailRecord, FullDetailRecord, ListReference};

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("{url} responded with HTTP {status}")]
    Http { status: u16, url: String },
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// Read-only access to the remote catalog.
///
/// Each call is a fresh round-trip: no retry, no caching.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_list(&self) -> Result<Vec<ListReference>, CatalogError>;

    async fn fetch_detail(&self, url: &str) -> Result<DetailRecord, CatalogError>;

    async fn fetch_full_detail(&self, url: &str) -> Result<FullDetailRecord, CatalogError>;

    /// Raw body of an image URL
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    #[serde(default)]
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    #[serde(default)]
    base_experience: Option<u32>,
    #[serde(default)]
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    moves: Vec<PokemonMoveSlot>,
    #[serde(default)]
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

impl PokemonResponse {
    fn into_detail(self, url: &str) -> DetailRecord {
        DetailRecord {
            id: self.id,
            name: self.name,
            url: url.to_string(),
            image_primary: pointer_string(&self.sprites, "/other/official-artwork/front_default"),
            image_fallback: pointer_string(&self.sprites, "/front_default"),
            categories: self
                .types
                .into_iter()
                .map(|slot| slot.type_info.name)
                .collect(),
            height: self.height,
            weight: self.weight,
        }
    }

    fn into_full_detail(mut self, url: &str) -> FullDetailRecord {
        let base_experience = self.base_experience;
        let image_dream_world = pointer_string(&self.sprites, "/other/dream_world/front_default");
        let abilities = std::mem::take(&mut self.abilities)
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
                is_hidden: slot.is_hidden,
            })
            .collect();
        let stats = std::mem::take(&mut self.stats)
            .into_iter()
            .map(|slot| BaseStat {
                name: slot.stat.name,
                base: slot.base_stat,
            })
            .collect();
        let moves = std::mem::take(&mut self.moves)
            .into_iter()
            .map(|slot| slot.move_info.name)
            .collect();

        FullDetailRecord {
            summary: self.into_detail(url),
            base_experience,
            image_dream_world,
            abilities,
            stats,
            moves,
        }
    }
}

/// [`CatalogApi`] over HTTP with a shared `reqwest` client
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: reqwest::Client,
    list_url: String,
}

impl HttpCatalog {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| CatalogError::Client(err.to_string()))?;
        Ok(Self {
            client,
            list_url: config.list_url(),
        })
    }

    pub fn list_url(&self) -> &str {
        &self.list_url
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|err| CatalogError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn fetch_list(&self) -> Result<Vec<ListReference>, CatalogError> {
        let response: ListResponse = self.get_json(&self.list_url).await?;
        Ok(response
            .results
            .into_iter()
            .map(|entry| ListReference {
                name: entry.name,
                url: entry.url,
            })
            .collect())
    }

    async fn fetch_detail(&self, url: &str) -> Result<DetailRecord, CatalogError> {
        let response: PokemonResponse = self.get_json(url).await?;
        Ok(response.into_detail(url))
    }

    async fn fetch_full_detail(&self, url: &str) -> Result<FullDetailRecord, CatalogError> {
        let response: PokemonResponse = self.get_json(url).await?;
        Ok(response.into_full_detail(url))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        self.get_bytes(url).await
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
