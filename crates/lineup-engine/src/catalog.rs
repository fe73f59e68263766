//! Builds the track list from a public music catalog.
//!
//! Artists are grouped by tier; each tier decides how many top tracks are fetched
//! per artist.

use crate::config::schema::{CatalogConfig, ms};
use lineup_common::model::PlaylistEntry;
use serde::{Deserialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Catalog list responses wrap their items in `data`; error bodies have none.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub nb_fan: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAlbum {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub album: Option<CatalogAlbum>,
}

pub struct CatalogClient {
    http: reqwest::Client,
    api_base: String,
}

impl CatalogClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CatalogError> {
        let envelope: DataEnvelope<T> = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.data)
    }

    /// Best match for an artist name, if any.
    pub async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>, CatalogError> {
        let artists: Vec<CatalogArtist> = self
            .get_list("/search/artist", &[("q", name.to_string())])
            .await?;
        Ok(artists.into_iter().next())
    }

    pub async fn top_tracks(
        &self,
        artist_id: u64,
        limit: usize,
    ) -> Result<Vec<CatalogTrack>, CatalogError> {
        self.get_list(
            &format!("/artist/{}/top", artist_id),
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Walk the lineup tier by tier and collect each artist's top tracks.
    ///
    /// Artists the catalog does not know are skipped with a warning.
    pub async fn build_playlist(
        &self,
        config: &CatalogConfig,
    ) -> Result<Vec<PlaylistEntry>, CatalogError> {
        let mut playlist = Vec::new();

        for (&tier, artists) in &config.lineup {
            let songs = config.songs_for_tier(tier);
            info!(tier, songs, "Fetching tier");

            for artist_name in artists {
                let Some(artist) = self.search_artist(artist_name).await? else {
                    warn!(artist = %artist_name, "Could not find artist");
                    continue;
                };
                info!(
                    artist = %artist.name,
                    id = artist.id,
                    fans = artist.nb_fan.unwrap_or_default(),
                    "Found artist"
                );

                let tracks = self.top_tracks(artist.id, songs).await?;
                playlist.extend(entries_for_artist(&artist, tracks, tier));

                tokio::time::sleep(ms(config.request_delay_ms)).await;
            }
        }

        Ok(playlist)
    }
}

pub fn entries_for_artist(
    artist: &CatalogArtist,
    tracks: Vec<CatalogTrack>,
    tier: u8,
) -> Vec<PlaylistEntry> {
    tracks
        .into_iter()
        .map(|track| PlaylistEntry {
            artist_name: artist.name.clone(),
            artist_id: artist.id,
            track_name: track.title,
            track_id: track.id,
            album: track
                .album
                .map(|a| a.title)
                .unwrap_or_else(|| "Unknown".to_string()),
            duration: track.duration,
            tier,
        })
        .collect()
}

/// Totals printed after a playlist is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub total_tracks: usize,
    pub tracks_by_tier: BTreeMap<u8, usize>,
    pub total_seconds: u64,
}

impl PlaylistSummary {
    pub fn from_entries(entries: &[PlaylistEntry]) -> Self {
        let mut tracks_by_tier = BTreeMap::new();
        for entry in entries {
            *tracks_by_tier.entry(entry.tier).or_insert(0) += 1;
        }
        Self {
            total_tracks: entries.len(),
            tracks_by_tier,
            total_seconds: entries.iter().map(|e| e.duration).sum(),
        }
    }

    pub fn hours(&self) -> u64 {
        self.total_seconds / 3600
    }

    pub fn minutes(&self) -> u64 {
        (self.total_seconds % 3600) / 60
    }
}

impl fmt::Display for PlaylistSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total tracks: {}", self.total_tracks)?;
        writeln!(f)?;
        writeln!(f, "Tracks by tier:")?;
        for (tier, count) in &self.tracks_by_tier {
            writeln!(f, "  Tier {}: {} tracks", tier, count)?;
        }
        writeln!(f)?;
        write!(f, "Total duration: {}h {}m", self.hours(), self.minutes())
    }
}
