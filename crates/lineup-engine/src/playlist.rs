use lineup_common::model::PlaylistEntry;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("{} not found", .0.display())]
    Missing(PathBuf),
    #[error("Failed to read playlist file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse playlist file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub async fn load_playlist(path: &Path) -> Result<Vec<PlaylistEntry>, PlaylistError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(PlaylistError::Missing(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let entries: Vec<PlaylistEntry> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), count = entries.len(), "Loaded playlist");
    Ok(entries)
}

pub async fn save_playlist(path: &Path, entries: &[PlaylistEntry]) -> Result<(), PlaylistError> {
    let content = serde_json::to_string_pretty(entries)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(artist: &str, track: &str, tier: u8) -> PlaylistEntry {
        PlaylistEntry {
            artist_name: artist.to_string(),
            artist_id: 1,
            track_name: track.to_string(),
            track_id: 2,
            album: "Album".to_string(),
            duration: 180,
            tier,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");

        let err = load_playlist(&path).await.unwrap_err();

        assert!(matches!(err, PlaylistError::Missing(ref p) if p == &path));
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_order_and_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        let entries = vec![entry("Fimiguerro", "Señorita", 3), entry("Che", "Miss Me", 2)];

        save_playlist(&path, &entries).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Señorita"));
        assert_eq!(load_playlist(&path).await.unwrap(), entries);
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playlist.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            load_playlist(&path).await,
            Err(PlaylistError::Parse(_))
        ));
    }
}
