use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadedSprite {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Error)]
pub(crate) enum SpriteLoadError {
    #[error("invalid sprite key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Lazily decoded PNG sprites under `<assets>/sprites/<key>.png`.
///
/// A key that fails to load is cached as missing and warned about once, so
/// the renderer keeps drawing the fallback rectangle without retrying.
#[derive(Debug)]
pub(crate) struct SpriteCache {
    asset_root: PathBuf,
    loaded: HashMap<String, Option<LoadedSprite>>,
    warned_keys: HashSet<String>,
}

impl SpriteCache {
    pub(crate) fn new(asset_root: PathBuf) -> Self {
        Self {
            asset_root,
            loaded: HashMap::new(),
            warned_keys: HashSet::new(),
        }
    }

    pub(crate) fn get(&mut self, key: &str) -> Option<&LoadedSprite> {
        if !self.loaded.contains_key(key) {
            let sprite = match load_sprite(&self.asset_root, key) {
                Ok(sprite) => Some(sprite),
                Err(error) => {
                    if self.warned_keys.insert(key.to_string()) {
                        warn!(
                            sprite_key = key,
                            error = %error,
                            "sprite_load_failed_using_fallback"
                        );
                    }
                    None
                }
            };
            self.loaded.insert(key.to_string(), sprite);
        }
        self.loaded.get(key).and_then(Option::as_ref)
    }

    #[cfg(test)]
    fn warned_count(&self) -> usize {
        self.warned_keys.len()
    }
}

fn load_sprite(asset_root: &Path, key: &str) -> Result<LoadedSprite, SpriteLoadError> {
    let path = sprite_path(asset_root, key)?;
    let reader = ImageReader::open(&path).map_err(|source| SpriteLoadError::Open {
        path: path.clone(),
        source,
    })?;
    let image = reader
        .decode()
        .map_err(|source| SpriteLoadError::Decode {
            path: path.clone(),
            source,
        })?
        .to_rgba8();
    Ok(LoadedSprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

fn sprite_path(asset_root: &Path, key: &str) -> Result<PathBuf, SpriteLoadError> {
    validate_sprite_key(key).map_err(|reason| SpriteLoadError::InvalidKey {
        key: key.to_string(),
        reason,
    })?;
    Ok(asset_root.join("sprites").join(format!("{key}.png")))
}

/// Keys are slash-separated segments of `[a-z0-9_-]`.
fn validate_sprite_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("empty key");
    }
    for segment in key.split('/') {
        if segment.is_empty() {
            return Err("empty path segment");
        }
        let valid = segment
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-'));
        if !valid {
            return Err("segment contains a character outside [a-z0-9_-]");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn key_validation_accepts_nested_lowercase_keys() {
        for key in ["player/b2_1", "apple/golden-mush", "tree"] {
            assert!(validate_sprite_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn key_validation_rejects_traversal_and_odd_characters() {
        for key in ["", "/apple", "apple/", "..", "a/../b", r"a\b", "Apple", "apple.png"] {
            assert!(validate_sprite_key(key).is_err(), "key={key}");
        }
    }

    #[test]
    fn missing_sprite_is_cached_and_warned_once() {
        let temp = TempDir::new().expect("temp");
        let mut cache = SpriteCache::new(temp.path().to_path_buf());

        assert!(cache.get("apple/normal").is_none());
        assert!(cache.get("apple/normal").is_none());
        assert_eq!(cache.warned_count(), 1);
    }

    #[test]
    fn png_on_disk_is_decoded_to_rgba() {
        let temp = TempDir::new().expect("temp");
        let sprite_dir = temp.path().join("sprites").join("apple");
        std::fs::create_dir_all(&sprite_dir).expect("sprite dir");
        let mut image = image::RgbaImage::new(2, 3);
        image.put_pixel(1, 2, image::Rgba([200, 10, 10, 255]));
        image.save(sprite_dir.join("normal.png")).expect("save png");

        let mut cache = SpriteCache::new(temp.path().to_path_buf());
        let sprite = cache.get("apple/normal").expect("sprite");
        assert_eq!((sprite.width, sprite.height), (2, 3));
        assert_eq!(sprite.rgba.len(), 2 * 3 * 4);
        assert_eq!(&sprite.rgba[20..24], &[200, 10, 10, 255]);
    }
}
