//! Fruit sprite assets at the provider boundary
//!
//! The simulation never touches pixels. It only needs each sprite's logical
//! size, derived from the loaded image's aspect ratio at the requested size.

use serde::{Deserialize, Serialize};

use crate::SimError;

/// Request for one sprite at a target size (the longer side)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRequest {
    pub id: String,
    pub target_size: f32,
}

impl AssetRequest {
    pub fn new(id: impl Into<String>, target_size: f32) -> Self {
        Self {
            id: id.into(),
            target_size,
        }
    }
}

/// What a provider hands back for a loaded image
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub id: String,
    pub natural_width: f32,
    pub natural_height: f32,
}

/// A sprite the simulation can spawn, sized in logical pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FruitAsset {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

impl FruitAsset {
    /// Scale an image so its longer side matches `target_size`, keeping aspect ratio
    pub fn from_image(image: &LoadedImage, target_size: f32) -> Result<Self, SimError> {
        let (w, h) = (image.natural_width, image.natural_height);
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(SimError::InvalidAsset {
                id: image.id.clone(),
            });
        }

        let (width, height) = if w >= h {
            (target_size, target_size * h / w)
        } else {
            (target_size * w / h, target_size)
        };

        Ok(Self {
            id: image.id.clone(),
            width,
            height,
        })
    }

    /// Larger of the two dimensions
    #[inline]
    pub fn max_dimension(&self) -> f32 {
        self.width.max(self.height)
    }
}

/// Source of loaded images.
///
/// A provider either loads the whole batch or fails; partial results are never
/// returned.
pub trait AssetProvider {
    fn load(&mut self, requests: &[AssetRequest]) -> Result<Vec<LoadedImage>, SimError>;
}

/// Load and size a batch of sprites. Any missing or broken image fails the batch.
pub fn resolve_assets<P: AssetProvider + ?Sized>(
    provider: &mut P,
    requests: &[AssetRequest],
) -> Result<Vec<FruitAsset>, SimError> {
    if requests.is_empty() {
        return Err(SimError::NoAssets);
    }

    let images = provider.load(requests)?;
    size_assets(requests, &images)
}

/// Pair already-loaded images with their requests
pub fn size_assets(
    requests: &[AssetRequest],
    images: &[LoadedImage],
) -> Result<Vec<FruitAsset>, SimError> {
    requests
        .iter()
        .map(|request| {
            let image = images
                .iter()
                .find(|image| image.id == request.id)
                .ok_or_else(|| SimError::AssetLoad {
                    id: request.id.clone(),
                    reason: "provider returned no image".to_string(),
                })?;
            FruitAsset::from_image(image, request.target_size)
        })
        .collect()
}

/// Largest sprite dimension in a batch (spawn spacing is based on it)
pub fn max_fruit_size(assets: &[FruitAsset]) -> f32 {
    assets
        .iter()
        .map(FruitAsset::max_dimension)
        .fold(0.0, f32::max)
}

/// Provider backed by fixed image sizes, for headless runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    pub images: Vec<LoadedImage>,
}

impl StaticAssets {
    /// Square images with the given ids
    pub fn squares(ids: &[&str], size: f32) -> Self {
        Self {
            images: ids
                .iter()
                .map(|id| LoadedImage {
                    id: (*id).to_string(),
                    natural_width: size,
                    natural_height: size,
                })
                .collect(),
        }
    }
}

impl AssetProvider for StaticAssets {
    fn load(&mut self, requests: &[AssetRequest]) -> Result<Vec<LoadedImage>, SimError> {
        requests
            .iter()
            .map(|request| {
                self.images
                    .iter()
                    .find(|image| image.id == request.id)
                    .cloned()
                    .ok_or_else(|| SimError::AssetLoad {
                        id: request.id.clone(),
                        reason: "not found".to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_preserved() {
        let wide = LoadedImage {
            id: "melon".into(),
            natural_width: 400.0,
            natural_height: 200.0,
        };
        let asset = FruitAsset::from_image(&wide, 80.0).unwrap();
        assert_eq!(asset.width, 80.0);
        assert_eq!(asset.height, 40.0);

        let tall = LoadedImage {
            id: "pear".into(),
            natural_width: 100.0,
            natural_height: 200.0,
        };
        let asset = FruitAsset::from_image(&tall, 80.0).unwrap();
        assert_eq!(asset.width, 40.0);
        assert_eq!(asset.height, 80.0);
        assert_eq!(asset.max_dimension(), 80.0);
    }

    #[test]
    fn test_one_missing_asset_fails_batch() {
        let mut provider = StaticAssets::squares(&["strawberry", "grape"], 64.0);
        let requests = vec![
            AssetRequest::new("strawberry", 80.0),
            AssetRequest::new("kiwi", 80.0),
        ];
        let err = resolve_assets(&mut provider, &requests).unwrap_err();
        assert!(matches!(err, SimError::AssetLoad { ref id, .. } if id == "kiwi"));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let mut provider = StaticAssets::default();
        assert!(matches!(
            resolve_assets(&mut provider, &[]),
            Err(SimError::NoAssets)
        ));
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let broken = LoadedImage {
            id: "ghost".into(),
            natural_width: 0.0,
            natural_height: 10.0,
        };
        assert!(matches!(
            FruitAsset::from_image(&broken, 80.0),
            Err(SimError::InvalidAsset { .. })
        ));
    }

    #[test]
    fn test_max_fruit_size() {
        let mut provider = StaticAssets::squares(&["a", "b"], 10.0);
        let requests = vec![AssetRequest::new("a", 50.0), AssetRequest::new("b", 80.0)];
        let assets = resolve_assets(&mut provider, &requests).unwrap();
        assert_eq!(max_fruit_size(&assets), 80.0);
    }
}
