//! Game settings and preferences
//!
//! Persisted in LocalStorage on the web, read from a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::SimError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live sparkles for this preset
    pub fn max_sparkles(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 600,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Feel ===
    /// Falling speed (logical px per frame)
    pub fall_speed: f32,
    /// Spin while falling (radians per frame)
    pub rotate_speed: f32,
    /// Target sprite size requested from the asset provider
    pub fruit_size: f32,
    /// Extra horizontal spacing between spawn slots
    pub spawn_margin: f32,

    // === Visual Effects ===
    /// Sparkles along the coating line
    pub sparkles: bool,

    // === Accessibility ===
    /// Reduced motion (no sparkles)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            fall_speed: 2.0,
            rotate_speed: 0.1,
            fruit_size: 80.0,
            spawn_margin: 20.0,

            sparkles: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the sparkle pass entirely
        if preset == QualityPreset::Low {
            self.sparkles = false;
        }
    }

    /// Effective sparkle emission (respects reduced_motion)
    pub fn effective_sparkles(&self) -> bool {
        self.sparkles && !self.reduced_motion
    }

    /// Effective sparkle cap
    pub fn max_sparkles(&self) -> usize {
        if !self.effective_sparkles() {
            0
        } else {
            self.quality.max_sparkles()
        }
    }

    /// Clamp hand-edited values into ranges the simulation can work with
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if !self.fall_speed.is_finite() || self.fall_speed <= 0.0 {
            self.fall_speed = defaults.fall_speed;
        }
        if !self.rotate_speed.is_finite() {
            self.rotate_speed = defaults.rotate_speed;
        }
        if !self.fruit_size.is_finite() || self.fruit_size < 8.0 {
            self.fruit_size = defaults.fruit_size;
        }
        if !self.spawn_margin.is_finite() || self.spawn_margin < 0.0 {
            self.spawn_margin = defaults.spawn_margin;
        }
        self.fall_speed = self.fall_speed.min(40.0);
        self
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    /// Read settings from a JSON file
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fruit_skewer_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
