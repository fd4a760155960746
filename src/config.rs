// Tunables for one play surface and the per-level dirt theme

use serde::{Deserialize, Serialize};

use crate::ambient::DEFAULT_BLOB_COUNT;
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical surface resolution; constant for the session.
    pub width: u32,
    pub height: u32,
    /// Erase radius in logical pixels. Not rescaled with the display size.
    pub brush_radius: f64,
    /// Fraction of one dab's area credited to the accumulator (`k`).
    pub area_credit: f64,
    /// Multiplies the surface area to form the 100% denominator.
    pub difficulty: f64,
    pub blob_count: usize,
    /// Brush cursor edge length in logical pixels (cosmetic).
    pub cursor_size: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            brush_radius: 50.0,
            area_credit: 0.05,
            difficulty: 1.0,
            blob_count: DEFAULT_BLOB_COUNT,
            cursor_size: 100.0,
        }
    }
}

impl EngineConfig {
    /// Missing fields take their defaults; the result is validated.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &'static str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(name, v))
            }
        };
        positive("width", self.width as f64)?;
        positive("height", self.height as f64)?;
        positive("brush_radius", self.brush_radius)?;
        positive("area_credit", self.area_credit)?;
        positive("difficulty", self.difficulty)?;
        Ok(())
    }

    /// Area credited per erase stroke: `π·R²·k`.
    pub fn stroke_credit(&self) -> f64 {
        std::f64::consts::PI * self.brush_radius * self.brush_radius * self.area_credit
    }

    /// Accumulator value that counts as 100%: `W·H·difficulty`.
    pub fn progress_denominator(&self) -> f64 {
        self.width as f64 * self.height as f64 * self.difficulty
    }
}

/// What the dirt layer looks like for one level.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// `#RRGGBB`; `None` or malformed means the neutral fallback.
    pub dirt_color: Option<String>,
    /// Empty means "no image": the flat fill with ambient blobs is used.
    pub dirt_image: String,
    pub clean_image: String,
    pub brush_image: String,
}

impl Theme {
    pub fn has_dirt_image(&self) -> bool {
        !self.dirt_image.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_game_tuning() {
        let c = EngineConfig::default();
        assert_eq!((c.width, c.height), (800, 600));
        assert_eq!(c.brush_radius, 50.0);
        assert_eq!(c.progress_denominator(), 480_000.0);
        assert!((c.stroke_credit() - 392.699).abs() < 1e-3);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = EngineConfig::from_json(r#"{ "area_credit": 1.0, "difficulty": 2.0 }"#).unwrap();
        assert_eq!(c.area_credit, 1.0);
        assert_eq!(c.progress_denominator(), 960_000.0);
        assert_eq!(c.blob_count, DEFAULT_BLOB_COUNT);
    }

    #[test]
    fn rejects_bad_json_and_bad_values() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(
            EngineConfig::from_json(r#"{ "brush_radius": 0 }"#),
            Err(ConfigError::Invalid("brush_radius", 0.0))
        );
        assert_eq!(
            EngineConfig::from_json(r#"{ "difficulty": -1 }"#),
            Err(ConfigError::Invalid("difficulty", -1.0))
        );
    }

    #[test]
    fn theme_blank_image_means_fallback() {
        let mut t = Theme::default();
        assert!(!t.has_dirt_image());
        t.dirt_image = "   ".into();
        assert!(!t.has_dirt_image());
        t.dirt_image = "dirt.png".into();
        assert!(t.has_dirt_image());
    }
}
