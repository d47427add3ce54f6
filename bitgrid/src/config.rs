#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bits::packed_len;
use crate::error::ConfigError;

/// One RGBA pixel.
pub type Rgba = [u8; 4];

pub const RED: Rgba = [255, 0, 0, 255];
pub const WHITE: Rgba = [255, 255, 255, 255];

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 1000;

/// Colors written for set and clear cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Palette {
    pub set: Rgba,
    pub clear: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            set: RED,
            clear: WHITE,
        }
    }
}

impl Palette {
    #[inline]
    pub fn color(&self, is_set: bool) -> Rgba {
        if is_set {
            self.set
        } else {
            self.clear
        }
    }
}

/// Board geometry and colors.
///
/// ```toml
/// width = 1000
/// height = 1000
///
/// [palette]
/// set = [255, 0, 0, 255]
/// clear = [255, 255, 255, 255]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            palette: Palette::default(),
        }
    }
}

impl BoardConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parse a TOML board description. Missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(toml_str: &str) -> Result<BoardConfig, ConfigError> {
        let config: BoardConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the board is non-empty and its RGBA buffer is addressable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|cells| cells.checked_mul(4))
            .ok_or(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
            })?;
        Ok(())
    }

    /// Total number of cells. Only meaningful after [`validate`](Self::validate).
    #[inline]
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of a fully populated packed grid.
    #[inline]
    pub fn packed_len(&self) -> usize {
        packed_len(self.cells())
    }

    /// Byte length of the RGBA raster.
    #[inline]
    pub fn raster_len(&self) -> usize {
        self.cells() * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board() {
        let config = BoardConfig::default();
        assert_eq!(config.width, 1000);
        assert_eq!(config.height, 1000);
        assert_eq!(config.cells(), 1_000_000);
        assert_eq!(config.packed_len(), 125_000);
        assert_eq!(config.raster_len(), 4_000_000);
        assert_eq!(config.palette.set, RED);
        assert_eq!(config.palette.clear, WHITE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimension_rejected() {
        let err = BoardConfig::new(0, 10).validate().unwrap_err();
        assert_eq!(err, ConfigError::ZeroDimension { width: 0, height: 10 });
    }

    #[test]
    fn palette_color() {
        let p = Palette::default();
        assert_eq!(p.color(true), RED);
        assert_eq!(p.color(false), WHITE);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn parse_toml_with_defaults() {
        let config = BoardConfig::from_toml_str("width = 64\nheight = 32\n").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 32);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn parse_toml_palette() {
        let src = "width = 8\nheight = 1\n[palette]\nset = [0, 0, 0, 255]\n";
        let config = BoardConfig::from_toml_str(src).unwrap();
        assert_eq!(config.palette.set, [0, 0, 0, 255]);
        assert_eq!(config.palette.clear, WHITE);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn parse_toml_rejects_zero() {
        assert!(matches!(
            BoardConfig::from_toml_str("width = 0"),
            Err(ConfigError::ZeroDimension { .. })
        ));
        assert!(matches!(
            BoardConfig::from_toml_str("width = \"wide\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
