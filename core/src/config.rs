use serde::{Deserialize, Serialize};

use crate::*;

/// Classroom centre used as the local origin and the default start position.
pub const CLASSROOM: LatLng = LatLng::new(36.997936938057016, -122.05703507501151);

/// Where cell `(0, 0)` is anchored.
///
/// With [`OriginScheme::Global`] every instance agrees on cell identity; the local schemes only
/// agree with instances anchored at the same point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginScheme {
    #[default]
    Global,
    Local,
    Custom(LatLng),
}

impl OriginScheme {
    pub const fn origin(self) -> LatLng {
        match self {
            Self::Global => LatLng::new(0.0, 0.0),
            Self::Local => CLASSROOM,
            Self::Custom(origin) => origin,
        }
    }
}

/// What happens to overridden cells once they scroll out of view.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayPolicy {
    /// Keep every override for the whole session.
    #[default]
    Retain,
    /// Forget overrides outside the visible cells at each redraw.
    EvictOffscreen,
}

/// Largest allowed `half_extent + padding`, in cells.
pub const MAX_VIEW_RADIUS: u32 = 256;

/// Visible area around the player, in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ViewportConfig {
    pub half_extent: u16,
    pub padding: u16,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            half_extent: 8,
            padding: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GameConfig {
    pub origin: OriginScheme,
    pub cell_size: f64,
    pub start: LatLng,
    pub interact_steps: u32,
    pub win_target: TokenValue,
    pub spawn: SpawnTable,
    pub viewport: ViewportConfig,
    pub overlay_policy: OverlayPolicy,
    pub movement: MovementMode,
    pub max_feed_jump_cells: Option<u32>,
}

impl ViewportConfig {
    /// Cells from the player's cell to the edge of the padded view.
    pub fn radius(&self) -> u32 {
        u32::from(self.half_extent) + u32::from(self.padding)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            origin: OriginScheme::Global,
            cell_size: 1e-4,
            start: CLASSROOM,
            interact_steps: 3,
            win_target: 32,
            spawn: SpawnTable::default(),
            viewport: ViewportConfig::default(),
            overlay_policy: OverlayPolicy::Retain,
            movement: MovementMode::Step,
            max_feed_jump_cells: None,
        }
    }
}

impl GameConfig {
    /// Cells anchored at the classroom centre.
    pub fn local() -> Self {
        Self {
            origin: OriginScheme::Local,
            ..Self::default()
        }
    }

    /// Cells anchored at `(0, 0)`, shared by every instance.
    pub fn global() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.mapper()?;
        if !self.start.is_on_globe() {
            return Err(GameError::InvalidConfig("start must be a point on the globe"));
        }
        if !self.win_target.is_token() {
            return Err(GameError::InvalidConfig(
                "win target must be a non-zero power of two",
            ));
        }
        if self.viewport.half_extent == 0 {
            return Err(GameError::InvalidConfig("viewport must span at least one cell"));
        }
        if self.viewport.radius() > MAX_VIEW_RADIUS {
            return Err(GameError::InvalidConfig("viewport is too large"));
        }
        // the visible range may stop one cell short of the radius on its northern and eastern edges
        if self.interact_steps >= self.viewport.radius() {
            return Err(GameError::InvalidConfig(
                "interaction reach must stay inside the viewport",
            ));
        }
        if self.max_feed_jump_cells == Some(0) {
            return Err(GameError::InvalidConfig("feed jump guard must allow some movement"));
        }
        self.spawn.validate()
    }

    pub fn mapper(&self) -> Result<GridMapper> {
        GridMapper::new(self.origin.origin(), self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::local().validate(), Ok(()));
    }

    #[test]
    fn presets_pick_origin() {
        assert_eq!(GameConfig::global().origin.origin(), LatLng::new(0.0, 0.0));
        assert_eq!(GameConfig::local().origin.origin(), CLASSROOM);
    }

    #[test]
    fn rejects_invalid_values() {
        let bad = [
            GameConfig {
                cell_size: 0.0,
                ..GameConfig::default()
            },
            GameConfig {
                win_target: 24,
                ..GameConfig::default()
            },
            GameConfig {
                win_target: 0,
                ..GameConfig::default()
            },
            GameConfig {
                start: LatLng::new(f64::NAN, 0.0),
                ..GameConfig::default()
            },
            GameConfig {
                viewport: ViewportConfig {
                    half_extent: 0,
                    padding: 0,
                },
                ..GameConfig::default()
            },
            GameConfig {
                max_feed_jump_cells: Some(0),
                ..GameConfig::default()
            },
            GameConfig {
                viewport: ViewportConfig {
                    half_extent: u16::MAX,
                    padding: u16::MAX,
                },
                ..GameConfig::default()
            },
            GameConfig {
                viewport: ViewportConfig {
                    half_extent: 200,
                    padding: 57,
                },
                ..GameConfig::default()
            },
            GameConfig {
                interact_steps: 5,
                viewport: ViewportConfig {
                    half_extent: 1,
                    padding: 0,
                },
                overlay_policy: OverlayPolicy::EvictOffscreen,
                ..GameConfig::default()
            },
            GameConfig {
                interact_steps: 9,
                ..GameConfig::default()
            },
            GameConfig {
                cell_size: 1e-8,
                ..GameConfig::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn accepts_limits() {
        let widest = GameConfig {
            interact_steps: 255,
            viewport: ViewportConfig {
                half_extent: 200,
                padding: 56,
            },
            ..GameConfig::default()
        };
        let tightest = GameConfig {
            interact_steps: 0,
            viewport: ViewportConfig {
                half_extent: 1,
                padding: 0,
            },
            ..GameConfig::default()
        };

        assert_eq!(widest.validate(), Ok(()));
        assert_eq!(tightest.validate(), Ok(()));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: GameConfig = serde_json::from_str(
            r#"{
                "origin": { "custom": { "lat": 1.0, "lng": 2.0 } },
                "win-target": 64,
                "overlay-policy": "evict-offscreen",
                "movement": "feed"
            }"#,
        )
        .unwrap();

        assert_eq!(config.origin.origin(), LatLng::new(1.0, 2.0));
        assert_eq!(config.win_target, 64);
        assert_eq!(config.overlay_policy, OverlayPolicy::EvictOffscreen);
        assert_eq!(config.movement, MovementMode::Feed);
        assert_eq!(config.interact_steps, 3);
        assert_eq!(config.spawn, SpawnTable::default());
    }
}
