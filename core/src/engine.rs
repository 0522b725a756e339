use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldState {
    Idle,
    Holding(TokenValue),
}

impl HoldState {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn held(self) -> Option<TokenValue> {
        match self {
            Self::Idle => None,
            Self::Holding(value) => Some(value),
        }
    }
}

impl Default for HoldState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Cell transition caused by a position update.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PositionChange {
    pub from: Coord2,
    pub to: Coord2,
}

impl PositionChange {
    pub const fn cell_changed(&self) -> bool {
        self.from.0 != self.to.0 || self.from.1 != self.to.1
    }

    /// Chebyshev length of the transition in cells.
    pub const fn cells(&self) -> u32 {
        chebyshev(self.from, self.to)
    }
}

/// The game state machine: player position, held token, win flag and the cell overlay.
#[derive(Clone, Debug)]
pub struct PlayEngine<G> {
    mapper: GridMapper,
    overlay: Overlay<G>,
    player: LatLng,
    hold: HoldState,
    has_won: bool,
    interact_steps: u32,
    win_target: TokenValue,
    merges: u32,
    best_value: TokenValue,
}

impl<G: TokenGenerator> PlayEngine<G> {
    pub fn new(config: &GameConfig, generator: G) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mapper: config.mapper()?,
            overlay: Overlay::new(generator),
            player: config.start,
            hold: HoldState::Idle,
            has_won: false,
            interact_steps: config.interact_steps,
            win_target: config.win_target,
            merges: 0,
            best_value: 0,
        })
    }

    pub fn mapper(&self) -> &GridMapper {
        &self.mapper
    }

    pub fn overlay(&self) -> &Overlay<G> {
        &self.overlay
    }

    pub(crate) fn overlay_mut(&mut self) -> &mut Overlay<G> {
        &mut self.overlay
    }

    pub fn player(&self) -> LatLng {
        self.player
    }

    pub fn player_cell(&self) -> Coord2 {
        self.mapper.to_cell(self.player)
    }

    pub fn hold_state(&self) -> HoldState {
        self.hold
    }

    pub fn held(&self) -> Option<TokenValue> {
        self.hold.held()
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn win_target(&self) -> TokenValue {
        self.win_target
    }

    pub fn interact_steps(&self) -> u32 {
        self.interact_steps
    }

    pub fn merges(&self) -> u32 {
        self.merges
    }

    pub fn best_value(&self) -> TokenValue {
        self.best_value
    }

    pub fn effective_value(&self, cell: Coord2) -> TokenValue {
        self.overlay.effective_value(cell)
    }

    /// Whether `cell` is within reach of the player.
    pub fn can_interact_at(&self, cell: Coord2) -> bool {
        chebyshev(self.player_cell(), cell) <= self.interact_steps
    }

    /// Picks up or merges the token at `cell`.
    ///
    /// Out of reach and mismatched cells are silently ignored.
    pub fn interact(&mut self, cell: Coord2) -> InteractOutcome {
        use HoldState::*;
        use InteractOutcome::*;

        if !self.can_interact_at(cell) {
            log::debug!(
                "ignoring {:?}, out of reach from {:?}",
                cell,
                self.player_cell()
            );
            return NoChange;
        }

        let value = self.overlay.effective_value(cell);
        match self.hold {
            Idle if value > 0 => {
                self.hold = Holding(value);
                self.overlay.set_value(cell, 0);
                self.best_value = self.best_value.max(value);
                log::debug!("picked up {} at {:?}", value, cell);
                if self.check_win(value) {
                    Won(value)
                } else {
                    PickedUp(value)
                }
            }
            Holding(held) if held > 0 && value == held => {
                let merged = held.doubled();
                self.overlay.set_value(cell, merged);
                self.hold = Idle;
                self.merges += 1;
                self.best_value = self.best_value.max(merged);
                log::debug!("merged {} into {} at {:?}", held, merged, cell);
                Merged(merged)
            }
            _ => NoChange,
        }
    }

    /// Moves the player, rejecting anything that is not a finite point on the globe.
    pub fn set_player_position(&mut self, pos: LatLng) -> Result<PositionChange> {
        if !pos.is_on_globe() {
            log::warn!("rejected position {:?}", pos);
            return Err(GameError::InvalidPosition);
        }

        let from = self.player_cell();
        self.player = pos;
        let change = PositionChange {
            from,
            to: self.player_cell(),
        };
        if change.cell_changed() {
            log::debug!("player moved {:?} -> {:?}", change.from, change.to);
        }
        Ok(change)
    }

    fn check_win(&mut self, held: TokenValue) -> bool {
        if self.has_won || held < self.win_target {
            return false;
        }
        self.has_won = true;
        log::info!("won holding {}", held);
        true
    }
}
