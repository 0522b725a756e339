use serde::{Deserialize, Serialize};

use crate::*;

/// Presentation layer fed by a [`Session`].
pub trait Presenter {
    /// Called after every state-affecting event.
    fn redraw(&mut self, scene: &Scene);

    /// Called once per session, when the win target is first reached.
    fn announce_win(&mut self, held: TokenValue);
}

/// HUD information.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub held: Option<TokenValue>,
    pub has_won: bool,
    pub win_target: TokenValue,
    pub mode: Option<MovementMode>,
    pub merges: u32,
    pub best_value: TokenValue,
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.held {
            Some(value) => write!(f, "Holding: {value}")?,
            None => write!(f, "Holding: nothing")?,
        }
        write!(f, " | Goal: {}", self.win_target)?;
        if self.has_won {
            write!(f, " | Won!")?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneCell {
    pub cell: Coord2,
    pub value: TokenValue,
    /// Within interaction reach of the player.
    pub reachable: bool,
}

/// Everything a presenter needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub visible: CellRange,
    pub cells: Vec<SceneCell>,
    pub player: LatLng,
    pub player_cell: Coord2,
    pub status: Status,
}

impl Scene {
    pub fn value_at(&self, cell: Coord2) -> Option<TokenValue> {
        self.cells
            .iter()
            .find(|scene_cell| scene_cell.cell == cell)
            .map(|scene_cell| scene_cell.value)
    }
}

/// One running game: the engine, what is on screen, how the player moves, and who draws it.
#[derive(Debug)]
pub struct Session<G, F, P> {
    engine: PlayEngine<G>,
    viewport: Viewport,
    movement: MovementSwitch<F>,
    presenter: P,
    overlay_policy: OverlayPolicy,
    max_feed_jump_cells: Option<u32>,
}

impl<G, F, P> Session<G, F, P>
where
    G: TokenGenerator,
    F: PositionFeed,
    P: Presenter,
{
    pub fn new(config: &GameConfig, generator: G, feed: F, presenter: P) -> Result<Self> {
        let engine = PlayEngine::new(config, generator)?;
        let mut session = Self {
            viewport: Viewport::new(engine.player(), config.viewport),
            movement: MovementSwitch::new(engine.mapper().cell_size(), feed),
            engine,
            presenter,
            overlay_policy: config.overlay_policy,
            max_feed_jump_cells: config.max_feed_jump_cells,
        };

        if let Err(err) = session.movement.switch_to(config.movement) {
            log::warn!(
                "starting without {} movement: {}",
                config.movement.as_str(),
                err
            );
        }
        log::info!(
            "session started at {} (cell {:?})",
            session.engine.player(),
            session.engine.player_cell()
        );
        session.redraw();
        Ok(session)
    }

    pub fn engine(&self) -> &PlayEngine<G> {
        &self.engine
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    pub fn feed_mut(&mut self) -> &mut F {
        self.movement.feed_mut()
    }

    pub fn mode(&self) -> Option<MovementMode> {
        self.movement.current()
    }

    pub fn interact(&mut self, cell: Coord2) -> InteractOutcome {
        let outcome = self.engine.interact(cell);
        if outcome.has_update() {
            self.redraw();
        }
        if let InteractOutcome::Won(held) = outcome {
            self.presenter.announce_win(held);
        }
        outcome
    }

    /// Interacts with the cell at offset `(di, dj)` from the player's cell.
    pub fn interact_relative(&mut self, (di, dj): Coord2) -> InteractOutcome {
        let (i, j) = self.engine.player_cell();
        self.interact((i.saturating_add(di), j.saturating_add(dj)))
    }

    pub fn switch_mode(&mut self, mode: MovementMode) -> Result<()> {
        let result = self.movement.switch_to(mode);
        self.redraw();
        result
    }

    /// Stops whichever movement source is active, releasing the position feed.
    pub fn stop_movement(&mut self) {
        self.movement.stop_all();
    }

    /// Directional input. Returns `Ok(false)` when step movement is not active.
    pub fn on_direction(&mut self, direction: Direction) -> Result<bool> {
        let Some((dlat, dlng)) = self.movement.step(direction) else {
            log::debug!("ignoring {:?}, step movement is not active", direction);
            return Ok(false);
        };
        let target = self.engine.player().offset(dlat, dlng);
        self.apply_player_position(target.lat, target.lng)?;
        Ok(true)
    }

    /// Absolute fix from the position feed. Returns `Ok(false)` when the feed is not active.
    pub fn on_position_fix(&mut self, fix: LatLng) -> Result<bool> {
        let Some(fix) = self.movement.accept_fix(fix) else {
            log::debug!("ignoring fix {:?}, feed is not active", fix);
            return Ok(false);
        };
        self.check_jump(fix)?;
        self.apply_player_position(fix.lat, fix.lng)?;
        Ok(true)
    }

    /// Moves the player, recentres the viewport and redraws.
    pub fn apply_player_position(&mut self, lat: f64, lng: f64) -> Result<()> {
        let pos = LatLng::new(lat, lng);
        self.engine.set_player_position(pos)?;
        self.viewport.recenter(pos);
        self.redraw();
        Ok(())
    }

    pub fn redraw(&mut self) {
        let visible = self.viewport.visible_cells(self.engine.mapper());
        if self.overlay_policy == OverlayPolicy::EvictOffscreen {
            self.engine.overlay_mut().evict_outside(&visible);
        }
        let scene = self.scene_for(visible);
        log::trace!("redraw {} cells around {:?}", scene.cells.len(), scene.player_cell);
        self.presenter.redraw(&scene);
    }

    pub fn status(&self) -> Status {
        Status {
            held: self.engine.held(),
            has_won: self.engine.has_won(),
            win_target: self.engine.win_target(),
            mode: self.movement.current(),
            merges: self.engine.merges(),
            best_value: self.engine.best_value(),
        }
    }

    pub fn scene(&self) -> Scene {
        self.scene_for(self.viewport.visible_cells(self.engine.mapper()))
    }

    fn scene_for(&self, visible: CellRange) -> Scene {
        let cells = visible
            .iter()
            .map(|cell| SceneCell {
                cell,
                value: self.engine.effective_value(cell),
                reachable: self.engine.can_interact_at(cell),
            })
            .collect();
        Scene {
            visible,
            cells,
            player: self.engine.player(),
            player_cell: self.engine.player_cell(),
            status: self.status(),
        }
    }

    fn check_jump(&self, fix: LatLng) -> Result<()> {
        let Some(limit) = self.max_feed_jump_cells else {
            return Ok(());
        };
        if !fix.is_finite() {
            return Err(GameError::InvalidPosition);
        }
        let cells = chebyshev(
            self.engine.player_cell(),
            self.engine.mapper().to_cell(fix),
        );
        if cells > limit {
            log::warn!("rejected fix {} jumping {} cells", fix, cells);
            return Err(GameError::PositionJump { cells });
        }
        Ok(())
    }
}
