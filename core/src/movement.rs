//! Movement sources.
//!
//! Two controllers can move the player: [`StepController`] turns directional input into one-cell
//! deltas and [`FeedController`] relays absolute fixes from an external [`PositionFeed`].
//! [`MovementSwitch`] makes sure at most one of them is active.

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementMode {
    /// Directional steps from keys or buttons.
    #[default]
    Step,
    /// Absolute fixes from a position feed.
    Feed,
}

impl MovementMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Step => "step",
            Self::Feed => "feed",
        }
    }
}

impl core::str::FromStr for MovementMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "step" | "buttons" | "keys" => Ok(Self::Step),
            "feed" | "gps" | "geo" => Ok(Self::Feed),
            _ => Err(GameError::InvalidConfig("unknown movement mode")),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Unit displacement in cells, `(di, dj)`.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::North => (1, 0),
            Self::South => (-1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

/// Shared start/stop contract of every movement source.
pub trait MovementController {
    fn mode(&self) -> MovementMode;

    /// Begins producing updates. Starting an active controller does nothing.
    fn start(&mut self) -> Result<()>;

    /// Stops producing updates. Stopping an inactive controller does nothing.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Turns each directional input into one cell-sized step along one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepController {
    cell_size: f64,
    active: bool,
}

impl StepController {
    pub const fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            active: false,
        }
    }

    /// Displacement in degrees for `direction`, or `None` while stopped.
    pub fn step(&self, direction: Direction) -> Option<(f64, f64)> {
        if !self.active {
            return None;
        }
        let (di, dj) = direction.delta();
        Some((
            f64::from(di) * self.cell_size,
            f64::from(dj) * self.cell_size,
        ))
    }
}

impl MovementController for StepController {
    fn mode(&self) -> MovementMode {
        MovementMode::Step
    }

    fn start(&mut self) -> Result<()> {
        if !self.active {
            self.active = true;
            log::debug!("step controls enabled");
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.active {
            self.active = false;
            log::debug!("step controls disabled");
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// External source of absolute positions, such as a location sensor.
///
/// The feed delivers fixes on its own schedule; the session only subscribes and unsubscribes.
pub trait PositionFeed {
    fn is_available(&self) -> bool;

    fn subscribe(&mut self) -> Result<()>;

    fn unsubscribe(&mut self);
}

/// A feed for hosts without any position source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoFeed;

impl PositionFeed for NoFeed {
    fn is_available(&self) -> bool {
        false
    }

    fn subscribe(&mut self) -> Result<()> {
        Err(GameError::SourceUnavailable)
    }

    fn unsubscribe(&mut self) {}
}

/// Relays absolute fixes from a [`PositionFeed`] while subscribed.
#[derive(Debug)]
pub struct FeedController<F> {
    feed: F,
    active: bool,
}

impl<F: PositionFeed> FeedController<F> {
    pub const fn new(feed: F) -> Self {
        Self {
            feed,
            active: false,
        }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }

    /// Passes `fix` through while subscribed.
    pub fn accept(&self, fix: LatLng) -> Option<LatLng> {
        self.active.then_some(fix)
    }
}

impl<F: PositionFeed> MovementController for FeedController<F> {
    fn mode(&self) -> MovementMode {
        MovementMode::Feed
    }

    fn start(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        if !self.feed.is_available() {
            log::warn!("position feed is unavailable");
            return Err(GameError::SourceUnavailable);
        }
        self.feed.subscribe()?;
        self.active = true;
        log::debug!("subscribed to position feed");
        Ok(())
    }

    fn stop(&mut self) {
        if self.active {
            self.feed.unsubscribe();
            self.active = false;
            log::debug!("unsubscribed from position feed");
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Owns one controller per mode and keeps at most one of them active.
#[derive(Debug)]
pub struct MovementSwitch<F> {
    step: StepController,
    feed: FeedController<F>,
    current: Option<MovementMode>,
}

impl<F: PositionFeed> MovementSwitch<F> {
    pub const fn new(cell_size: f64, feed: F) -> Self {
        Self {
            step: StepController::new(cell_size),
            feed: FeedController::new(feed),
            current: None,
        }
    }

    /// The active mode, if any controller is running.
    pub fn current(&self) -> Option<MovementMode> {
        self.current
    }

    pub fn step_controller(&self) -> &StepController {
        &self.step
    }

    pub fn feed_controller(&self) -> &FeedController<F> {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut F {
        self.feed.feed_mut()
    }

    /// Activates `mode`, stopping the previous controller first.
    ///
    /// When the new controller cannot start, the previous one is restarted and the error is
    /// returned.
    pub fn switch_to(&mut self, mode: MovementMode) -> Result<()> {
        if self.current == Some(mode) && self.controller(mode).is_active() {
            return Ok(());
        }

        let previous = self.current.take();
        if let Some(previous) = previous {
            self.controller_mut(previous).stop();
        }

        match self.controller_mut(mode).start() {
            Ok(()) => {
                self.current = Some(mode);
                log::debug!("movement mode {:?} -> {:?}", previous, mode);
                Ok(())
            }
            Err(err) => {
                if let Some(previous) = previous {
                    // the previous controller was running a moment ago
                    if self.controller_mut(previous).start().is_ok() {
                        self.current = Some(previous);
                    }
                }
                log::warn!("cannot switch to {:?} movement: {}", mode, err);
                Err(err)
            }
        }
    }

    /// Stops whichever controller is active.
    pub fn stop_all(&mut self) {
        if let Some(mode) = self.current.take() {
            self.controller_mut(mode).stop();
        }
    }

    pub fn step(&self, direction: Direction) -> Option<(f64, f64)> {
        self.step.step(direction)
    }

    pub fn accept_fix(&self, fix: LatLng) -> Option<LatLng> {
        self.feed.accept(fix)
    }

    fn controller(&self, mode: MovementMode) -> &dyn MovementController {
        match mode {
            MovementMode::Step => &self.step,
            MovementMode::Feed => &self.feed,
        }
    }

    fn controller_mut(&mut self, mode: MovementMode) -> &mut dyn MovementController {
        match mode {
            MovementMode::Step => &mut self.step,
            MovementMode::Feed => &mut self.feed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed double that counts subscriptions.
    #[derive(Debug, Default)]
    struct FakeFeed {
        available: bool,
        subscriptions: u32,
        live: bool,
    }

    impl FakeFeed {
        fn available() -> Self {
            Self {
                available: true,
                ..Self::default()
            }
        }
    }

    impl PositionFeed for FakeFeed {
        fn is_available(&self) -> bool {
            self.available
        }

        fn subscribe(&mut self) -> Result<()> {
            assert!(!self.live, "double subscription");
            self.subscriptions += 1;
            self.live = true;
            Ok(())
        }

        fn unsubscribe(&mut self) {
            assert!(self.live, "unsubscribe without subscription");
            self.live = false;
        }
    }

    #[test]
    fn step_is_one_cell_along_one_axis() {
        let mut step = StepController::new(1e-4);
        assert_eq!(step.step(Direction::North), None);

        step.start().unwrap();

        assert_eq!(step.step(Direction::North), Some((1e-4, 0.0)));
        assert_eq!(step.step(Direction::South), Some((-1e-4, 0.0)));
        assert_eq!(step.step(Direction::East), Some((0.0, 1e-4)));
        assert_eq!(step.step(Direction::West), Some((0.0, -1e-4)));
        assert_eq!(step.step(Direction::West), step.step(Direction::West));
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut feed = FeedController::new(FakeFeed::available());

        feed.start().unwrap();
        feed.start().unwrap();
        assert_eq!(feed.feed().subscriptions, 1);

        feed.stop();
        feed.stop();
        assert!(!feed.feed().live);
        assert!(!feed.is_active());
    }

    #[test]
    fn unavailable_feed_does_not_subscribe() {
        let mut feed = FeedController::new(FakeFeed::default());

        assert_eq!(feed.start(), Err(GameError::SourceUnavailable));
        assert_eq!(feed.feed().subscriptions, 0);
        assert_eq!(feed.accept(LatLng::new(1.0, 1.0)), None);
    }

    #[test]
    fn switching_stops_previous_controller() {
        let mut switch = MovementSwitch::new(1e-4, FakeFeed::available());

        switch.switch_to(MovementMode::Step).unwrap();
        assert!(switch.step(Direction::East).is_some());

        switch.switch_to(MovementMode::Feed).unwrap();
        assert_eq!(switch.current(), Some(MovementMode::Feed));
        assert_eq!(switch.step(Direction::East), None);
        assert!(switch.accept_fix(LatLng::new(1.0, 2.0)).is_some());

        switch.switch_to(MovementMode::Step).unwrap();
        assert!(!switch.feed_controller().feed().live);
        assert_eq!(switch.accept_fix(LatLng::new(1.0, 2.0)), None);
    }

    #[test]
    fn same_mode_switch_is_noop() {
        let mut switch = MovementSwitch::new(1e-4, FakeFeed::available());

        switch.switch_to(MovementMode::Feed).unwrap();
        switch.switch_to(MovementMode::Feed).unwrap();

        assert_eq!(switch.feed_controller().feed().subscriptions, 1);
    }

    #[test]
    fn failed_switch_keeps_previous_mode() {
        let mut switch = MovementSwitch::new(1e-4, NoFeed);
        switch.switch_to(MovementMode::Step).unwrap();

        assert_eq!(
            switch.switch_to(MovementMode::Feed),
            Err(GameError::SourceUnavailable)
        );
        assert_eq!(switch.current(), Some(MovementMode::Step));
        assert!(switch.step(Direction::North).is_some());
    }

    #[test]
    fn failed_switch_from_nothing_leaves_no_movement() {
        let mut switch = MovementSwitch::new(1e-4, NoFeed);

        assert!(switch.switch_to(MovementMode::Feed).is_err());
        assert_eq!(switch.current(), None);
        assert_eq!(switch.step(Direction::North), None);
    }

    #[test]
    fn stop_all_deactivates() {
        let mut switch = MovementSwitch::new(1e-4, FakeFeed::available());
        switch.switch_to(MovementMode::Feed).unwrap();

        switch.stop_all();

        assert_eq!(switch.current(), None);
        assert!(!switch.feed_controller().feed().live);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("GPS".parse::<MovementMode>(), Ok(MovementMode::Feed));
        assert_eq!(" step ".parse::<MovementMode>(), Ok(MovementMode::Step));
        assert!("teleport".parse::<MovementMode>().is_err());
    }
}
