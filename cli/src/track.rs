use std::collections::VecDeque;
use std::path::Path;

use anyhow::Context;
use geomerge_core::{GameError, LatLng, PositionFeed};

/// Position feed replaying a recorded track, one `lat,lng` fix per line.
///
/// Without a track the feed reports itself unavailable, like a host without a location sensor.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TrackFeed {
    fixes: Option<VecDeque<LatLng>>,
    subscribed: bool,
}

impl TrackFeed {
    pub(crate) fn unavailable() -> Self {
        Self::default()
    }

    pub(crate) fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading track {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing track {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> anyhow::Result<Self> {
        let mut fixes = VecDeque::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let (lat, lng) = line
                .split_once(',')
                .with_context(|| format!("line {}: expected `lat,lng`", index + 1))?;
            let lat = lat
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad latitude", index + 1))?;
            let lng = lng
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad longitude", index + 1))?;
            fixes.push_back(LatLng::new(lat, lng));
        }
        log::debug!("loaded track with {} fixes", fixes.len());
        Ok(Self {
            fixes: Some(fixes),
            subscribed: false,
        })
    }

    /// Next recorded fix, only while someone is subscribed. An exhausted track simply goes quiet.
    pub(crate) fn next_fix(&mut self) -> Option<LatLng> {
        if !self.subscribed {
            return None;
        }
        self.fixes.as_mut()?.pop_front()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.fixes.as_ref().map_or(0, VecDeque::len)
    }
}

impl PositionFeed for TrackFeed {
    fn is_available(&self) -> bool {
        self.fixes.is_some()
    }

    fn subscribe(&mut self) -> Result<(), GameError> {
        if self.fixes.is_none() {
            return Err(GameError::SourceUnavailable);
        }
        self.subscribed = true;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }
}
