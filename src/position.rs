//! Position sources: recorded track replay and the background feed that
//! pushes fixes into a controller mailbox.

use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use crate::controller::RideEvent;
use crate::coordinate::{Coordinate, ParseCoordinateError};
use crate::traits::PositionSource;

/// A single location report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    pub coordinate: Coordinate,
    pub timestamp: Instant,
}

impl PositionFix {
    pub fn new(coordinate: Coordinate, timestamp: Instant) -> Self {
        Self {
            coordinate,
            timestamp,
        }
    }

    /// A fix stamped with the current instant.
    pub fn now(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Instant::now())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,
}

#[derive(Debug, Error)]
pub enum TrackFileError {
    #[error("failed to read track file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        source: ParseCoordinateError,
    },
}

/// Replays a recorded list of coordinates as position fixes.
///
/// Timestamps start at construction and advance by `interval` per fix.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    points: std::vec::IntoIter<Coordinate>,
    next_timestamp: Instant,
    interval: Duration,
}

impl ReplaySource {
    pub fn new(points: Vec<Coordinate>, interval: Duration) -> Self {
        Self {
            points: points.into_iter(),
            next_timestamp: Instant::now(),
            interval,
        }
    }

    /// Loads a track with one `lat,lng` pair per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_file(path: impl AsRef<Path>, interval: Duration) -> Result<Self, TrackFileError> {
        let contents = fs::read_to_string(path)?;
        let points = parse_track(&contents)?;
        Ok(Self::new(points, interval))
    }

    pub fn remaining(&self) -> usize {
        self.points.len()
    }
}

pub fn parse_track(contents: &str) -> Result<Vec<Coordinate>, TrackFileError> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            line.parse::<Coordinate>()
                .map_err(|source| TrackFileError::Parse {
                    line: index + 1,
                    source,
                })
        })
        .collect()
}

impl PositionSource for ReplaySource {
    fn next_fix(&mut self) -> Result<Option<PositionFix>, PositionError> {
        let Some(coordinate) = self.points.next() else {
            return Ok(None);
        };
        let fix = PositionFix::new(coordinate, self.next_timestamp);
        self.next_timestamp += self.interval;
        Ok(Some(fix))
    }
}

/// A provider the user never authorized.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedSource;

impl PositionSource for DeniedSource {
    fn next_fix(&mut self) -> Result<Option<PositionFix>, PositionError> {
        Err(PositionError::PermissionDenied)
    }
}

/// Pumps `source` into a controller mailbox from a background thread.
///
/// Sleeps `pace` between fixes. Sends `RideEvent::PositionUnavailable` if the
/// source fails and `RideEvent::FeedEnded` whenever the thread exits any other
/// way, including a panic inside the source. Stops early if the controller
/// has gone away.
pub fn spawn_feed<S>(mut source: S, mailbox: Sender<RideEvent>, pace: Duration) -> JoinHandle<()>
where
    S: PositionSource + Send + 'static,
{
    thread::spawn(move || {
        let mut feed_end = FeedEnd {
            mailbox,
            notify: true,
        };
        loop {
            let event = match source.next_fix() {
                Ok(Some(fix)) => RideEvent::Position(fix),
                Ok(None) => {
                    debug!("position feed exhausted");
                    return;
                }
                Err(err) => {
                    warn!(error = %err, "position feed failed");
                    feed_end.notify = false;
                    let _ = feed_end.mailbox.send(RideEvent::PositionUnavailable(err));
                    return;
                }
            };

            if feed_end.mailbox.send(event).is_err() {
                feed_end.notify = false;
                return;
            }
            if !pace.is_zero() {
                thread::sleep(pace);
            }
        }
    })
}

/// Reports the end of a feed when dropped, so a panicking source cannot
/// leave the controller waiting.
struct FeedEnd {
    mailbox: Sender<RideEvent>,
    notify: bool,
}

impl Drop for FeedEnd {
    fn drop(&mut self) {
        if self.notify {
            let _ = self.mailbox.send(RideEvent::FeedEnded);
        }
    }
}
