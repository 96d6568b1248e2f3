use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

/// Cadence of the two room timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// How often the current song is fetched
    pub playback: Duration,
    /// How often the room details and the chat log are fetched
    pub room: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        PollIntervals {
            playback: Duration::from_millis(1000),
            room: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTick {
    Playback,
    Room,
}

/// Timers of a single room session, dropping them stops the polling
pub struct RoomPollers {
    playback: Interval,
    room: Interval,
}

impl RoomPollers {
    /// Both timers fire right away, then on their own cadence
    pub fn start(intervals: PollIntervals) -> Self {
        RoomPollers {
            playback: delayed_interval(intervals.playback),
            room: delayed_interval(intervals.room),
        }
    }

    /// # Cancel Safety
    ///
    /// Cancel safe, a tick that lost a [tokio::select!] race is handed out by the next call.
    pub async fn tick(&mut self) -> PollTick {
        tokio::select! {
            _ = self.playback.tick() => PollTick::Playback,
            _ = self.room.tick() => PollTick::Room,
        }
    }
}

// a slow request must not cause a burst of catch-up polls
fn delayed_interval(period: Duration) -> Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    interval
}

/// Resolves with the next tick of the pollers, never when there are none
pub async fn next_poll(pollers: Option<&mut RoomPollers>) -> PollTick {
    match pollers {
        Some(pollers) => pollers.tick().await,
        None => std::future::pending().await,
    }
}
