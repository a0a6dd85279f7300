//! Display refresh background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, Mode, StateLabel};

/// Recompute the display snapshot every `period` and publish it to watchers.
///
/// This is the only periodic work in the process; the clock core itself has
/// no timer.
pub async fn display_tick_task(state: Arc<AppState>, period: Duration) {
    info!("Starting display tick task ({}ms)", period.as_millis());

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last: Option<(Mode, StateLabel)> = None;

    loop {
        ticker.tick().await;

        match state.publish_display() {
            Ok(snapshot) => {
                let current = (snapshot.mode, snapshot.label);
                if last != Some(current) {
                    if current.1 == StateLabel::Done {
                        info!("Countdown finished");
                    } else {
                        debug!("Display is now {} ({:?})", current.0, current.1);
                    }
                    last = Some(current);
                }
            }
            Err(e) => {
                error!("Failed to refresh display: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        state::{DisplayPreferences, StyleState},
    };
    use chrono::{TimeZone, Utc};

    #[tokio::test(start_paused = true)]
    async fn tick_publishes_the_running_counter() {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 2, 2, 2, 2, 2).unwrap()));
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            clock.clone(),
            DisplayPreferences::default(),
            StyleState::default(),
        ));
        state.set_mode(Mode::CountUp, None).unwrap();
        let mut rx = state.subscribe();

        let task = tokio::spawn(display_tick_task(Arc::clone(&state), Duration::from_millis(200)));

        clock.advance(42);
        tokio::time::sleep(Duration::from_millis(250)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().time, "00:00:42");

        task.abort();
    }
}
