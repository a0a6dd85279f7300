//! Time-mode state machine: wall clock, count-up and count-down

use std::fmt;

use chrono::{DateTime, Duration, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ClockError;

/// Text shown once a countdown has run out
pub const FINISHED_TEXT: &str = "00:00:00";

/// What the big time display shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Clock,
    CountUp,
    CountDown,
}

impl Mode {
    /// Next mode in the toolbar cycle
    pub fn next(self) -> Self {
        match self {
            Mode::Clock => Mode::CountUp,
            Mode::CountUp => Mode::CountDown,
            Mode::CountDown => Mode::Clock,
        }
    }

    /// Whether the mode counts seconds (and so can be paused and reset)
    pub fn is_counter(self) -> bool {
        !matches!(self, Mode::Clock)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Clock => "clock",
            Mode::CountUp => "countup",
            Mode::CountDown => "countdown",
        };
        f.write_str(name)
    }
}

/// Status shown next to the mode name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateLabel {
    Clock,
    Running,
    Paused,
    Done,
}

/// One rendering of the time display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeReading {
    pub text: String,
    pub mode: Mode,
    pub label: StateLabel,
}

/// Raw timer bookkeeping.
///
/// The paused flag is derived from `pause_started_at`, so a pause instant
/// exists exactly while the counter is paused.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub mode: Mode,
    /// Start reference; `None` only in clock mode
    pub started_at: Option<DateTime<Utc>>,
    pub countdown_total_seconds: i64,
    pub pause_started_at: Option<DateTime<Utc>>,
    pub accumulated_paused: Duration,
    /// Signed shift applied to the wall clock in clock mode
    pub clock_offset_seconds: i64,
}

impl TimerState {
    /// Clock mode, no offset
    pub fn new() -> Self {
        Self {
            mode: Mode::Clock,
            started_at: None,
            countdown_total_seconds: 0,
            pause_started_at: None,
            accumulated_paused: Duration::zero(),
            clock_offset_seconds: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_at.is_some()
    }

    fn clear_pause(&mut self) {
        self.pause_started_at = None;
        self.accumulated_paused = Duration::zero();
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of [`TimerState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub paused: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub countdown_total_seconds: i64,
    pub pause_started_at: Option<DateTime<Utc>>,
    pub accumulated_paused_seconds: f64,
    pub clock_offset_seconds: i64,
}

/// Drives the time display.
///
/// The engine owns no timer: callers pass `now` to every operation that
/// depends on the wall clock and poll [`TimeModeEngine::current_time`] at
/// their own cadence.
#[derive(Debug, Clone, Default)]
pub struct TimeModeEngine {
    state: TimerState,
}

impl TimeModeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Switch to `mode`.
    ///
    /// `initial_seconds` is the countdown total (required, positive) for
    /// count-down and the already-elapsed seed (optional, non-negative) for
    /// count-up; it is ignored for clock. On error nothing changes, including
    /// the current mode.
    pub fn set_mode(
        &mut self,
        mode: Mode,
        initial_seconds: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(), ClockError> {
        let (started_at, total) = match mode {
            Mode::Clock => (None, self.state.countdown_total_seconds),
            Mode::CountUp => {
                let seed = non_negative(initial_seconds.unwrap_or(0))?;
                (Some(rewind(now, seed)?), self.state.countdown_total_seconds)
            }
            Mode::CountDown => {
                let total = initial_seconds
                    .ok_or_else(|| ClockError::invalid("countdown needs a total number of seconds"))?;
                (Some(now), positive(total)?)
            }
        };

        self.state.mode = mode;
        self.state.started_at = started_at;
        self.state.countdown_total_seconds = total;
        self.state.clear_pause();
        info!("Mode set to {} (initial={:?})", mode, initial_seconds);
        Ok(())
    }

    /// Advance to the next mode in the cycle clock → count-up → count-down.
    ///
    /// Entering count-down needs `countdown_seconds`; without a valid total
    /// the engine stays in its current mode.
    pub fn switch_mode(
        &mut self,
        countdown_seconds: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Mode, ClockError> {
        let target = self.state.mode.next();
        let initial = match target {
            Mode::CountDown => countdown_seconds,
            Mode::Clock | Mode::CountUp => None,
        };
        self.set_mode(target, initial, now)?;
        Ok(target)
    }

    /// Restart the counter from zero. Does nothing in clock mode.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        if !self.state.mode.is_counter() {
            return;
        }
        self.state.started_at = Some(now);
        self.state.clear_pause();
        debug!("Counter reset");
    }

    /// Pause a running counter or resume a paused one. Does nothing in clock mode.
    pub fn toggle_pause(&mut self, now: DateTime<Utc>) {
        if !self.state.mode.is_counter() {
            return;
        }
        match self.state.pause_started_at.take() {
            Some(paused_at) => {
                self.state.accumulated_paused = self.state.accumulated_paused + (now - paused_at);
                debug!("Counter resumed");
            }
            None => {
                self.state.pause_started_at = Some(now);
                debug!("Counter paused");
            }
        }
    }

    /// Make the clock read `target` (`HH:MM:SS`, local time) at `now`
    pub fn set_clock_offset(&mut self, target: &str, now: DateTime<Utc>) -> Result<(), ClockError> {
        self.set_clock_offset_in(target, now, &Local)
    }

    /// [`TimeModeEngine::set_clock_offset`] against an explicit time zone
    pub fn set_clock_offset_in<Tz: TimeZone>(
        &mut self,
        target: &str,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<(), ClockError> {
        if self.state.mode != Mode::Clock {
            return Err(ClockError::invalid("the clock offset can only be set in clock mode"));
        }
        let target_seconds = parse_hms(target)?;
        let now_seconds = i64::from(now.with_timezone(tz).num_seconds_from_midnight());
        self.state.clock_offset_seconds = target_seconds - now_seconds;
        info!("Clock offset set to {}s", self.state.clock_offset_seconds);
        Ok(())
    }

    /// The "set time" control: interprets `raw` according to the current mode.
    ///
    /// Clock takes `HH:MM:SS`, count-up takes already-elapsed seconds and
    /// count-down takes a new positive total.
    pub fn set_time_value(&mut self, raw: &str, now: DateTime<Utc>) -> Result<(), ClockError> {
        self.set_time_value_in(raw, now, &Local)
    }

    pub fn set_time_value_in<Tz: TimeZone>(
        &mut self,
        raw: &str,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<(), ClockError> {
        match self.state.mode {
            Mode::Clock => self.set_clock_offset_in(raw, now, tz),
            Mode::CountUp => {
                let seed = non_negative(parse_seconds(raw)?)?;
                self.state.started_at = Some(rewind(now, seed)?);
                self.state.clear_pause();
                info!("Count-up seeded with {}s", seed);
                Ok(())
            }
            Mode::CountDown => {
                let total = positive(parse_seconds(raw)?)?;
                self.state.countdown_total_seconds = total;
                self.state.started_at = Some(now);
                self.state.clear_pause();
                info!("Countdown restarted with {}s", total);
                Ok(())
            }
        }
    }

    /// Whole seconds counted so far, excluding time spent paused
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        let Some(started_at) = self.state.started_at else {
            return 0;
        };
        let reference = self.state.pause_started_at.unwrap_or(now);
        let elapsed = reference - started_at - self.state.accumulated_paused;
        elapsed.num_seconds().max(0)
    }

    /// Seconds left on the countdown; goes negative once it has run out
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.state.countdown_total_seconds - self.elapsed_seconds(now)
    }

    /// Text and status for the time display, clock mode in local time
    pub fn current_time(&self, now: DateTime<Utc>) -> TimeReading {
        self.current_time_in(now, &Local)
    }

    pub fn current_time_in<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> TimeReading
    where
        Tz::Offset: fmt::Display,
    {
        let mode = self.state.mode;
        let running = if self.is_paused() {
            StateLabel::Paused
        } else {
            StateLabel::Running
        };

        let (text, label) = match mode {
            Mode::Clock => {
                let shifted = now + Duration::seconds(self.state.clock_offset_seconds);
                (shifted.with_timezone(tz).format("%H:%M:%S").to_string(), StateLabel::Clock)
            }
            Mode::CountUp => (format_hms(self.elapsed_seconds(now)), running),
            Mode::CountDown => {
                let remain = self.remaining_seconds(now);
                if remain <= 0 {
                    (FINISHED_TEXT.to_string(), StateLabel::Done)
                } else {
                    (format_hms(remain), running)
                }
            }
        };

        TimeReading { text, mode, label }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let accumulated = self.state.accumulated_paused;
        TimerSnapshot {
            mode: self.state.mode,
            paused: self.is_paused(),
            started_at: self.state.started_at,
            countdown_total_seconds: self.state.countdown_total_seconds,
            pause_started_at: self.state.pause_started_at,
            accumulated_paused_seconds: accumulated.num_milliseconds() as f64 / 1000.0,
            clock_offset_seconds: self.state.clock_offset_seconds,
        }
    }
}

/// Format seconds as `HH:MM:SS`. Hours are not wrapped at 24; negative
/// input renders as zero.
pub fn format_hms(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse `HH:MM:SS` (24-hour) into seconds since midnight
pub fn parse_hms(raw: &str) -> Result<i64, ClockError> {
    let bad = || ClockError::invalid(format!("expected HH:MM:SS, e.g. 08:30:00, got {:?}", raw));

    let parts = raw
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| bad())?;

    let [hours, minutes, seconds] = parts[..] else {
        return Err(bad());
    };
    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) || !(0..=59).contains(&seconds) {
        return Err(bad());
    }
    Ok(hours * 3600 + minutes * 60 + seconds)
}

fn parse_seconds(raw: &str) -> Result<i64, ClockError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ClockError::invalid(format!("expected a whole number of seconds, got {:?}", raw)))
}

/// `now` moved back by `seconds`; out-of-range seeds are rejected
fn rewind(now: DateTime<Utc>, seconds: i64) -> Result<DateTime<Utc>, ClockError> {
    Duration::try_seconds(seconds)
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| ClockError::invalid(format!("{} seconds is too far back to count from", seconds)))
}

fn positive(seconds: i64) -> Result<i64, ClockError> {
    if seconds > 0 {
        Ok(seconds)
    } else {
        Err(ClockError::invalid(format!("seconds must be positive, got {}", seconds)))
    }
}

fn non_negative(seconds: i64) -> Result<i64, ClockError> {
    if seconds >= 0 {
        Ok(seconds)
    } else {
        Err(ClockError::invalid(format!("seconds must not be negative, got {}", seconds)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 15, 30).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(seconds)
    }

    #[test]
    fn starts_in_clock_mode() {
        let engine = TimeModeEngine::new();
        assert_eq!(engine.mode(), Mode::Clock);
        assert!(engine.state().started_at.is_none());
        assert!(!engine.is_paused());
    }

    #[test]
    fn clock_reads_wall_time_in_zone() {
        let engine = TimeModeEngine::new();
        let reading = engine.current_time_in(t0(), &Utc);
        assert_eq!(reading.text, "09:15:30");
        assert_eq!(reading.label, StateLabel::Clock);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(engine.current_time_in(t0(), &plus_two).text, "11:15:30");
    }

    #[test]
    fn clock_offset_round_trips_every_hour() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        for hour in 0..24 {
            let target = format!("{:02}:{:02}:{:02}", hour, (hour * 7) % 60, (hour * 13) % 60);
            let mut engine = TimeModeEngine::new();
            engine.set_clock_offset_in(&target, t0(), &tz).unwrap();
            assert_eq!(engine.current_time_in(t0(), &tz).text, target);
        }
    }

    #[test]
    fn clock_offset_round_trips_in_local_time() {
        let mut engine = TimeModeEngine::new();
        engine.set_clock_offset("23:59:59", t0()).unwrap();
        assert_eq!(engine.current_time(t0()).text, "23:59:59");
    }

    #[test]
    fn clock_offset_wraps_past_midnight() {
        let mut engine = TimeModeEngine::new();
        engine.set_clock_offset_in("23:59:58", t0(), &Utc).unwrap();
        assert_eq!(engine.current_time_in(at(3), &Utc).text, "00:00:01");
    }

    #[test]
    fn clock_offset_keeps_ticking() {
        let mut engine = TimeModeEngine::new();
        engine.set_clock_offset_in("08:30:00", t0(), &Utc).unwrap();
        assert_eq!(engine.current_time_in(at(61), &Utc).text, "08:31:01");
    }

    #[test]
    fn clock_offset_rejects_malformed_input() {
        let mut engine = TimeModeEngine::new();
        for raw in ["", "8:30", "24:00:00", "12:60:00", "12:00:60", "a:b:c", "1:2:3:4", "-1:00:00"] {
            let err = engine.set_clock_offset_in(raw, t0(), &Utc).unwrap_err();
            assert!(matches!(err, ClockError::InvalidInput(_)), "{raw}");
        }
        assert_eq!(engine.state().clock_offset_seconds, 0);
    }

    #[test]
    fn clock_offset_only_in_clock_mode() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, None, t0()).unwrap();
        assert!(engine.set_clock_offset_in("10:00:00", t0(), &Utc).is_err());
    }

    #[test]
    fn count_up_formats_hours_minutes_seconds() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, Some(0), t0()).unwrap();
        let reading = engine.current_time(at(3661));
        assert_eq!(reading.text, "01:01:01");
        assert_eq!(reading.label, StateLabel::Running);
    }

    #[test]
    fn count_up_hours_are_not_wrapped() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, Some(100 * 3600), t0()).unwrap();
        assert_eq!(engine.current_time(t0()).text, "100:00:00");
    }

    #[test]
    fn count_up_truncates_partial_seconds() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, None, t0()).unwrap();
        let almost = t0() + Duration::milliseconds(1999);
        assert_eq!(engine.current_time(almost).text, "00:00:01");
    }

    #[test]
    fn count_up_rejects_negative_seed() {
        let mut engine = TimeModeEngine::new();
        assert!(engine.set_mode(Mode::CountUp, Some(-1), t0()).is_err());
        assert_eq!(engine.mode(), Mode::Clock);
    }

    #[test]
    fn count_up_rejects_seeds_beyond_the_calendar() {
        let mut engine = TimeModeEngine::new();
        for seed in [i64::MAX, 10_000_000_000_000] {
            let err = engine.set_mode(Mode::CountUp, Some(seed), t0()).unwrap_err();
            assert!(matches!(err, ClockError::InvalidInput(_)), "{seed}");
        }
        assert_eq!(engine.mode(), Mode::Clock);

        engine.set_mode(Mode::CountUp, Some(30), t0()).unwrap();
        assert!(engine.set_time_value_in("10000000000000", t0(), &Utc).is_err());
        assert!(engine.set_time_value_in(&i64::MAX.to_string(), t0(), &Utc).is_err());
        assert_eq!(engine.current_time(t0()).text, "00:00:30");
    }

    #[test]
    fn countdown_finishes_and_stays_at_zero() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountDown, Some(10), t0()).unwrap();

        let running = engine.current_time(at(4));
        assert_eq!(running.text, "00:00:06");
        assert_eq!(running.label, StateLabel::Running);

        let done = engine.current_time(at(10));
        assert_eq!(done.text, FINISHED_TEXT);
        assert_eq!(done.label, StateLabel::Done);

        let later = engine.current_time(at(15));
        assert_eq!(later.text, FINISHED_TEXT);
        assert_eq!(later.label, StateLabel::Done);
        assert_eq!(engine.remaining_seconds(at(15)), -5);
        assert_eq!(engine.mode(), Mode::CountDown);
    }

    #[test]
    fn countdown_requires_positive_total() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, None, t0()).unwrap();

        let err = engine.set_mode(Mode::CountDown, Some(0), at(5)).unwrap_err();
        assert!(matches!(err, ClockError::InvalidInput(_)));
        assert!(engine.set_mode(Mode::CountDown, None, at(5)).is_err());

        assert_eq!(engine.mode(), Mode::CountUp);
        assert_eq!(engine.current_time(at(5)).text, "00:00:05");
    }

    #[test]
    fn toggle_pause_flips_state() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, None, t0()).unwrap();

        engine.toggle_pause(at(1));
        assert!(engine.is_paused());
        assert_eq!(engine.state().pause_started_at, Some(at(1)));

        engine.toggle_pause(at(2));
        assert!(!engine.is_paused());
        assert!(engine.state().pause_started_at.is_none());
        assert_eq!(engine.state().accumulated_paused, Duration::seconds(1));
    }

    #[test]
    fn paused_time_is_excluded() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, Some(0), t0()).unwrap();

        engine.toggle_pause(at(5));
        let paused = engine.current_time(at(50));
        assert_eq!(paused.text, "00:00:05");
        assert_eq!(paused.label, StateLabel::Paused);

        engine.toggle_pause(at(105));
        assert_eq!(engine.current_time(at(110)).text, "00:00:10");
    }

    #[test]
    fn paused_countdown_holds_its_remaining_time() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountDown, Some(60), t0()).unwrap();
        engine.toggle_pause(at(20));

        let reading = engine.current_time(at(500));
        assert_eq!(reading.text, "00:00:40");
        assert_eq!(reading.label, StateLabel::Paused);
    }

    #[test]
    fn pause_and_reset_do_nothing_in_clock_mode() {
        let mut engine = TimeModeEngine::new();
        engine.toggle_pause(t0());
        assert!(!engine.is_paused());
        engine.reset(t0());
        assert!(engine.state().started_at.is_none());
    }

    #[test]
    fn reset_reanchors_and_clears_pause() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, None, t0()).unwrap();
        engine.toggle_pause(at(30));
        engine.reset(at(40));

        assert!(!engine.is_paused());
        assert_eq!(engine.state().accumulated_paused, Duration::zero());
        assert_eq!(engine.current_time(at(43)).text, "00:00:03");
    }

    #[test]
    fn switching_cycles_through_modes() {
        let mut engine = TimeModeEngine::new();
        assert_eq!(engine.switch_mode(None, t0()).unwrap(), Mode::CountUp);
        assert!(engine.switch_mode(None, t0()).is_err());
        assert_eq!(engine.mode(), Mode::CountUp);
        assert_eq!(engine.switch_mode(Some(30), t0()).unwrap(), Mode::CountDown);
        assert_eq!(engine.switch_mode(None, t0()).unwrap(), Mode::Clock);
        assert!(engine.state().started_at.is_none());
    }

    #[test]
    fn clock_offset_survives_a_mode_round_trip() {
        let mut engine = TimeModeEngine::new();
        engine.set_clock_offset_in("12:00:00", t0(), &Utc).unwrap();
        engine.set_mode(Mode::CountUp, None, t0()).unwrap();
        engine.set_mode(Mode::Clock, None, t0()).unwrap();
        assert_eq!(engine.current_time_in(t0(), &Utc).text, "12:00:00");
    }

    #[test]
    fn set_time_value_follows_the_mode() {
        let mut engine = TimeModeEngine::new();
        engine.set_time_value_in("07:00:00", t0(), &Utc).unwrap();
        assert_eq!(engine.current_time_in(t0(), &Utc).text, "07:00:00");

        engine.set_mode(Mode::CountUp, None, t0()).unwrap();
        engine.toggle_pause(at(1));
        engine.set_time_value_in("90", at(2), &Utc).unwrap();
        assert!(!engine.is_paused());
        assert_eq!(engine.current_time(at(2)).text, "00:01:30");
        assert!(engine.set_time_value_in("-3", at(2), &Utc).is_err());

        engine.set_mode(Mode::CountDown, Some(5), t0()).unwrap();
        engine.set_time_value_in("120", at(10), &Utc).unwrap();
        assert_eq!(engine.current_time(at(10)).text, "00:02:00");
        assert!(engine.set_time_value_in("0", at(10), &Utc).is_err());
        assert!(engine.set_time_value_in("soon", at(10), &Utc).is_err());
        assert_eq!(engine.state().countdown_total_seconds, 120);
    }

    #[test]
    fn format_hms_clamps_negative() {
        assert_eq!(format_hms(-20), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(86_400), "24:00:00");
    }

    #[test]
    fn snapshot_reports_pause_totals() {
        let mut engine = TimeModeEngine::new();
        engine.set_mode(Mode::CountUp, None, t0()).unwrap();
        engine.toggle_pause(at(1));
        engine.toggle_pause(at(4));
        let snapshot = engine.snapshot();
        assert!(!snapshot.paused);
        assert_eq!(snapshot.accumulated_paused_seconds, 3.0);
    }
}
