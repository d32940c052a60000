//! Pulse coordinator
//!
//! Runs on the sensor core. Polls the pulse input, debounces edges, tracks
//! the active shift, renders the display, and publishes checkpoint and
//! delivery requests to the cross-core mailbox. It never touches flash or
//! the radio itself.

use crate::config;
use crate::core::mailbox::{CoreMailbox, SaveRequest};
use crate::counter::shift::{classify, continues_current_shift, ShiftState};
use crate::devices::display::{DisplayInterface, SharedDisplay};
use crate::devices::rtc::ClockSnapshot;
use crate::log_info;
use crate::storage::CounterRecord;

/// Pulse counting state machine
pub struct PulseCoordinator<'a, D: DisplayInterface> {
    display: &'a SharedDisplay<D>,
    mailbox: &'a CoreMailbox,
    counter: u32,
    shift: ShiftState,
    /// Input level seen on the previous poll, idle high
    pin_was_high: bool,
    /// Time of the last accepted edge
    last_edge_ms: u64,
    /// Counter value captured by the last checkpoint request
    checkpointed: u32,
    /// Start of the current checkpoint time window
    last_save_ms: u64,
    /// Second last drawn on the time line
    rendered_sec: u8,
}

impl<'a, D: DisplayInterface> PulseCoordinator<'a, D> {
    /// Create a coordinator starting from zero in the given shift
    pub fn new(display: &'a SharedDisplay<D>, mailbox: &'a CoreMailbox, now: &ClockSnapshot) -> Self {
        Self {
            display,
            mailbox,
            counter: 0,
            shift: classify(now.hour),
            pin_was_high: true,
            last_edge_ms: 0,
            checkpointed: 0,
            last_save_ms: 0,
            rendered_sec: 0xFF,
        }
    }

    /// Restore the counter from the newest checkpoint if it belongs to the
    /// shift in progress
    ///
    /// Returns true when a restore happened.
    pub fn boot(&mut self, latest: Option<&CounterRecord>, now: &ClockSnapshot) -> bool {
        let restored = match latest {
            Some(rec) if continues_current_shift(now, rec) => {
                log_info!(
                    "Restoring counter {} from checkpoint seq {}",
                    rec.counter,
                    rec.seq
                );
                self.counter = rec.counter;
                self.checkpointed = rec.counter;
                true
            }
            Some(rec) => {
                log_info!(
                    "Checkpoint seq {} is from another shift, starting at zero",
                    rec.seq
                );
                false
            }
            None => {
                log_info!("No checkpoint found, starting at zero");
                false
            }
        };

        self.display.render_count(self.counter);
        if self.counter != 0 {
            self.mailbox.publish_delivery(self.counter);
        }
        restored
    }

    /// Current counter value
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Shift currently in effect
    pub fn shift(&self) -> ShiftState {
        self.shift
    }

    /// One polling step
    ///
    /// `pin_high` is the raw pulse input level (idle high, active low),
    /// `now_ms` a monotonic millisecond clock, `clock` the latest wall-clock
    /// reading.
    pub fn poll(&mut self, pin_high: bool, now_ms: u64, clock: &ClockSnapshot) {
        self.update_shift(clock, now_ms);
        self.sample_input(pin_high, now_ms);
        self.apply_save_policy(now_ms, clock);
        self.refresh_time_line(clock);
    }

    fn update_shift(&mut self, clock: &ClockSnapshot, now_ms: u64) {
        let shift = classify(clock.hour);
        if shift == self.shift {
            return;
        }

        log_info!("Shift transition, counter reset from {}", self.counter);
        self.shift = shift;
        self.counter = 0;
        self.checkpointed = 0;
        self.last_save_ms = now_ms;
        // A stale value from the previous shift must not reach the collector
        self.mailbox.clear_delivery();
        self.display.render_count(0);
    }

    fn sample_input(&mut self, pin_high: bool, now_ms: u64) {
        let falling = self.pin_was_high && !pin_high;
        self.pin_was_high = pin_high;
        if !falling {
            return;
        }
        if now_ms - self.last_edge_ms <= config::DEBOUNCE_MS {
            return;
        }
        self.last_edge_ms = now_ms;

        if self.shift == ShiftState::Break {
            return;
        }

        self.counter += 1;
        self.display.render_count(self.counter);
        self.mailbox.publish_delivery(self.counter);
    }

    fn apply_save_policy(&mut self, now_ms: u64, clock: &ClockSnapshot) {
        let changed = self.counter != self.checkpointed;
        let window_over = now_ms - self.last_save_ms >= config::SAVE_TIME_THRESHOLD_MS;
        let burst = self.counter - self.checkpointed >= config::SAVE_EVENT_THRESHOLD;

        // The window runs from the last checkpoint, so a change landing
        // after a long idle stretch persists on the next poll
        if (window_over && changed) || burst {
            self.request_checkpoint(clock);
            self.last_save_ms = now_ms;
        }
    }

    fn request_checkpoint(&mut self, clock: &ClockSnapshot) {
        self.mailbox.publish_save(SaveRequest {
            value: self.counter,
            day: clock.day,
            month: clock.month,
            year: clock.year,
            hour: clock.hour,
        });
        self.checkpointed = self.counter;
    }

    fn refresh_time_line(&mut self, clock: &ClockSnapshot) {
        if clock.sec == self.rendered_sec {
            return;
        }
        self.rendered_sec = clock.sec;
        self.display
            .render_time(clock.hour, clock.min, clock.sec, self.shift.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::display::recording::RecordingDisplay;

    fn clock(hour: u8) -> ClockSnapshot {
        ClockSnapshot {
            sec: 0,
            min: 0,
            hour,
            day: 10,
            month: 6,
            year: 24,
        }
    }

    fn setup() -> (SharedDisplay<RecordingDisplay>, CoreMailbox) {
        (SharedDisplay::new(RecordingDisplay::new()), CoreMailbox::new())
    }

    /// Drive one full pulse: release, then press at `t_ms`
    fn pulse<D: DisplayInterface>(
        coord: &mut PulseCoordinator<'_, D>,
        t_ms: u64,
        clock: &ClockSnapshot,
    ) {
        coord.poll(true, t_ms, clock);
        coord.poll(false, t_ms, clock);
    }

    #[test]
    fn counts_debounced_pulses() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        pulse(&mut coord, 100, &now);
        pulse(&mut coord, 150, &now);
        pulse(&mut coord, 200, &now);
        assert_eq!(coord.counter(), 3);
        assert_eq!(mailbox.pending_delivery(), Some(3));
    }

    #[test]
    fn rejects_edges_within_debounce_window() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        pulse(&mut coord, 100, &now);
        // Bounce: 10 ms after the accepted edge is still inside the window
        pulse(&mut coord, 105, &now);
        pulse(&mut coord, 110, &now);
        assert_eq!(coord.counter(), 1);

        // Strictly past the window
        pulse(&mut coord, 111, &now);
        assert_eq!(coord.counter(), 2);
    }

    #[test]
    fn counts_pulses_from_gpio_line() {
        use crate::platform::mock::MockGpio;
        use crate::platform::traits::GpioInterface;

        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);
        let pin = MockGpio::new_input();

        coord.poll(pin.read(), 100, &now);
        pin.set_level(false);
        coord.poll(pin.read(), 120, &now);
        pin.set_level(true);
        coord.poll(pin.read(), 140, &now);
        pin.set_level(false);
        coord.poll(pin.read(), 160, &now);

        assert_eq!(coord.counter(), 2);
    }

    #[test]
    fn level_held_low_counts_once() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        coord.poll(true, 100, &now);
        coord.poll(false, 200, &now);
        coord.poll(false, 300, &now);
        coord.poll(false, 400, &now);
        assert_eq!(coord.counter(), 1);
    }

    #[test]
    fn break_hours_ignore_pulses() {
        let (display, mailbox) = setup();
        let now = clock(20);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        pulse(&mut coord, 100, &now);
        pulse(&mut coord, 200, &now);
        assert_eq!(coord.counter(), 0);
        assert_eq!(mailbox.pending_delivery(), None);
    }

    #[test]
    fn shift_transition_resets_counter_and_delivery() {
        let (display, mailbox) = setup();
        let day = clock(19);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &day);

        pulse(&mut coord, 100, &day);
        pulse(&mut coord, 200, &day);
        assert_eq!(coord.counter(), 2);

        // Hour rolls into the break
        let brk = clock(20);
        coord.poll(true, 300, &brk);
        assert_eq!(coord.counter(), 0);
        assert_eq!(coord.shift(), ShiftState::Break);
        assert_eq!(mailbox.pending_delivery(), None);
        assert_eq!(display.with(|d| d.last_count()), Some(0));
    }

    #[test]
    fn burst_of_five_requests_one_checkpoint() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        for i in 0..5u64 {
            pulse(&mut coord, 100 + i * 20, &now);
        }
        let req = mailbox.take_save_request().expect("checkpoint after burst");
        assert_eq!(req.value, 5);
        assert_eq!((req.day, req.month, req.year, req.hour), (10, 6, 24, 9));

        // The burst window restarts: four more pulses stay below threshold
        for i in 0..4u64 {
            pulse(&mut coord, 300 + i * 20, &now);
        }
        assert!(mailbox.take_save_request().is_none());

        pulse(&mut coord, 400, &now);
        assert_eq!(mailbox.take_save_request().unwrap().value, 10);
    }

    #[test]
    fn time_window_checkpoints_only_on_change() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        pulse(&mut coord, 100, &now);
        assert!(mailbox.take_save_request().is_none());

        // Window elapses with one pulse outstanding
        coord.poll(true, 5_100, &now);
        assert_eq!(mailbox.take_save_request().unwrap().value, 1);

        // Idle window elapses with no change
        coord.poll(true, 10_200, &now);
        assert!(mailbox.take_save_request().is_none());
    }

    #[test]
    fn change_after_long_idle_checkpoints_promptly() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        pulse(&mut coord, 100, &now);
        coord.poll(true, 5_100, &now);
        assert_eq!(mailbox.take_save_request().unwrap().value, 1);

        // Well past the window: the next pulse persists on the same poll
        pulse(&mut coord, 60_000, &now);
        assert_eq!(mailbox.take_save_request().unwrap().value, 2);
    }

    #[test]
    fn boot_restores_matching_checkpoint() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        let rec = CounterRecord {
            seq: 7,
            counter: 123,
            day: 10,
            month: 6,
            year: 24,
            hour: 8,
        };
        assert!(coord.boot(Some(&rec), &now));
        assert_eq!(coord.counter(), 123);
        assert_eq!(mailbox.pending_delivery(), Some(123));
        assert_eq!(display.with(|d| d.last_count()), Some(123));

        // A restored value does not immediately re-checkpoint
        coord.poll(true, 6_000, &now);
        assert!(mailbox.take_save_request().is_none());
    }

    #[test]
    fn boot_ignores_stale_checkpoint() {
        let (display, mailbox) = setup();
        let now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        let rec = CounterRecord {
            seq: 7,
            counter: 123,
            day: 9,
            month: 6,
            year: 24,
            hour: 8,
        };
        assert!(!coord.boot(Some(&rec), &now));
        assert_eq!(coord.counter(), 0);
        assert_eq!(mailbox.pending_delivery(), None);
    }

    #[test]
    fn time_line_renders_once_per_second() {
        let (display, mailbox) = setup();
        let mut now = clock(9);
        let mut coord = PulseCoordinator::new(&display, &mailbox, &now);

        coord.poll(true, 100, &now);
        coord.poll(true, 200, &now);
        now.sec = 1;
        coord.poll(true, 300, &now);

        let times: Vec<_> = display
            .with(|d| d.calls())
            .into_iter()
            .filter(|c| matches!(c, crate::devices::display::recording::RenderCall::Time(..)))
            .collect();
        assert_eq!(times.len(), 2);
    }
}
