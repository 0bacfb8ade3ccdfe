//! Per-question countdown driven by an external one-second scheduler.
//!
//! The timer holds no clock of its own: whoever owns the event loop calls
//! [`CountdownTimer::tick`] once per second and reacts to the returned event.

/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The timer is not running; nothing happened.
    Idle,
    /// One second elapsed and time remains.
    Tick { remaining: u32 },
    /// The countdown reached zero. Reported once per start, in place of
    /// `Tick { remaining: 0 }`; `remaining()` reads 0 afterwards.
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountdownTimer {
    remaining: u32,
    running: bool,
    generation: u64,
}

impl CountdownTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the countdown with `duration_secs` seconds.
    ///
    /// Each start bumps the generation so stale schedules can be told apart.
    pub fn start(&mut self, duration_secs: u32) {
        self.generation = self.generation.wrapping_add(1);
        self.remaining = duration_secs;
        self.running = true;
    }

    /// Cancels the countdown. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self, duration_secs: u32) {
        self.stop();
        self.start(duration_secs);
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TimerEvent {
        if !self.running {
            return TimerEvent::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TimerEvent::Expired
        } else {
            TimerEvent::Tick {
                remaining: self.remaining,
            }
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_then_expires_once() {
        let mut timer = CountdownTimer::new();
        timer.start(3);

        assert_eq!(timer.tick(), TimerEvent::Tick { remaining: 2 });
        assert_eq!(timer.tick(), TimerEvent::Tick { remaining: 1 });
        assert_eq!(timer.tick(), TimerEvent::Expired);
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_silences_ticks() {
        let mut timer = CountdownTimer::new();
        timer.stop();
        timer.start(30);
        timer.stop();
        timer.stop();
        assert_eq!(timer.tick(), TimerEvent::Idle);
        assert_eq!(timer.remaining(), 30);
    }

    #[test]
    fn restart_resets_remaining_and_bumps_generation() {
        let mut timer = CountdownTimer::new();
        timer.start(30);
        let first = timer.generation();
        timer.tick();
        timer.tick();

        timer.restart(30);
        assert_eq!(timer.remaining(), 30);
        assert!(timer.is_running());
        assert_eq!(timer.generation(), first + 1);
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut timer = CountdownTimer::new();
        timer.start(0);
        assert_eq!(timer.tick(), TimerEvent::Expired);
    }
}
