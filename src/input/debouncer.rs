//! Per-button debouncing: noisy raw levels in, confirmed edges out.

use chrono::{DateTime, Local};

use super::sampler::{ButtonId, RawSample};

/// How long a raw level must hold before an edge is committed.
pub const DEBOUNCE_MS: i64 = 5;

/// A confirmed press or release on one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    pub button: ButtonId,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy)]
struct LineState {
    last_raw: bool,
    stable: bool,
    last_change: DateTime<Local>,
}

/// Debounce state machine, one line per [`ButtonId`].
///
/// Transition rule: any raw flip restarts that line's hold timer; once the
/// raw level has held for [`DEBOUNCE_MS`] and differs from the committed
/// stable level, the stable level flips and exactly one edge is emitted.
/// Steady-state ticks produce nothing. All lines start released, matching
/// the pulled-up idle hardware level.
#[derive(Debug, Clone)]
pub struct Debouncer {
    lines: [LineState; ButtonId::COUNT],
}

impl Debouncer {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            lines: [LineState {
                last_raw: false,
                stable: false,
                last_change: now,
            }; ButtonId::COUNT],
        }
    }

    /// Feeds one raw snapshot; returns the edges confirmed on this tick.
    pub fn update(&mut self, raw: RawSample, now: DateTime<Local>) -> Vec<ButtonEdge> {
        let mut edges = Vec::new();

        for button in ButtonId::ALL {
            let level = raw.asserted(button);
            let line = &mut self.lines[button.index()];

            if level != line.last_raw {
                line.last_change = now;
                line.last_raw = level;
            }

            if (now - line.last_change).num_milliseconds() >= DEBOUNCE_MS
                && level != line.stable
            {
                line.stable = level;
                edges.push(ButtonEdge {
                    button,
                    pressed: level,
                });
            }
        }

        edges
    }

    /// Backs out the edge just committed on a line. The raw level is left
    /// alone, so as long as it holds, the same edge re-commits on the next
    /// tick the caller accepts it. Used by the arbitration layer to hold
    /// back nudge-button edges while a gesture pulse is active.
    pub fn defer(&mut self, button: ButtonId) {
        let line = &mut self.lines[button.index()];
        line.stable = !line.stable;
    }

    /// Drops everything back to the idle released state (layout switch).
    pub fn reset(&mut self, now: DateTime<Local>) {
        for line in &mut self.lines {
            line.last_raw = false;
            line.stable = false;
            line.last_change = now;
        }
    }

    pub fn is_stable_pressed(&self, button: ButtonId) -> bool {
        self.lines[button.index()].stable
    }

    /// Buttons currently committed as pressed.
    pub fn stable_pressed(&self) -> impl Iterator<Item = ButtonId> + '_ {
        ButtonId::ALL
            .into_iter()
            .filter(|b| self.lines[b.index()].stable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t(base: DateTime<Local>, ms: i64) -> DateTime<Local> {
        base + Duration::milliseconds(ms)
    }

    #[test]
    fn steady_press_commits_exactly_once_at_debounce_window() {
        // Register byte 0b11111101 equivalent: one button asserted, held
        // for 10 ticks at 1ms per tick.
        let base = Local::now();
        let mut debouncer = Debouncer::new(base);
        let sample = RawSample::default().with(ButtonId::RightNudge);

        let mut presses = Vec::new();
        for tick in 0..10 {
            for edge in debouncer.update(sample, t(base, tick)) {
                presses.push((tick, edge));
            }
        }

        assert_eq!(presses.len(), 1);
        let (tick, edge) = presses[0];
        assert_eq!(tick, DEBOUNCE_MS);
        assert_eq!(edge.button, ButtonId::RightNudge);
        assert!(edge.pressed);
    }

    #[test]
    fn bounce_shorter_than_window_is_filtered() {
        let base = Local::now();
        let mut debouncer = Debouncer::new(base);
        let pressed = RawSample::default().with(ButtonId::Plunger);
        let released = RawSample::default();

        // Flip the raw level every other millisecond for 20 ticks; no run
        // ever holds for DEBOUNCE_MS.
        for tick in 0..20 {
            let sample = if tick % 2 == 0 { pressed } else { released };
            let edges = debouncer.update(sample, t(base, tick));
            assert!(edges.is_empty(), "unexpected edge at tick {}", tick);
        }
        assert!(!debouncer.is_stable_pressed(ButtonId::Plunger));
    }

    #[test]
    fn repeated_identical_sample_is_idempotent() {
        let base = Local::now();
        let mut debouncer = Debouncer::new(base);
        let sample = RawSample::default().with(ButtonId::Special);

        let mut edge_count = 0;
        for tick in 0..50 {
            edge_count += debouncer.update(sample, t(base, tick)).len();
        }
        assert_eq!(edge_count, 1);
        assert!(debouncer.is_stable_pressed(ButtonId::Special));
    }

    #[test]
    fn release_edge_follows_press_edge() {
        let base = Local::now();
        let mut debouncer = Debouncer::new(base);
        let pressed = RawSample::default().with(ButtonId::LeftFlipper);
        let released = RawSample::default();

        let mut edges = Vec::new();
        for tick in 0..10 {
            edges.extend(debouncer.update(pressed, t(base, tick)));
        }
        for tick in 10..20 {
            edges.extend(debouncer.update(released, t(base, tick)));
        }

        assert_eq!(edges.len(), 2);
        assert!(edges[0].pressed);
        assert!(!edges[1].pressed);
        assert_eq!(edges[1].button, ButtonId::LeftFlipper);
    }

    #[test]
    fn bounce_before_stable_hold_still_yields_single_edge() {
        let base = Local::now();
        let mut debouncer = Debouncer::new(base);
        let pressed = RawSample::default().with(ButtonId::Start);
        let released = RawSample::default();

        // 3ms of contact chatter, then a clean hold.
        let mut edges = Vec::new();
        for tick in 0..3 {
            let sample = if tick % 2 == 0 { pressed } else { released };
            edges.extend(debouncer.update(sample, t(base, tick)));
        }
        for tick in 3..15 {
            edges.extend(debouncer.update(pressed, t(base, tick)));
        }

        assert_eq!(edges.len(), 1);
        assert!(edges[0].pressed);
    }

    #[test]
    fn deferred_edge_recommits_while_level_holds() {
        let base = Local::now();
        let mut debouncer = Debouncer::new(base);
        let pressed = RawSample::default().with(ButtonId::RightNudge);

        for tick in 0..=DEBOUNCE_MS {
            debouncer.update(pressed, t(base, tick));
        }
        assert!(debouncer.is_stable_pressed(ButtonId::RightNudge));

        debouncer.defer(ButtonId::RightNudge);
        assert!(!debouncer.is_stable_pressed(ButtonId::RightNudge));

        // Same held level, next tick: the edge comes straight back.
        let edges = debouncer.update(pressed, t(base, DEBOUNCE_MS + 1));
        assert_eq!(
            edges,
            vec![ButtonEdge {
                button: ButtonId::RightNudge,
                pressed: true,
            }]
        );
    }

    #[test]
    fn reset_returns_all_lines_to_released() {
        let base = Local::now();
        let mut debouncer = Debouncer::new(base);
        let sample = RawSample::default()
            .with(ButtonId::LeftFlipper)
            .with(ButtonId::RightFlipper);

        for tick in 0..10 {
            debouncer.update(sample, t(base, tick));
        }
        assert_eq!(debouncer.stable_pressed().count(), 2);

        debouncer.reset(t(base, 10));
        assert_eq!(debouncer.stable_pressed().count(), 0);

        // After a reset the held levels must debounce from scratch.
        let edges = debouncer.update(sample, t(base, 11));
        assert!(edges.is_empty());
    }
}
