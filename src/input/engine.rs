//! Arbitration of debounced button edges and nudge gestures into one
//! ordered HID event stream, plus the engine lifecycle that drives it.
//!
//! The governing rule: the physical nudge buttons and the accelerometer
//! gesture share one output action space and must never overlap. While a
//! gesture pulse is active, edges on the layout's designated nudge buttons
//! are held back (a still-held button commits a fresh Press once the pulse
//! ends). The reverse direction is intentionally open - button presses
//! never block the detector, because the motion-based input takes priority.
//!
//! Lifecycle is a statum state machine: Idle -> Calibrating -> Running,
//! with the Running state re-entered (and all per-session state reset) on
//! every layout change.

use chrono::{DateTime, Local};
use statum::{machine, state, transition};
use std::collections::HashSet;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::debouncer::Debouncer;
use super::nudge::{Accelerometer, NudgeDetector, NudgeEvent};
use super::sampler::{ControlLine, RawSource};
use super::InputError;
use crate::hid::OutputEmitter;
use crate::layout::{self, HapticChannel, HapticCue, Layout, OutputAction};

/// How long the control line must be held to request a mode switch.
pub const MODE_HOLD_MS: i64 = 3000;

/// Engine settings.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Poll tick interval; the whole sampler -> emitter path runs once per
    /// tick, strictly sequentially.
    pub poll_interval_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { poll_interval_ms: 1 }
    }
}

/// Read-mostly state shared with the LED task through a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    pub layout: Layout,
    pub connected: bool,
}

/// Out-of-band events reported to the supervisor loop in main.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Control line held for [`MODE_HOLD_MS`]; pressed actions are already
    /// flushed when this is sent.
    ModeSwitchRequested,
}

/// Sink for solenoid haptic cues. Implemented by the GPIO driver in
/// [`crate::feedback::haptic`]; tests record calls instead.
pub trait HapticSink: Send {
    fn set_level(&mut self, channel: HapticChannel, on: bool);
    fn pulse(&mut self, channel: HapticChannel);
    /// Periodic maintenance hook (pulse timers); called once per tick.
    fn service(&mut self, _now: DateTime<Local>) {}
}

/// The arbitration core. Owns the debouncer, the nudge detector and the
/// set of output actions currently pressed, and is the only writer of any
/// of them - the suppression rule depends on that single-writer ordering.
pub struct Arbiter {
    layout: Layout,
    debouncer: Debouncer,
    nudge: NudgeDetector,
    pressed: HashSet<OutputAction>,
    was_connected: bool,
}

impl Arbiter {
    pub fn new(layout: Layout, now: DateTime<Local>) -> Self {
        Self {
            layout,
            debouncer: Debouncer::new(now),
            nudge: NudgeDetector::new(now),
            pressed: HashSet::new(),
            was_connected: false,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn calibrate_nudge(&mut self, sensor: &mut dyn Accelerometer) {
        self.nudge.calibrate(sensor);
    }

    /// Number of output actions pressed but not yet released.
    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    /// One full arbitration cycle for one poll tick.
    pub fn tick(
        &mut self,
        raw: crate::input::RawSample,
        now: DateTime<Local>,
        sensor: &mut dyn Accelerometer,
        emitter: &mut dyn OutputEmitter,
        haptics: &mut dyn HapticSink,
    ) {
        haptics.service(now);

        let connected = emitter.is_connected();
        if connected != self.was_connected {
            self.was_connected = connected;
            if connected {
                self.resync_after_reconnect(emitter, haptics);
            } else {
                // Transport is gone; drop the logical press state so nothing
                // is considered held across the gap. Debouncing keeps
                // running below so no edges are lost.
                info!(
                    "Transport disconnected, dropping {} logical presses",
                    self.pressed.len()
                );
                self.pressed.clear();
            }
        }

        // Gesture source first; its active flag governs suppression for the
        // button edges processed afterwards in the same tick.
        let nudge_map = layout::nudge_map(self.layout);
        match self.nudge.tick(now, nudge_map, sensor, connected) {
            Some(NudgeEvent::Press { action, .. }) => {
                if connected {
                    emitter.press(&action);
                }
                self.pressed.insert(action);
            }
            Some(NudgeEvent::Release { action }) => {
                if connected {
                    emitter.release(&action);
                }
                self.pressed.remove(&action);
            }
            None => {}
        }

        for edge in self.debouncer.update(raw, now) {
            let Some(mapping) = layout::resolve(self.layout, edge.button) else {
                continue;
            };

            if self.nudge.is_active() && nudge_map.is_nudge_button(edge.button) {
                debug!(
                    "Holding back {:?} edge on {:?}: nudge gesture active",
                    edge.pressed, edge.button
                );
                // Back the commit out so a still-held button turns into a
                // fresh Press the moment the pulse ends, and a tap that
                // started and ended inside the pulse leaves no trace.
                self.debouncer.defer(edge.button);
                continue;
            }

            if !connected {
                continue;
            }

            if edge.pressed {
                emitter.press(&mapping.action);
                self.pressed.insert(mapping.action);
            } else {
                emitter.release(&mapping.action);
                self.pressed.remove(&mapping.action);
            }

            if let Some(cue) = mapping.haptic {
                match cue {
                    HapticCue::Follow(channel) => haptics.set_level(channel, edge.pressed),
                    HapticCue::PulseOnPress(channel) if edge.pressed => haptics.pulse(channel),
                    HapticCue::PulseOnRelease(channel) if !edge.pressed => {
                        haptics.pulse(channel)
                    }
                    _ => {}
                }
            }
        }
    }

    /// Tears down one layout session and enters the next: every pressed
    /// action gets its Release first, then debounce and nudge state start
    /// from scratch. Nothing is carried across the switch.
    pub fn switch_layout(
        &mut self,
        layout: Layout,
        now: DateTime<Local>,
        emitter: &mut dyn OutputEmitter,
        haptics: &mut dyn HapticSink,
    ) {
        info!("Switching layout {} -> {}", self.layout, layout);
        self.release_all(emitter, haptics);
        self.debouncer.reset(now);
        self.nudge.reset(now);
        self.layout = layout;
    }

    /// Emits a Release for every pressed-but-unreleased action and drops
    /// all haptic levels. Required before any transport teardown; a stuck
    /// key across a teardown is a correctness failure.
    pub fn release_all(&mut self, emitter: &mut dyn OutputEmitter, haptics: &mut dyn HapticSink) {
        let connected = emitter.is_connected();
        for action in self.pressed.drain() {
            if connected {
                emitter.release(&action);
            }
        }
        haptics.set_level(HapticChannel::Left, false);
        haptics.set_level(HapticChannel::Right, false);
    }

    /// Re-synthesizes Press events for buttons still held across a
    /// reconnect, so the host view matches the debounced state without
    /// waiting for fresh edges.
    fn resync_after_reconnect(
        &mut self,
        emitter: &mut dyn OutputEmitter,
        haptics: &mut dyn HapticSink,
    ) {
        let held: Vec<_> = self.debouncer.stable_pressed().collect();
        if held.is_empty() {
            info!("Transport connected");
            return;
        }
        info!(
            "Transport connected, re-synthesizing {} held buttons",
            held.len()
        );
        for button in held {
            let Some(mapping) = layout::resolve(self.layout, button) else {
                continue;
            };
            emitter.press(&mapping.action);
            self.pressed.insert(mapping.action);
            if let Some(HapticCue::Follow(channel)) = mapping.haptic {
                haptics.set_level(channel, true);
            }
        }
    }
}

// Engine lifecycle phases
#[state]
#[derive(Debug, Clone)]
pub enum EnginePhase {
    Idle,
    Calibrating,
    Running,
}

#[machine]
pub struct InputEngine<EnginePhase> {
    source: Box<dyn RawSource>,
    sensor: Box<dyn Accelerometer>,
    emitter: Box<dyn OutputEmitter>,
    haptics: Box<dyn HapticSink>,
    arbiter: Arbiter,
    settings: EngineSettings,
}

impl<S: EnginePhaseTrait> InputEngine<S> {
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn layout(&self) -> Layout {
        self.arbiter.layout()
    }
}

impl InputEngine<Idle> {
    pub fn create(
        layout: Layout,
        source: Box<dyn RawSource>,
        sensor: Box<dyn Accelerometer>,
        emitter: Box<dyn OutputEmitter>,
        haptics: Box<dyn HapticSink>,
        settings: EngineSettings,
    ) -> Self {
        info!(
            "Creating input engine for layout {} with settings {:?}",
            layout, settings
        );
        let arbiter = Arbiter::new(layout, Local::now());
        Self::builder()
            .source(source)
            .sensor(sensor)
            .emitter(emitter)
            .haptics(haptics)
            .arbiter(arbiter)
            .settings(settings)
            .build()
    }
}

#[transition]
impl InputEngine<Idle> {
    pub fn begin(self) -> InputEngine<Calibrating> {
        debug!("Transitioning to Calibrating state");
        self.transition()
    }
}

#[transition]
impl InputEngine<Calibrating> {
    /// One-shot accelerometer calibration; an absent sensor degrades to a
    /// button-only session rather than failing startup.
    pub fn calibrate(mut self) -> InputEngine<Running> {
        self.arbiter.calibrate_nudge(self.sensor.as_mut());
        info!("Input engine entering Running state");
        self.transition()
    }
}

impl InputEngine<Running> {
    /// One poll tick: sample, then arbitrate, strictly in order.
    pub fn tick(&mut self, now: DateTime<Local>) {
        let raw = self.source.sample();
        self.arbiter.tick(
            raw,
            now,
            self.sensor.as_mut(),
            self.emitter.as_mut(),
            self.haptics.as_mut(),
        );
    }

    pub fn is_connected(&self) -> bool {
        self.emitter.is_connected()
    }

    /// Flushes all pressed actions ahead of a transport teardown/restart.
    pub fn flush(&mut self) {
        self.arbiter
            .release_all(self.emitter.as_mut(), self.haptics.as_mut());
    }
}

/// Public interface for spawning the engine as a tokio task.
pub struct EngineHandle {
    task: tokio::task::JoinHandle<()>,
}

impl EngineHandle {
    /// Creates the engine and spawns its poll loop. The loop publishes
    /// [`DeviceStatus`] over the watch channel and reports mode-switch
    /// requests over the mpsc channel.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        layout: Layout,
        source: Box<dyn RawSource>,
        sensor: Box<dyn Accelerometer>,
        emitter: Box<dyn OutputEmitter>,
        haptics: Box<dyn HapticSink>,
        control: Box<dyn ControlLine>,
        settings: EngineSettings,
        status_sender: watch::Sender<DeviceStatus>,
        event_sender: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, InputError> {
        info!("Spawning input engine task");
        let engine = InputEngine::create(layout, source, sensor, emitter, haptics, settings);

        let task = tokio::spawn(async move {
            let engine = engine.begin().calibrate();
            if let Err(e) = run_engine_loop(engine, control, status_sender, event_sender).await {
                error!("Input engine task terminated with error: {}", e);
            }
        });

        Ok(Self { task })
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

async fn run_engine_loop(
    mut engine: InputEngine<Running>,
    mut control: Box<dyn ControlLine>,
    status_sender: watch::Sender<DeviceStatus>,
    event_sender: mpsc::Sender<EngineEvent>,
) -> Result<(), InputError> {
    let poll_interval = engine.settings().poll_interval_ms;
    info!("Entering input engine loop with {}ms poll tick", poll_interval);

    let mut ticker = tokio::time::interval(tokio::time::Duration::from_millis(poll_interval));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut last_status: Option<DeviceStatus> = None;
    let mut hold_since: Option<DateTime<Local>> = None;

    loop {
        ticker.tick().await;
        let now = Local::now();

        engine.tick(now);

        let status = DeviceStatus {
            layout: engine.layout(),
            connected: engine.is_connected(),
        };
        if last_status != Some(status) {
            if let Some(prev) = last_status {
                if prev.connected != status.connected {
                    if status.connected {
                        info!("HID transport connected");
                    } else {
                        warn!("HID transport disconnected, output suppressed");
                    }
                }
            }
            if status_sender.send(status).is_err() {
                debug!("No status subscribers left");
            }
            last_status = Some(status);
        }

        // Long-press on the control line cycles the game mode. The flush
        // happens here, before the supervisor tears the transport down.
        if control.is_pressed() {
            match hold_since {
                None => hold_since = Some(now),
                Some(start) if (now - start).num_milliseconds() >= MODE_HOLD_MS => {
                    info!("Mode button held for {}ms, requesting mode switch", MODE_HOLD_MS);
                    engine.flush();
                    event_sender
                        .send(EngineEvent::ModeSwitchRequested)
                        .await
                        .map_err(|e| InputError::EventSendError(e.to_string()))?;
                    hold_since = None;
                }
                Some(_) => {}
            }
        } else {
            hold_since = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::nudge::{NUDGE_PRESS_TIME_MS, NUDGE_THRESHOLD};
    use crate::input::sampler::{ButtonId, RawSample};
    use crate::layout::quest;
    use chrono::Duration;

    struct FakeAccel {
        connected: bool,
        reading: (i16, i16, i16),
    }

    impl Accelerometer for FakeAccel {
        fn test_connection(&mut self) -> bool {
            self.connected
        }

        fn read_acceleration(&mut self) -> Result<(i16, i16, i16), InputError> {
            Ok(self.reading)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Emitted {
        Press(OutputAction),
        Release(OutputAction),
    }

    struct Recorder {
        connected: bool,
        events: Vec<Emitted>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                connected: true,
                events: Vec::new(),
            }
        }

        fn presses(&self) -> usize {
            self.events
                .iter()
                .filter(|e| matches!(e, Emitted::Press(_)))
                .count()
        }
    }

    impl OutputEmitter for Recorder {
        fn press(&mut self, action: &OutputAction) {
            self.events.push(Emitted::Press(*action));
        }

        fn release(&mut self, action: &OutputAction) {
            self.events.push(Emitted::Release(*action));
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum HapticCall {
        Level(HapticChannel, bool),
        Pulse(HapticChannel),
    }

    struct HapticRecorder {
        calls: Vec<HapticCall>,
    }

    impl HapticSink for HapticRecorder {
        fn set_level(&mut self, channel: HapticChannel, on: bool) {
            self.calls.push(HapticCall::Level(channel, on));
        }

        fn pulse(&mut self, channel: HapticChannel) {
            self.calls.push(HapticCall::Pulse(channel));
        }
    }

    struct Rig {
        arbiter: Arbiter,
        sensor: FakeAccel,
        emitter: Recorder,
        haptics: HapticRecorder,
        base: DateTime<Local>,
    }

    impl Rig {
        fn new(layout: Layout) -> Self {
            let base = Local::now();
            let mut sensor = FakeAccel {
                connected: true,
                reading: (0, 0, 16000),
            };
            let mut arbiter = Arbiter::new(layout, base);
            arbiter.calibrate_nudge(&mut sensor);
            Self {
                arbiter,
                sensor,
                emitter: Recorder::new(),
                haptics: HapticRecorder { calls: Vec::new() },
                base,
            }
        }

        fn tick(&mut self, raw: RawSample, ms: i64) {
            self.arbiter.tick(
                raw,
                self.base + Duration::milliseconds(ms),
                &mut self.sensor,
                &mut self.emitter,
                &mut self.haptics,
            );
        }

        /// Runs enough steady ticks for a level to debounce.
        fn settle(&mut self, raw: RawSample, from_ms: i64, ticks: i64) -> i64 {
            for ms in from_ms..from_ms + ticks {
                self.tick(raw, ms);
            }
            from_ms + ticks
        }
    }

    const RMAGNA: OutputAction = OutputAction::Key(quest::KEY_RMAGNASAVE);

    #[test]
    fn plain_button_edges_pass_through_with_haptics() {
        let mut rig = Rig::new(Layout::QuestPinballVr);
        let pressed = RawSample::default().with(ButtonId::LeftFlipper);

        let next = rig.settle(pressed, 0, 10);
        rig.settle(RawSample::default(), next, 10);

        assert_eq!(
            rig.emitter.events,
            vec![
                Emitted::Press(OutputAction::Key(quest::KEY_LFLIPPER)),
                Emitted::Release(OutputAction::Key(quest::KEY_LFLIPPER)),
            ]
        );
        assert_eq!(
            rig.haptics.calls,
            vec![
                HapticCall::Level(HapticChannel::Left, true),
                HapticCall::Level(HapticChannel::Left, false),
            ]
        );
        assert_eq!(rig.arbiter.pressed_count(), 0);
    }

    #[test]
    fn still_held_nudge_button_presses_fresh_after_pulse() {
        let mut rig = Rig::new(Layout::QuestPinballVr);

        // Fire a gesture, then hold the right nudge button from inside the
        // pulse until well past its end.
        rig.sensor.reading = (NUDGE_THRESHOLD as i16 + 1000, 0, 16000);
        rig.tick(RawSample::default(), 0);
        assert_eq!(rig.emitter.events, vec![Emitted::Press(RMAGNA)]);
        rig.sensor.reading = (0, 0, 16000);

        let held = RawSample::default().with(ButtonId::RightNudge);
        let next = rig.settle(held, 1, NUDGE_PRESS_TIME_MS + 10);

        // The press was held back while the gesture was active, then
        // committed as a fresh Press the moment the pulse released.
        assert_eq!(
            rig.emitter.events,
            vec![
                Emitted::Press(RMAGNA),
                Emitted::Release(RMAGNA),
                Emitted::Press(RMAGNA),
            ]
        );
        assert_eq!(rig.arbiter.pressed_count(), 1);

        // Letting go produces the matching Release; every Press stays
        // paired.
        rig.settle(RawSample::default(), next, 10);
        assert_eq!(
            rig.emitter.events,
            vec![
                Emitted::Press(RMAGNA),
                Emitted::Release(RMAGNA),
                Emitted::Press(RMAGNA),
                Emitted::Release(RMAGNA),
            ]
        );
        assert_eq!(rig.arbiter.pressed_count(), 0);
    }

    #[test]
    fn nudge_button_tap_inside_pulse_leaves_no_trace() {
        let mut rig = Rig::new(Layout::QuestPinballVr);

        rig.sensor.reading = (NUDGE_THRESHOLD as i16 + 1000, 0, 16000);
        rig.tick(RawSample::default(), 0);
        rig.sensor.reading = (0, 0, 16000);

        // Press and release the button entirely within the 50ms pulse.
        let held = RawSample::default().with(ButtonId::RightNudge);
        let next = rig.settle(held, 1, 20);
        rig.settle(RawSample::default(), next, NUDGE_PRESS_TIME_MS);

        // Only the gesture's own pair shows up; the tap never commits, so
        // no unmatched Release can leak out.
        assert_eq!(
            rig.emitter.events,
            vec![Emitted::Press(RMAGNA), Emitted::Release(RMAGNA)]
        );
        assert_eq!(rig.arbiter.pressed_count(), 0);
    }

    #[test]
    fn nudge_pulse_end_to_end_no_other_keys_affected() {
        let mut rig = Rig::new(Layout::QuestPinballVr);

        rig.sensor.reading = (9000, 500, 16000);
        rig.tick(RawSample::default(), 0);
        rig.sensor.reading = (0, 0, 16000);
        for ms in 1..=NUDGE_PRESS_TIME_MS + 1 {
            rig.tick(RawSample::default(), ms);
        }

        assert_eq!(
            rig.emitter.events,
            vec![Emitted::Press(RMAGNA), Emitted::Release(RMAGNA)]
        );
    }

    #[test]
    fn buttons_never_block_the_gesture_detector() {
        let mut rig = Rig::new(Layout::QuestPinballVr);

        // Physical nudge button held and committed first.
        let held = RawSample::default().with(ButtonId::RightNudge);
        let next = rig.settle(held, 0, 10);
        assert_eq!(rig.emitter.events, vec![Emitted::Press(RMAGNA)]);

        // The gesture still fires regardless of the held button.
        rig.sensor.reading = (NUDGE_THRESHOLD as i16 + 500, 0, 16000);
        rig.tick(held, next);
        assert_eq!(
            rig.emitter.events,
            vec![Emitted::Press(RMAGNA), Emitted::Press(RMAGNA)]
        );
    }

    #[test]
    fn layout_switch_flushes_pressed_and_resets_state() {
        let mut rig = Rig::new(Layout::QuestPinballVr);
        let held = RawSample::default().with(ButtonId::LeftFlipper);

        rig.settle(held, 0, 10);
        assert_eq!(rig.arbiter.pressed_count(), 1);

        rig.arbiter.switch_layout(
            Layout::PcVisualPinball,
            rig.base + Duration::milliseconds(20),
            &mut rig.emitter,
            &mut rig.haptics,
        );

        assert_eq!(rig.arbiter.pressed_count(), 0);
        assert_eq!(
            rig.emitter.events.last(),
            Some(&Emitted::Release(OutputAction::Key(quest::KEY_LFLIPPER)))
        );
        assert_eq!(rig.arbiter.layout(), Layout::PcVisualPinball);
        // Haptic levels dropped on teardown.
        assert!(rig
            .haptics
            .calls
            .contains(&HapticCall::Level(HapticChannel::Left, false)));

        // Still-held level debounces from scratch under the new layout.
        let mut presses_before = rig.emitter.presses();
        let next = rig.settle(held, 21, 4);
        assert_eq!(rig.emitter.presses(), presses_before);
        presses_before = rig.emitter.presses();
        rig.settle(held, next, 10);
        assert_eq!(rig.emitter.presses(), presses_before + 1);
    }

    #[test]
    fn disconnect_drops_presses_and_reconnect_resynthesizes() {
        let mut rig = Rig::new(Layout::QuestPinballVr);
        let held = RawSample::default().with(ButtonId::RightFlipper);

        let next = rig.settle(held, 0, 10);
        assert_eq!(rig.arbiter.pressed_count(), 1);

        rig.emitter.connected = false;
        let next = rig.settle(held, next, 5);
        assert_eq!(rig.arbiter.pressed_count(), 0);
        // No release was (or could be) sent to the dead transport.
        assert_eq!(rig.emitter.events.len(), 1);

        rig.emitter.connected = true;
        rig.settle(held, next, 5);
        assert_eq!(
            rig.emitter.events,
            vec![
                Emitted::Press(OutputAction::Key(quest::KEY_RFLIPPER)),
                Emitted::Press(OutputAction::Key(quest::KEY_RFLIPPER)),
            ]
        );
        assert_eq!(rig.arbiter.pressed_count(), 1);
    }

    #[test]
    fn disconnected_transport_gates_new_nudges() {
        let mut rig = Rig::new(Layout::QuestPinballVr);
        rig.emitter.connected = false;
        rig.sensor.reading = (NUDGE_THRESHOLD as i16 + 2000, 0, 16000);

        for ms in 0..20 {
            rig.tick(RawSample::default(), ms);
        }
        assert!(rig.emitter.events.is_empty());
        assert_eq!(rig.arbiter.pressed_count(), 0);
    }

    #[test]
    fn pc_plunger_haptic_fires_on_release_only() {
        let mut rig = Rig::new(Layout::PcVisualPinball);
        let plunger = RawSample::default().with(ButtonId::Plunger);

        let next = rig.settle(plunger, 0, 10);
        assert!(rig.haptics.calls.is_empty());

        rig.settle(RawSample::default(), next, 10);
        assert_eq!(rig.haptics.calls, vec![HapticCall::Pulse(HapticChannel::Right)]);
    }

    #[test]
    fn quest_plunger_haptic_fires_on_press() {
        let mut rig = Rig::new(Layout::QuestPinballVr);
        let plunger = RawSample::default().with(ButtonId::Plunger);

        rig.settle(plunger, 0, 10);
        assert_eq!(rig.haptics.calls, vec![HapticCall::Pulse(HapticChannel::Right)]);
    }
}
