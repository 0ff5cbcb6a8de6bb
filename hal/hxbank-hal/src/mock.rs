//! Deterministic fake GPIO backend
//!
//! [`MockGpio`] simulates HX711 chips wired to a shared clock line so the
//! driver can be exercised end to end without hardware:
//!
//! - each simulated chip has a DOUT pin and a PD_SCK (clock) pin
//! - conversions come from a scripted queue of raw 24-bit samples, or a
//!   constant sample repeated forever; a chip with neither never becomes
//!   ready (DOUT stays high)
//! - rising clock edges shift the sample out MSB first; pulses beyond the
//!   24th select the gain of the next conversion (25 → 128, 26 → 32,
//!   27 → 64)
//! - holding the clock high for at least 60 µs powers the chip down,
//!   discarding the conversion in flight and reverting the gain to 128
//!
//! Time only advances through [`MockDelay`], which shares its time base
//! with the [`MockGpio`] that created it.
//!
//! Every mode change and write is appended to an event log for assertions.
//! Raw per-pin read scripts can override the chip model entirely.

use std::cell::Cell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::gpio::{GpioBackend, Level, PinId, PinMode};

/// Clock high time after which the chip enters power-down (ns)
pub const POWER_DOWN_NS: u64 = 60_000;

/// Number of data bits per conversion
const DATA_BITS: u32 = 24;

/// A recorded backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioEvent {
    /// `set_mode` was called
    Mode { pin: PinId, mode: PinMode },
    /// `write_digital` was called
    Write { pin: PinId, level: Level },
}

/// Simulated delay provider
///
/// Advances the time base shared with the owning [`MockGpio`]; never sleeps.
#[derive(Debug, Clone)]
pub struct MockDelay {
    now_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    /// Total simulated time elapsed (ns)
    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ns));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChipState {
    /// Converting or powered down; DOUT high
    Idle,
    /// Conversion available; DOUT low until the first clock pulse
    Ready,
    /// Clocking out the current conversion
    Shifting,
}

/// One simulated HX711
#[derive(Debug)]
struct SimChip {
    data_pin: PinId,
    clock_pin: PinId,
    queue: VecDeque<u32>,
    repeat: Option<u32>,
    state: ChipState,
    current: u32,
    pulses: u32,
    history: Vec<u32>,
    gain: u16,
    power_downs: usize,
}

impl SimChip {
    fn new(data_pin: PinId, clock_pin: PinId) -> Self {
        Self {
            data_pin,
            clock_pin,
            queue: VecDeque::new(),
            repeat: None,
            state: ChipState::Idle,
            current: 0,
            pulses: 0,
            history: Vec::new(),
            gain: 128,
            power_downs: 0,
        }
    }

    fn dout(&mut self) -> bool {
        if self.state == ChipState::Shifting && self.pulses > DATA_BITS {
            self.finish_cycle();
        }

        match self.state {
            ChipState::Ready => false,
            ChipState::Shifting => {
                let bit = DATA_BITS - self.pulses;
                (self.current >> bit) & 1 == 1
            }
            ChipState::Idle => match self.queue.pop_front().or(self.repeat) {
                Some(sample) => {
                    self.current = sample & 0x00FF_FFFF;
                    self.pulses = 0;
                    self.state = ChipState::Ready;
                    false
                }
                None => true,
            },
        }
    }

    fn rising_edge(&mut self) {
        match self.state {
            ChipState::Ready => {
                self.state = ChipState::Shifting;
                self.pulses = 1;
            }
            ChipState::Shifting => self.pulses += 1,
            ChipState::Idle => {}
        }
    }

    fn finish_cycle(&mut self) {
        self.history.push(self.pulses);
        self.gain = match self.pulses {
            26 => 32,
            27 => 64,
            _ => 128,
        };
        self.pulses = 0;
        self.state = ChipState::Idle;
    }

    fn power_down(&mut self) {
        self.state = ChipState::Idle;
        self.pulses = 0;
        self.gain = 128;
        self.power_downs += 1;
    }
}

/// Fake GPIO backend with simulated HX711 chips
#[derive(Debug, Default)]
pub struct MockGpio {
    now_ns: Rc<Cell<u64>>,
    modes: BTreeMap<PinId, PinMode>,
    levels: BTreeMap<PinId, Level>,
    high_since: BTreeMap<PinId, u64>,
    chips: Vec<SimChip>,
    scripts: BTreeMap<PinId, VecDeque<bool>>,
    events: Vec<GpioEvent>,
    reads: usize,
}

impl MockGpio {
    /// Create a backend with no chips attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a delay provider sharing this backend's time base
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            now_ns: Rc::clone(&self.now_ns),
        }
    }

    /// Attach a simulated chip with DOUT on `data_pin` and PD_SCK on `clock_pin`
    ///
    /// The chip produces no conversions until samples are queued.
    pub fn attach_chip(&mut self, data_pin: PinId, clock_pin: PinId) -> &mut Self {
        self.chips.retain(|c| c.data_pin != data_pin);
        self.chips.push(SimChip::new(data_pin, clock_pin));
        self
    }

    /// Queue raw 24-bit conversions on a chip (consumed in order)
    pub fn push_samples(
        &mut self,
        data_pin: PinId,
        samples: impl IntoIterator<Item = u32>,
    ) -> &mut Self {
        if let Some(chip) = self.chip_mut(data_pin) {
            chip.queue.extend(samples);
        }
        self
    }

    /// Produce the same raw conversion forever once the queue is empty
    pub fn repeat_sample(&mut self, data_pin: PinId, raw: u32) -> &mut Self {
        if let Some(chip) = self.chip_mut(data_pin) {
            chip.repeat = Some(raw);
        }
        self
    }

    /// Script raw read results for a pin, overriding any attached chip
    ///
    /// Once the script is exhausted the pin falls back to the chip model,
    /// or reads high if no chip is attached.
    pub fn script_reads(
        &mut self,
        pin: PinId,
        levels: impl IntoIterator<Item = bool>,
    ) -> &mut Self {
        self.scripts.entry(pin).or_default().extend(levels);
        self
    }

    /// All recorded mode changes and writes, oldest first
    pub fn events(&self) -> &[GpioEvent] {
        &self.events
    }

    /// Forget recorded events
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of writes recorded for a pin
    pub fn writes_to(&self, pin: PinId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GpioEvent::Write { pin: p, .. } if *p == pin))
            .count()
    }

    /// Number of high writes recorded for a pin
    pub fn high_writes_to(&self, pin: PinId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GpioEvent::Write { pin: p, level: Level::High } if *p == pin))
            .count()
    }

    /// Last mode configured for a pin
    pub fn mode_of(&self, pin: PinId) -> Option<PinMode> {
        self.modes.get(&pin).copied()
    }

    /// Current output level of a pin (low if never written)
    pub fn level_of(&self, pin: PinId) -> Level {
        self.levels.get(&pin).copied().unwrap_or(Level::Low)
    }

    /// Total number of `read_digital` calls
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Pulse counts of every completed cycle on a chip
    ///
    /// A cycle is completed once the chip is polled again after at least
    /// 25 pulses; an aborted (powered-down) cycle is not recorded.
    pub fn pulse_history(&self, data_pin: PinId) -> Vec<u32> {
        self.chip(data_pin)
            .map(|c| c.history.clone())
            .unwrap_or_default()
    }

    /// Pulses seen by a chip in the cycle still in progress
    pub fn pending_pulses(&self, data_pin: PinId) -> u32 {
        self.chip(data_pin).map(|c| c.pulses).unwrap_or(0)
    }

    /// Gain the chip will use for its next conversion
    pub fn selected_gain(&self, data_pin: PinId) -> Option<u16> {
        self.chip(data_pin).map(|c| c.gain)
    }

    /// Number of times a chip was powered down by a long clock high
    pub fn power_downs(&self, data_pin: PinId) -> usize {
        self.chip(data_pin).map(|c| c.power_downs).unwrap_or(0)
    }

    fn chip(&self, data_pin: PinId) -> Option<&SimChip> {
        self.chips.iter().find(|c| c.data_pin == data_pin)
    }

    fn chip_mut(&mut self, data_pin: PinId) -> Option<&mut SimChip> {
        self.chips.iter_mut().find(|c| c.data_pin == data_pin)
    }
}

impl GpioBackend for MockGpio {
    fn set_mode(&mut self, pin: PinId, mode: PinMode) {
        self.modes.insert(pin, mode);
        self.events.push(GpioEvent::Mode { pin, mode });
    }

    fn read_digital(&mut self, pin: PinId) -> bool {
        self.reads += 1;

        if let Some(level) = self.scripts.get_mut(&pin).and_then(VecDeque::pop_front) {
            return level;
        }

        match self.chip_mut(pin) {
            Some(chip) => chip.dout(),
            None => true,
        }
    }

    fn write_digital(&mut self, pin: PinId, level: Level) {
        self.events.push(GpioEvent::Write { pin, level });

        let previous = self.levels.insert(pin, level).unwrap_or(Level::Low);
        let now = self.now_ns.get();

        match (previous, level) {
            (Level::Low, Level::High) => {
                self.high_since.insert(pin, now);
                for chip in self.chips.iter_mut().filter(|c| c.clock_pin == pin) {
                    chip.rising_edge();
                }
            }
            (Level::High, Level::Low) => {
                let since = self.high_since.remove(&pin).unwrap_or(now);
                if now - since >= POWER_DOWN_NS {
                    for chip in self.chips.iter_mut().filter(|c| c.clock_pin == pin) {
                        chip.power_down();
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock one full cycle by hand, reading DOUT after each rising edge
    fn clock_cycle(gpio: &mut MockGpio, data: PinId, clock: PinId, pulses: u32) -> u32 {
        let mut raw = 0;
        for pulse in 0..pulses {
            gpio.write_digital(clock, Level::High);
            gpio.write_digital(clock, Level::Low);
            if pulse < DATA_BITS {
                raw = (raw << 1) | u32::from(gpio.read_digital(data));
            }
        }
        raw
    }

    #[test]
    fn test_silent_chip_never_ready() {
        let mut gpio = MockGpio::new();
        gpio.attach_chip(1, 4);

        for _ in 0..10 {
            assert!(gpio.read_digital(1));
        }
        // Unwired pins read high as well
        assert!(gpio.read_digital(9));
    }

    #[test]
    fn test_shift_out_msb_first() {
        let mut gpio = MockGpio::new();
        gpio.attach_chip(1, 4).push_samples(1, [0x00A5_0F81]);

        assert!(!gpio.read_digital(1), "ready means DOUT low");
        let raw = clock_cycle(&mut gpio, 1, 4, 25);
        assert_eq!(raw, 0x00A5_0F81 & 0x00FF_FFFF);

        // Queue empty: next poll finishes the cycle and stays not-ready
        assert!(gpio.read_digital(1));
        assert_eq!(gpio.pulse_history(1), [25]);
    }

    #[test]
    fn test_gain_latch_from_pulse_count() {
        let mut gpio = MockGpio::new();
        gpio.attach_chip(2, 4).repeat_sample(2, 7);

        assert!(!gpio.read_digital(2));
        clock_cycle(&mut gpio, 2, 4, 27);
        assert_eq!(gpio.pending_pulses(2), 27);

        assert!(!gpio.read_digital(2));
        assert_eq!(gpio.selected_gain(2), Some(64));

        clock_cycle(&mut gpio, 2, 4, 26);
        assert!(!gpio.read_digital(2));
        assert_eq!(gpio.selected_gain(2), Some(32));
        assert_eq!(gpio.pulse_history(2), [27, 26]);
    }

    #[test]
    fn test_long_clock_high_powers_down() {
        let mut gpio = MockGpio::new();
        let mut delay = gpio.delay();
        gpio.attach_chip(1, 4).repeat_sample(1, 1);

        assert!(!gpio.read_digital(1));
        clock_cycle(&mut gpio, 1, 4, 27);
        assert!(!gpio.read_digital(1));
        assert_eq!(gpio.selected_gain(1), Some(64));

        gpio.write_digital(4, Level::High);
        delay.delay_us(60);
        gpio.write_digital(4, Level::Low);

        assert_eq!(gpio.power_downs(1), 1);
        assert_eq!(gpio.selected_gain(1), Some(128));
        assert_eq!(delay.now_ns(), 60_000);
    }

    #[test]
    fn test_short_clock_high_does_not_power_down() {
        let mut gpio = MockGpio::new();
        let mut delay = gpio.delay();
        gpio.attach_chip(1, 4);

        gpio.write_digital(4, Level::High);
        delay.delay_us(59);
        gpio.write_digital(4, Level::Low);

        assert_eq!(gpio.power_downs(1), 0);
    }

    #[test]
    fn test_scripts_override_chip() {
        let mut gpio = MockGpio::new();
        gpio.attach_chip(1, 4).repeat_sample(1, 0);
        gpio.script_reads(1, [true, true]);

        assert!(gpio.read_digital(1));
        assert!(gpio.read_digital(1));
        assert!(!gpio.read_digital(1));
        assert_eq!(gpio.reads(), 3);
    }

    #[test]
    fn test_event_log() {
        let mut gpio = MockGpio::new();
        gpio.set_mode(4, PinMode::Output);
        gpio.write_digital(4, Level::High);
        gpio.write_digital(4, Level::Low);

        assert_eq!(
            gpio.events(),
            [
                GpioEvent::Mode { pin: 4, mode: PinMode::Output },
                GpioEvent::Write { pin: 4, level: Level::High },
                GpioEvent::Write { pin: 4, level: Level::Low },
            ]
        );
        assert_eq!(gpio.writes_to(4), 2);
        assert_eq!(gpio.high_writes_to(4), 1);
        assert_eq!(gpio.mode_of(4), Some(PinMode::Output));
        assert_eq!(gpio.level_of(4), Level::Low);

        gpio.clear_events();
        assert!(gpio.events().is_empty());
    }
}
