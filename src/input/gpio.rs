//! GPIO pedal board adapter (Raspberry Pi).
//!
//! Two momentary buttons wired to ground with the internal pull-ups enabled,
//! each with an LED that lights briefly when its press is accepted. The
//! buttons are sampled on a dedicated thread at a fixed rate, independent of
//! how often the main loop polls, and accepted presses are forwarded over a
//! channel that the main loop drains through [`ChannelInput`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::{ChannelInput, InputSource, NavEvent};

pub const DEFAULT_BOUNCE: Duration = Duration::from_millis(50);
/// Interval between two samples of the button lines.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(5);
/// How long a pedal's LED stays lit after a press.
pub const LED_HOLD: Duration = Duration::from_millis(150);

/// BCM pin assignment for the pedal board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedalPins {
    pub forward: u8,
    pub backward: u8,
    pub forward_led: u8,
    pub backward_led: u8,
}

impl Default for PedalPins {
    fn default() -> Self {
        Self {
            forward: 27,
            backward: 17,
            forward_led: 23,
            backward_led: 22,
        }
    }
}

/// A button line that can be sampled.
pub trait InputLine: Send {
    /// `true` when the line is high (button released).
    fn read_level(&mut self) -> Result<bool>;
}

/// An LED line.
pub trait OutputLine: Send {
    fn write_level(&mut self, high: bool) -> Result<()>;
}

/// Edge detector for an active-low button. The first sample only records
/// the idle level. After that a press registers on a high-to-low
/// transition, provided at least `bounce` has passed since the last accepted
/// edge; chatter inside that window is ignored.
#[derive(Debug, Clone)]
pub struct Debouncer {
    bounce: Duration,
    level_high: Option<bool>,
    last_edge: Option<Instant>,
}

impl Debouncer {
    pub fn new(bounce: Duration) -> Self {
        Self {
            bounce,
            level_high: None,
            last_edge: None,
        }
    }

    /// Feed the current level; returns `true` exactly once per press.
    pub fn update(&mut self, level_high: bool, now: Instant) -> bool {
        let Some(previous) = self.level_high else {
            self.level_high = Some(level_high);
            return false;
        };
        if level_high == previous {
            return false;
        }
        if let Some(last) = self.last_edge {
            if now.duration_since(last) < self.bounce {
                return false;
            }
        }

        self.level_high = Some(level_high);
        self.last_edge = Some(now);
        !level_high
    }
}

struct Pedal<B, L> {
    button: B,
    led: L,
    debouncer: Debouncer,
    lit_until: Option<Instant>,
    event: NavEvent,
}

impl<B: InputLine, L: OutputLine> Pedal<B, L> {
    fn new(button: B, led: L, bounce: Duration, event: NavEvent) -> Self {
        Self {
            button,
            led,
            debouncer: Debouncer::new(bounce),
            lit_until: None,
            event,
        }
    }

    fn sample(&mut self, now: Instant) -> Result<Option<NavEvent>> {
        let level = self.button.read_level()?;
        if self.debouncer.update(level, now) {
            self.led.write_level(true)?;
            self.lit_until = Some(now + LED_HOLD);
            return Ok(Some(self.event));
        }

        if self.lit_until.is_some_and(|until| now >= until) {
            self.led.write_level(false)?;
            self.lit_until = None;
        }
        Ok(None)
    }
}

/// Forward/backward pedals with their LEDs. Sampled by [`GpioPedals`]'s
/// worker thread; [`PedalBoard::sample_at`] is the single step.
pub struct PedalBoard<B: InputLine, L: OutputLine> {
    pedals: [Pedal<B, L>; 2],
}

impl<B: InputLine, L: OutputLine> PedalBoard<B, L> {
    pub fn new(forward: B, forward_led: L, backward: B, backward_led: L, bounce: Duration) -> Self {
        Self {
            pedals: [
                Pedal::new(forward, forward_led, bounce, NavEvent::Forward),
                Pedal::new(backward, backward_led, bounce, NavEvent::Backward),
            ],
        }
    }

    /// Sample both buttons at `now` and return the presses seen, forward
    /// first.
    pub fn sample_at(&mut self, now: Instant) -> Result<Vec<NavEvent>> {
        let mut pressed = Vec::new();
        for pedal in &mut self.pedals {
            if let Some(event) = pedal.sample(now)? {
                pressed.push(event);
            }
        }
        Ok(pressed)
    }

    fn leds_off(&mut self) {
        for pedal in &mut self.pedals {
            if let Err(err) = pedal.led.write_level(false) {
                warn!(error = %err, "failed to switch off pedal LED");
            }
            pedal.lit_until = None;
        }
    }
}

impl<B: InputLine, L: OutputLine> Drop for PedalBoard<B, L> {
    fn drop(&mut self) {
        self.leds_off();
    }
}

/// Sampling thread plus the channel it feeds. Dropping it stops the thread
/// and switches the LEDs off.
pub struct GpioPedals {
    events: ChannelInput,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl GpioPedals {
    /// Claim the board's pins with pull-ups on the buttons and start
    /// sampling.
    #[cfg(target_os = "linux")]
    pub fn open(pins: PedalPins) -> Result<Self> {
        let board = rpi::open_board(pins)?;
        info!(
            forward = pins.forward,
            forward_led = pins.forward_led,
            backward = pins.backward,
            backward_led = pins.backward_led,
            "GPIO pedal board initialized"
        );
        Self::spawn(board, SAMPLE_INTERVAL)
    }

    #[cfg(not(target_os = "linux"))]
    pub fn open(_pins: PedalPins) -> Result<Self> {
        anyhow::bail!("GPIO pedals are only supported on Linux")
    }

    /// Start sampling `board` every `interval` on a worker thread.
    pub fn spawn<B, L>(board: PedalBoard<B, L>, interval: Duration) -> Result<Self>
    where
        B: InputLine + 'static,
        L: OutputLine + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let worker = thread::Builder::new()
            .name("gpio-pedals".into())
            .spawn(move || sample_loop(board, interval, tx, &worker_stop))
            .context("failed to spawn GPIO sampling thread")?;

        Ok(Self {
            events: ChannelInput::new("gpio", rx),
            stop,
            worker: Some(worker),
        })
    }
}

impl InputSource for GpioPedals {
    fn name(&self) -> &str {
        "gpio"
    }

    fn poll_event(&mut self) -> Result<Option<NavEvent>> {
        self.events.poll_event()
    }
}

impl Drop for GpioPedals {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("GPIO sampling thread panicked");
            }
        }
    }
}

fn sample_loop<B: InputLine, L: OutputLine>(
    mut board: PedalBoard<B, L>,
    interval: Duration,
    events: Sender<NavEvent>,
    stop: &AtomicBool,
) {
    while !stop.load(Ordering::Relaxed) {
        match board.sample_at(Instant::now()) {
            Ok(pressed) => {
                for event in pressed {
                    debug!(?event, "pedal press");
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "GPIO sampling failed");
                return;
            }
        }
        thread::sleep(interval);
    }
}

#[cfg(target_os = "linux")]
mod rpi {
    use anyhow::{Context, Result};
    use rppal::gpio::{Gpio, InputPin, OutputPin};

    use super::{InputLine, OutputLine, PedalBoard, PedalPins, DEFAULT_BOUNCE};

    impl InputLine for InputPin {
        fn read_level(&mut self) -> Result<bool> {
            Ok(self.is_high())
        }
    }

    impl OutputLine for OutputPin {
        fn write_level(&mut self, high: bool) -> Result<()> {
            if high {
                self.set_high();
            } else {
                self.set_low();
            }
            Ok(())
        }
    }

    pub(super) fn open_board(pins: PedalPins) -> Result<PedalBoard<InputPin, OutputPin>> {
        let gpio = Gpio::new().context("failed to open the GPIO peripheral")?;
        let input = |number: u8| -> Result<InputPin> {
            Ok(gpio
                .get(number)
                .with_context(|| format!("failed to claim GPIO {number}"))?
                .into_input_pullup())
        };
        let output = |number: u8| -> Result<OutputPin> {
            Ok(gpio
                .get(number)
                .with_context(|| format!("failed to claim GPIO {number}"))?
                .into_output_low())
        };

        Ok(PedalBoard::new(
            input(pins.forward)?,
            output(pins.forward_led)?,
            input(pins.backward)?,
            output(pins.backward_led)?,
            DEFAULT_BOUNCE,
        ))
    }
}
