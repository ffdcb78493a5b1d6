//! Input abstraction layer.
//!
//! Every physical control (keyboard, USB footswitch, GPIO pedals) is adapted
//! to [`InputSource`], which yields the same three [`NavEvent`]s. The main
//! loop only ever talks to one source; [`MergedInput`] folds several adapters
//! into that single consumer.

pub mod footswitch;
pub mod gpio;
pub mod keyboard;

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::config::Settings;

pub use crate::models::NavEvent;
pub use footswitch::FootswitchInput;
pub use gpio::{GpioPedals, PedalPins};
pub use keyboard::KeyboardInput;

/// Polled input provider. `Ok(None)` means nothing happened since the last
/// call; errors mean the source is no longer usable.
pub trait InputSource {
    fn name(&self) -> &str;

    fn poll_event(&mut self) -> Result<Option<NavEvent>>;

    /// Whether an idle `poll_event` waits before returning. Callers that
    /// poll in a loop must pace themselves when this is `false`.
    fn blocks(&self) -> bool {
        false
    }
}

impl<T: InputSource + ?Sized> InputSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn poll_event(&mut self) -> Result<Option<NavEvent>> {
        (**self).poll_event()
    }

    fn blocks(&self) -> bool {
        (**self).blocks()
    }
}

/// Polls each adapter in order and hands back the first event. An adapter
/// that errors is logged and dropped so the rest keep working.
#[derive(Default)]
pub struct MergedInput {
    sources: Vec<Box<dyn InputSource>>,
}

impl MergedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: Box<dyn InputSource>) {
        self.sources.push(source);
    }

    pub fn with(mut self, source: impl InputSource + 'static) -> Self {
        self.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl InputSource for MergedInput {
    fn name(&self) -> &str {
        "merged"
    }

    fn poll_event(&mut self) -> Result<Option<NavEvent>> {
        let mut index = 0;
        while index < self.sources.len() {
            match self.sources[index].poll_event() {
                Ok(Some(event)) => return Ok(Some(event)),
                Ok(None) => index += 1,
                Err(err) => {
                    let source = self.sources.remove(index);
                    warn!(source = source.name(), error = %err, "dropping input source");
                }
            }
        }

        if self.sources.is_empty() {
            Err(anyhow!("no input sources left"))
        } else {
            Ok(None)
        }
    }

    fn blocks(&self) -> bool {
        self.sources.iter().any(|source| source.blocks())
    }
}

/// The merged source for a run plus any adapter that could not be set up.
pub struct InputSetup {
    pub input: MergedInput,
    /// Human-readable reasons for adapters that were skipped.
    pub warnings: Vec<String>,
}

/// Assemble the adapters requested by `settings`. Hardware adapters that fail
/// to start are skipped with a warning; the keyboard is always present and
/// polled last because its poll blocks briefly.
pub fn from_settings(settings: &Settings) -> InputSetup {
    let mut input = MergedInput::new();
    let mut warnings = Vec::new();

    if settings.gpio {
        match GpioPedals::open(PedalPins::default()) {
            Ok(pedals) => input.push(Box::new(pedals)),
            Err(err) => {
                warn!(error = %err, "GPIO pedal board unavailable");
                warnings.push(format!("Running without GPIO pedals: {err:#}"));
            }
        }
    } else if cfg!(target_os = "linux") {
        match FootswitchInput::connect(settings.footswitch_device.clone()) {
            Ok(footswitch) => input.push(Box::new(footswitch)),
            Err(err) => {
                info!(error = %err, "footswitch unavailable");
                warnings.push(format!("No footswitch ({err:#}). Use keyboard controls."));
            }
        }
    }

    input.push(Box::new(KeyboardInput::default()));
    InputSetup { input, warnings }
}

/// Receiving end of a channel fed by an adapter thread.
pub struct ChannelInput {
    name: String,
    events: Receiver<NavEvent>,
}

impl ChannelInput {
    pub fn new(name: impl Into<String>, events: Receiver<NavEvent>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }
}

impl InputSource for ChannelInput {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll_event(&mut self) -> Result<Option<NavEvent>> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(anyhow!("{} reader stopped", self.name)),
        }
    }
}

/// Replays a fixed list of events, then reports idle. Handy for demos and
/// for driving the main loop without hardware.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    events: VecDeque<NavEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = NavEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn name(&self) -> &str {
        "scripted"
    }

    fn poll_event(&mut self) -> Result<Option<NavEvent>> {
        Ok(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    struct Broken;

    impl InputSource for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn poll_event(&mut self) -> Result<Option<NavEvent>> {
            Err(anyhow!("device unplugged"))
        }
    }

    #[test]
    fn merged_input_preserves_source_order() {
        let mut merged = MergedInput::new()
            .with(ScriptedInput::new([NavEvent::Forward]))
            .with(ScriptedInput::new([NavEvent::Backward, NavEvent::Quit]));

        assert_eq!(merged.poll_event().unwrap(), Some(NavEvent::Forward));
        assert_eq!(merged.poll_event().unwrap(), Some(NavEvent::Backward));
        assert_eq!(merged.poll_event().unwrap(), Some(NavEvent::Quit));
        assert_eq!(merged.poll_event().unwrap(), None);
    }

    #[test]
    fn failing_source_is_dropped() {
        let mut merged = MergedInput::new()
            .with(Broken)
            .with(ScriptedInput::new([NavEvent::Forward]));

        assert_eq!(merged.poll_event().unwrap(), Some(NavEvent::Forward));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn merged_input_errors_once_every_source_is_gone() {
        let mut merged = MergedInput::new().with(Broken);
        assert!(merged.poll_event().is_err());
        assert!(merged.is_empty());
    }

    struct Waiting;

    impl InputSource for Waiting {
        fn name(&self) -> &str {
            "waiting"
        }

        fn poll_event(&mut self) -> Result<Option<NavEvent>> {
            Err(anyhow!("terminal closed"))
        }

        fn blocks(&self) -> bool {
            true
        }
    }

    #[test]
    fn merged_input_blocks_only_while_a_blocking_source_remains() {
        let mut merged = MergedInput::new()
            .with(ScriptedInput::default())
            .with(Waiting);
        assert!(merged.blocks());

        assert_eq!(merged.poll_event().unwrap(), None);
        assert_eq!(merged.len(), 1);
        assert!(!merged.blocks());
    }

    #[test]
    fn channel_input_drains_then_reports_disconnect() {
        let (tx, rx) = mpsc::channel();
        let mut input = ChannelInput::new("footswitch", rx);

        tx.send(NavEvent::Forward).unwrap();
        assert_eq!(input.poll_event().unwrap(), Some(NavEvent::Forward));
        assert_eq!(input.poll_event().unwrap(), None);

        drop(tx);
        assert!(input.poll_event().is_err());
    }
}
