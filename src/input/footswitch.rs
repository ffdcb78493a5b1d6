//! USB HID footswitch adapter for Linux.
//!
//! Footswitches enumerate as ordinary keyboards, so the kernel exposes them
//! through evdev. The device file is read on a dedicated thread (reads block
//! until a pedal moves) and decoded events are forwarded over a channel that
//! the main loop drains through [`ChannelInput`].

use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::mem::size_of;
use std::os::raw::c_long;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use super::{ChannelInput, InputSource, NavEvent};

const SYS_CLASS_INPUT: &str = "/sys/class/input";
const DEV_INPUT: &str = "/dev/input";
/// Substrings that identify a footswitch by its reported name.
const NAME_HINTS: &[&str] = &["footswitch", "foot", "pedal"];

/// `struct input_event`: a `struct timeval` followed by type, code and value.
pub const EVENT_SIZE: usize = 2 * size_of::<c_long>() + 8;

const EV_KEY: u16 = 0x01;
const KEY_UP: u16 = 103;
const KEY_PAGEUP: u16 = 104;
const KEY_LEFT: u16 = 105;
const KEY_RIGHT: u16 = 106;
const KEY_DOWN: u16 = 108;
const KEY_PAGEDOWN: u16 = 109;

/// The fields of one evdev record that matter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

/// Decode one native-endian `input_event` record. Returns `None` when the
/// buffer is not exactly one record long.
pub fn decode_event(record: &[u8]) -> Option<RawInputEvent> {
    if record.len() != EVENT_SIZE {
        return None;
    }
    let tail = &record[EVENT_SIZE - 8..];
    Some(RawInputEvent {
        kind: u16::from_ne_bytes([tail[0], tail[1]]),
        code: u16::from_ne_bytes([tail[2], tail[3]]),
        value: i32::from_ne_bytes([tail[4], tail[5], tail[6], tail[7]]),
    })
}

/// Only key-down events of the arrow and paging keys are navigation; key
/// repeats (`value == 2`) and releases are dropped.
pub fn map_event(event: RawInputEvent) -> Option<NavEvent> {
    if event.kind != EV_KEY || event.value != 1 {
        return None;
    }
    match event.code {
        KEY_RIGHT | KEY_PAGEDOWN | KEY_DOWN => Some(NavEvent::Forward),
        KEY_LEFT | KEY_PAGEUP | KEY_UP => Some(NavEvent::Backward),
        _ => None,
    }
}

/// Look for an input device whose name suggests a footswitch.
pub fn find_footswitch_device() -> Option<PathBuf> {
    find_footswitch_in(Path::new(SYS_CLASS_INPUT), Path::new(DEV_INPUT))
}

/// Scan `sys_class_input/event*/device/name` and map a match to the
/// corresponding node under `dev_input`. Entries are checked in name order
/// so the result is stable.
pub fn find_footswitch_in(sys_class_input: &Path, dev_input: &Path) -> Option<PathBuf> {
    let mut entries: Vec<_> = fs::read_dir(sys_class_input)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("event"))
        .collect();
    entries.sort();

    entries.into_iter().find_map(|node| {
        let name_path = sys_class_input.join(&node).join("device").join("name");
        let name = fs::read_to_string(name_path).ok()?.to_lowercase();
        if NAME_HINTS.iter().any(|hint| name.contains(hint)) {
            debug!(node = %node, name = name.trim(), "footswitch candidate");
            Some(dev_input.join(&node))
        } else {
            None
        }
    })
}

/// Reader thread plus the channel it feeds.
pub struct FootswitchInput {
    events: ChannelInput,
}

impl FootswitchInput {
    /// Open `device`, or the auto-detected footswitch when `None`, and start
    /// the reader thread.
    pub fn connect(device: Option<PathBuf>) -> Result<Self> {
        let device = match device {
            Some(path) => path,
            None => find_footswitch_device().ok_or_else(|| anyhow!("no footswitch device found"))?,
        };
        let file = File::open(&device)
            .with_context(|| format!("failed to open footswitch {}", device.display()))?;
        Self::spawn(device, file)
    }

    /// Start reading records from any byte stream laid out like an evdev
    /// node.
    pub fn spawn<R: Read + Send + 'static>(device: PathBuf, reader: R) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let label = device.display().to_string();
        thread::Builder::new()
            .name("footswitch-reader".into())
            .spawn(move || read_loop(reader, tx, &label))
            .context("failed to spawn footswitch reader thread")?;

        info!(device = %device.display(), "footswitch connected");
        Ok(Self {
            events: ChannelInput::new("footswitch", rx),
        })
    }
}

impl InputSource for FootswitchInput {
    fn name(&self) -> &str {
        "footswitch"
    }

    fn poll_event(&mut self) -> Result<Option<NavEvent>> {
        self.events.poll_event()
    }
}

fn read_loop<R: Read>(mut reader: R, events: Sender<NavEvent>, device: &str) {
    let mut record = [0u8; EVENT_SIZE];
    loop {
        match reader.read_exact(&mut record) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                info!(device, "footswitch stream ended");
                return;
            }
            Err(err) => {
                warn!(device, error = %err, "footswitch read failed");
                return;
            }
        }

        let Some(event) = decode_event(&record).and_then(map_event) else {
            continue;
        };
        if events.send(event).is_err() {
            return;
        }
    }
}
