use anyhow::{Context, Result};
use evdev::{Device, EventType, InputEventKind, Key};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::constants::{input, paths, permissions};

/// Command sent from a listener thread to the shell loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleCommand {
    Forward,
    Backward,
}

/// Find all keyboard devices that expose the keys we bind
fn find_all_keyboard_devices() -> Result<Vec<Device>> {
    info!(path = %paths::DEV_INPUT, "Scanning for keyboard devices...");

    let mut devices = Vec::new();

    for entry in std::fs::read_dir(paths::DEV_INPUT).context(format!(
        "Failed to read {} - are you in the '{}' group?",
        paths::DEV_INPUT,
        permissions::INPUT_GROUP
    ))? {
        let entry = entry?;
        let path = entry.path();

        // Try to open device
        if let Ok(device) = Device::open(&path) {
            // Check if it has the K key (indicates keyboard)
            if let Some(keys) = device.supported_keys() {
                if keys.contains(Key::KEY_K) {
                    let key_count = keys.iter().count();
                    info!(device_path = %path.display(), name = ?device.name(), key_count = key_count, "Found keyboard device");
                    devices.push(device);
                }
            }
        }
    }

    if devices.is_empty() {
        anyhow::bail!(
            "No keyboard device found. Ensure you're in '{}' group:\n\
             {}\n\
             Then log out and back in.",
            permissions::INPUT_GROUP,
            permissions::ADD_TO_INPUT_GROUP
        )
    }

    info!(count = devices.len(), "Listening on keyboard device(s)");

    Ok(devices)
}

/// Spawn background threads listening for the cycle shortcuts
/// (F8, Shift+F8, Ctrl+K) on all keyboard devices
pub fn spawn_listener(sender: Sender<CycleCommand>) -> Result<Vec<thread::JoinHandle<()>>> {
    let devices = find_all_keyboard_devices()?;
    let mut handles = Vec::new();

    for device in devices {
        let sender = sender.clone();
        let handle = thread::spawn(move || {
            info!(device = ?device.name(), "Hotkey listener started");
            if let Err(e) = listen_for_hotkeys(device, sender) {
                error!(error = %e, "Hotkey listener error");
            }
        });
        handles.push(handle);
    }

    Ok(handles)
}

/// Listen for cycle shortcuts on a single device
fn listen_for_hotkeys(mut device: Device, sender: Sender<CycleCommand>) -> Result<()> {
    loop {
        // Fetch events (blocks until available)
        let events = device.fetch_events().context("Failed to fetch events")?;

        // Collect presses of the bound keys first.
        // We need to finish with the events iterator before querying key state
        let mut presses = Vec::new();

        for event in events {
            if event.event_type() != EventType::KEY {
                continue;
            }

            if let InputEventKind::Key(key) = event.kind() {
                debug!(key = ?key, value = event.value(), "Key event");

                let pressed = event.value() == input::KEY_PRESS;
                if pressed && (key == Key::KEY_F8 || key == Key::KEY_K) {
                    presses.push(key);
                }
            }
        }

        // Now resolve each press against the current modifier state
        for key in presses {
            // Check real-time state of modifier keys when the key was pressed
            // This avoids race conditions from batched events
            let key_state = device
                .get_key_state()
                .context("Failed to get keyboard state")?;

            let shift = key_state.contains(Key::KEY_LEFTSHIFT)
                || key_state.contains(Key::KEY_RIGHTSHIFT);
            let ctrl = key_state.contains(Key::KEY_LEFTCTRL)
                || key_state.contains(Key::KEY_RIGHTCTRL);
            let alt =
                key_state.contains(Key::KEY_LEFTALT) || key_state.contains(Key::KEY_RIGHTALT);

            let command = if key == Key::KEY_F8 && !ctrl && !alt {
                if shift {
                    Some(CycleCommand::Backward)
                } else {
                    Some(CycleCommand::Forward)
                }
            } else if key == Key::KEY_K && ctrl && !alt && !shift {
                Some(CycleCommand::Forward)
            } else {
                None
            };

            if let Some(command) = command {
                info!(key = ?key, command = ?command, "Hotkey pressed, sending cycle command");

                sender
                    .send(command)
                    .context("Failed to send cycle command")?;
            }
        }
    }
}

/// Check if hotkeys are available (user has input group permissions)
pub fn check_permissions() -> bool {
    std::fs::read_dir(paths::DEV_INPUT).is_ok()
}

/// Print helpful error message if permissions missing
pub fn print_permission_error() {
    error!(path = %paths::DEV_INPUT, "Cannot access input devices");
    error!(group = %permissions::INPUT_GROUP, "Hotkeys require group membership");
    error!(command = %permissions::ADD_TO_INPUT_GROUP, "Add user to input group");
    error!("  Then log out and back in");
    warn!(continuing = true, "Continuing with button-only control...");
}
