//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used
//! throughout the add-on, providing a single source of truth for
//! constant values.

/// Durable storage locations
pub mod storage {
    /// Directory under the user config dir holding our state
    pub const APP_DIR: &str = "linkmode-toggle";

    /// State file name
    pub const FILENAME: &str = "state.toml";
}

/// Host discovery retry budget
pub mod discovery {
    use std::time::Duration;

    /// Maximum number of polls before giving up on the host
    pub const MAX_ATTEMPTS: u32 = 60;

    /// Pause between discovery polls
    pub const RETRY_INTERVAL: Duration = Duration::from_millis(250);
}

/// Input event constants (from evdev)
pub mod input {
    /// Key press event value
    pub const KEY_PRESS: i32 = 1;

    /// Key release event value
    pub const KEY_RELEASE: i32 = 0;

    /// Key repeat event value
    pub const KEY_REPEAT: i32 = 2;
}

/// Filesystem paths
pub mod paths {
    /// Input device directory scanned for keyboards
    pub const DEV_INPUT: &str = "/dev/input";
}

/// Input permission guidance
pub mod permissions {
    /// Group membership required to read input devices
    pub const INPUT_GROUP: &str = "input";

    /// Command that grants it
    pub const ADD_TO_INPUT_GROUP: &str = "sudo usermod -aG input $USER";
}
