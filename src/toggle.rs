//! The toggle control docked into the host's UI.

use tracing::{debug, info};

use crate::host::HostApp;
use crate::mode::LinkMode;

/// Where the toggle currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Docked into the host's toolbar group.
    Toolbar,
    /// Fixed fallback position outside the toolbar.
    Floating,
}

/// Visible state of the toggle control.
///
/// Always shows the *requested* mode; `failed` marks that the host did not
/// accept it. The face never keeps showing a stale mode as if it succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleFace {
    pub mode: LinkMode,
    pub failed: bool,
}

impl ToggleFace {
    /// Single-letter badge shown in the control's corner.
    pub fn badge(&self) -> char {
        self.mode.badge()
    }

    /// Hover text.
    pub fn tooltip(&self) -> String {
        format!("Link mode: {} (F8 / Ctrl+K to cycle)", self.mode)
    }
}

/// The toggle button and its docking state.
pub struct ToggleButton {
    face: ToggleFace,
    placement: Option<Placement>,
}

impl ToggleButton {
    pub fn new(mode: LinkMode) -> Self {
        Self {
            face: ToggleFace { mode, failed: false },
            placement: None,
        }
    }

    pub fn face(&self) -> ToggleFace {
        self.face
    }

    pub fn placement(&self) -> Option<Placement> {
        self.placement
    }

    /// Mount the control, preferring the toolbar and falling back to the
    /// floating position when the toolbar marker is missing. Slots are
    /// looked up fresh on every call; the host may have rebuilt them since
    /// the last one.
    pub fn dock(&mut self, host: &mut dyn HostApp) {
        if let Some(slot) = host.toolbar_slot() {
            slot.mount(&self.face);
            self.placement = Some(Placement::Toolbar);
            debug!(mode = %self.face.mode, "toggle docked in toolbar");
            return;
        }
        host.floating_slot().mount(&self.face);
        self.placement = Some(Placement::Floating);
        info!(mode = %self.face.mode, "toolbar marker missing, toggle floating at fallback position");
    }

    /// Re-mount after a host UI rebuild left the control unmounted. Does
    /// not re-run discovery and touches no persisted state.
    pub fn ensure_docked(&mut self, host: &mut dyn HostApp) {
        if self.is_mounted(host) {
            return;
        }
        info!("toggle lost in host re-render, re-docking");
        self.dock(host);
    }

    fn is_mounted(&self, host: &mut dyn HostApp) -> bool {
        if let Some(slot) = host.toolbar_slot() {
            if slot.mounted() {
                return true;
            }
        }
        host.floating_slot().mounted()
    }

    /// Update the visible state from the latest apply outcome.
    pub fn refresh(&mut self, host: &mut dyn HostApp, mode: LinkMode, failed: bool) {
        self.face = ToggleFace { mode, failed };
        if let Some(slot) = host.toolbar_slot() {
            if slot.mounted() {
                slot.update(&self.face);
                return;
            }
        }
        let slot = host.floating_slot();
        if slot.mounted() {
            slot.update(&self.face);
        }
    }
}
