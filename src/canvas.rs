//! Host-side control surface for link rendering.
//!
//! Hosts differ by version in how link rendering is driven: newer builds
//! expose a direct setter, older ones a raw mode field plus a constant table
//! on the canvas type, the oldest only a boolean "curved" flag under one of
//! two names. Each mechanism is its own small trait; a host canvas
//! implements the accessors for whichever mechanisms it actually has and
//! leaves the rest at their `None` defaults. [`crate::controller::apply_mode`]
//! probes the accessors in priority order on every call; the host may
//! rebuild or swap its canvas between calls, so nothing is cached.

use crate::mode::LinkMode;

/// Direct mode-setting entry point, taking the numeric wire code.
pub trait ModeSetter {
    fn set_link_render_mode(&mut self, code: u32);
}

/// Raw render-mode field, with an optional constant table on the canvas type.
pub trait RenderModeField {
    /// The host's own code for `mode`, when the host publishes a constant
    /// table. `None` means the caller falls back to the default wire codes.
    fn mode_constant(&self, mode: LinkMode) -> Option<u32>;

    /// Write the raw render-mode field.
    fn write_mode_code(&mut self, code: u32);
}

/// Boolean "render links curved" flag. Cannot represent the difference
/// between `Linear` and `Straight`; both collapse to "not curved".
pub trait CurvedLinksFlag {
    fn set_curved(&mut self, curved: bool);
}

/// One version of the host's canvas object.
///
/// Capability accessors return `None` when the mechanism is absent in this
/// host version. The repaint entry points are best-effort: `false` means the
/// host has no such operation, which never fails a mutation that already
/// happened.
pub trait CanvasSurface {
    fn mode_setter(&mut self) -> Option<&mut dyn ModeSetter> {
        None
    }

    fn render_mode_field(&mut self) -> Option<&mut dyn RenderModeField> {
        None
    }

    fn curved_links(&mut self) -> Option<&mut dyn CurvedLinksFlag> {
        None
    }

    /// Alternate spelling of the curved-links flag kept by some old hosts.
    fn curved_links_legacy(&mut self) -> Option<&mut dyn CurvedLinksFlag> {
        None
    }

    /// Flag the canvas as needing a repaint. No-op on hosts without a dirty bit.
    fn mark_dirty(&mut self) {}

    /// Synchronous repaint. Returns `false` when the host has no such entry point.
    fn redraw(&mut self) -> bool {
        false
    }

    /// Older repaint entry point some hosts keep alongside or instead of `redraw`.
    fn draw(&mut self) -> bool {
        false
    }
}
