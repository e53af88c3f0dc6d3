use tracing::{debug, info};

use crate::canvas::CanvasSurface;
use crate::mode::LinkMode;

/// Outcome of one application attempt.
///
/// `applied == false` means no compatible control surface was found (or no
/// canvas exists right now). That is an expected outcome on unsupported
/// hosts, not an error; callers surface it in the UI and move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyReport {
    pub mode: LinkMode,
    pub applied: bool,
}

/// Drive `canvas` to render links in `mode`.
///
/// Control mechanisms are probed in fixed priority order and are mutually
/// exclusive: the first one present runs its side effects and the rest are
/// never touched. Mutation always happens before any repaint request, and a
/// missing repaint entry point never fails a mechanism that already mutated.
pub fn apply_mode(canvas: Option<&mut dyn CanvasSurface>, mode: LinkMode) -> ApplyReport {
    let Some(canvas) = canvas else {
        debug!(mode = %mode, "no canvas to apply mode to");
        return ApplyReport { mode, applied: false };
    };

    if let Some(setter) = canvas.mode_setter() {
        setter.set_link_render_mode(mode.wire_code());
        debug!(mode = %mode, code = mode.wire_code(), "applied via direct setter");
        return ApplyReport { mode, applied: true };
    }

    if let Some(field) = canvas.render_mode_field() {
        let code = field.mode_constant(mode).unwrap_or_else(|| mode.wire_code());
        field.write_mode_code(code);
        canvas.mark_dirty();
        canvas.draw();
        debug!(mode = %mode, code = code, "applied via render-mode field");
        return ApplyReport { mode, applied: true };
    }

    // The boolean flags only know curved-or-not: LINEAR and STRAIGHT both
    // land on "not curved" and still count as applied.
    let curved = mode == LinkMode::Spline;

    if let Some(flag) = canvas.curved_links() {
        flag.set_curved(curved);
        canvas.mark_dirty();
        canvas.draw();
        debug!(mode = %mode, curved = curved, "applied via curved-links flag");
        return ApplyReport { mode, applied: true };
    }

    if let Some(flag) = canvas.curved_links_legacy() {
        flag.set_curved(curved);
        canvas.redraw();
        canvas.draw();
        debug!(mode = %mode, curved = curved, "applied via legacy curved-links flag");
        return ApplyReport { mode, applied: true };
    }

    info!(mode = %mode, "host exposes no link-mode control surface");
    ApplyReport { mode, applied: false }
}
