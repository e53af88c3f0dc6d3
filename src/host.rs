//! What the embedding application provides to the add-on.

use crate::canvas::CanvasSurface;
use crate::toggle::ToggleFace;

/// Handle to the embedding graph editor.
///
/// Everything reachable through this trait may change between calls (the
/// host can rebuild its UI tree or replace its canvas object at any time),
/// so the add-on re-asks for every handle on every use and caches nothing.
pub trait HostApp {
    /// Current canvas object, if the host has constructed one yet.
    fn canvas(&mut self) -> Option<&mut dyn CanvasSurface>;

    /// True while a text-editing widget owns keyboard focus. Hotkeys are
    /// suppressed then so cycling never hijacks normal typing.
    fn text_input_focused(&self) -> bool;

    /// The toolbar slot marked for canvas controls, when the marker exists
    /// in the current UI tree.
    fn toolbar_slot(&mut self) -> Option<&mut dyn DockSlot>;

    /// Fixed fallback position for the toggle; always available.
    fn floating_slot(&mut self) -> &mut dyn DockSlot;
}

/// A place the toggle control can be mounted.
pub trait DockSlot {
    /// Whether the toggle is currently mounted here.
    fn mounted(&self) -> bool;

    /// Insert the toggle, rendered from `face`.
    fn mount(&mut self, face: &ToggleFace);

    /// Re-render an already mounted toggle from `face`.
    fn update(&mut self, face: &ToggleFace);
}
