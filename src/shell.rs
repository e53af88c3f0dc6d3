//! Event loop wiring hotkeys, the toggle control, and persistence to the
//! mode controller.
//!
//! Everything runs serially on the thread that calls [`Shell::run`]; the
//! hotkey listener threads and the host's UI callbacks only produce channel
//! messages. The shell owns all mutable state, so the last write wins by
//! construction and nothing here needs synchronization.

use std::sync::mpsc::{Receiver, RecvTimeoutError};

use tracing::{debug, error, info, warn};

use crate::constants::discovery::RETRY_INTERVAL;
use crate::controller;
use crate::discovery::{Discovery, Probe};
use crate::host::HostApp;
use crate::hotkeys::CycleCommand;
use crate::mode::LinkMode;
use crate::persistence::ModeStore;
use crate::toggle::ToggleButton;

/// Events the shell reacts to.
///
/// Producers: the hotkey listener threads, the host's click callback for the
/// toggle control, and the host's notification that it rebuilt its UI tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    Hotkey(CycleCommand),
    TogglePressed,
    UiRebuilt,
}

/// The add-on's state machine: current selection, its on-disk home, and the
/// toggle control.
pub struct Shell {
    store: ModeStore,
    current: LinkMode,
    toggle: ToggleButton,
}

impl Shell {
    /// Restore the persisted selection (or the default) without touching
    /// the host.
    pub fn new(store: ModeStore) -> Self {
        let current = store.load();
        Self {
            store,
            current,
            toggle: ToggleButton::new(current),
        }
    }

    /// The mode currently shown in the UI, applied or not.
    pub fn current_mode(&self) -> LinkMode {
        self.current
    }

    /// Discover the host canvas, restore the saved mode, then handle events
    /// until the channel closes. Returns quietly when the host never
    /// produces a canvas; the add-on just stays inert.
    pub fn run(&mut self, host: &mut dyn HostApp, events: &Receiver<ShellEvent>) {
        let mut discovery = Discovery::new();
        loop {
            match discovery.poll(host) {
                Probe::Ready => break,
                Probe::GaveUp => return,
                Probe::Retry => match events.recv_timeout(RETRY_INTERVAL) {
                    Ok(event) => debug!(event = ?event, "dropping event during host discovery"),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => return,
                },
            }
        }

        self.attach(host);

        while let Ok(event) = events.recv() {
            self.handle_event(host, event);
        }
    }

    /// Apply the restored mode (the outcome is surfaced either way) and
    /// dock the toggle. Called once the host canvas exists.
    pub fn attach(&mut self, host: &mut dyn HostApp) {
        info!(mode = %self.current, "restoring saved link mode");
        self.apply_current(host);
        self.toggle.dock(host);
    }

    /// React to one event. Serial by construction: the caller owns the loop.
    pub fn handle_event(&mut self, host: &mut dyn HostApp, event: ShellEvent) {
        match event {
            ShellEvent::Hotkey(command) => {
                if host.text_input_focused() {
                    debug!(command = ?command, "ignoring hotkey while a text input has focus");
                    return;
                }
                self.cycle(host, command);
            }
            // A click on the toggle is deliberate; no focus filter.
            ShellEvent::TogglePressed => self.cycle(host, CycleCommand::Forward),
            ShellEvent::UiRebuilt => self.toggle.ensure_docked(host),
        }
    }

    fn cycle(&mut self, host: &mut dyn HostApp, command: CycleCommand) {
        self.current = match command {
            CycleCommand::Forward => self.current.next(),
            CycleCommand::Backward => self.current.prev(),
        };
        self.apply_current(host);
    }

    fn apply_current(&mut self, host: &mut dyn HostApp) {
        let report = controller::apply_mode(host.canvas(), self.current);
        if report.applied {
            info!(mode = %report.mode, "link mode applied");
        } else {
            warn!(mode = %report.mode, "link mode not applied, host incompatible or unavailable");
        }

        // The requested mode is remembered even when the host rejected it,
        // so the next session retries the same request.
        if let Err(e) = self.store.save(report.mode) {
            error!(error = ?e, "failed to persist link mode");
        }

        self.toggle.refresh(host, report.mode, !report.applied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasSurface, CurvedLinksFlag, ModeSetter};
    use crate::constants::storage;
    use crate::host::DockSlot;
    use crate::toggle::{Placement, ToggleFace};
    use std::fs;
    use std::sync::mpsc;

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Surface {
        DirectSetter,
        CurvedFlag,
        Bare,
    }

    struct FakeCanvas {
        surface: Surface,
        codes: Vec<u32>,
        curved: Vec<bool>,
    }

    impl FakeCanvas {
        fn new(surface: Surface) -> Self {
            Self {
                surface,
                codes: Vec::new(),
                curved: Vec::new(),
            }
        }
    }

    impl ModeSetter for FakeCanvas {
        fn set_link_render_mode(&mut self, code: u32) {
            self.codes.push(code);
        }
    }

    impl CurvedLinksFlag for FakeCanvas {
        fn set_curved(&mut self, curved: bool) {
            self.curved.push(curved);
        }
    }

    impl CanvasSurface for FakeCanvas {
        fn mode_setter(&mut self) -> Option<&mut dyn ModeSetter> {
            if self.surface == Surface::DirectSetter {
                Some(self)
            } else {
                None
            }
        }

        fn curved_links(&mut self) -> Option<&mut dyn CurvedLinksFlag> {
            if self.surface == Surface::CurvedFlag {
                Some(self)
            } else {
                None
            }
        }
    }

    #[derive(Default)]
    struct FakeSlot {
        mounted: bool,
        mounts: u32,
        last_face: Option<ToggleFace>,
    }

    impl DockSlot for FakeSlot {
        fn mounted(&self) -> bool {
            self.mounted
        }

        fn mount(&mut self, face: &ToggleFace) {
            self.mounted = true;
            self.mounts += 1;
            self.last_face = Some(*face);
        }

        fn update(&mut self, face: &ToggleFace) {
            self.last_face = Some(*face);
        }
    }

    struct FakeHost {
        canvas: Option<FakeCanvas>,
        text_focused: bool,
        has_toolbar: bool,
        toolbar: FakeSlot,
        floating: FakeSlot,
    }

    impl FakeHost {
        fn new(surface: Surface) -> Self {
            Self {
                canvas: Some(FakeCanvas::new(surface)),
                text_focused: false,
                has_toolbar: true,
                toolbar: FakeSlot::default(),
                floating: FakeSlot::default(),
            }
        }

        fn without_canvas() -> Self {
            let mut host = Self::new(Surface::Bare);
            host.canvas = None;
            host
        }

        fn shown_face(&self) -> ToggleFace {
            self.toolbar
                .last_face
                .or(self.floating.last_face)
                .expect("toggle never rendered")
        }
    }

    impl HostApp for FakeHost {
        fn canvas(&mut self) -> Option<&mut dyn CanvasSurface> {
            self.canvas.as_mut().map(|c| c as &mut dyn CanvasSurface)
        }

        fn text_input_focused(&self) -> bool {
            self.text_focused
        }

        fn toolbar_slot(&mut self) -> Option<&mut dyn DockSlot> {
            if self.has_toolbar {
                Some(&mut self.toolbar)
            } else {
                None
            }
        }

        fn floating_slot(&mut self) -> &mut dyn DockSlot {
            &mut self.floating
        }
    }

    fn store(test_name: &str) -> ModeStore {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "linkmode-shell-test-{}-{}",
            std::process::id(),
            test_name
        ));
        path.push(storage::FILENAME);
        let _ = fs::remove_file(&path);
        ModeStore::at_path(path)
    }

    fn persisted(store: &ModeStore) -> LinkMode {
        store.load()
    }

    #[test]
    fn test_startup_with_no_saved_mode_applies_spline() {
        let store = store("fresh-start");
        let mut host = FakeHost::new(Surface::DirectSetter);
        let mut shell = Shell::new(store);

        shell.attach(&mut host);

        // SPLINE went through the direct setter with its wire code.
        assert_eq!(host.canvas.as_ref().unwrap().codes, vec![1]);
        assert_eq!(persisted(&shell.store), LinkMode::Spline);
        let face = host.shown_face();
        assert_eq!(face.mode, LinkMode::Spline);
        assert!(!face.failed);
    }

    #[test]
    fn test_startup_restores_saved_mode_through_curved_flag() {
        let store = store("restore-linear");
        store.save(LinkMode::Linear).unwrap();
        let mut host = FakeHost::new(Surface::CurvedFlag);
        let mut shell = Shell::new(store);

        shell.attach(&mut host);

        // LINEAR collapses to "not curved" and still counts as applied.
        assert_eq!(host.canvas.as_ref().unwrap().curved, vec![false]);
        let face = host.shown_face();
        assert_eq!(face.mode, LinkMode::Linear);
        assert!(!face.failed);
    }

    #[test]
    fn test_three_cycles_from_straight() {
        let store = store("cycle-three");
        store.save(LinkMode::Straight).unwrap();
        let mut host = FakeHost::new(Surface::DirectSetter);
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        for _ in 0..3 {
            shell.handle_event(&mut host, ShellEvent::Hotkey(CycleCommand::Forward));
        }

        // Restore applied STRAIGHT, then the requested sequence was
        // SPLINE, LINEAR, STRAIGHT.
        assert_eq!(host.canvas.as_ref().unwrap().codes, vec![0, 1, 2, 0]);
        assert_eq!(shell.current_mode(), LinkMode::Straight);
        assert_eq!(persisted(&shell.store), LinkMode::Straight);
    }

    #[test]
    fn test_backward_cycle() {
        let store = store("cycle-back");
        let mut host = FakeHost::new(Surface::DirectSetter);
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        shell.handle_event(&mut host, ShellEvent::Hotkey(CycleCommand::Backward));
        assert_eq!(shell.current_mode(), LinkMode::Straight);
    }

    #[test]
    fn test_incompatible_host_marks_failure_but_persists() {
        let store = store("incompatible");
        let mut host = FakeHost::new(Surface::Bare);
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        shell.handle_event(&mut host, ShellEvent::Hotkey(CycleCommand::Forward));

        let face = host.shown_face();
        assert_eq!(face.mode, LinkMode::Linear);
        assert!(face.failed);
        // The unapplied request is still remembered for the next session.
        assert_eq!(persisted(&shell.store), LinkMode::Linear);
    }

    #[test]
    fn test_missing_canvas_marks_failure_without_panic() {
        let store = store("no-canvas");
        let mut host = FakeHost::without_canvas();
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        assert!(host.shown_face().failed);
        assert_eq!(persisted(&shell.store), LinkMode::Spline);
    }

    #[test]
    fn test_hotkey_suppressed_while_typing() {
        let store = store("typing");
        let mut host = FakeHost::new(Surface::DirectSetter);
        host.text_focused = true;
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        shell.handle_event(&mut host, ShellEvent::Hotkey(CycleCommand::Forward));

        // Only the startup restore reached the canvas.
        assert_eq!(host.canvas.as_ref().unwrap().codes, vec![1]);
        assert_eq!(shell.current_mode(), LinkMode::Spline);
    }

    #[test]
    fn test_toggle_press_ignores_focus_filter() {
        let store = store("toggle-press");
        let mut host = FakeHost::new(Surface::DirectSetter);
        host.text_focused = true;
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        shell.handle_event(&mut host, ShellEvent::TogglePressed);
        assert_eq!(shell.current_mode(), LinkMode::Linear);
    }

    #[test]
    fn test_ui_rebuild_redocks_without_touching_state() {
        let store = store("rebuild");
        let mut host = FakeHost::new(Surface::DirectSetter);
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        host.toolbar.mounted = false;
        shell.handle_event(&mut host, ShellEvent::UiRebuilt);

        assert_eq!(host.toolbar.mounts, 2);
        assert_eq!(shell.current_mode(), LinkMode::Spline);
        assert_eq!(persisted(&shell.store), LinkMode::Spline);
        // Re-docking never re-applies the mode.
        assert_eq!(host.canvas.as_ref().unwrap().codes, vec![1]);
    }

    #[test]
    fn test_fallback_placement_without_toolbar() {
        let store = store("fallback");
        let mut host = FakeHost::new(Surface::DirectSetter);
        host.has_toolbar = false;
        let mut shell = Shell::new(store);
        shell.attach(&mut host);

        assert_eq!(host.floating.mounts, 1);
        assert_eq!(shell.toggle.placement(), Some(Placement::Floating));
    }

    #[test]
    fn test_run_processes_queued_events_then_returns() {
        let store = store("run-loop");
        let mut host = FakeHost::new(Surface::DirectSetter);
        let mut shell = Shell::new(store);

        let (tx, rx) = mpsc::channel();
        tx.send(ShellEvent::Hotkey(CycleCommand::Forward)).unwrap();
        tx.send(ShellEvent::Hotkey(CycleCommand::Forward)).unwrap();
        drop(tx);

        shell.run(&mut host, &rx);

        // Restore (SPLINE), then LINEAR, then STRAIGHT.
        assert_eq!(host.canvas.as_ref().unwrap().codes, vec![1, 2, 0]);
        assert_eq!(shell.current_mode(), LinkMode::Straight);
    }
}
