//! Link-mode toggle add-on for graph-editing canvas hosts.
//!
//! Cycles the host's link rendering through `SPLINE → LINEAR → STRAIGHT`,
//! persists the selection across sessions, and exposes the cycle action
//! through global hotkeys (F8 / Ctrl+K) and a toggle control docked into
//! the host's toolbar.
//!
//! The host's exact control surface varies by version and is probed fresh
//! on every call; see [`canvas`] for the capability traits and
//! [`controller`] for the ordered fallback chain. The embedding host
//! implements [`host::HostApp`], forwards its UI events as
//! [`shell::ShellEvent`]s, and drives [`shell::Shell::run`] on a thread it
//! owns. Subscriber installation for `tracing` is the host's job.

#![forbid(unsafe_code)]

pub mod canvas;
pub mod constants;
pub mod controller;
pub mod discovery;
pub mod host;
pub mod hotkeys;
pub mod mode;
pub mod persistence;
pub mod shell;
pub mod toggle;

pub use controller::{ApplyReport, apply_mode};
pub use mode::LinkMode;
pub use persistence::ModeStore;
pub use shell::{Shell, ShellEvent};
