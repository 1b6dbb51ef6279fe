//! Terminal restoration on panic.
//!
//! The panic hook is process-wide and runs before unwinding, so it also sees
//! panics that the polling task catches per cycle. Only a panic on the thread
//! that owns the terminal is allowed to tear the screen down.

use std::panic;
use std::thread::{self, ThreadId};

use tracing::error;

/// The thread that drives the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalOwner {
    thread: ThreadId,
}

impl TerminalOwner {
    /// Claim the terminal for the calling thread.
    pub fn current() -> Self {
        Self {
            thread: thread::current().id(),
        }
    }

    pub fn owns(&self, thread: ThreadId) -> bool {
        self.thread == thread
    }

    pub fn is_current(&self) -> bool {
        self.owns(thread::current().id())
    }
}

/// Install a panic hook that runs `restore` and then the previous hook, for
/// panics on the calling thread only.
///
/// Panics elsewhere go to the tracing log instead of stderr, which the TUI
/// is drawing on.
pub fn install_panic_hook<F>(restore: F) -> TerminalOwner
where
    F: Fn() + Send + Sync + 'static,
{
    let owner = TerminalOwner::current();
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if owner.is_current() {
            restore();
            original_hook(info);
        } else {
            error!(panic = %info, "panic off the terminal thread");
        }
    }));
    owner
}
