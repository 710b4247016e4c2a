//! Interrupt and alarm handling.
//!
//! Handlers do as little as the reentrancy rules allow: the interrupt
//! handler sets a flag that the read loop observes at a safe point, and
//! the alarm handler terminates the process outright. All message
//! formatting happens on the main thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use nix::unistd::alarm;
use signal_hook::consts::{SIGALRM, SIGINT};

/// Handle to the installed signal dispositions.
pub struct SignalGate {
    interrupted: Arc<AtomicBool>,
}

impl SignalGate {
    /// Install both handlers: an interrupt never terminates the
    /// interpreter, an alarm always does, immediately and with status 0.
    ///
    /// Children revert to default dispositions once they exec, so an
    /// interrupt still reaches a running pipeline the usual way.
    pub fn install() -> Result<SignalGate> {
        let interrupted = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGINT, Arc::clone(&interrupted))?;
        signal_hook::flag::register_conditional_shutdown(SIGALRM, 0, Arc::new(AtomicBool::new(true)))?;
        Ok(SignalGate { interrupted })
    }

    /// True when an interrupt arrived since the last call; clears the
    /// flag.
    pub fn take_interrupt(&self) -> bool {
        self.interrupted.swap(false, Ordering::SeqCst)
    }
}

/// Arm the alarm timer that the gate turns into a shell shutdown; zero
/// cancels a pending alarm instead.
pub fn arm_alarm(seconds: u32) {
    if seconds == 0 {
        let _ = alarm::cancel();
    } else {
        let _ = alarm::set(seconds);
    }
}
