use crate::base::{Error, Result};

/// Operational state of the device, gating which commands it will accept.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// Not measuring; configuration and query commands are admissible.
    Idle,
    /// Streaming distance samples; only StopScan and the raw sample read
    /// are admissible.
    Scanning,
}

/// Tracks the Idle/Scanning state and enforces command admissibility.
///
/// Owned by the device session; the state is the session's only piece of
/// mutable shared state and is changed solely by the StartScan/StopScan
/// transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStateMachine {
    state: ScanState,
}

impl ScanStateMachine {
    /// Creates a new state machine in the initial `Idle` state.
    pub fn new() -> ScanStateMachine {
        ScanStateMachine {
            state: ScanState::Idle,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Returns `true` while the device is streaming distance samples.
    pub fn is_scanning(&self) -> bool {
        self.state == ScanState::Scanning
    }

    /// Rejects commands that the device only accepts while idle.
    pub fn ensure_idle(&self) -> Result<()> {
        match self.state {
            ScanState::Idle => Ok(()),
            ScanState::Scanning => Err(Error::OperationNotAllowedWhileScanning),
        }
    }

    /// Records the StartScan transition.
    pub fn start(&mut self) {
        self.state = ScanState::Scanning;
    }

    /// Records the StopScan transition.
    pub fn stop(&mut self) {
        self.state = ScanState::Idle;
    }
}

impl Default for ScanStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
