use uuid::Uuid;

use crate::error::DoctrackError;
use crate::models::DecodedTrackingCode;
use crate::tracking::{self, ScanRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    Paused,
}

#[derive(Debug)]
pub enum ScanOutcome {
    /// A valid code was accepted and the session paused.
    Committed(DecodedTrackingCode),
    /// The frame did not carry an acceptable code; keep scanning.
    Rejected(DoctrackError),
    /// The session is paused and the frame was dropped undecoded.
    Ignored,
}

/// One camera scanning session. Frames are decoded until the first valid
/// code commits, after which the session stays paused until `reset`.
#[derive(Debug)]
pub struct ScanSession {
    id: Uuid,
    rules: ScanRules,
    state: ScanState,
    committed: Option<DecodedTrackingCode>,
}

impl ScanSession {
    pub fn new(rules: ScanRules) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(session = %id, "scan session started");
        Self {
            id,
            rules,
            state: ScanState::Scanning,
            committed: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn committed(&self) -> Option<&DecodedTrackingCode> {
        self.committed.as_ref()
    }

    pub fn on_scan(&mut self, scanned: Option<&str>) -> ScanOutcome {
        if self.state == ScanState::Paused {
            return ScanOutcome::Ignored;
        }

        let Some(scanned) = scanned else {
            tracing::debug!(session = %self.id, "frame without payload");
            return ScanOutcome::Rejected(DoctrackError::InvalidInput(
                "scanned code is missing".to_string(),
            ));
        };

        match tracking::decode_and_validate(&self.rules, scanned) {
            Ok(code) => {
                tracing::info!(
                    session = %self.id,
                    year = code.year,
                    tracking_number = %code.tracking_number,
                    "tracking code committed"
                );
                self.state = ScanState::Paused;
                self.committed = Some(code.clone());
                ScanOutcome::Committed(code)
            }
            Err(err) => {
                tracing::debug!(session = %self.id, error = %err, "scan rejected");
                ScanOutcome::Rejected(err)
            }
        }
    }

    pub fn reset(&mut self) {
        tracing::debug!(session = %self.id, "scan session reset");
        self.state = ScanState::Scanning;
        self.committed = None;
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(ScanRules::default())
    }
}
