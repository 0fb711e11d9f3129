use std::time::Duration;

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → acquiring → recording → stopping → idle
///            ↓
///          idle   (denied / device error / no encoder)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Acquiring,
    Recording { elapsed_secs: u64 },
    Stopping,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Recording { .. } => "recording",
            Self::Stopping => "stopping",
        }
    }
}

/// Format an elapsed duration as `HH:MM:SS` for timer displays.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
