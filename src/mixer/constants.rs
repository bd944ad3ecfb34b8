use tokio::time::Duration;

// Worker settings

/// Upper bound on one condition wait; spurious wakes re-check thresholds.
pub const MIXER_WAIT: Duration = Duration::from_millis(500);
