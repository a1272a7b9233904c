//! Drastic-change detection and log compaction policy.
//!
//! Readers report at heartbeat rate (every few seconds per asset), so the
//! log table would grow without bound if every observation inserted a row.
//! Instead, an observation that looks like "more of the same" amends the
//! live row for its (asset, location, status, type) tuple, and a fresh row
//! is only started when the stream is new, the window lapsed, or the signal
//! jumped enough to suggest a new physical state.
//!
//! This is a pure decision function over available data: missing metrics
//! are handled by omission, never by failure.

use chrono::{DateTime, Utc};

/// Trailing window within which an existing log row is considered live.
pub const LOG_WINDOW_SECS: i64 = 300;

/// Raw RSSI delta (dBm) above which a change is drastic.
pub const RSSI_THRESHOLD: f64 = 10.0;

/// Kalman-filtered RSSI delta (dBm) above which a change is drastic.
pub const KALMAN_RSSI_THRESHOLD: f64 = 10.0;

/// Estimated distance delta (meters) above which a change is drastic.
pub const DISTANCE_THRESHOLD: f64 = 2.0;

/// Signal metrics of the stored live row for a tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorObservation {
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub reader_name: String,
    pub updated_at: DateTime<Utc>,
}

/// Signal metrics of the incoming observation.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingObservation {
    pub rssi: Option<f64>,
    pub kalman_rssi: Option<f64>,
    pub estimated_distance: Option<f64>,
    pub reader_name: String,
}

/// Which comparison flagged the observation as drastic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeReason {
    Rssi,
    KalmanRssi,
    EstimatedDistance,
    ReaderHandoff,
}

impl ChangeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rssi => "rssi",
            Self::KalmanRssi => "kalman_rssi",
            Self::EstimatedDistance => "estimated_distance",
            Self::ReaderHandoff => "reader_handoff",
        }
    }
}

/// Outcome of the compaction decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDecision {
    /// No live row for this tuple: start a new observation stream.
    NewStream,
    /// A live row exists but the situation changed: close it out by
    /// starting a fresh row, preserving history.
    DrasticChange(ChangeReason),
    /// More of the same: update the live row's metrics in place.
    Amend,
}

impl LogDecision {
    /// Whether this decision results in a new log row.
    pub fn creates_row(&self) -> bool {
        !matches!(self, Self::Amend)
    }
}

/// Decides what to do with an incoming observation given the most recent
/// stored row for the same (asset, location, status, type) tuple.
///
/// `prior` is the latest row for the tuple, if any; rows whose `updated_at`
/// has fallen out of the trailing window are treated as absent even when the
/// caller passes them.
pub fn decide(
    prior: Option<&PriorObservation>,
    incoming: &IncomingObservation,
    now: DateTime<Utc>,
) -> LogDecision {
    let prior = match prior {
        Some(p) if within_window(p.updated_at, now) => p,
        _ => return LogDecision::NewStream,
    };

    // Metric comparisons short-circuit on the first trigger. A comparison
    // only applies when both sides carry the metric.
    if delta_exceeds(prior.rssi, incoming.rssi, RSSI_THRESHOLD) {
        return LogDecision::DrasticChange(ChangeReason::Rssi);
    }
    if delta_exceeds(prior.kalman_rssi, incoming.kalman_rssi, KALMAN_RSSI_THRESHOLD) {
        return LogDecision::DrasticChange(ChangeReason::KalmanRssi);
    }
    if delta_exceeds(
        prior.estimated_distance,
        incoming.estimated_distance,
        DISTANCE_THRESHOLD,
    ) {
        return LogDecision::DrasticChange(ChangeReason::EstimatedDistance);
    }
    // A handoff between readers always counts, whatever the metrics say.
    if prior.reader_name != incoming.reader_name {
        return LogDecision::DrasticChange(ChangeReason::ReaderHandoff);
    }

    LogDecision::Amend
}

/// Whether a row updated at `updated_at` is still live at `now`.
pub fn within_window(updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (now - updated_at).num_seconds() <= LOG_WINDOW_SECS
}

fn delta_exceeds(old: Option<f64>, new: Option<f64>, threshold: f64) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => (new - old).abs() > threshold,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn prior(rssi: Option<f64>, kalman: Option<f64>, distance: Option<f64>) -> PriorObservation {
        PriorObservation {
            rssi,
            kalman_rssi: kalman,
            estimated_distance: distance,
            reader_name: "READER-01".to_string(),
            updated_at: Utc::now(),
        }
    }

    fn incoming(rssi: Option<f64>, kalman: Option<f64>, distance: Option<f64>) -> IncomingObservation {
        IncomingObservation {
            rssi,
            kalman_rssi: kalman,
            estimated_distance: distance,
            reader_name: "READER-01".to_string(),
        }
    }

    #[test]
    fn test_no_prior_starts_new_stream() {
        let obs = incoming(Some(-60.0), Some(-60.0), Some(1.5));
        assert_eq!(decide(None, &obs, Utc::now()), LogDecision::NewStream);
    }

    #[test]
    fn test_identical_observation_amends() {
        let now = Utc::now();
        let p = prior(Some(-60.0), Some(-60.0), Some(1.5));
        let obs = incoming(Some(-60.0), Some(-60.0), Some(1.5));
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);
        // Repeating the identical observation keeps amending.
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);
    }

    #[test]
    fn test_window_expiry_starts_new_stream() {
        let now = Utc::now();
        let mut p = prior(Some(-60.0), Some(-60.0), Some(1.5));
        p.updated_at = now - Duration::seconds(LOG_WINDOW_SECS + 1);
        let obs = incoming(Some(-60.0), Some(-60.0), Some(1.5));
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::NewStream);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let now = Utc::now();
        let mut p = prior(Some(-60.0), None, None);
        p.updated_at = now - Duration::seconds(LOG_WINDOW_SECS);
        let obs = incoming(Some(-60.0), None, None);
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);
    }

    #[test]
    fn test_rssi_threshold_is_strict() {
        let now = Utc::now();
        let p = prior(Some(-60.0), None, None);

        // Delta 9: amend.
        let obs = incoming(Some(-69.0), None, None);
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);

        // Delta exactly 10: not drastic.
        let obs = incoming(Some(-70.0), None, None);
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);

        // Delta 11: drastic.
        let obs = incoming(Some(-71.0), None, None);
        assert_eq!(
            decide(Some(&p), &obs, now),
            LogDecision::DrasticChange(ChangeReason::Rssi)
        );
    }

    #[test]
    fn test_rssi_delta_is_symmetric() {
        let now = Utc::now();
        let p = prior(Some(-71.0), None, None);
        let obs = incoming(Some(-60.0), None, None);
        assert_eq!(
            decide(Some(&p), &obs, now),
            LogDecision::DrasticChange(ChangeReason::Rssi)
        );
    }

    #[test]
    fn test_kalman_rssi_checked_after_rssi() {
        let now = Utc::now();
        let p = prior(Some(-60.0), Some(-60.0), None);
        let obs = incoming(Some(-62.0), Some(-75.0), None);
        assert_eq!(
            decide(Some(&p), &obs, now),
            LogDecision::DrasticChange(ChangeReason::KalmanRssi)
        );
    }

    #[test]
    fn test_distance_threshold() {
        let now = Utc::now();
        let p = prior(None, None, Some(1.0));

        let obs = incoming(None, None, Some(3.0));
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);

        let obs = incoming(None, None, Some(3.1));
        assert_eq!(
            decide(Some(&p), &obs, now),
            LogDecision::DrasticChange(ChangeReason::EstimatedDistance)
        );
    }

    #[test]
    fn test_rssi_triggers_before_distance() {
        let now = Utc::now();
        let p = prior(Some(-60.0), None, Some(1.0));
        let obs = incoming(Some(-75.0), None, Some(5.0));
        // Both deltas exceed their thresholds; RSSI is evaluated first.
        assert_eq!(
            decide(Some(&p), &obs, now),
            LogDecision::DrasticChange(ChangeReason::Rssi)
        );
    }

    #[test]
    fn test_reader_handoff_always_drastic() {
        let now = Utc::now();
        let p = prior(Some(-60.0), Some(-60.0), Some(1.5));
        let mut obs = incoming(Some(-60.0), Some(-60.0), Some(1.5));
        obs.reader_name = "READER-02".to_string();
        assert_eq!(
            decide(Some(&p), &obs, now),
            LogDecision::DrasticChange(ChangeReason::ReaderHandoff)
        );
    }

    #[test]
    fn test_missing_metric_never_triggers() {
        let now = Utc::now();

        // Stored row has rssi, incoming does not: the RSSI branch is skipped
        // however large the stored value is.
        let p = prior(Some(-20.0), None, None);
        let obs = incoming(None, None, None);
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);

        // And the other way around.
        let p = prior(None, None, None);
        let obs = incoming(Some(-90.0), None, None);
        assert_eq!(decide(Some(&p), &obs, now), LogDecision::Amend);
    }

    #[test]
    fn test_missing_metric_does_not_block_later_metrics() {
        let now = Utc::now();
        // No RSSI on either side, but the distance jumped: the distance
        // branch must still run.
        let p = prior(None, Some(-60.0), Some(1.0));
        let obs = incoming(None, Some(-61.0), Some(4.0));
        assert_eq!(
            decide(Some(&p), &obs, now),
            LogDecision::DrasticChange(ChangeReason::EstimatedDistance)
        );
    }

    #[test]
    fn test_decision_creates_row() {
        assert!(LogDecision::NewStream.creates_row());
        assert!(LogDecision::DrasticChange(ChangeReason::Rssi).creates_row());
        assert!(!LogDecision::Amend.creates_row());
    }
}
