use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalizeReason {
    Manual,
    TimedOut,
}

/// Final score of one quiz attempt, in the shape of the `lastQuizResult` record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub score: u32,
    pub total: u32,
    pub percent: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub time_left: Option<u32>,
    pub timed_out: bool,
}

impl ResultSummary {
    pub fn new(
        score: u32,
        total: u32,
        time_left: Option<u32>,
        timed_out: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            score,
            total,
            percent: percent(score, total),
            // Stored as epoch milliseconds; keep the in-memory value identical.
            timestamp: timestamp.trunc_subsecs(3),
            time_left,
            timed_out,
        }
    }

    pub fn verdict(&self) -> &'static str {
        if self.percent >= 80 {
            "Excellent!"
        } else if self.percent >= 60 {
            "Success"
        } else {
            "Keep Trying"
        }
    }
}

/// `round(100 * score / total)`, halves rounding up; an empty quiz scores 0.
pub fn percent(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (score, total) = (score as u64, total as u64);
    ((200 * score + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(12, 15), 80);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(percent(15, 15), 100);
        assert_eq!(percent(0, 15), 0);
    }

    #[test]
    fn test_percent_of_empty_quiz_is_zero() {
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_verdict_thresholds() {
        let at = |score, total| ResultSummary::new(score, total, None, false, Utc::now());
        assert_eq!(at(8, 10).verdict(), "Excellent!");
        assert_eq!(at(6, 10).verdict(), "Success");
        assert_eq!(at(5, 10).verdict(), "Keep Trying");
    }

    #[test]
    fn test_record_field_names() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let summary = ResultSummary::new(5, 15, Some(0), true, ts);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "score": 5,
                "total": 15,
                "percent": 33,
                "timestamp": 1_700_000_000_123i64,
                "timeLeft": 0,
                "timedOut": true
            })
        );
    }

    #[test]
    fn test_null_time_left_is_written() {
        let summary = ResultSummary::new(1, 2, None, false, Utc::now());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"timeLeft\":null"));
    }

    #[test]
    fn test_timestamp_survives_storage_round_trip() {
        let ts = Utc.timestamp_nanos(1_700_000_000_123_456_789);
        let summary = ResultSummary::new(3, 4, Some(12), false, ts);
        assert_eq!(summary.timestamp.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(summary.timestamp.timestamp_subsec_nanos(), 123_000_000);

        let json = serde_json::to_string(&summary).unwrap();
        let back: ResultSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
