use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::subjects::repo::AttendanceStatus;

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpsertAttendanceRequest {
    pub date: Date,
    pub status: AttendanceStatus,
}

/// Body of DELETE .../attendance; subject_id mirrors the path segment.
#[derive(Debug, Deserialize)]
pub struct DeleteAttendanceRequest {
    pub date: Date,
    #[allow(dead_code)]
    pub subject_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub date: Date,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub total_classes: i64,
    pub attended_classes: i64,
    pub missed_classes: i64,
    pub attendance_percentage: f64,
}

impl AttendanceStats {
    /// Percentage is defined as 0.0 for an empty ledger rather than NaN.
    pub fn from_counts(total: i64, attended: i64) -> Self {
        let percentage = if total > 0 {
            attended as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_classes: total,
            attended_classes: attended,
            missed_classes: total - attended,
            attendance_percentage: percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_empty_ledger_is_all_zero() {
        let stats = AttendanceStats::from_counts(0, 0);
        assert_eq!(
            stats,
            AttendanceStats {
                total_classes: 0,
                attended_classes: 0,
                missed_classes: 0,
                attendance_percentage: 0.0,
            }
        );
    }

    #[test]
    fn stats_single_missed_class() {
        let stats = AttendanceStats::from_counts(1, 0);
        assert_eq!(stats.total_classes, 1);
        assert_eq!(stats.attended_classes, 0);
        assert_eq!(stats.missed_classes, 1);
        assert_eq!(stats.attendance_percentage, 0.0);
    }

    #[test]
    fn stats_mixed_attendance() {
        let stats = AttendanceStats::from_counts(4, 3);
        assert_eq!(stats.missed_classes, 1);
        assert_eq!(stats.attendance_percentage, 75.0);
    }

    #[test]
    fn stats_full_attendance() {
        let stats = AttendanceStats::from_counts(10, 10);
        assert_eq!(stats.attendance_percentage, 100.0);
        assert_eq!(stats.missed_classes, 0);
    }

    #[test]
    fn status_response_null_when_absent() {
        let json = serde_json::to_value(StatusResponse { status: None }).unwrap();
        assert!(json["status"].is_null());
        let json = serde_json::to_value(StatusResponse {
            status: Some(AttendanceStatus::Attended),
        })
        .unwrap();
        assert_eq!(json["status"], "attended");
    }

    #[test]
    fn upsert_request_parses_iso_date() {
        let req: UpsertAttendanceRequest =
            serde_json::from_str(r#"{"date":"2024-01-01","status":"attended"}"#).unwrap();
        assert_eq!(req.date, time::macros::date!(2024 - 01 - 01));
        assert_eq!(req.status, AttendanceStatus::Attended);
    }

    #[test]
    fn status_query_and_delete_body_parse_iso_dates() {
        let q: StatusQuery = serde_json::from_str(r#"{"date":"2024-03-15"}"#).unwrap();
        assert_eq!(q.date, time::macros::date!(2024 - 03 - 15));

        let body: DeleteAttendanceRequest = serde_json::from_str(
            r#"{"date":"2024-03-15","subject_id":"8c4bb1f0-56f1-4c6e-9b3f-1f2a3b4c5d6e"}"#,
        )
        .unwrap();
        assert_eq!(body.date, q.date);
    }
}
