//! Attendance rows and their sheet layout.

use serde::Serialize;
use utoipa::ToSchema;

/// Header row of the attendance sheet: recorded-at, user id, send date.
pub const ATTENDANCE_HEADER: [&str; 3] = ["記録日時", "ユーザID", "送信日時"];

/// One attendance row.
///
/// At most one record exists per `(user_id, arrival_date)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AttendanceRecord {
    /// When the row was written (`YYYY/MM/DD HH:MM:SS`).
    pub recorded_at: String,
    /// Slack user id of the person who reacted.
    pub user_id: String,
    /// Derived arrival date (`YYYY/MM/DD`).
    pub arrival_date: String,
}

impl AttendanceRecord {
    /// Returns the sheet cells in header order.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.recorded_at.clone(),
            self.user_id.clone(),
            self.arrival_date.clone(),
        ]
    }
}

/// Returns `true` if any data row already holds `user_id` on
/// `arrival_date`. Cells are compared as stored, without reformatting.
#[must_use]
pub fn is_duplicate(rows: &[Vec<String>], user_id: &str, arrival_date: &str) -> bool {
    rows.iter().any(|row| {
        row.get(1).is_some_and(|cell| cell == user_id)
            && row.get(2).is_some_and(|cell| cell == arrival_date)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn duplicate_requires_same_user_and_date() {
        let rows = vec![
            row(&["2023/11/14 22:13:20", "U1", "2023/11/19"]),
            row(&["2023/11/14 22:15:00", "U2", "2023/11/20"]),
        ];
        assert!(is_duplicate(&rows, "U1", "2023/11/19"));
        assert!(!is_duplicate(&rows, "U1", "2023/11/20"));
        assert!(!is_duplicate(&rows, "U3", "2023/11/19"));
    }

    #[test]
    fn short_rows_never_match() {
        let rows = vec![row(&["2023/11/14"]), row(&[])];
        assert!(!is_duplicate(&rows, "U1", "2023/11/19"));
    }

    #[test]
    fn row_follows_header_order() {
        let record = AttendanceRecord {
            recorded_at: "2023/11/14 22:13:20".into(),
            user_id: "U1".into(),
            arrival_date: "2023/11/19".into(),
        };
        assert_eq!(record.to_row().len(), ATTENDANCE_HEADER.len());
        assert_eq!(record.to_row(), row(&["2023/11/14 22:13:20", "U1", "2023/11/19"]));
    }
}
