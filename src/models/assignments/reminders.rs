//! 截止提醒计划

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// 截止前 3 天提醒学生
    D3Student,
    /// 截止前 1 天提醒学生
    D1Student,
    /// 截止前 1 天提醒教师
    D1Teacher,
}

impl ReminderKind {
    pub fn all() -> [ReminderKind; 3] {
        [
            ReminderKind::D3Student,
            ReminderKind::D1Student,
            ReminderKind::D1Teacher,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::D3Student => "d3_student",
            ReminderKind::D1Student => "d1_student",
            ReminderKind::D1Teacher => "d1_teacher",
        }
    }

    pub fn lead_time(&self) -> Duration {
        match self {
            ReminderKind::D3Student => Duration::days(3),
            ReminderKind::D1Student | ReminderKind::D1Teacher => Duration::days(1),
        }
    }

    pub fn targets_teachers(&self) -> bool {
        matches!(self, ReminderKind::D1Teacher)
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d3_student" => Ok(ReminderKind::D3Student),
            "d1_student" => Ok(ReminderKind::D1Student),
            "d1_teacher" => Ok(ReminderKind::D1Teacher),
            _ => Err(format!("Invalid reminder kind: {s}")),
        }
    }
}

/// 已落库的提醒
#[derive(Debug, Clone, Serialize)]
pub struct DueReminder {
    pub id: i64,
    pub assignment_id: i64,
    pub kind: ReminderKind,
    pub scheduled_for: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// 根据截止时间计算提醒时间，已经过去的提醒跳过
pub fn plan_reminders(
    due_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<(ReminderKind, DateTime<Utc>)> {
    ReminderKind::all()
        .into_iter()
        .map(|kind| (kind, due_at - kind.lead_time()))
        .filter(|(_, at)| *at > now)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plan_all_reminders() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2025, 3, 10, 23, 59, 0).unwrap();
        let plan = plan_reminders(due, now);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0], (ReminderKind::D3Student, due - Duration::days(3)));
        assert_eq!(plan[2].1, due - Duration::days(1));
    }

    #[test]
    fn test_past_reminders_skipped() {
        let now = Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap();
        let due = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let kinds: Vec<_> = plan_reminders(due, now).into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ReminderKind::D1Student, ReminderKind::D1Teacher]);

        let overdue = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert!(plan_reminders(overdue, now).is_empty());
    }

    #[test]
    fn test_kind_strings() {
        for kind in ReminderKind::all() {
            assert_eq!(kind.as_str().parse::<ReminderKind>(), Ok(kind));
        }
        assert!(ReminderKind::D1Teacher.targets_teachers());
    }
}
