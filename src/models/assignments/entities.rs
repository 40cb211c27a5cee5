use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 作业类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentKind {
    Task,
    Exam,
    Quiz,
    Project,
    Participation,
}

impl<'de> Deserialize<'de> for AssignmentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作业类型: '{s}'. 支持: task, exam, quiz, project, participation"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentKind::Task => write!(f, "task"),
            AssignmentKind::Exam => write!(f, "exam"),
            AssignmentKind::Quiz => write!(f, "quiz"),
            AssignmentKind::Project => write!(f, "project"),
            AssignmentKind::Participation => write!(f, "participation"),
        }
    }
}

impl std::str::FromStr for AssignmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(AssignmentKind::Task),
            "exam" => Ok(AssignmentKind::Exam),
            "quiz" => Ok(AssignmentKind::Quiz),
            "project" => Ok(AssignmentKind::Project),
            "participation" => Ok(AssignmentKind::Participation),
            _ => Err(format!("Invalid assignment kind: {s}")),
        }
    }
}

// 作业状态：draft -> published -> closed
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Draft,
    Published,
    Closed,
}

impl AssignmentStatus {
    /// 发布：只允许从草稿发布
    pub fn publish(self) -> Result<Self, &'static str> {
        match self {
            AssignmentStatus::Draft => Ok(AssignmentStatus::Published),
            AssignmentStatus::Published => Err("作业已发布"),
            AssignmentStatus::Closed => Err("已关闭的作业不能发布"),
        }
    }

    /// 关闭：已关闭的作业不能再次关闭
    pub fn close(self) -> Result<Self, &'static str> {
        match self {
            AssignmentStatus::Closed => Err("作业已关闭"),
            _ => Ok(AssignmentStatus::Closed),
        }
    }

    pub fn is_editable(self) -> bool {
        self != AssignmentStatus::Closed
    }

    /// 学生可见并计入成绩
    pub fn is_visible_to_students(self) -> bool {
        self != AssignmentStatus::Draft
    }
}

impl<'de> Deserialize<'de> for AssignmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作业状态: '{s}'. 支持: draft, published, closed"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Draft => write!(f, "draft"),
            AssignmentStatus::Published => write!(f, "published"),
            AssignmentStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(AssignmentStatus::Draft),
            "published" => Ok(AssignmentStatus::Published),
            "closed" => Ok(AssignmentStatus::Closed),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

// 作业实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentKind,
    pub weight: Decimal,
    pub publish_at: chrono::DateTime<chrono::Utc>,
    pub due_at: chrono::DateTime<chrono::Utc>,
    pub status: AssignmentStatus,
    pub allow_late_submission: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn is_past_due(&self, at: chrono::DateTime<chrono::Utc>) -> bool {
        at > self.due_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_transitions() {
        assert_eq!(
            AssignmentStatus::Draft.publish(),
            Ok(AssignmentStatus::Published)
        );
        assert!(AssignmentStatus::Published.publish().is_err());
        assert!(AssignmentStatus::Closed.publish().is_err());
    }

    #[test]
    fn test_close_transitions() {
        assert_eq!(AssignmentStatus::Draft.close(), Ok(AssignmentStatus::Closed));
        assert_eq!(
            AssignmentStatus::Published.close(),
            Ok(AssignmentStatus::Closed)
        );
        assert!(AssignmentStatus::Closed.close().is_err());
        assert!(!AssignmentStatus::Closed.is_editable());
    }

    #[test]
    fn test_drafts_hidden_from_students() {
        assert!(!AssignmentStatus::Draft.is_visible_to_students());
        assert!(AssignmentStatus::Closed.is_visible_to_students());
    }
}
