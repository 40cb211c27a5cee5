use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Withdrawn,
}

impl<'de> Deserialize<'de> for EnrollmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!("无效的选课状态: '{s}'. 支持: active, withdrawn"))
        })
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "active"),
            EnrollmentStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "withdrawn" => Ok(EnrollmentStatus::Withdrawn),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub period_id: i64,
    pub schedule: String,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

// 带课程和学生信息的选课记录
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentDetail {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub subject_code: String,
    pub subject_name: String,
    pub student_name: String,
    pub student_username: String,
}
