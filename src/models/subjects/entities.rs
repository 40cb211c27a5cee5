use serde::{Deserialize, Serialize};

// 课程实体（代码在学期内唯一）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: i32,
    pub period_id: i64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 培养方案条目：课程在某专业中的位置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub career_id: i64,
    pub career_code: String,
    pub career_name: String,
    pub faculty_id: i64,
    pub semester: i32,
    pub is_mandatory: bool,
    pub credits_override: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRef {
    pub id: i64,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectTeacher {
    pub teacher_id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

// 课程详情
#[derive(Debug, Clone, Serialize)]
pub struct SubjectDetail {
    #[serde(flatten)]
    pub subject: Subject,
    pub careers: Vec<PlanEntry>,
    pub prerequisites: Vec<SubjectRef>,
    pub teachers: Vec<SubjectTeacher>,
}
