use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// 学期实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicPeriod {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AcademicPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// 复制学期课程的结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct PeriodCloneResult {
    pub source_period_id: i64,
    pub target_period_id: i64,
    /// 新建的课程数
    pub created: usize,
    /// 目标学期已存在同代码课程的数量
    pub reused: usize,
    /// 复制的培养方案关联数
    pub plan_links: usize,
}
