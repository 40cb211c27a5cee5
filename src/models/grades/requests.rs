use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GradeSummaryParams {
    pub subject_id: i64,
    /// 学生查询自己的成绩时可省略
    pub student_id: Option<i64>,
}
