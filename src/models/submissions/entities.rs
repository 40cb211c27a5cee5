use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

// 提交状态（派生，不落库）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Late,
    Graded,
}

/// 提交时间严格晚于截止时间即为迟交
pub fn is_late(submitted_at: DateTime<Utc>, due_at: DateTime<Utc>) -> bool {
    submitted_at > due_at
}

pub fn derive_status(grade: Option<Decimal>, late: bool) -> SubmissionStatus {
    match (grade, late) {
        (Some(_), _) => SubmissionStatus::Graded,
        (None, true) => SubmissionStatus::Late,
        (None, false) => SubmissionStatus::Pending,
    }
}

// 提交记录
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<Decimal>,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub graded_at: Option<DateTime<Utc>>,
    pub late: bool,
    pub status: SubmissionStatus,
}

// 列表视图：附带作业、课程和学生信息
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub assignment_title: String,
    pub subject_id: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub student_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupedStudent {
    pub student_id: i64,
    pub student_name: String,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupedSubject {
    pub subject_id: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub students: Vec<GroupedStudent>,
}

/// 按 课程 -> 学生 -> 提交 分组，课程按代码、学生按姓名排序
pub fn group_submissions(rows: Vec<SubmissionView>) -> Vec<GroupedSubject> {
    let mut subjects: BTreeMap<(String, i64), GroupedSubject> = BTreeMap::new();
    let mut students: BTreeMap<(i64, String, i64), GroupedStudent> = BTreeMap::new();

    for row in rows {
        let subject_key = (row.subject_code.clone(), row.subject_id);
        subjects.entry(subject_key).or_insert_with(|| GroupedSubject {
            subject_id: row.subject_id,
            subject_code: row.subject_code.clone(),
            subject_name: row.subject_name.clone(),
            students: Vec::new(),
        });
        students
            .entry((row.subject_id, row.student_name.clone(), row.submission.student_id))
            .or_insert_with(|| GroupedStudent {
                student_id: row.submission.student_id,
                student_name: row.student_name.clone(),
                submissions: Vec::new(),
            })
            .submissions
            .push(row.submission);
    }

    for ((subject_id, _, _), student) in students {
        if let Some(subject) = subjects.values_mut().find(|s| s.subject_id == subject_id) {
            subject.students.push(student);
        }
    }
    subjects.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::dec;

    #[test]
    fn test_late_is_strictly_after_due() {
        let due = Utc::now();
        assert!(!is_late(due, due));
        assert!(!is_late(due - Duration::seconds(1), due));
        assert!(is_late(due + Duration::seconds(1), due));
    }

    #[test]
    fn test_status_derivation() {
        assert_eq!(derive_status(Some(dec!(90)), true), SubmissionStatus::Graded);
        assert_eq!(derive_status(None, true), SubmissionStatus::Late);
        assert_eq!(derive_status(None, false), SubmissionStatus::Pending);
    }

    fn view(id: i64, subject_id: i64, code: &str, student_id: i64, name: &str) -> SubmissionView {
        SubmissionView {
            submission: Submission {
                id,
                assignment_id: id,
                student_id,
                content: None,
                attachment_url: None,
                submitted_at: Utc::now(),
                grade: None,
                feedback: None,
                graded_by: None,
                graded_at: None,
                late: false,
                status: SubmissionStatus::Pending,
            },
            assignment_title: format!("Tarea {id}"),
            subject_id,
            subject_code: code.to_string(),
            subject_name: code.to_string(),
            student_name: name.to_string(),
        }
    }

    #[test]
    fn test_group_submissions() {
        let grouped = group_submissions(vec![
            view(1, 2, "PHY100", 10, "Zoe"),
            view(2, 1, "ALG101", 11, "Ana"),
            view(3, 1, "ALG101", 10, "Zoe"),
            view(4, 1, "ALG101", 11, "Ana"),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].subject_code, "ALG101");
        assert_eq!(grouped[0].students.len(), 2);
        assert_eq!(grouped[0].students[0].student_name, "Ana");
        assert_eq!(grouped[0].students[0].submissions.len(), 2);
        assert_eq!(grouped[1].students.len(), 1);
    }
}
