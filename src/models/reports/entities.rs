//! 月度学业报告
//!
//! 统计窗口按作业截止时间划分：[当月 1 日, 次月 1 日)。

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// 统计窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// 月份无效时返回 None
pub fn month_window(year: i32, month: u32) -> Option<MonthWindow> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(MonthWindow {
        start: Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0)?),
        end: Utc.from_utc_datetime(&end.and_hms_opt(0, 0, 0)?),
    })
}

/// 给定日期的上一个月
pub fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

/// 一条提交记录（作业截止时间落在窗口内）
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub subject_id: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub period_name: String,
    pub student_id: i64,
    pub grade: Option<f64>,
}

/// 任课关系
#[derive(Debug, Clone)]
pub struct TeacherLink {
    pub teacher_id: i64,
    pub teacher_name: String,
    pub subject_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubjectStats {
    pub subject_id: i64,
    pub subject_code: String,
    pub subject_name: String,
    pub period_name: String,
    pub total_students: usize,
    pub average_grade: f64,
    pub graded: usize,
    pub approved: usize,
    pub approval_rate: f64,
    pub pending: usize,
}

impl SubjectStats {
    pub fn failure_rate(&self) -> f64 {
        if self.graded == 0 {
            0.0
        } else {
            (self.graded - self.approved) as f64 / self.graded as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureStats {
    pub subject_code: String,
    pub subject_name: String,
    pub failure_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeacherStats {
    pub teacher_id: i64,
    pub teacher_name: String,
    pub average_grade: f64,
}

/// 报告内容（以 JSON 存入 monthly_reports.data）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyReportData {
    pub year: i32,
    pub month: u32,
    pub generated_at: DateTime<Utc>,
    pub subjects: Vec<SubjectStats>,
    pub highest_failure: Vec<FailureStats>,
    pub top_teachers: Vec<TeacherStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub data: MonthlyReportData,
    pub generated_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReportSummary {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub generated_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<&MonthlyReport> for MonthlyReportSummary {
    fn from(report: &MonthlyReport) -> Self {
        Self {
            id: report.id,
            year: report.year,
            month: report.month,
            generated_at: report.generated_at,
            sent_at: report.sent_at,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn desc(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}

impl MonthlyReportData {
    pub fn compute(
        year: i32,
        month: u32,
        rows: &[ReportRow],
        teachers: &[TeacherLink],
        approval_threshold: f64,
        top_n: usize,
    ) -> Self {
        struct Acc<'a> {
            row: &'a ReportRow,
            students: HashSet<i64>,
            grades: Vec<f64>,
            pending: usize,
        }

        // 按课程代码排序
        let mut by_subject: BTreeMap<(&str, i64), Acc> = BTreeMap::new();
        for row in rows {
            let acc = by_subject
                .entry((row.subject_code.as_str(), row.subject_id))
                .or_insert_with(|| Acc {
                    row,
                    students: HashSet::new(),
                    grades: Vec::new(),
                    pending: 0,
                });
            acc.students.insert(row.student_id);
            match row.grade {
                Some(grade) => acc.grades.push(grade),
                None => acc.pending += 1,
            }
        }

        let subjects: Vec<SubjectStats> = by_subject
            .into_values()
            .map(|acc| {
                let approved = acc
                    .grades
                    .iter()
                    .filter(|g| **g >= approval_threshold)
                    .count();
                let graded = acc.grades.len();
                SubjectStats {
                    subject_id: acc.row.subject_id,
                    subject_code: acc.row.subject_code.clone(),
                    subject_name: acc.row.subject_name.clone(),
                    period_name: acc.row.period_name.clone(),
                    total_students: acc.students.len(),
                    average_grade: mean(&acc.grades),
                    graded,
                    approved,
                    approval_rate: if graded == 0 {
                        0.0
                    } else {
                        approved as f64 / graded as f64 * 100.0
                    },
                    pending: acc.pending,
                }
            })
            .collect();

        let mut highest_failure: Vec<FailureStats> = subjects
            .iter()
            .map(|s| FailureStats {
                subject_code: s.subject_code.clone(),
                subject_name: s.subject_name.clone(),
                failure_rate: s.failure_rate(),
            })
            .collect();
        highest_failure.sort_by(|a, b| desc(a.failure_rate, b.failure_rate));
        highest_failure.truncate(top_n);

        // 教师平均分：其任教课程的所有已评分提交
        let mut grades_by_subject: HashMap<i64, Vec<f64>> = HashMap::new();
        for row in rows {
            if let Some(grade) = row.grade {
                grades_by_subject.entry(row.subject_id).or_default().push(grade);
            }
        }
        let mut by_teacher: BTreeMap<i64, (String, Vec<f64>)> = BTreeMap::new();
        for link in teachers {
            if let Some(grades) = grades_by_subject.get(&link.subject_id) {
                by_teacher
                    .entry(link.teacher_id)
                    .or_insert_with(|| (link.teacher_name.clone(), Vec::new()))
                    .1
                    .extend(grades.iter().copied());
            }
        }
        let mut top_teachers: Vec<TeacherStats> = by_teacher
            .into_iter()
            .map(|(teacher_id, (teacher_name, grades))| TeacherStats {
                teacher_id,
                teacher_name,
                average_grade: mean(&grades),
            })
            .collect();
        top_teachers.sort_by(|a, b| desc(a.average_grade, b.average_grade));
        top_teachers.truncate(top_n);

        Self {
            year,
            month,
            generated_at: Utc::now(),
            subjects,
            highest_failure,
            top_teachers,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn row(subject_id: i64, code: &str, student_id: i64, grade: Option<f64>) -> ReportRow {
        ReportRow {
            subject_id,
            subject_code: code.to_string(),
            subject_name: format!("Subject {code}"),
            period_name: "2025-1".to_string(),
            student_id,
            grade,
        }
    }

    pub fn sample() -> MonthlyReportData {
        let rows = vec![
            row(1, "ALG101", 10, Some(80.0)),
            row(1, "ALG101", 11, Some(40.0)),
            row(1, "ALG101", 10, None),
            row(2, "PHY100", 10, Some(30.0)),
            row(2, "PHY100", 12, Some(45.0)),
        ];
        let teachers = vec![
            TeacherLink {
                teacher_id: 100,
                teacher_name: "Ada".to_string(),
                subject_id: 1,
            },
            TeacherLink {
                teacher_id: 101,
                teacher_name: "Bob".to_string(),
                subject_id: 2,
            },
        ];
        MonthlyReportData::compute(2025, 3, &rows, &teachers, 51.0, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample;
    use super::*;

    #[test]
    fn test_month_window_wraps_year() {
        let w = month_window(2024, 12).unwrap();
        assert_eq!(w.start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(w.end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert!(month_window(2024, 13).is_none());
        assert!(month_window(2024, 0).is_none());
    }

    #[test]
    fn test_previous_month() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(previous_month(d), (2024, 12));
        let d = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(previous_month(d), (2025, 6));
    }

    #[test]
    fn test_subject_stats() {
        let data = sample();
        assert_eq!(data.subjects.len(), 2);
        let alg = &data.subjects[0];
        assert_eq!(alg.subject_code, "ALG101");
        assert_eq!(alg.total_students, 2);
        assert_eq!(alg.average_grade, 60.0);
        assert_eq!(alg.approval_rate, 50.0);
        assert_eq!(alg.pending, 1);
    }

    #[test]
    fn test_highest_failure_and_top_teachers() {
        let data = sample();
        assert_eq!(data.highest_failure[0].subject_code, "PHY100");
        assert_eq!(data.highest_failure[0].failure_rate, 100.0);
        assert_eq!(data.top_teachers[0].teacher_name, "Ada");
        assert_eq!(data.top_teachers[1].average_grade, 37.5);
    }

    #[test]
    fn test_top_n_truncates() {
        let rows: Vec<_> = (0..8)
            .map(|i| super::fixtures::row(i, &format!("S{i}"), 1, Some(10.0 * i as f64)))
            .collect();
        let data = MonthlyReportData::compute(2025, 3, &rows, &[], 51.0, 5);
        assert_eq!(data.subjects.len(), 8);
        assert_eq!(data.highest_failure.len(), 5);
        assert!(data.top_teachers.is_empty());
    }

    #[test]
    fn test_empty_month() {
        let data = MonthlyReportData::compute(2025, 3, &[], &[], 51.0, 5);
        assert!(data.subjects.is_empty());
        assert!(data.highest_failure.is_empty());
    }
}
