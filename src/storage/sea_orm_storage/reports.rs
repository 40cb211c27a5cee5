//! 月度报告存储操作

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::academic_periods::{Column as PeriodColumn, Entity as Periods};
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::monthly_reports::{ActiveModel, Column, Entity as MonthlyReports};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::teacher_subjects::{Column as TeachingColumn, Entity as TeacherSubjects};
use crate::entity::users::Entity as Users;
use crate::errors::{AcademiaError, Result};
use crate::models::reports::entities::{
    MonthWindow, MonthlyReport, MonthlyReportData, MonthlyReportSummary, ReportRow, TeacherLink,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::Expr,
};

fn decode(model: crate::entity::monthly_reports::Model) -> Result<MonthlyReport> {
    model
        .into_report()
        .map_err(|e| AcademiaError::serialization(format!("解析月度报告失败: {e}")))
}

impl SeaOrmStorage {
    /// 截止时间落在窗口内的作业的全部提交
    pub async fn fetch_report_rows_impl(
        &self,
        window: MonthWindow,
    ) -> Result<(Vec<ReportRow>, Vec<TeacherLink>)> {
        let assignments = Assignments::find()
            .filter(AssignmentColumn::DueAt.gte(window.start.timestamp()))
            .filter(AssignmentColumn::DueAt.lt(window.end.timestamp()))
            .all(&self.db)
            .await
            .map_err(read_err("查询当月作业失败"))?;

        if assignments.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let assignment_subject: HashMap<i64, i64> =
            assignments.iter().map(|a| (a.id, a.subject_id)).collect();
        let subjects = Self::subjects_by_ids(
            &self.db,
            assignment_subject.values().copied().collect(),
        )
        .await?;

        let period_names: HashMap<i64, String> = Periods::find()
            .filter(PeriodColumn::Id.is_in(subjects.values().map(|s| s.period_id)))
            .all(&self.db)
            .await
            .map_err(read_err("查询学期失败"))?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let submissions = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.is_in(assignment_subject.keys().copied()))
            .all(&self.db)
            .await
            .map_err(read_err("查询当月提交失败"))?;

        let rows = submissions
            .into_iter()
            .filter_map(|s| {
                let subject = subjects.get(assignment_subject.get(&s.assignment_id)?)?;
                Some(ReportRow {
                    subject_id: subject.id,
                    subject_code: subject.code.clone(),
                    subject_name: subject.name.clone(),
                    period_name: period_names
                        .get(&subject.period_id)
                        .cloned()
                        .unwrap_or_default(),
                    student_id: s.student_id,
                    grade: s.grade.and_then(|g| g.to_f64()),
                })
            })
            .collect();

        let teachers = TeacherSubjects::find()
            .filter(TeachingColumn::SubjectId.is_in(subjects.keys().copied()))
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(read_err("查询任课教师失败"))?
            .into_iter()
            .filter_map(|(link, user)| {
                let user = user?;
                Some(TeacherLink {
                    teacher_id: user.id,
                    teacher_name: user.full_name(),
                    subject_id: link.subject_id,
                })
            })
            .collect();

        Ok((rows, teachers))
    }

    pub async fn get_monthly_report_impl(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthlyReport>> {
        let result = MonthlyReports::find()
            .filter(Column::Year.eq(year))
            .filter(Column::Month.eq(month as i32))
            .one(&self.db)
            .await
            .map_err(read_err("查询月度报告失败"))?;

        result.map(decode).transpose()
    }

    /// 按 (year, month) 写入或覆盖；已发送标记保持不变
    pub async fn save_monthly_report_impl(
        &self,
        data: &MonthlyReportData,
    ) -> Result<MonthlyReport> {
        let json = serde_json::to_value(data)?;
        let generated_at = data.generated_at.timestamp();

        let existing = MonthlyReports::find()
            .filter(Column::Year.eq(data.year))
            .filter(Column::Month.eq(data.month as i32))
            .one(&self.db)
            .await
            .map_err(read_err("查询月度报告失败"))?;

        let model = match existing {
            Some(found) => {
                let mut model: ActiveModel = found.into();
                model.data = Set(json);
                model.generated_at = Set(generated_at);
                model
                    .update(&self.db)
                    .await
                    .map_err(write_err("更新月度报告失败"))?
            }
            None => ActiveModel {
                year: Set(data.year),
                month: Set(data.month as i32),
                data: Set(json),
                generated_at: Set(generated_at),
                sent_at: Set(None),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(write_err("保存月度报告失败"))?,
        };

        decode(model)
    }

    pub async fn mark_report_sent_impl(&self, id: i64, now: i64) -> Result<bool> {
        let result = MonthlyReports::update_many()
            .col_expr(Column::SentAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(write_err("标记报告已发送失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_monthly_reports_impl(
        &self,
        year: Option<i32>,
    ) -> Result<Vec<MonthlyReportSummary>> {
        let mut select = MonthlyReports::find();
        if let Some(year) = year {
            select = select.filter(Column::Year.eq(year));
        }

        let reports = select
            .order_by_desc(Column::Year)
            .order_by_desc(Column::Month)
            .all(&self.db)
            .await
            .map_err(read_err("查询月度报告列表失败"))?;

        reports
            .into_iter()
            .map(|m| decode(m).map(|r| MonthlyReportSummary::from(&r)))
            .collect()
    }
}
