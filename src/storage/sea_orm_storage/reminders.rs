//! 截止提醒存储操作
//!
//! 发送是幂等的：`sent_at` 只能通过条件更新从空变为非空。

use chrono::{DateTime, Utc};

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::due_reminders::{ActiveModel, Column, Entity as DueReminders};
use crate::errors::Result;
use crate::models::assignments::reminders::{DueReminder, ReminderKind};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, LockBehavior, LockType},
};

impl SeaOrmStorage {
    /// 重新安排未发送的提醒
    pub async fn schedule_reminders_impl(
        &self,
        assignment_id: i64,
        plan: &[(ReminderKind, DateTime<Utc>)],
    ) -> Result<usize> {
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        DueReminders::delete_many()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::SentAt.is_null())
            .exec(&txn)
            .await
            .map_err(write_err("清除待发送提醒失败"))?;

        let sent: Vec<String> = DueReminders::find()
            .select_only()
            .column(Column::Kind)
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::SentAt.is_not_null())
            .into_tuple::<String>()
            .all(&txn)
            .await
            .map_err(read_err("查询已发送提醒失败"))?;

        let mut scheduled = 0;
        for (kind, at) in plan {
            if sent.iter().any(|k| k == kind.as_str()) {
                continue;
            }
            ActiveModel {
                assignment_id: Set(assignment_id),
                kind: Set(kind.as_str().to_string()),
                scheduled_for: Set(at.timestamp()),
                sent_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(write_err("创建提醒失败"))?;
            scheduled += 1;
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;
        Ok(scheduled)
    }

    /// 取出到期未发送的提醒
    ///
    /// PostgreSQL/MySQL 上使用 `FOR UPDATE SKIP LOCKED`，多实例扫描互不阻塞。
    pub async fn claim_due_reminders_impl(&self, now: i64, limit: u64) -> Result<Vec<DueReminder>> {
        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        let mut select = DueReminders::find()
            .filter(Column::SentAt.is_null())
            .filter(Column::ScheduledFor.lte(now))
            .order_by_asc(Column::ScheduledFor)
            .limit(limit);

        if matches!(
            txn.get_database_backend(),
            DbBackend::Postgres | DbBackend::MySql
        ) {
            select = select.lock_with_behavior(LockType::Update, LockBehavior::SkipLocked);
        }

        let models = select
            .all(&txn)
            .await
            .map_err(read_err("查询待发送提醒失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(models.into_iter().filter_map(|m| m.into_reminder()).collect())
    }

    pub async fn get_reminder_impl(&self, id: i64) -> Result<Option<DueReminder>> {
        let result = DueReminders::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询提醒失败"))?;

        Ok(result.and_then(|m| m.into_reminder()))
    }

    pub async fn mark_reminder_sent_impl(&self, id: i64, now: i64) -> Result<bool> {
        let result = DueReminders::update_many()
            .col_expr(Column::SentAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::SentAt.is_null())
            .exec(&self.db)
            .await
            .map_err(write_err("标记提醒已发送失败"))?;

        Ok(result.rows_affected == 1)
    }
}
