//! 定时扫描
//!
//! 两个 `tokio::time::interval` 循环：到期提醒扫描和月度报告扫描。
//! 扫描只负责入队，幂等性由任务本身保证。

use chrono::{Datelike, NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::queue::{Job, TaskQueue};
use crate::config::AppConfig;
use crate::models::reports::entities::previous_month;
use crate::storage::Storage;

pub fn spawn_reminder_scan(storage: Arc<dyn Storage>, queue: TaskQueue) -> JoinHandle<()> {
    let config = &AppConfig::get().tasks;
    let period = Duration::from_secs(config.reminder_scan_interval_secs.max(1));
    let batch_size = config.reminder_batch_size.max(1);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match storage
                .claim_due_reminders(Utc::now().timestamp(), batch_size)
                .await
            {
                Ok(reminders) if reminders.is_empty() => debug!("No due reminders"),
                Ok(reminders) => {
                    info!("Dispatching {} due reminder(s)", reminders.len());
                    for reminder in reminders {
                        queue.dispatch(Job::SendDueReminder {
                            reminder_id: reminder.id,
                        });
                    }
                }
                Err(e) => warn!("Reminder scan failed: {}", e),
            }
        }
    })
}

/// 每月 1 日返回上个月的报告任务
pub(crate) fn monthly_job_for(today: NaiveDate) -> Option<Job> {
    if today.day() != 1 {
        return None;
    }
    let (year, month) = previous_month(today);
    Some(Job::MonthlyReport {
        year,
        month,
        force_resend: false,
    })
}

pub fn spawn_monthly_scan(queue: TaskQueue) -> Option<JoinHandle<()>> {
    let config = &AppConfig::get().tasks;
    if !config.monthly_report_enabled {
        info!("Monthly report scan disabled");
        return None;
    }
    let period = Duration::from_secs(config.monthly_scan_interval_secs.max(1));

    Some(tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Some(job) = monthly_job_for(Utc::now().date_naive()) {
                queue.dispatch(job);
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_job_only_on_first_day() {
        let first = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(
            monthly_job_for(first),
            Some(Job::MonthlyReport {
                year: 2025,
                month: 3,
                force_resend: false
            })
        );
        let mid = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        assert_eq!(monthly_job_for(mid), None);
    }

    #[test]
    fn test_monthly_job_wraps_year() {
        let first = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(
            monthly_job_for(first),
            Some(Job::MonthlyReport {
                year: 2025,
                month: 12,
                force_resend: false
            })
        );
    }
}
