//! 后台任务：邮件、到期提醒、月度报告

pub mod jobs;
pub mod mailer;
pub mod queue;
pub mod scheduler;

use std::sync::Arc;

use crate::storage::Storage;
use mailer::Mailer;

pub use queue::{Job, TaskQueue};

/// 任务执行所需的依赖
pub struct TaskContext {
    pub storage: Arc<dyn Storage>,
    pub mailer: Arc<dyn Mailer>,
}

/// 创建队列并启动 worker 与定时扫描
pub fn start(storage: Arc<dyn Storage>) -> TaskQueue {
    let (queue, receiver) = TaskQueue::new();
    let ctx = Arc::new(TaskContext {
        storage: storage.clone(),
        mailer: mailer::create_mailer(),
    });

    queue::spawn_worker(receiver, ctx);
    scheduler::spawn_reminder_scan(storage, queue.clone());
    scheduler::spawn_monthly_scan(queue.clone());

    queue
}
