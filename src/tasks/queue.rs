//! 进程内任务队列
//!
//! 服务层只负责入队，由单个 worker 顺序执行。失败的任务记录日志后丢弃，不重试。

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{TaskContext, jobs};
use crate::errors::{AcademiaError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// 新用户欢迎邮件，管理员代设密码时附带初始密码
    WelcomeEmail {
        user_id: i64,
        initial_password: Option<String>,
    },
    PasswordChanged {
        user_id: i64,
    },
    PasswordReset {
        user_id: i64,
        token: String,
    },
    SubjectSaved {
        subject_id: i64,
        created: bool,
    },
    TeacherAssignment {
        subject_id: i64,
        teacher_id: i64,
        assigned: bool,
    },
    AssignmentPublished {
        assignment_id: i64,
    },
    NewSubmission {
        submission_id: i64,
    },
    SendDueReminder {
        reminder_id: i64,
    },
    MonthlyReport {
        year: i32,
        month: u32,
        force_resend: bool,
    },
}

impl Job {
    pub fn name(&self) -> &'static str {
        match self {
            Job::WelcomeEmail { .. } => "welcome_email",
            Job::PasswordChanged { .. } => "password_changed",
            Job::PasswordReset { .. } => "password_reset",
            Job::SubjectSaved { .. } => "subject_saved",
            Job::TeacherAssignment { .. } => "teacher_assignment",
            Job::AssignmentPublished { .. } => "assignment_published",
            Job::NewSubmission { .. } => "new_submission",
            Job::SendDueReminder { .. } => "send_due_reminder",
            Job::MonthlyReport { .. } => "monthly_report",
        }
    }
}

#[derive(Clone)]
pub struct TaskQueue {
    sender: UnboundedSender<Job>,
}

impl TaskQueue {
    pub fn new() -> (Self, UnboundedReceiver<Job>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn enqueue(&self, job: Job) -> Result<()> {
        debug!("Enqueue job {}", job.name());
        self.sender
            .send(job)
            .map_err(|e| AcademiaError::task_queue(format!("任务队列已关闭: {}", e.0.name())))
    }

    /// 入队失败只记录日志，不影响主流程
    pub fn dispatch(&self, job: Job) {
        if let Err(e) = self.enqueue(job) {
            warn!("{}", e);
        }
    }
}

/// 启动 worker，队列所有发送端关闭后退出
pub fn spawn_worker(mut receiver: UnboundedReceiver<Job>, ctx: Arc<TaskContext>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(job) = receiver.recv().await {
            let name = job.name();
            match jobs::run(&ctx, job).await {
                Ok(outcome) => debug!("Job {} finished: {}", name, outcome),
                Err(e) => warn!("Job {} failed: {}", name, e),
            }
        }
        debug!("Task worker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_and_receive() {
        let (queue, mut rx) = TaskQueue::new();
        queue
            .enqueue(Job::PasswordChanged { user_id: 7 })
            .unwrap();
        assert_eq!(rx.recv().await, Some(Job::PasswordChanged { user_id: 7 }));
    }

    #[tokio::test]
    async fn test_enqueue_after_close() {
        let (queue, rx) = TaskQueue::new();
        drop(rx);
        let err = queue
            .enqueue(Job::SendDueReminder { reminder_id: 1 })
            .unwrap_err();
        assert_eq!(err.code(), "E016");
        // dispatch 不返回错误
        queue.dispatch(Job::SendDueReminder { reminder_id: 1 });
    }
}
