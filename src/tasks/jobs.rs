//! 任务处理
//!
//! 每个任务返回一段结果描述，错误由 worker 记录。

use chrono::{DateTime, Utc};
use tracing::info;

use super::TaskContext;
use super::mailer::{MailAttachment, OutgoingEmail};
use super::queue::Job;
use crate::config::AppConfig;
use crate::errors::{AcademiaError, Result};
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::reminders::{DueReminder, ReminderKind};
use crate::models::reports::entities::{MonthlyReportData, month_window};
use crate::models::roles::entities::perms;
use crate::models::subjects::entities::Subject;
use crate::models::users::entities::User;
use crate::services::reports::render::{self, ReportFormat};

pub async fn run(ctx: &TaskContext, job: Job) -> Result<String> {
    match job {
        Job::WelcomeEmail {
            user_id,
            initial_password,
        } => welcome_email(ctx, user_id, initial_password).await,
        Job::PasswordChanged { user_id } => password_changed(ctx, user_id).await,
        Job::PasswordReset { user_id, token } => password_reset(ctx, user_id, &token).await,
        Job::SubjectSaved {
            subject_id,
            created,
        } => subject_saved(ctx, subject_id, created).await,
        Job::TeacherAssignment {
            subject_id,
            teacher_id,
            assigned,
        } => teacher_assignment(ctx, subject_id, teacher_id, assigned).await,
        Job::AssignmentPublished { assignment_id } => {
            assignment_published(ctx, assignment_id).await
        }
        Job::NewSubmission { submission_id } => new_submission(ctx, submission_id).await,
        Job::SendDueReminder { reminder_id } => send_due_reminder(ctx, reminder_id).await,
        Job::MonthlyReport {
            year,
            month,
            force_resend,
        } => monthly_report(ctx, year, month, force_resend).await,
    }
}

fn system_name() -> String {
    AppConfig::get().app.system_name.clone()
}

fn emails(users: &[User]) -> Vec<String> {
    users.iter().map(|u| u.email.clone()).collect()
}

fn format_due(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

async fn require_user(ctx: &TaskContext, user_id: i64) -> Result<User> {
    ctx.storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| AcademiaError::not_found(format!("用户 {user_id} 不存在")))
}

async fn require_subject(ctx: &TaskContext, subject_id: i64) -> Result<Subject> {
    ctx.storage
        .get_subject_by_id(subject_id)
        .await?
        .ok_or_else(|| AcademiaError::not_found(format!("课程 {subject_id} 不存在")))
}

async fn require_assignment(ctx: &TaskContext, assignment_id: i64) -> Result<Assignment> {
    ctx.storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| AcademiaError::not_found(format!("作业 {assignment_id} 不存在")))
}

pub(crate) fn welcome_message(
    user: &User,
    initial_password: Option<&str>,
    system: &str,
) -> OutgoingEmail {
    let mut text = format!(
        "Hola {},\n\nTu cuenta en {} fue creada.\nUsuario: {}\n",
        user.full_name(),
        system,
        user.username
    );
    if let Some(password) = initial_password {
        text.push_str(&format!(
            "Contrasena temporal: {password}\nCambiala al iniciar sesion.\n"
        ));
    }
    OutgoingEmail::to_one(user.email.clone(), format!("Bienvenido a {system}"), text)
}

async fn welcome_email(
    ctx: &TaskContext,
    user_id: i64,
    initial_password: Option<String>,
) -> Result<String> {
    let user = require_user(ctx, user_id).await?;
    ctx.mailer
        .send(welcome_message(&user, initial_password.as_deref(), &system_name()))
        .await?;
    Ok(format!("welcome email sent to {}", user.email))
}

async fn password_changed(ctx: &TaskContext, user_id: i64) -> Result<String> {
    let user = require_user(ctx, user_id).await?;
    let text = format!(
        "Hola {},\n\nLa contrasena de tu cuenta fue cambiada el {}.\nSi no fuiste tu, contacta al administrador.\n",
        user.full_name(),
        format_due(Utc::now())
    );
    ctx.mailer
        .send(OutgoingEmail::to_one(
            user.email.clone(),
            "Contrasena actualizada",
            text,
        ))
        .await?;
    Ok(format!("password change notice sent to {}", user.email))
}

pub(crate) fn reset_link(public_url: &str, token: &str) -> String {
    format!(
        "{}/reset-password?token={}",
        public_url.trim_end_matches('/'),
        token
    )
}

async fn password_reset(ctx: &TaskContext, user_id: i64, token: &str) -> Result<String> {
    let user = require_user(ctx, user_id).await?;
    let config = AppConfig::get();
    let text = format!(
        "Hola {},\n\nPara restablecer tu contrasena abre el siguiente enlace:\n{}\n\nEl enlace vence en {} minutos y solo puede usarse una vez.\n",
        user.full_name(),
        reset_link(&config.app.public_url, token),
        config.auth.reset_token_ttl_minutes
    );
    ctx.mailer
        .send(OutgoingEmail::to_one(
            user.email.clone(),
            "Restablecer contrasena",
            text,
        ))
        .await?;
    Ok(format!("password reset link sent to {}", user.email))
}

async fn subject_saved(ctx: &TaskContext, subject_id: i64, created: bool) -> Result<String> {
    let subject = require_subject(ctx, subject_id).await?;
    let teachers = ctx.storage.list_subject_teachers(subject_id).await?;
    if teachers.is_empty() {
        return Ok(format!("subject {} has no teachers", subject.code));
    }

    let action = if created { "creada" } else { "actualizada" };
    let text = format!(
        "La materia {} ({}) fue {}.\nCreditos: {}\n",
        subject.name, subject.code, action, subject.credits
    );
    ctx.mailer
        .send(OutgoingEmail::broadcast(
            emails(&teachers),
            format!("Materia {action}: {}", subject.code),
            text,
        ))
        .await?;
    Ok(format!("{} teacher(s) notified", teachers.len()))
}

async fn teacher_assignment(
    ctx: &TaskContext,
    subject_id: i64,
    teacher_id: i64,
    assigned: bool,
) -> Result<String> {
    let teacher = require_user(ctx, teacher_id).await?;
    let subject = require_subject(ctx, subject_id).await?;
    let (subject_line, text) = if assigned {
        (
            format!("Asignacion a {}", subject.code),
            format!(
                "Hola {},\n\nFuiste asignado como docente de {} ({}).\n",
                teacher.full_name(),
                subject.name,
                subject.code
            ),
        )
    } else {
        (
            format!("Desasignacion de {}", subject.code),
            format!(
                "Hola {},\n\nYa no figuras como docente de {} ({}).\n",
                teacher.full_name(),
                subject.name,
                subject.code
            ),
        )
    };
    ctx.mailer
        .send(OutgoingEmail::to_one(teacher.email.clone(), subject_line, text))
        .await?;
    Ok(format!("teacher {} notified", teacher.id))
}

async fn assignment_published(ctx: &TaskContext, assignment_id: i64) -> Result<String> {
    let assignment = require_assignment(ctx, assignment_id).await?;
    let subject = require_subject(ctx, assignment.subject_id).await?;
    let students = ctx.storage.list_subject_students(subject.id).await?;
    if students.is_empty() {
        return Ok(format!("subject {} has no students", subject.code));
    }

    let text = format!(
        "Se publico una nueva actividad en {} ({}).\n\nTitulo: {}\nTipo: {}\nPeso: {}%\nFecha limite: {}\n",
        subject.name,
        subject.code,
        assignment.title,
        assignment.kind,
        assignment.weight,
        format_due(assignment.due_at)
    );
    ctx.mailer
        .send(OutgoingEmail::broadcast(
            emails(&students),
            format!("Nueva actividad: {}", assignment.title),
            text,
        ))
        .await?;
    Ok(format!("{} student(s) notified", students.len()))
}

async fn new_submission(ctx: &TaskContext, submission_id: i64) -> Result<String> {
    let view = ctx
        .storage
        .get_submission_view(submission_id)
        .await?
        .ok_or_else(|| AcademiaError::not_found(format!("提交 {submission_id} 不存在")))?;
    let teachers = ctx.storage.list_subject_teachers(view.subject_id).await?;
    if teachers.is_empty() {
        return Ok(format!("subject {} has no teachers", view.subject_code));
    }

    let late = if view.submission.late { " (tardia)" } else { "" };
    let text = format!(
        "{} entrego \"{}\" en {} ({}) el {}{}.\n",
        view.student_name,
        view.assignment_title,
        view.subject_name,
        view.subject_code,
        format_due(view.submission.submitted_at),
        late
    );
    ctx.mailer
        .send(OutgoingEmail::broadcast(
            emails(&teachers),
            format!("Nueva entrega: {}", view.assignment_title),
            text,
        ))
        .await?;
    Ok(format!("{} teacher(s) notified", teachers.len()))
}

pub(crate) fn reminder_message(
    reminder: &DueReminder,
    assignment: &Assignment,
    subject: &Subject,
    responsible: Option<&User>,
    recipients: Vec<String>,
) -> OutgoingEmail {
    let kind_label = match reminder.kind {
        ReminderKind::D3Student => "3 dias antes",
        ReminderKind::D1Student => "1 dia antes",
        ReminderKind::D1Teacher => "1 dia antes (docente)",
    };
    let teacher = responsible
        .map(|t| t.full_name())
        .unwrap_or_else(|| "Sin asignar".to_string());
    let text = format!(
        "Materia: {} ({})\nActividad: {}\nFecha limite: {}\nDocente responsable: {}\nTipo de recordatorio: {}\nEnviado: {}\n",
        subject.name,
        subject.code,
        assignment.title,
        format_due(assignment.due_at),
        teacher,
        kind_label,
        format_due(Utc::now())
    );
    let subject_line = format!("Recordatorio ({}): {}", reminder.kind, assignment.title);

    if reminder.kind.targets_teachers() {
        OutgoingEmail {
            to: recipients,
            subject: subject_line,
            text,
            ..Default::default()
        }
    } else {
        OutgoingEmail::broadcast(recipients, subject_line, text)
    }
}

async fn send_due_reminder(ctx: &TaskContext, reminder_id: i64) -> Result<String> {
    let Some(reminder) = ctx.storage.get_reminder(reminder_id).await? else {
        return Ok(format!("reminder {reminder_id} no longer exists"));
    };
    if reminder.sent_at.is_some() {
        return Ok(format!("reminder {reminder_id} already sent"));
    }

    let now = Utc::now().timestamp();
    let assignment = match ctx.storage.get_assignment_by_id(reminder.assignment_id).await? {
        Some(a) if a.status != AssignmentStatus::Closed => a,
        _ => {
            ctx.storage.mark_reminder_sent(reminder_id, now).await?;
            return Ok(format!("reminder {reminder_id} skipped, assignment not open"));
        }
    };
    let subject = require_subject(ctx, assignment.subject_id).await?;
    let teachers = ctx.storage.list_subject_teachers(subject.id).await?;
    let responsible = teachers.first();

    let recipients = if reminder.kind.targets_teachers() {
        responsible.map(|t| vec![t.email.clone()]).unwrap_or_default()
    } else {
        emails(&ctx.storage.list_subject_students(subject.id).await?)
    };

    if recipients.is_empty() {
        ctx.storage.mark_reminder_sent(reminder_id, now).await?;
        return Ok(format!("reminder {reminder_id} has no recipients"));
    }

    let count = recipients.len();
    ctx.mailer
        .send(reminder_message(
            &reminder,
            &assignment,
            &subject,
            responsible,
            recipients,
        ))
        .await?;

    if !ctx.storage.mark_reminder_sent(reminder_id, now).await? {
        info!("Reminder {} was already marked sent", reminder_id);
    }
    Ok(format!("reminder {reminder_id} sent to {count} recipient(s)"))
}

/// 月度报告邮件，正文为 HTML，附带 XLSX 与 PDF
pub(crate) fn monthly_report_message(
    data: &MonthlyReportData,
    recipients: Vec<String>,
    system: &str,
) -> Result<OutgoingEmail> {
    let mut attachments = Vec::with_capacity(2);
    for format in [ReportFormat::Xlsx, ReportFormat::Pdf] {
        attachments.push(MailAttachment {
            filename: render::report_filename(data, format),
            content_type: format.content_type().to_string(),
            bytes: render::render(data, format)?,
        });
    }

    Ok(OutgoingEmail {
        bcc: recipients,
        subject: format!(
            "{} - Consolidado academico {:04}-{:02}",
            system, data.year, data.month
        ),
        text: format!(
            "Consolidado academico de {:04}-{:02}: {} materia(s). Ver adjuntos.\n",
            data.year,
            data.month,
            data.subjects.len()
        ),
        html: Some(render::render_html(data)),
        attachments,
        ..Default::default()
    })
}

async fn monthly_report(
    ctx: &TaskContext,
    year: i32,
    month: u32,
    force_resend: bool,
) -> Result<String> {
    if let Some(existing) = ctx.storage.get_monthly_report(year, month).await?
        && existing.sent_at.is_some()
        && !force_resend
    {
        return Ok(format!("report {year:04}-{month:02} already sent"));
    }

    let window = month_window(year, month)
        .ok_or_else(|| AcademiaError::validation(format!("无效的月份: {year}-{month}")))?;
    let (rows, teachers) = ctx.storage.fetch_report_rows(window).await?;
    let config = &AppConfig::get().reports;
    let data = MonthlyReportData::compute(
        year,
        month,
        &rows,
        &teachers,
        config.approval_threshold,
        config.top_n,
    );
    let report = ctx.storage.save_monthly_report(&data).await?;

    let recipients = emails(
        &ctx.storage
            .list_users_with_permission(perms::RECEIVE_MONTHLY_REPORT)
            .await?,
    );
    if recipients.is_empty() {
        return Ok(format!(
            "report {year:04}-{month:02} generated but no recipients"
        ));
    }

    let count = recipients.len();
    ctx.mailer
        .send(monthly_report_message(&data, recipients, &system_name())?)
        .await?;
    ctx.storage
        .mark_report_sent(report.id, Utc::now().timestamp())
        .await?;
    Ok(format!(
        "report {year:04}-{month:02} sent to {count} recipient(s)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentKind;
    use crate::models::reports::entities::fixtures;
    use crate::models::roles::entities::RoleCode;
    use crate::models::users::entities::fixtures::user;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn subject() -> Subject {
        Subject {
            id: 3,
            name: "Algebra".to_string(),
            code: "ALG101".to_string(),
            description: None,
            credits: 4,
            period_id: 1,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assignment() -> Assignment {
        let due = Utc.with_ymd_and_hms(2025, 3, 10, 23, 59, 0).unwrap();
        Assignment {
            id: 9,
            subject_id: 3,
            title: "Parcial 1".to_string(),
            description: None,
            kind: AssignmentKind::Exam,
            weight: Decimal::new(40, 0),
            publish_at: due - chrono::Duration::days(10),
            due_at: due,
            status: AssignmentStatus::Published,
            allow_late_submission: false,
            created_by: Some(1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reminder(kind: ReminderKind) -> DueReminder {
        DueReminder {
            id: 1,
            assignment_id: 9,
            kind,
            scheduled_for: Utc::now(),
            sent_at: None,
        }
    }

    #[test]
    fn test_student_reminder_uses_bcc() {
        let teacher = user(2, &[RoleCode::Teacher]);
        let email = reminder_message(
            &reminder(ReminderKind::D3Student),
            &assignment(),
            &subject(),
            Some(&teacher),
            vec!["s1@uni.edu".to_string(), "s2@uni.edu".to_string()],
        );
        assert!(email.to.is_empty());
        assert_eq!(email.bcc.len(), 2);
        assert_eq!(email.subject, "Recordatorio (d3_student): Parcial 1");
        assert!(email.text.contains("ALG101"));
        assert!(email.text.contains("Test User2"));
        assert!(email.text.contains("2025-03-10 23:59 UTC"));
    }

    #[test]
    fn test_teacher_reminder_goes_direct() {
        let email = reminder_message(
            &reminder(ReminderKind::D1Teacher),
            &assignment(),
            &subject(),
            None,
            vec!["t@uni.edu".to_string()],
        );
        assert_eq!(email.to, vec!["t@uni.edu".to_string()]);
        assert!(email.bcc.is_empty());
        assert!(email.text.contains("Sin asignar"));
    }

    #[test]
    fn test_welcome_message_password_only_when_generated() {
        let u = user(5, &[RoleCode::Student]);
        let plain = welcome_message(&u, None, "Academia");
        assert!(!plain.text.contains("Contrasena temporal"));
        assert!(plain.text.contains("user5"));

        let generated = welcome_message(&u, Some("Xy12abcdEF"), "Academia");
        assert!(generated.text.contains("Xy12abcdEF"));
        assert_eq!(generated.to, vec!["user5@example.com".to_string()]);
    }

    #[test]
    fn test_reset_link() {
        assert_eq!(
            reset_link("https://academia.local/", "abc"),
            "https://academia.local/reset-password?token=abc"
        );
    }

    #[test]
    fn test_monthly_report_message_attachments() {
        let data = fixtures::sample();
        let email =
            monthly_report_message(&data, vec!["dean@uni.edu".to_string()], "Academia").unwrap();
        assert_eq!(email.bcc, vec!["dean@uni.edu".to_string()]);
        assert!(email.html.as_deref().unwrap_or_default().contains("ALG101"));
        let names: Vec<_> = email.attachments.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["consolidado_2025-03.xlsx", "consolidado_2025-03.pdf"]);
    }
}
