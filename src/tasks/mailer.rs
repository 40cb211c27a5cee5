//! 邮件发送
//!
//! `smtp.enabled = false` 时使用 [`LogMailer`]，邮件只写入日志。

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, SmtpConfig};
use crate::errors::{AcademiaError, Result};

#[derive(Debug, Clone)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 待发送的邮件
///
/// 群发时收件人放在 `bcc`，`to` 为空时由发件地址充当收件人。
#[derive(Debug, Clone, Default)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    pub attachments: Vec<MailAttachment>,
}

impl OutgoingEmail {
    pub fn to_one(address: impl Into<String>, subject: impl Into<String>, text: String) -> Self {
        Self {
            to: vec![address.into()],
            subject: subject.into(),
            text,
            ..Default::default()
        }
    }

    pub fn broadcast(recipients: Vec<String>, subject: impl Into<String>, text: String) -> Self {
        Self {
            bcc: recipients,
            subject: subject.into(),
            text,
            ..Default::default()
        }
    }

    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.bcc.len()
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;
}

/// SMTP 发送（lettre + tokio）
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        let mut builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.parse()?,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject.clone());

        if email.to.is_empty() {
            builder = builder.to(self.from.clone());
        }
        for address in &email.to {
            builder = builder.to(address.parse::<Mailbox>()?);
        }
        for address in &email.bcc {
            builder = builder.bcc(address.parse::<Mailbox>()?);
        }

        let body = match &email.html {
            Some(html) => MultiPart::alternative_plain_html(email.text.clone(), html.clone()),
            None => MultiPart::alternative().singlepart(SinglePart::plain(email.text.clone())),
        };

        let body = if email.attachments.is_empty() {
            body
        } else {
            let mut mixed = MultiPart::mixed().multipart(body);
            for attachment in &email.attachments {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| AcademiaError::mail(format!("无效的附件类型: {e}")))?;
                mixed = mixed.singlepart(
                    Attachment::new(attachment.filename.clone())
                        .body(attachment.bytes.clone(), content_type),
                );
            }
            mixed
        };

        Ok(builder.multipart(body)?)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let message = self.build_message(&email)?;
        self.transport.send(message).await?;
        info!(
            "Email '{}' sent to {} recipient(s)",
            email.subject,
            email.recipient_count()
        );
        Ok(())
    }
}

/// 只记录日志的发送器
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        info!(
            to = ?email.to,
            bcc = email.bcc.len(),
            attachments = email.attachments.len(),
            "SMTP disabled, email '{}' not delivered:\n{}",
            email.subject,
            email.text
        );
        Ok(())
    }
}

/// 按配置创建发送器，SMTP 配置无效时回退到日志
pub fn create_mailer() -> Arc<dyn Mailer> {
    let config = &AppConfig::get().smtp;
    if !config.enabled {
        warn!("SMTP disabled, emails will only be logged");
        return Arc::new(LogMailer);
    }
    match SmtpMailer::from_config(config) {
        Ok(mailer) => {
            warn!("SMTP mailer ready ({}:{})", config.host, config.port);
            Arc::new(mailer)
        }
        Err(e) => {
            warn!("Failed to create SMTP mailer: {}, falling back to log mailer", e);
            Arc::new(LogMailer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            enabled: true,
            host: "localhost".to_string(),
            port: 1025,
            username: String::new(),
            password: String::new(),
            from: "Academia <no-reply@academia.local>".to_string(),
            starttls: false,
        }
    }

    // 传输层的连接池必须在 tokio 运行时内创建和释放
    #[tokio::test]
    async fn test_broadcast_message_hides_recipients() {
        let mailer = SmtpMailer::from_config(&smtp_config()).unwrap();
        let email = OutgoingEmail::broadcast(
            vec!["a@uni.edu".to_string(), "b@uni.edu".to_string()],
            "Recordatorio",
            "Texto".to_string(),
        );
        let message = mailer.build_message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: Academia <no-reply@academia.local>"));
        assert!(!raw.contains("a@uni.edu"));
        assert_eq!(message.envelope().to().len(), 3);
    }

    #[tokio::test]
    async fn test_message_with_attachments() {
        let mailer = SmtpMailer::from_config(&smtp_config()).unwrap();
        let mut email = OutgoingEmail::to_one("ana@uni.edu", "Reporte", "Texto".to_string());
        email.html = Some("<p>Texto</p>".to_string());
        email.attachments.push(MailAttachment {
            filename: "reporte.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF".to_vec(),
        });
        let raw = String::from_utf8(mailer.build_message(&email).unwrap().formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("reporte.pdf"));
    }

    #[tokio::test]
    async fn test_invalid_address_is_mail_error() {
        let mailer = SmtpMailer::from_config(&smtp_config()).unwrap();
        let email = OutgoingEmail::to_one("not an address", "X", String::new());
        let err = mailer.build_message(&email).unwrap_err();
        assert_eq!(err.code(), "E014");
    }
}
