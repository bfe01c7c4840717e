// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound email.
//!
//! Delivery itself is outside this service; [`LogMailer`] records what would
//! be sent. Swap in a real transport by implementing [`Mailer`].

use thiserror::Error;

pub const MAIL_SUBJECT: &str = "Neuro Triumph";

#[derive(Debug, Error)]
#[error("failed to send mail to {recipient}: {reason}")]
pub struct MailError {
    pub recipient: String,
    pub reason: String,
}

/// A single outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Mail {
    pub fn registration_confirmation(to: &str, token: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: MAIL_SUBJECT.to_string(),
            body: format!("Confirm your registration with this token:\n\n{token}\n"),
        }
    }

    pub fn email_change_confirmation(to: &str, token: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: MAIL_SUBJECT.to_string(),
            body: format!("Confirm your new email address with this token:\n\n{token}\n"),
        }
    }
}

pub trait Mailer: Send + Sync {
    fn send(&self, mail: Mail) -> Result<(), MailError>;
}

/// Logs outbound mail instead of delivering it. Token bodies are not logged.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, mail: Mail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "mail queued");
        Ok(())
    }
}
