//! Email outreach for clubs whose records remain incomplete.
//!
//! A club qualifies when it has a real address (a contact-form
//! placeholder is not a sendable target) and at least one informational
//! field is still missing. Every generated message is appended to the
//! send log whether or not transmission succeeded; one bad recipient
//! never aborts the rest of the batch.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::types::ClubRecord;

/// One club selected for outreach, with the fields we want from them.
#[derive(Debug, Clone)]
pub struct OutreachCandidate {
    pub club_name: String,
    pub email: String,
    pub missing_fields: Vec<String>,
}

/// Append-only send-log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendLogEntry {
    pub club_name: String,
    pub email: String,
    pub missing_fields: Vec<String>,
    pub body: String,
    pub sent: bool,
    pub timestamp: Option<String>,
}

#[derive(Debug, Default)]
pub struct OutreachSummary {
    pub candidates: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Clubs eligible for outreach: real address plus at least one missing
/// informational field.
pub fn eligible_clubs(records: &[ClubRecord]) -> Vec<OutreachCandidate> {
    records
        .iter()
        .filter_map(|record| {
            let email = record.email.address()?;
            let missing = record.missing_data_fields();
            if missing.is_empty() {
                return None;
            }
            Some(OutreachCandidate {
                club_name: record.name.clone(),
                email: email.to_string(),
                missing_fields: missing,
            })
        })
        .collect()
}

/// Personalized information request naming the fields we could not find.
pub fn compose_message(club_name: &str, missing_fields: &[String]) -> String {
    let mut body = format!(
        "Dear {} Team,\n\n\
         I hope this message finds you well. I am compiling a database of tennis clubs \
         in the Greater Toronto Area to help players find the right club for their needs.\n\n\
         I visited your website but was unable to find some information about your club. \
         Would you be able to provide the following details?\n\n\
         Missing information:\n",
        club_name
    );
    for field in missing_fields {
        body.push_str("  - ");
        body.push_str(field);
        body.push('\n');
    }
    body.push_str(
        "\nI would greatly appreciate your help in making this database as accurate and \
         helpful as possible for the tennis community.\n\n\
         Thank you for your time.\n",
    );
    body
}

pub fn subject_for(club_name: &str) -> String {
    format!("Information request - {} club database entry", club_name)
}

/// Message transport. The orchestration below depends only on this seam,
/// so dry runs and tests swap the wire out.
pub trait Mailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;

    /// Whether sends actually leave the machine (drives log/summary text).
    fn is_live(&self) -> bool {
        true
    }
}

/// Logs what would be sent without transmitting anything.
pub struct DryRunMailer;

impl Mailer for DryRunMailer {
    fn send(&self, to: &str, subject: &str, _body: &str) -> Result<()> {
        info!(to, subject, "[dry run] would send");
        Ok(())
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// SMTP transport with STARTTLS; credentials come from the
/// EMAIL_ADDRESS / EMAIL_PASSWORD environment variables.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    pub fn from_env(config: &SmtpConfig) -> Result<Self> {
        let address = std::env::var("EMAIL_ADDRESS")
            .context("EMAIL_ADDRESS environment variable is not set")?;
        let password = std::env::var("EMAIL_PASSWORD")
            .context("EMAIL_PASSWORD environment variable is not set")?;

        let transport = SmtpTransport::starttls_relay(&config.server)
            .with_context(|| format!("invalid SMTP relay {}", config.server))?
            .port(config.port)
            .credentials(Credentials::new(address.clone(), password))
            .build();

        let from = config.from.clone().unwrap_or(address);
        Ok(SmtpMailer { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("invalid from address")?)
            .to(to.parse().with_context(|| format!("invalid recipient {}", to))?)
            .subject(subject)
            .body(body.to_string())
            .context("failed to build message")?;
        self.transport.send(&message).context("SMTP send failed")?;
        Ok(())
    }
}

/// Generate and (maybe) send one message per qualifying club, appending
/// each attempt to the send log.
pub fn run_outreach(
    records: &[ClubRecord],
    mailer: &dyn Mailer,
    log_path: &Path,
    send_delay: Duration,
) -> Result<OutreachSummary> {
    let candidates = eligible_clubs(records);
    let mut summary = OutreachSummary {
        candidates: candidates.len(),
        ..OutreachSummary::default()
    };

    let mut log = open_send_log(log_path)?;

    for (index, candidate) in candidates.iter().enumerate() {
        let body = compose_message(&candidate.club_name, &candidate.missing_fields);
        let subject = subject_for(&candidate.club_name);

        let sent = match mailer.send(&candidate.email, &subject, &body) {
            Ok(()) => {
                if mailer.is_live() {
                    info!(club = %candidate.club_name, to = %candidate.email, "sent");
                }
                true
            }
            Err(e) => {
                // Logged per recipient; the batch continues.
                warn!(club = %candidate.club_name, to = %candidate.email, "send failed: {:#}", e);
                false
            }
        };

        if sent {
            summary.sent += 1;
        } else {
            summary.failed += 1;
        }

        let entry = SendLogEntry {
            club_name: candidate.club_name.clone(),
            email: candidate.email.clone(),
            missing_fields: candidate.missing_fields.clone(),
            body,
            sent: sent && mailer.is_live(),
            timestamp: (sent && mailer.is_live())
                .then(|| Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        };
        append_log_entry(&mut log, &entry)?;

        if mailer.is_live() && index + 1 < candidates.len() {
            std::thread::sleep(send_delay);
        }
    }

    log.flush()?;
    Ok(summary)
}

fn open_send_log(path: &Path) -> Result<BufWriter<std::fs::File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open send log {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn append_log_entry(writer: &mut impl Write, entry: &SendLogEntry) -> Result<()> {
    let line = serde_json::to_string(entry).context("failed to serialize send-log entry")?;
    writeln!(writer, "{}", line).context("failed to append send-log entry")
}
