use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::sync::{Arc, Mutex};

// 1. Mailer Contract
/// Mailer
///
/// The abstract contract for outbound email. Handlers depend on this trait so
/// the concrete transport can be swapped — the real SMTP relay (SmtpMailer) in
/// production, the in-memory Mock (MockMailer) during testing — without
/// touching the calling code.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Dispatches a plain-text email with a single PDF attachment.
    ///
    /// # Arguments
    /// * `to`: recipient address.
    /// * `subject`: message subject line.
    /// * `body`: plain-text message body.
    /// * `filename`: attachment filename, e.g. "todo_7.pdf".
    /// * `pdf`: the rendered PDF bytes.
    async fn send_todo_pdf(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        filename: &str,
        pdf: Vec<u8>,
    ) -> Result<(), String>;
}

/// MailerState
///
/// The concrete type used to share the mail service across the application
/// state.
pub type MailerState = Arc<dyn Mailer>;

// 2. The Real Implementation (SMTP)
/// SmtpMailer
///
/// The concrete implementation over lettre's async SMTP transport. With
/// credentials configured it speaks authenticated STARTTLS (production
/// relays); without them it falls back to a plain connection, which is what
/// local catch-all relays (MailHog/Mailpit on port 1025) expect.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// new
    ///
    /// Builds the transport from the resolved AppConfig values. Fails if the
    /// sender mailbox or relay host cannot be parsed.
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        from: &str,
    ) -> Result<Self, String> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| format!("invalid sender mailbox {from:?}: {e}"))?;

        let transport = if username.is_empty() {
            // Unauthenticated dev relay.
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(port)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| format!("smtp relay setup failed: {e}"))?
                .port(port)
                .credentials(Credentials::new(username.to_string(), password.to_string()))
                .build()
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_todo_pdf(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        filename: &str,
        pdf: Vec<u8>,
    ) -> Result<(), String> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| format!("invalid recipient {to:?}: {e}"))?;

        let pdf_type = ContentType::parse("application/pdf")
            .map_err(|e| format!("attachment content type: {e}"))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(Attachment::new(filename.to_string()).body(pdf, pdf_type)),
            )
            .map_err(|e| format!("message assembly failed: {e}"))?;

        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| format!("smtp send failed: {e}"))
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// SentEmail
///
/// A record of one dispatch captured by the mock, for test assertions.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub filename: String,
    pub pdf_len: usize,
}

/// MockMailer
///
/// A mock implementation of `Mailer` used exclusively for testing. Records
/// every dispatch instead of talking to a network, and can be flipped into a
/// failing mode to exercise the error path.
#[derive(Default)]
pub struct MockMailer {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    /// Every message "sent" through this mock, in order.
    pub sent: Mutex<Vec<SentEmail>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_todo_pdf(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        filename: &str,
        pdf: Vec<u8>,
    ) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock Mailer Error: Simulation requested".to_string());
        }

        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            filename: filename.to_string(),
            pdf_len: pdf.len(),
        });

        Ok(())
    }
}
