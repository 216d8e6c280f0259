use tracing::debug;

use crate::smtp_verify::error::SmtpVerifyError;
use crate::smtp_verify::options::SmtpProbeOptions;
use crate::smtp_verify::session::{SmtpSession, is_timeout};
use crate::smtp_verify::state::{Action, Conversation};
use crate::smtp_verify::types::SmtpProbeResult;

/// One RCPT probe against one mail host.
///
/// `Err` means the host could not be talked to at all; any answer the server
/// gave, including silence until the deadline, is an `Ok` result.
pub trait RcptProbe {
    fn probe(&self, host: &str, recipient: &str) -> Result<SmtpProbeResult, SmtpVerifyError>;
}

/// [`RcptProbe`] over a real TCP connection.
#[derive(Debug, Clone, Default)]
pub struct TcpProber {
    options: SmtpProbeOptions,
}

impl TcpProber {
    pub fn new(options: SmtpProbeOptions) -> Self {
        Self { options }
    }
}

impl RcptProbe for TcpProber {
    fn probe(&self, host: &str, recipient: &str) -> Result<SmtpProbeResult, SmtpVerifyError> {
        verify_rcpt(host, recipient, &self.options)
    }
}

/// Run a full `greet → ehlo → mail → rcpt` conversation with `host`.
pub fn verify_rcpt(
    host: &str,
    recipient: &str,
    options: &SmtpProbeOptions,
) -> Result<SmtpProbeResult, SmtpVerifyError> {
    let mut session = SmtpSession::connect(host, options.port, options.timeout())?;
    let mut conversation = Conversation::new(options.helo(), recipient);
    let outcome = drive(&mut session, &mut conversation);
    session.quit();
    debug!(%host, %recipient, ?outcome, "RCPT probe finished");
    outcome
}

fn drive(
    session: &mut SmtpSession,
    conversation: &mut Conversation,
) -> Result<SmtpProbeResult, SmtpVerifyError> {
    loop {
        let line = match session.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => return Ok(SmtpProbeResult::connection_closed()),
            Err(err) if is_timeout(&err) => return Ok(SmtpProbeResult::timeout()),
            Err(err) => return Err(SmtpVerifyError::io(err)),
        };
        match conversation.feed_line(&line) {
            Action::Send(command) => match session.send(&command) {
                Ok(()) => {}
                Err(err) if is_timeout(&err) => return Ok(SmtpProbeResult::timeout()),
                Err(err) => return Err(SmtpVerifyError::io(err)),
            },
            Action::Finish(result) => return Ok(result),
            Action::Ignore => {}
        }
    }
}
