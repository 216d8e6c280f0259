use super::classify::classify_rcpt;
use super::{ProbeCategory, SmtpProbeResult};

/// Where the client stands in the `greet → ehlo → mail → rcpt` dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpState {
    /// Waiting for the server banner.
    Greet,
    /// `EHLO` sent.
    Ehlo,
    /// `MAIL FROM` sent; `retried` once the non-null sender went out.
    Mail { retried: bool },
    /// `RCPT TO` sent.
    Rcpt,
    Done,
}

impl SmtpState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(String),
    Finish(SmtpProbeResult),
    Ignore,
}

/// HELO identity and recipient for one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub helo: String,
    pub recipient: String,
}

impl Envelope {
    pub fn new(helo: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            helo: helo.into(),
            recipient: recipient.into(),
        }
    }

    fn fallback_sender(&self) -> String {
        format!("MAIL FROM:<postmaster@{}>", self.helo)
    }
}

/// Pure transition on one final reply line.
pub fn transition(
    state: SmtpState,
    code: u16,
    line: &str,
    envelope: &Envelope,
) -> (SmtpState, Action) {
    let positive = (200..400).contains(&code);
    match state {
        SmtpState::Greet if positive => (
            SmtpState::Ehlo,
            Action::Send(format!("EHLO {}", envelope.helo)),
        ),
        SmtpState::Ehlo if positive => (
            SmtpState::Mail { retried: false },
            Action::Send("MAIL FROM:<>".to_string()),
        ),
        SmtpState::Mail { .. } if positive => (
            SmtpState::Rcpt,
            Action::Send(format!("RCPT TO:<{}>", envelope.recipient)),
        ),
        SmtpState::Mail { retried: false } if (500..600).contains(&code) => (
            SmtpState::Mail { retried: true },
            Action::Send(envelope.fallback_sender()),
        ),
        SmtpState::Greet | SmtpState::Ehlo | SmtpState::Mail { .. } => (
            SmtpState::Done,
            Action::Finish(SmtpProbeResult::new(ProbeCategory::Temp, code, line)),
        ),
        SmtpState::Rcpt => (
            SmtpState::Done,
            Action::Finish(SmtpProbeResult::new(
                classify_rcpt(code, line),
                code,
                line,
            )),
        ),
        SmtpState::Done => (SmtpState::Done, Action::Ignore),
    }
}

/// Leading three-digit reply code, or 0.
pub fn reply_code(line: &str) -> u16 {
    line.get(..3)
        .filter(|head| head.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|head| head.parse().ok())
        .unwrap_or(0)
}

/// `250-...` style line of a multi-line reply.
pub fn is_continuation(line: &str) -> bool {
    reply_code(line) != 0 && line.as_bytes().get(3) == Some(&b'-')
}

/// Stateful wrapper feeding raw server lines through [`transition`].
#[derive(Debug, Clone)]
pub struct Conversation {
    state: SmtpState,
    envelope: Envelope,
}

impl Conversation {
    pub fn new(helo: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            state: SmtpState::Greet,
            envelope: Envelope::new(helo, recipient),
        }
    }

    pub fn state(&self) -> SmtpState {
        self.state
    }

    pub fn feed_line(&mut self, line: &str) -> Action {
        if is_continuation(line) {
            return Action::Ignore;
        }
        let (next, action) = transition(self.state, reply_code(line), line, &self.envelope);
        self.state = next;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> (Vec<String>, Option<SmtpProbeResult>) {
        let mut conversation = Conversation::new("verifier.local", "user@example.com");
        let mut sent = Vec::new();
        for line in lines {
            match conversation.feed_line(line) {
                Action::Send(cmd) => sent.push(cmd),
                Action::Finish(result) => return (sent, Some(result)),
                Action::Ignore => {}
            }
        }
        (sent, None)
    }

    #[test]
    fn accepted_recipient() {
        let (sent, result) = run(&[
            "220 mx.example.com ESMTP",
            "250-mx.example.com",
            "250-PIPELINING",
            "250 8BITMIME",
            "250 2.1.0 Ok",
            "250 2.1.5 Ok",
        ]);
        assert_eq!(
            sent,
            vec!["EHLO verifier.local", "MAIL FROM:<>", "RCPT TO:<user@example.com>"]
        );
        let result = result.expect("finished");
        assert_eq!(result.category, ProbeCategory::Accept);
        assert_eq!(result.code, 250);
        assert_eq!(result.message, "250 2.1.5 Ok");
    }

    #[test]
    fn null_sender_rejection_retries_once() {
        let (sent, result) = run(&[
            "220 ready",
            "250 hello",
            "553 5.1.8 null sender refused",
            "250 ok",
            "550 5.1.1 user unknown",
        ]);
        assert_eq!(sent[2], "MAIL FROM:<postmaster@verifier.local>");
        assert_eq!(sent[3], "RCPT TO:<user@example.com>");
        assert_eq!(result.unwrap().category, ProbeCategory::Reject);
    }

    #[test]
    fn second_mail_failure_is_temporary() {
        let (sent, result) = run(&["220 ready", "250 hello", "550 no", "550 still no"]);
        assert_eq!(sent.len(), 3);
        let result = result.unwrap();
        assert_eq!(result.category, ProbeCategory::Temp);
        assert_eq!(result.code, 550);
    }

    #[test]
    fn transient_mail_failure_does_not_retry() {
        let (sent, result) = run(&["220 ready", "250 hello", "451 later"]);
        assert_eq!(sent.len(), 2);
        assert_eq!(result.unwrap().category, ProbeCategory::Temp);
    }

    #[test]
    fn bad_greeting_ends_conversation() {
        let (sent, result) = run(&["554 go away"]);
        assert!(sent.is_empty());
        let result = result.unwrap();
        assert_eq!(result.category, ProbeCategory::Temp);
        assert_eq!(result.code, 554);
    }

    #[test]
    fn multi_line_rcpt_classifies_final_line() {
        let (_, result) = run(&[
            "220 ready",
            "250 hello",
            "250 ok",
            "550-5.7.1 Service refused",
            "550 5.7.1 see https://www.spamhaus.org",
        ]);
        let result = result.unwrap();
        assert_eq!(result.category, ProbeCategory::Temp);
        assert_eq!(result.message, "550 5.7.1 see https://www.spamhaus.org");
    }

    #[test]
    fn lines_after_terminal_state_are_ignored() {
        let envelope = Envelope::new("h", "r@example.com");
        let (state, action) = transition(SmtpState::Done, 250, "250 ok", &envelope);
        assert!(state.is_terminal());
        assert_eq!(action, Action::Ignore);
    }

    #[test]
    fn reply_code_parsing() {
        assert_eq!(reply_code("250 ok"), 250);
        assert_eq!(reply_code("25"), 0);
        assert_eq!(reply_code("abc def"), 0);
        assert!(is_continuation("250-PIPELINING"));
        assert!(!is_continuation("250 PIPELINING"));
        assert!(!is_continuation("abc-"));
    }
}
