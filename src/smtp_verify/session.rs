use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::smtp_verify::error::SmtpVerifyError;

/// Blocking SMTP connection bounded by one overall deadline.
///
/// The socket is shut down when the session is dropped.
pub struct SmtpSession {
    host: String,
    reader: BufReader<TcpStream>,
    deadline: Instant,
}

impl SmtpSession {
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self, SmtpVerifyError> {
        let deadline = Instant::now() + timeout;
        let addresses = (host, port)
            .to_socket_addrs()
            .map_err(|err| SmtpVerifyError::connect(host, err))?;

        let mut last_err = None;
        for addr in addresses {
            let budget = match remaining(deadline) {
                Ok(budget) => budget,
                Err(err) => {
                    last_err = Some(err);
                    break;
                }
            };
            match TcpStream::connect_timeout(&addr, budget) {
                Ok(stream) => {
                    return Ok(Self {
                        host: host.to_string(),
                        reader: BufReader::new(stream),
                        deadline,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(SmtpVerifyError::connect(
            host,
            last_err.unwrap_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "no usable address for host")
            }),
        ))
    }

    /// Next line without its CRLF; `None` once the peer closed the stream.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let budget = remaining(self.deadline)?;
        self.reader.get_ref().set_read_timeout(Some(budget))?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        debug!(host = %self.host, "S: {line}");
        Ok(Some(line))
    }

    pub fn send(&mut self, command: &str) -> io::Result<()> {
        debug!(host = %self.host, "C: {command}");
        let budget = remaining(self.deadline)?;
        let stream = self.reader.get_mut();
        stream.set_write_timeout(Some(budget))?;
        stream.write_all(command.as_bytes())?;
        stream.write_all(b"\r\n")?;
        stream.flush()
    }

    /// Best-effort `QUIT`; the reply is not awaited.
    pub fn quit(&mut self) {
        let _ = self.send("QUIT");
    }
}

impl Drop for SmtpSession {
    fn drop(&mut self) {
        let _ = self.reader.get_ref().shutdown(Shutdown::Both);
    }
}

/// Time left before `deadline`, or a `TimedOut` error once it has passed.
fn remaining(deadline: Instant) -> io::Result<Duration> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        Err(io::Error::new(io::ErrorKind::TimedOut, "deadline elapsed"))
    } else {
        Ok(left)
    }
}

pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_time_until_deadline() {
        let left = remaining(Instant::now() + Duration::from_secs(30)).unwrap();
        assert!(left > Duration::from_secs(25) && left <= Duration::from_secs(30));

        let err = remaining(Instant::now()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(is_timeout(&err));
    }

    #[test]
    fn elapsed_deadline_fails_before_connecting() {
        let err = SmtpSession::connect("127.0.0.1", 25, Duration::ZERO)
            .err()
            .expect("zero budget cannot connect");
        match err {
            SmtpVerifyError::Connect { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::TimedOut)
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
