//! APRS-IS transmit path.
//!
//! Each publish opens a fresh TCP connection, logs in, sends one line and
//! closes. Nothing is held open between scheduler ticks.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use super::report::Report;
use crate::config::AprsIsConfig;
use crate::error::PublishError;

/// Sink for composed reports
pub trait Publisher {
    fn publish(&mut self, report: &Report) -> Result<(), PublishError>;
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn publish(&mut self, report: &Report) -> Result<(), PublishError> {
        (**self).publish(report)
    }
}

/// Logged-in APRS-IS session, shut down on drop
struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    timeout: Duration,
}

impl Connection {
    fn open(server: &str, timeout: Duration) -> Result<Self, PublishError> {
        let addrs = server
            .to_socket_addrs()
            .map_err(|_| PublishError::Resolve(server.to_string()))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout))?;
                    stream.set_write_timeout(Some(timeout))?;
                    log::debug!("Connected to {} ({})", server, addr);
                    let writer = stream.try_clone()?;
                    return Ok(Self {
                        reader: BufReader::new(stream),
                        writer,
                        timeout,
                    });
                }
                Err(e) => last_err = Some(e),
            }
        }

        match last_err {
            Some(source) => Err(PublishError::Connect {
                server: server.to_string(),
                source,
            }),
            None => Err(PublishError::Resolve(server.to_string())),
        }
    }

    fn read_line(&mut self, stage: &'static str) -> Result<String, PublishError> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Err(PublishError::Closed(stage)),
            Ok(_) => Ok(line.trim_end().to_string()),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                Err(PublishError::Timeout(stage))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn send_line(&mut self, line: &str) -> Result<(), PublishError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\r\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Read the banner, log in and wait for `# logresp`.
    ///
    /// The whole exchange shares one deadline of `timeout`, however many
    /// comment lines the server sends in the meantime.
    fn login(&mut self, callsign: &str, passcode: u16) -> Result<(), PublishError> {
        let deadline = Instant::now() + self.timeout;

        let banner = self.read_line("banner")?;
        log::debug!("Server banner: {}", banner);

        self.send_line(&format!(
            "user {} pass {} vers {} {}",
            callsign,
            passcode,
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))?;

        // Servers may interleave comment lines before the login response
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .filter(|d| !d.is_zero())
                .ok_or(PublishError::Timeout("login"))?;
            self.reader.get_ref().set_read_timeout(Some(remaining))?;

            let line = self.read_line("login")?;
            let Some(resp) = line.strip_prefix("# logresp") else {
                continue;
            };
            log::debug!("Login response: {}", line);

            let mut fields = resp.split_whitespace();
            let who = fields.next().unwrap_or_default();
            if !who.eq_ignore_ascii_case(callsign) {
                return Err(PublishError::Login(format!(
                    "response for {:?}, logged in as {:?} ({})",
                    who, callsign, line
                )));
            }
            return match fields.next().unwrap_or_default().trim_end_matches(',') {
                "verified" => Ok(()),
                other => Err(PublishError::Login(format!("{} ({})", other, line))),
            };
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self.writer.shutdown(Shutdown::Both);
    }
}

/// [`Publisher`] that injects reports into APRS-IS
pub struct AprsIsClient {
    server: String,
    callsign: String,
    passcode: u16,
    timeout: Duration,
}

impl AprsIsClient {
    pub fn new(config: &AprsIsConfig, callsign: impl Into<String>, passcode: u16) -> Self {
        Self {
            server: config.server.clone(),
            callsign: callsign.into(),
            passcode,
            timeout: Duration::from(config.timeout),
        }
    }
}

impl Publisher for AprsIsClient {
    fn publish(&mut self, report: &Report) -> Result<(), PublishError> {
        let mut conn = Connection::open(&self.server, self.timeout)?;
        conn.login(&self.callsign, self.passcode)?;
        conn.send_line(report.as_str())?;
        log::info!("Sent report via {}", self.server);
        Ok(())
    }
}

/// [`Publisher`] that only logs, for `--dry-run`
pub struct DryRun;

impl Publisher for DryRun {
    fn publish(&mut self, report: &Report) -> Result<(), PublishError> {
        log::info!("Dry run, not sending: {}", report);
        Ok(())
    }
}
