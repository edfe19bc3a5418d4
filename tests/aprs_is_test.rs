mod common;

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use tracker2aprs::aprs::{AprsIsClient, Publisher, Report, ReportComposer};
use tracker2aprs::config::{AprsIsConfig, Period};
use tracker2aprs::error::PublishError;
use tracker2aprs::tracker::{DeviceStatus, InterFixInterval, TrackerIcon};

fn report() -> Report {
    ReportComposer::new("N0CALL-7", "unit test")
        .compose(
            &common::fix(12.0, 34.0),
            &DeviceStatus {
                battery: 50,
                icon: TrackerIcon::Antenna,
            },
            &InterFixInterval::Unknown,
        )
        .unwrap()
}

/// Serve one connection with a scripted login response.
/// Returns the lines the client sent, collected once it hangs up.
fn fake_server(logresp: &'static str) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        writer.write_all(b"# aprsc 2.1.10-gd72a17c\r\n").unwrap();

        let mut lines = Vec::new();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        lines.push(line.trim_end().to_string());

        writer.write_all(b"# comment before login response\r\n").unwrap();
        writer.write_all(logresp.as_bytes()).unwrap();

        // Read until the client closes its side
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => lines.push(line.trim_end().to_string()),
            }
        }
        lines
    });

    (addr, handle)
}

fn client(server: String) -> AprsIsClient {
    client_with_timeout(server, Period::from_secs(5))
}

fn client_with_timeout(server: String, timeout: Period) -> AprsIsClient {
    let config = AprsIsConfig {
        server,
        timeout,
        passcode: None,
    };
    AprsIsClient::new(&config, "N0CALL-7", 13023)
}

#[test]
fn test_publish_logs_in_and_sends_one_line() {
    let (addr, server) = fake_server("# logresp N0CALL-7 verified, server T2TEST\r\n");
    let report = report();

    client(addr).publish(&report).unwrap();

    let lines = server.join().unwrap();
    assert_eq!(lines.len(), 2, "{:?}", lines);
    assert!(lines[0].starts_with("user N0CALL-7 pass 13023 vers tracker2aprs "));
    assert_eq!(lines[1], report.as_str());
}

#[test]
fn test_unverified_login_is_rejected_and_closed() {
    let (addr, server) = fake_server("# logresp N0CALL-7 unverified, server T2TEST\r\n");

    let err = client(addr).publish(&report()).unwrap_err();
    assert!(matches!(err, PublishError::Login(_)), "{:?}", err);

    // Server sees the hang-up and only the login line
    let lines = server.join().unwrap();
    assert_eq!(lines.len(), 1);
}

#[test]
fn test_logresp_for_other_callsign_is_rejected() {
    let (addr, server) = fake_server("# logresp N0CALL-8 verified, server T2TEST\r\n");

    let err = client(addr).publish(&report()).unwrap_err();
    assert!(matches!(err, PublishError::Login(_)), "{:?}", err);
    assert_eq!(server.join().unwrap().len(), 1);
}

#[test]
fn test_keepalives_without_logresp_time_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    // Chatty server that never answers the login
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        writer.write_all(b"# aprsc 2.1.10-gd72a17c\r\n").unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();

        for _ in 0..50 {
            if writer.write_all(b"# keepalive\r\n").is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(200));
        }
    });

    let start = Instant::now();
    let err = client_with_timeout(addr, Period::from_secs(1))
        .publish(&report())
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(matches!(err, PublishError::Timeout("login")), "{:?}", err);
    assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
}

#[test]
fn test_connection_refused() {
    // Grab a free port, then close it so nothing listens there
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };

    let err = client(addr).publish(&report()).unwrap_err();
    assert!(matches!(err, PublishError::Connect { .. }), "{:?}", err);
}

#[test]
fn test_unresolvable_server() {
    let err = client("not a host name".into()).publish(&report()).unwrap_err();
    assert!(matches!(err, PublishError::Resolve(_)), "{:?}", err);
}
