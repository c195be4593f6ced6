mod common;

use chrono::NaiveDate;
use common::{traffic_line, write_gz_bytes, write_gz_log};
use fwsift::FileError;
use fwsift::extract::FieldExtractor;
use fwsift::matcher::IpMatcher;
use fwsift::types::{FieldLayout, IpSet, LogFileDescriptor};
use fwsift::worker::{scan_file, scan_lines};
use proptest::prelude::*;
use std::fs;
use std::io::{self, BufReader, Cursor, Read};
use tempfile::TempDir;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 24).unwrap()
}

fn tools(ips: &[&str]) -> (IpMatcher, FieldExtractor) {
    let set: IpSet = ips.iter().collect();
    (
        IpMatcher::new(&set).unwrap(),
        FieldExtractor::new(FieldLayout::Standard).unwrap(),
    )
}

/// Yields `data`, then fails every further read.
struct FailAfter {
    inner: Cursor<Vec<u8>>,
}

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "simulated"));
        }
        Ok(n)
    }
}

#[test]
fn test_only_matching_lines_become_records() {
    let dir = TempDir::new().unwrap();
    let path = write_gz_log(
        dir.path(),
        "Firewall_Rules.24.03.25.gz",
        &[
            &traffic_line("10.0.0.5", "8.8.8.8", 443),
            &traffic_line("172.16.0.1", "8.8.4.4", 53),
            &traffic_line("192.168.1.20", "10.0.0.5", 22),
            "heartbeat",
        ],
    );
    let (matcher, extractor) = tools(&["10.0.0.5"]);

    let outcome = scan_file(&LogFileDescriptor::new(path, day()), &matcher, &extractor);

    assert!(outcome.is_ok());
    assert_eq!(outcome.lines_read, 4);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].get("src_ip"), Some("10.0.0.5"));
    assert_eq!(outcome.records[1].get("dst_ip"), Some("10.0.0.5"));
    assert_eq!(outcome.records[1].get("dst_port"), Some("22"));
}

#[test]
fn test_invalid_utf8_does_not_stop_the_read() {
    let dir = TempDir::new().unwrap();
    let mut data = Vec::new();
    data.extend_from_slice(b"src_ip=10.0.0.5 fw_rule_name=caf\xe9 status=Allow\n");
    data.extend_from_slice(b"\xff\xfe garbage\n");
    data.extend_from_slice(b"src_ip=10.0.0.5 status=Deny\r\n");
    let path = write_gz_bytes(dir.path(), "fw.24.03.25.gz", &data);
    let (matcher, extractor) = tools(&["10.0.0.5"]);

    let outcome = scan_file(&LogFileDescriptor::new(path, day()), &matcher, &extractor);

    assert!(outcome.is_ok());
    assert_eq!(outcome.lines_read, 3);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].get("status"), Some("Allow"));
    assert_eq!(outcome.records[1].get("status"), Some("Deny"));
}

#[test]
fn test_concatenated_gzip_members_are_read() {
    let dir = TempDir::new().unwrap();
    let first = write_gz_log(dir.path(), "a.gz", &["src_ip=10.0.0.5 status=one"]);
    let second = write_gz_log(dir.path(), "b.gz", &["src_ip=10.0.0.5 status=two"]);
    let mut joined = fs::read(&first).unwrap();
    joined.extend(fs::read(&second).unwrap());
    let path = dir.path().join("fw.24.03.25.gz");
    fs::write(&path, joined).unwrap();
    let (matcher, extractor) = tools(&["10.0.0.5"]);

    let outcome = scan_file(&LogFileDescriptor::new(path, day()), &matcher, &extractor);

    assert!(outcome.is_ok());
    let statuses: Vec<_> = outcome.records.iter().map(|r| r.get("status")).collect();
    assert_eq!(statuses, vec![Some("one"), Some("two")]);
}

#[test]
fn test_missing_file_reports_open_error() {
    let dir = TempDir::new().unwrap();
    let (matcher, extractor) = tools(&["10.0.0.5"]);
    let descriptor = LogFileDescriptor::new(dir.path().join("fw.24.03.25.gz"), day());

    let outcome = scan_file(&descriptor, &matcher, &extractor);

    assert!(matches!(outcome.error, Some(FileError::Open(_))));
    assert!(outcome.records.is_empty());
}

#[test]
fn test_not_gzip_reports_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fw.24.03.25.gz");
    fs::write(&path, "src_ip=10.0.0.5 plain text, not gzip\n").unwrap();
    let (matcher, extractor) = tools(&["10.0.0.5"]);

    let outcome = scan_file(&LogFileDescriptor::new(path, day()), &matcher, &extractor);

    assert!(matches!(outcome.error, Some(FileError::Read { .. })));
    assert!(outcome.records.is_empty());
}

#[test]
fn test_truncated_gzip_keeps_partial_records() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..20_000)
        .map(|i| {
            let dst = format!("8.8.{}.{}", i / 256 % 256, i % 256);
            traffic_line("10.0.0.5", &dst, (i % 65_000) as u16)
        })
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let full = write_gz_log(dir.path(), "full.gz", &refs);
    let bytes = fs::read(&full).unwrap();
    let path = dir.path().join("fw.24.03.25.gz");
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    let (matcher, extractor) = tools(&["10.0.0.5"]);

    let outcome = scan_file(&LogFileDescriptor::new(path, day()), &matcher, &extractor);

    assert!(matches!(outcome.error, Some(FileError::Read { .. })));
    assert!(outcome.records.len() < lines.len());
    assert!(outcome.lines_read >= outcome.records.len() as u64);
}

#[test]
fn test_mid_stream_failure_returns_lines_before_it() {
    let data = [
        "src_ip=10.0.0.5 status=a\n",
        "src_ip=1.1.1.1\n",
        "src_ip=10.0.0.5 status=b\n",
        "src_ip=10.0.0.5 stat",
    ]
    .concat()
    .into_bytes();
    let reader = BufReader::new(FailAfter {
        inner: Cursor::new(data),
    });
    let (matcher, extractor) = tools(&["10.0.0.5"]);
    let descriptor = LogFileDescriptor::new("fw.24.03.25.gz".into(), day());

    let outcome = scan_lines(reader, &descriptor, &matcher, &extractor);

    match outcome.error {
        Some(FileError::Read { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected read error, got {:?}", other),
    }
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[1].get("status"), Some("b"));
}

proptest! {
    #[test]
    fn prop_lines_without_ip_produce_nothing(
        lines in proptest::collection::vec(("[a-z_= ]{0,40}", any::<bool>()), 0..50)
    ) {
        let (matcher, extractor) = tools(&["10.0.0.5"]);
        let mut text = String::new();
        let mut expected = 0;
        for (line, with_ip) in &lines {
            text.push_str(line);
            if *with_ip {
                text.push_str(" src_ip=10.0.0.5");
                expected += 1;
            }
            text.push('\n');
        }
        let descriptor = LogFileDescriptor::new("fw.24.03.25.gz".into(), day());

        let outcome = scan_lines(Cursor::new(text.into_bytes()), &descriptor, &matcher, &extractor);

        prop_assert!(outcome.error.is_none());
        prop_assert_eq!(outcome.records.len(), expected);
        prop_assert_eq!(outcome.lines_read, lines.len() as u64);
        for record in &outcome.records {
            prop_assert_eq!(record.get("src_ip"), Some("10.0.0.5"));
        }
    }
}
