#![allow(dead_code)]

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `lines` as a gzip-compressed log file named `name` in `dir`.
pub fn write_gz_log(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    for line in lines {
        encoder.write_all(line.as_bytes()).unwrap();
        encoder.write_all(b"\n").unwrap();
    }
    encoder.finish().unwrap().sync_all().unwrap();
    path
}

/// Gzip-compresses raw bytes (for invalid UTF-8 fixtures).
pub fn write_gz_bytes(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap().sync_all().unwrap();
    path
}

pub fn write_ip_list(dir: &Path, ips: &[&str]) -> PathBuf {
    let path = dir.join("ips.txt");
    fs::write(&path, ips.join("\n")).unwrap();
    path
}

pub fn traffic_line(src: &str, dst: &str, port: u16) -> String {
    format!(
        r#"date=2025-03-24 time=10:00:{:02} log_type="Firewall" status="Allow" fw_rule_id=7 fw_rule_name="lan_out" src_ip={} dst_ip={} protocol="TCP" dst_country_code="USA" src_port=50123 dst_port={} tran_src_ip=203.0.113.9"#,
        port % 60,
        src,
        dst,
        port
    )
}
