#![allow(dead_code)]

pub mod command;
pub mod file;

/// Matches a full 40-character object id
pub const OID_PATTERN: &str = r"[0-9a-f]{40}";

/// Extract the abbreviated commit id from a `[<branch> <short-oid>] <message>` summary line
pub fn short_oid_from_summary(stdout: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let summary = stdout
        .lines()
        .find(|line| line.starts_with('['))
        .unwrap_or_else(|| panic!("no commit summary in output: {stdout}"));
    let (inside, _) = summary[1..]
        .split_once(']')
        .unwrap_or_else(|| panic!("malformed commit summary: {summary}"));

    inside
        .rsplit(' ')
        .next()
        .unwrap_or_else(|| panic!("malformed commit summary: {summary}"))
        .to_string()
}
