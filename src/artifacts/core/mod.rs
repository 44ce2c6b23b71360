//! Shared output utilities

use derive_new::new;
use minus::Pager;
use std::io::{self, Write};

/// Environment variable disabling the pager for long outputs (`log`, `diff`)
pub const NO_PAGER_ENV: &str = "NO_PAGER";

/// Wrapper that implements `Write` for the minus pager
///
/// The minus pager only accepts strings, so this adapter lets commands write to it through the
/// same `Box<dyn Write>` they use for stdout.
///
/// ## Usage
///
/// ```ignore
/// let pager = Pager::new();
/// let mut writer = PagerWriter::new(pager.clone());
/// writeln!(writer, "Some long output...")?;
/// minus::page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl PagerWriter {
    pub fn pager(&self) -> &Pager {
        &self.pager
    }
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Whether a long output should be paged
///
/// Only when writing to a terminal and `NO_PAGER` is unset.
pub fn should_page(is_terminal: bool) -> bool {
    is_terminal && std::env::var_os(NO_PAGER_ENV).is_none()
}
