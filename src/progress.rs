//! Progress and logging helpers that keep progress bars pinned.
//!
//! Tracing output is routed through the shared `MultiProgress` so per-item
//! log lines scroll above the bar instead of tearing it apart.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(|| {
        let mp = MultiProgress::new();
        mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        mp
    })
}

/// A bar for a batch of benchmark items, labeled with the run kind.
pub fn item_bar(len: u64, label: &str) -> ProgressBar {
    let bar = multi_progress().add(ProgressBar::new(len));
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(label.to_string());
    bar
}

/// `MakeWriter` that forwards tracing output through the multi-progress
/// handle, line by line.
#[derive(Default, Clone)]
pub struct ConsoleWriterFactory;

pub struct ConsoleWriter {
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn emit(line: &str) {
        let line = line.trim_end_matches('\r');
        let _ = multi_progress().println(line.to_string());
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        while let Some(idx) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=idx).collect();
            Self::emit(String::from_utf8_lossy(&line[..line.len() - 1]).as_ref());
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            let rest: Vec<u8> = self.buffer.drain(..).collect();
            Self::emit(String::from_utf8_lossy(&rest).as_ref());
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriterFactory {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buffer: Vec::new() }
    }
}
