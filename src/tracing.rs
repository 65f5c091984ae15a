use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Writes every log line to stderr and, when configured, appends it to a file.
#[derive(Clone, Default)]
struct TeeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl TeeWriter {
    fn with_file(log_file: Option<&Path>) -> Self {
        let file = log_file.and_then(|path| match open_log_file(path) {
            Ok(file) => Some(Arc::new(Mutex::new(file))),
            Err(err) => {
                eprintln!("cannot open log file {}: {}", path.display(), err);
                None
            }
        });
        Self { file }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = io::stderr().write(buf)?;
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(&buf[..written]);
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for TeeWriter {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber. `log` records are forwarded into `tracing`.
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init(log_file: Option<&Path>) {
    let _ = tracing_log::LogTracer::init();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(TeeWriter::with_file(log_file))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tee_writer_appends_to_log_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("maintenance.log");

        let mut writer = TeeWriter::with_file(Some(&path));
        writer.write_all(b"first line\n").unwrap();
        writer.flush().unwrap();

        let mut again = TeeWriter::with_file(Some(&path));
        again.write_all(b"second line\n").unwrap();
        again.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first line\nsecond line\n");
    }

    #[test]
    fn tee_writer_without_file_still_writes() {
        let mut writer = TeeWriter::default();
        assert_eq!(writer.write(b"stderr only\n").unwrap(), 12);
    }
}
