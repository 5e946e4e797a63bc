//! Opening the output folder in the platform's file browser

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Shows a directory to the operator
pub trait Revealer {
    /// Open `path` in a file browser
    fn reveal(&self, path: &Path) -> io::Result<()>;
}

/// Program used to open a folder on this platform
#[cfg(target_os = "windows")]
pub const OPENER: &str = "explorer";
#[cfg(target_os = "macos")]
pub const OPENER: &str = "open";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const OPENER: &str = "xdg-open";

/// Opens folders with the platform's default opener
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRevealer;

impl Revealer for SystemRevealer {
    fn reveal(&self, path: &Path) -> io::Result<()> {
        debug!(opener = OPENER, path = %path.display(), "Revealing output folder");
        let status = Command::new(OPENER)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        // explorer.exe exits with 1 even when the window opened
        if cfg!(target_os = "windows") || status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {}", OPENER, status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_is_set() {
        assert!(!OPENER.is_empty());
    }

    #[test]
    fn test_revealer_is_object_safe() {
        struct Recording(std::cell::RefCell<Vec<std::path::PathBuf>>);
        impl Revealer for Recording {
            fn reveal(&self, path: &Path) -> io::Result<()> {
                self.0.borrow_mut().push(path.to_path_buf());
                Ok(())
            }
        }

        let recording = Recording(Default::default());
        let revealer: &dyn Revealer = &recording;
        revealer.reveal(Path::new("out")).unwrap();
        assert_eq!(recording.0.borrow().as_slice(), [std::path::PathBuf::from("out")]);
    }
}
