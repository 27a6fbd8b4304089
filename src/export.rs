use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::notify::{Notice, Notifier};
use crate::{VecnaError, VecnaResult};

/// Name given to every downloaded vector result.
pub const SVG_FILE_NAME: &str = "vectorized.svg";
pub const SVG_MIME: &str = "image/svg+xml";

pub const DOWNLOADED_NOTICE: &str = "SVG downloaded";
pub const COPIED_NOTICE: &str = "Copied to clipboard";
pub const COPY_FAILED_NOTICE: &str = "Failed to copy to clipboard";

/// Somewhere plain text can be copied to.
pub trait ClipboardSink {
    fn set_text(&self, text: &str) -> Result<(), String>;
}

/// Write `svg` byte for byte to `path`.
pub fn write_svg(svg: &str, path: impl AsRef<Path>) -> VecnaResult<()> {
    fs::write(path.as_ref(), svg)?;
    debug!(path = %path.as_ref().display(), len = svg.len(), "svg written");
    Ok(())
}

/// Save the current result as [`SVG_FILE_NAME`] inside `dir`.
///
/// Nothing happens without a result; otherwise returns the written path.
pub fn download_svg(
    svg: Option<&str>,
    dir: impl AsRef<Path>,
    notifier: &dyn Notifier,
) -> VecnaResult<Option<PathBuf>> {
    let Some(svg) = svg else {
        return Ok(None);
    };
    let path = dir.as_ref().join(SVG_FILE_NAME);
    write_svg(svg, &path)?;
    notifier.notify(Notice::success(DOWNLOADED_NOTICE));
    Ok(Some(path))
}

/// Copy `text` via `primary`, trying `fallback` when that fails.
pub fn copy_with_fallback(
    text: &str,
    primary: &dyn ClipboardSink,
    fallback: &dyn ClipboardSink,
) -> VecnaResult<()> {
    let first = match primary.set_text(text) {
        Ok(()) => return Ok(()),
        Err(err) => err,
    };
    warn!(error = %first, "clipboard copy failed, trying fallback");
    fallback.set_text(text).map_err(|second| {
        warn!(error = %second, "fallback copy failed");
        VecnaError::Clipboard(format!("{first}; fallback: {second}"))
    })
}

/// Copy the current result and report the outcome as a notice.
///
/// Returns whether anything was copied; no result means nothing to do.
pub fn copy_svg(
    svg: Option<&str>,
    primary: &dyn ClipboardSink,
    fallback: &dyn ClipboardSink,
    notifier: &dyn Notifier,
) -> VecnaResult<bool> {
    let Some(svg) = svg else {
        return Ok(false);
    };
    match copy_with_fallback(svg, primary, fallback) {
        Ok(()) => {
            notifier.notify(Notice::success(COPIED_NOTICE));
            Ok(true)
        }
        Err(err) => {
            notifier.notify(Notice::error(COPY_FAILED_NOTICE));
            Err(err)
        }
    }
}

#[cfg(feature = "clipboard")]
pub use system::{SelectionClipboard, SystemClipboard};

#[cfg(feature = "clipboard")]
mod system {
    use std::time::Duration;

    use super::ClipboardSink;

    /// How long to keep the clipboard handle alive so clipboard managers can grab the text.
    const HOLD: Duration = Duration::from_millis(100);

    /// The regular system clipboard.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClipboard;

    impl ClipboardSink for SystemClipboard {
        fn set_text(&self, text: &str) -> Result<(), String> {
            let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
            clipboard.set_text(text.to_owned()).map_err(|e| e.to_string())?;
            std::thread::sleep(HOLD);
            Ok(())
        }
    }

    /// The primary selection on Linux; a fresh clipboard handle elsewhere.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SelectionClipboard;

    impl ClipboardSink for SelectionClipboard {
        #[cfg(target_os = "linux")]
        fn set_text(&self, text: &str) -> Result<(), String> {
            use arboard::{LinuxClipboardKind, SetExtLinux};

            let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
            clipboard
                .set()
                .clipboard(LinuxClipboardKind::Primary)
                .text(text.to_owned())
                .map_err(|e| e.to_string())?;
            std::thread::sleep(HOLD);
            Ok(())
        }

        #[cfg(not(target_os = "linux"))]
        fn set_text(&self, text: &str) -> Result<(), String> {
            let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
            clipboard.set().text(text.to_owned()).map_err(|e| e.to_string())?;
            std::thread::sleep(HOLD);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeKind, RecordingNotifier};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeClipboard {
        fail: bool,
        text: Mutex<Option<String>>,
    }

    impl FakeClipboard {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl ClipboardSink for FakeClipboard {
        fn set_text(&self, text: &str) -> Result<(), String> {
            if self.fail {
                return Err("denied".into());
            }
            *self.text.lock() = Some(text.to_owned());
            Ok(())
        }
    }

    const SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\">\n  <path d=\"M0 0\"/>\n</svg>\n";

    #[test]
    fn download_writes_exact_content_under_fixed_name() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = RecordingNotifier::new();

        let path = download_svg(Some(SVG), dir.path(), &notifier).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), "vectorized.svg");
        assert_eq!(fs::read_to_string(&path).unwrap(), SVG);
        assert_eq!(notifier.messages(), vec![DOWNLOADED_NOTICE.to_string()]);
    }

    #[test]
    fn download_without_result_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = RecordingNotifier::new();
        assert_eq!(download_svg(None, dir.path(), &notifier).unwrap(), None);
        assert!(!dir.path().join(SVG_FILE_NAME).exists());
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_svg(SVG, dir.path().join("nope").join("x.svg")).unwrap_err();
        assert!(matches!(err, VecnaError::Io(_)));
    }

    #[test]
    fn copy_uses_primary_when_it_works() {
        let (primary, fallback) = (FakeClipboard::default(), FakeClipboard::default());
        let notifier = RecordingNotifier::new();
        assert!(copy_svg(Some(SVG), &primary, &fallback, &notifier).unwrap());
        assert_eq!(primary.text.lock().as_deref(), Some(SVG));
        assert_eq!(*fallback.text.lock(), None);
        assert_eq!(notifier.messages(), vec![COPIED_NOTICE.to_string()]);
    }

    #[test]
    fn copy_falls_back_when_primary_fails() {
        let (primary, fallback) = (FakeClipboard::failing(), FakeClipboard::default());
        let notifier = RecordingNotifier::new();
        assert!(copy_svg(Some(SVG), &primary, &fallback, &notifier).unwrap());
        assert_eq!(fallback.text.lock().as_deref(), Some(SVG));
        assert_eq!(notifier.notices()[0].kind, NoticeKind::Success);
    }

    #[test]
    fn copy_reports_failure_when_both_fail() {
        let (primary, fallback) = (FakeClipboard::failing(), FakeClipboard::failing());
        let notifier = RecordingNotifier::new();
        let err = copy_svg(Some(SVG), &primary, &fallback, &notifier).unwrap_err();
        assert_eq!(err.to_string(), "Failed to copy to clipboard");
        let notices = notifier.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0], Notice::error(COPY_FAILED_NOTICE));
    }

    #[test]
    fn copy_without_result_does_nothing() {
        let primary = FakeClipboard::default();
        let notifier = RecordingNotifier::new();
        assert!(!copy_svg(None, &primary, &primary, &notifier).unwrap());
        assert!(notifier.notices().is_empty());
    }
}
