use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// A file handed to the widget for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// MIME type; guessed from the file name when absent.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Final body of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub format: String,
    #[serde(default)]
    pub content_length: Option<u64>,
    #[serde(default)]
    pub stored_in_knowledge: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Percentage of the request body sent so far.
    Progress(u8),
    Completed(UploadReceipt),
    /// Backend `detail` when one was sent.
    Failed(Option<String>),
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadEvent::Progress(_))
    }
}

pub type UploadEventStream = BoxStream<'static, UploadEvent>;

/// Turns byte counts into strictly increasing percentages.
///
/// The first call to `start` yields 0; `finish` yields 100 unless it was
/// already reported. Repeated percentages are swallowed.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u64,
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self { total, last: None }
    }

    pub fn start(&mut self) -> Option<u8> {
        self.emit(0)
    }

    /// Reports `loaded` bytes out of the total.
    pub fn advance(&mut self, loaded: u64) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let loaded = loaded.min(self.total);
        let percent = ((100 * loaded + self.total / 2) / self.total) as u8;
        self.emit(percent)
    }

    pub fn finish(&mut self) -> Option<u8> {
        self.emit(100)
    }

    fn emit(&mut self, percent: u8) -> Option<u8> {
        match self.last {
            Some(last) if percent <= last => None,
            _ => {
                self.last = Some(percent);
                Some(percent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_strictly_increases_from_zero_to_hundred() {
        let mut tracker = ProgressTracker::new(1000);
        let mut seen = Vec::new();
        seen.extend(tracker.start());
        for loaded in (0..=1000).step_by(64) {
            seen.extend(tracker.advance(loaded));
        }
        seen.extend(tracker.advance(1000));
        seen.extend(tracker.finish());

        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_file_reports_zero_then_hundred() {
        let mut tracker = ProgressTracker::new(0);
        assert_eq!(tracker.start(), Some(0));
        assert_eq!(tracker.advance(0), None);
        assert_eq!(tracker.finish(), Some(100));
        assert_eq!(tracker.finish(), None);
    }

    #[test]
    fn test_terminal_events() {
        assert!(!UploadEvent::Progress(50).is_terminal());
        assert!(UploadEvent::Failed(None).is_terminal());
    }
}
