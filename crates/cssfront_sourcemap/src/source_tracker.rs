use cssfront_shared::placeholder::{Placeholder, PlaceholderKind};

/// A file stored in the tracker, as a range of the concatenated buffer
#[derive(Clone, Debug, PartialEq)]
struct Segment {
    label: String,
    /// Offset of the segment (including its delimiters) in the concatenated buffer
    start: usize,
    /// Length of the segment including its delimiters
    length: usize,
    /// Offset of the stored content relative to `start`
    content_start: usize,
    /// Length of the stored content
    content_length: usize,
}

/// Keeps track of the files that are concatenated into the buffer handed to the tokenizer.
///
/// Every stored file is wrapped in a pair of source delimiters. They survive the escaping pass
/// unchanged, which lets the tokenizer restart its line and column counters at the start of each
/// file and report the label of the file a token comes from.
#[derive(Clone, Debug, Default)]
pub struct SourceTracker {
    segments: Vec<Segment>,
    /// Total length of all stored segments
    length: usize,
}

impl SourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the given content under `label` and returns the text to append to the buffer.
    pub fn store(&mut self, label: &str, content: &str) -> String {
        let index = self.segments.len() as u32;
        let start_marker = Placeholder::render(PlaceholderKind::Source, index, None);
        let end_marker = Placeholder::render(PlaceholderKind::SourceEnd, index, None);

        let wrapped = format!("{start_marker}{content}{end_marker}");
        self.segments.push(Segment {
            label: label.to_string(),
            start: self.length,
            length: wrapped.len(),
            content_start: start_marker.len(),
            content_length: content.len(),
        });
        self.length += wrapped.len();

        log::trace!("stored source {} ({} bytes) as segment {}", label, content.len(), index);

        wrapped
    }

    /// Returns true as soon as a file has been stored
    pub fn is_tracking(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Returns the label of the file the given offset of the concatenated buffer belongs to
    pub fn resolve(&self, offset: usize) -> Option<&str> {
        self.segment_at(offset).map(|segment| segment.label.as_str())
    }

    /// Returns the label of the file the given offset belongs to, together with the offset
    /// relative to the start of that file's content.
    pub fn locate(&self, offset: usize) -> Option<(&str, usize)> {
        let segment = self.segment_at(offset)?;
        let local = (offset - segment.start)
            .saturating_sub(segment.content_start)
            .min(segment.content_length);

        Some((segment.label.as_str(), local))
    }

    /// Returns the label of the n-th stored file
    pub fn label(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(|segment| segment.label.as_str())
    }

    /// Number of stored files
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn segment_at(&self, offset: usize) -> Option<&Segment> {
        let index = self
            .segments
            .partition_point(|segment| segment.start + segment.length <= offset);

        self.segments
            .get(index)
            .filter(|segment| segment.start <= offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untracked() {
        let tracker = SourceTracker::new();
        assert!(!tracker.is_tracking());
        assert!(tracker.is_empty());
        assert_eq!(tracker.resolve(0), None);
        assert_eq!(tracker.locate(0), None);
    }

    #[test]
    fn store_wraps_content() {
        let mut tracker = SourceTracker::new();
        let data = tracker.store("one.css", "a{}");

        assert!(tracker.is_tracking());
        assert_eq!(
            data,
            "__ESCAPED_SOURCE_CLEAN_CSS0__a{}__ESCAPED_SOURCE_END_CLEAN_CSS0__"
        );
        assert_eq!(tracker.label(0), Some("one.css"));
        assert_eq!(tracker.label(1), None);
    }

    #[test]
    fn resolve_finds_segment() {
        let mut tracker = SourceTracker::new();
        let one = tracker.store("one.css", "a{}");
        let two = tracker.store("two.css", "\na{color:red}");
        let three = tracker.store("one.css", "p{}");
        let data = format!("{one}{two}{three}");

        assert_eq!(tracker.len(), 3);
        assert_eq!(tracker.resolve(0), Some("one.css"));
        assert_eq!(tracker.resolve(one.len() - 1), Some("one.css"));
        assert_eq!(tracker.resolve(one.len()), Some("two.css"));
        assert_eq!(tracker.resolve(one.len() + two.len()), Some("one.css"));
        assert_eq!(tracker.resolve(data.len() - 1), Some("one.css"));
        assert_eq!(tracker.resolve(data.len()), None);
    }

    #[test]
    fn locate_returns_local_offset() {
        let mut tracker = SourceTracker::new();
        let one = tracker.store("one.css", "a{}");
        let two = tracker.store("two.css", "\na{color:red}");

        let second_a = one.len() + two.find("a{").unwrap();
        assert_eq!(tracker.locate(second_a), Some(("two.css", 1)));

        // Offsets on the delimiters clamp to the content
        assert_eq!(tracker.locate(0), Some(("one.css", 0)));
        assert_eq!(tracker.locate(one.len() - 1), Some(("one.css", 3)));
    }
}
