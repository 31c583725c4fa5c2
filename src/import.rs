//! Waveform import from delimited text.
//!
//! Reads newline-delimited rows of `timestamp_seconds,value,...`, infers the
//! channel layout from the first line, and materializes one analog channel
//! and one waveform per value column. Ingestion is deliberately lenient:
//! fields that fail to parse count as 0, short rows feed only the columns
//! they cover, and only a failed open aborts the import.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{error, trace};

use crate::channel::{default_channel_color, Channel, ChannelType};
use crate::error::CaptureError;
use crate::mock::MockScope;
use crate::waveform::{AnalogWaveform, FS_PER_SECOND};

/// Capacity of the line buffer. Bytes of a physical line beyond this are
/// silently discarded; the truncated line still parses.
const LINE_CAPACITY: usize = 1024;

/// Pulls one physical line at a time into a capacity-bounded buffer.
struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(LINE_CAPACITY),
        }
    }

    /// Next line without its terminator, or `None` at end of stream.
    ///
    /// Read errors after a successful open end the stream instead of
    /// surfacing; whatever was already buffered for the current line is
    /// returned first.
    fn next_line(&mut self) -> Option<&[u8]> {
        self.buf.clear();
        loop {
            let chunk = match self.inner.fill_buf() {
                Ok(chunk) => chunk,
                Err(_) => &[],
            };
            if chunk.is_empty() {
                if self.buf.is_empty() {
                    return None;
                }
                return Some(&self.buf);
            }
            let room = LINE_CAPACITY - self.buf.len();
            match chunk.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    self.buf.extend_from_slice(&chunk[..newline.min(room)]);
                    self.inner.consume(newline + 1);
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                    return Some(&self.buf);
                }
                None => {
                    let len = chunk.len();
                    self.buf.extend_from_slice(&chunk[..len.min(room)]);
                    self.inner.consume(len);
                }
            }
        }
    }
}

/// Scan-and-ignore-failure float parse: unparseable text counts as 0.
fn parse_lenient(field: &str) -> f64 {
    field.trim().parse().unwrap_or(0.0)
}

/// Splits a line into float fields on commas.
///
/// A terminator mid-buffer ends the row; the field pending at that point or
/// at the end of the buffer is still flushed, so every line yields at least
/// one field.
fn parse_fields(line: &[u8]) -> Vec<f64> {
    let mut row = Vec::new();
    let mut field = String::new();
    for &byte in line {
        match byte {
            b',' => {
                row.push(parse_lenient(&field));
                field.clear();
            }
            b'\n' | b'\r' => break,
            _ => field.push(char::from(byte)),
        }
    }
    row.push(parse_lenient(&field));
    row
}

/// Same scan as [`parse_fields`], collecting verbatim text fields instead.
fn parse_labels(line: &[u8]) -> Vec<String> {
    let mut labels = Vec::new();
    let mut field = String::new();
    for &byte in line {
        match byte {
            b',' => labels.push(std::mem::take(&mut field)),
            b'\n' | b'\r' => break,
            _ => field.push(char::from(byte)),
        }
    }
    labels.push(field);
    labels
}

/// A first line is numeric when every byte could belong to a timestamp/value
/// row: ASCII digits, whitespace, commas, decimal points. Anything else,
/// including sign and exponent characters, marks a header.
fn line_is_numeric(line: &[u8]) -> bool {
    line.iter()
        .all(|&b| b.is_ascii_digit() || b.is_ascii_whitespace() || b == b',' || b == b'.')
}

impl MockScope {
    /// Imports timestamped samples from a comma-delimited text file.
    ///
    /// The first line either names the channels (non-numeric) or is itself
    /// the first data row (numeric, names synthesized as `CH1..CHn`). Field
    /// 0 of every data row is the timestamp in seconds; the remaining fields
    /// are per-channel values. Channels are created only if the instrument
    /// has none — an import never replaces an existing channel layout — and
    /// a fresh waveform is bound to each covered channel at segment 0. Once
    /// the stream is exhausted, each channel's display range and offset are
    /// derived from its observed sample extrema.
    ///
    /// Only a failed open is an error. Malformed fields parse as 0, short
    /// rows feed only the columns they cover, physical lines are truncated
    /// at 1024 bytes, and an empty file is a successful no-op.
    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<(), CaptureError> {
        let path = path.as_ref();
        trace!("importing waveform file {}", path.display());

        let file = File::open(path).map_err(|source| {
            error!("failed to open waveform file {}", path.display());
            CaptureError::ImportOpen {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let mut reader = LineReader::new(BufReader::new(file));

        let mut nrows = 0usize;
        let mut ncols = 0usize;
        let mut names: Vec<String> = Vec::new();
        let mut bound = false;

        while let Some(line) = reader.next_line() {
            nrows += 1;
            let row = parse_fields(line);

            // The first line decides the schema. Field 0 of every row is the
            // timestamp, so the remaining fields are signal columns.
            if nrows == 1 {
                ncols = row.len() - 1;
                if !line_is_numeric(line) {
                    names = parse_labels(line);
                    // Discard the timestamp column label.
                    names.remove(0);
                    trace!("found {ncols} signal columns, with header row");
                    continue;
                }
                names = (1..=ncols).map(|i| format!("CH{i}")).collect();
                trace!("found {ncols} signal columns, no header row");
            }

            if self.channel_count() == 0 {
                for (i, name) in names.iter().enumerate() {
                    let mut chan = Channel::new(
                        i,
                        name.clone(),
                        ChannelType::Analog,
                        default_channel_color(i),
                        1.0,
                    );
                    chan.set_default_display_name();
                    self.add_channel(chan);
                }
            }

            if !bound {
                for i in 0..ncols {
                    if let Some(chan) = self.channel_mut(i) {
                        chan.set_data(AnalogWaveform::new(), 0);
                    }
                }
                bound = true;
            }

            let timestamp = (row[0] * FS_PER_SECOND as f64) as i64;
            for i in 0..ncols {
                if i + 1 >= row.len() {
                    break;
                }
                if let Some(wfm) = self.channel_mut(i).and_then(|c| c.data_mut(0)) {
                    wfm.append(timestamp, row[i + 1] as f32);
                }
            }
        }

        // Derive display calibration from the observed sample range.
        for i in 0..ncols {
            let Some(chan) = self.channel_mut(i) else {
                continue;
            };
            let Some(wfm) = chan.data(0) else {
                continue;
            };
            let mut vmin = f32::MAX;
            let mut vmax = f32::MIN;
            for &v in &wfm.samples {
                vmax = vmax.max(v);
                vmin = vmin.min(v);
            }
            chan.set_voltage_range(f64::from(vmax - vmin));
            chan.set_offset(f64::from((vmin - vmax) / 2.0));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::Oscilloscope;
    use std::io::{Cursor, Write as _};
    use tempfile::NamedTempFile;

    fn import(contents: &str) -> MockScope {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut scope = MockScope::new("import", "none", "");
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        scope.load_csv(file.path()).unwrap();
        scope
    }

    #[test]
    fn header_row_names_the_channels() {
        let scope = import("time,A,B\n0.0,1.0,2.0\n0.001,1.5,2.5\n");
        assert_eq!(scope.channel_count(), 2);
        assert_eq!(scope.channel(0).unwrap().name(), "A");
        assert_eq!(scope.channel(1).unwrap().name(), "B");
        assert_eq!(scope.channel(0).unwrap().display_name(), "A");
        assert_eq!(scope.channel(1).unwrap().index(), 1);
        assert_eq!(scope.channel(0).unwrap().unit_scale(), 1.0);
        assert_eq!(scope.channel(0).unwrap().color(), default_channel_color(0));
        assert_eq!(scope.channel(0).unwrap().channel_type(), ChannelType::Analog);

        let wfm = scope.channel(0).unwrap().data(0).unwrap();
        assert_eq!(wfm.offsets, vec![0, 1_000_000_000_000]);
        assert_eq!(wfm.durations, vec![1_000_000_000_000, 1]);
        assert_eq!(wfm.samples, vec![1.0, 1.5]);
        assert_eq!(scope.channel_voltage_range(0), 0.5);
        assert_eq!(scope.channel_offset(0), -0.25);

        let wfm = scope.channel(1).unwrap().data(0).unwrap();
        assert_eq!(wfm.samples, vec![2.0, 2.5]);
    }

    #[test]
    fn numeric_first_row_synthesizes_names_and_counts_as_data() {
        let scope = import("0.0,1.0\n0.1,3.0\n");
        assert_eq!(scope.channel_count(), 1);
        assert_eq!(scope.channel(0).unwrap().name(), "CH1");

        let wfm = scope.channel(0).unwrap().data(0).unwrap();
        assert_eq!(wfm.samples, vec![1.0, 3.0]);
        assert_eq!(wfm.offsets, vec![0, 100_000_000_000_000]);
    }

    #[test]
    fn short_rows_feed_only_their_columns() {
        let scope = import("t,A,B\n0,1,2\n1,5\n");
        let a = scope.channel(0).unwrap().data(0).unwrap();
        assert_eq!(a.samples, vec![1.0, 5.0]);
        assert_eq!(a.offsets, vec![0, 1_000_000_000_000_000]);
        assert_eq!(a.durations, vec![1_000_000_000_000_000, 1]);

        let b = scope.channel(1).unwrap().data(0).unwrap();
        assert_eq!(b.samples, vec![2.0]);
        assert_eq!(b.durations, vec![1]);
    }

    #[test]
    fn malformed_fields_count_as_zero() {
        let scope = import("t,A\n0.0,oops\n");
        let wfm = scope.channel(0).unwrap().data(0).unwrap();
        assert_eq!(wfm.samples, vec![0.0]);
    }

    #[test]
    fn blank_lines_feed_no_channel() {
        let scope = import("t,A\n0,1\n\n1,2\n");
        let wfm = scope.channel(0).unwrap().data(0).unwrap();
        assert_eq!(wfm.samples, vec![1.0, 2.0]);
        assert_eq!(wfm.offsets, vec![0, 1_000_000_000_000_000]);
    }

    #[test]
    fn any_non_numeric_byte_marks_a_header() {
        // The minus sign is outside the numeric byte set, so the first row
        // is consumed as a header even though it scans as numbers.
        let scope = import("-1,5\n0,1\n");
        assert_eq!(scope.channel_count(), 1);
        assert_eq!(scope.channel(0).unwrap().name(), "5");
        let wfm = scope.channel(0).unwrap().data(0).unwrap();
        assert_eq!(wfm.samples, vec![1.0]);
        assert_eq!(wfm.offsets, vec![0]);
    }

    #[test]
    fn missing_file_is_the_only_hard_failure() {
        let mut scope = MockScope::new("import", "none", "");
        let result = scope.load_csv("/nonexistent/waveforms/capture.csv");
        assert!(matches!(result, Err(CaptureError::ImportOpen { .. })));
        assert_eq!(scope.channel_count(), 0);
    }

    #[test]
    fn empty_file_imports_nothing() {
        let scope = import("");
        assert_eq!(scope.channel_count(), 0);
    }

    #[test]
    fn header_only_file_creates_no_channels() {
        let scope = import("time,A,B\n");
        assert_eq!(scope.channel_count(), 0);
    }

    #[test]
    fn existing_channels_are_kept_but_get_fresh_waveforms() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut scope = MockScope::new("import", "none", "");
        scope.add_channel(Channel::new(0, "X", ChannelType::Analog, "#ffff00", 1.0));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"t,A\n0,5\n").unwrap();
        scope.load_csv(file.path()).unwrap();

        assert_eq!(scope.channel_count(), 1);
        assert_eq!(scope.channel(0).unwrap().name(), "X");
        let wfm = scope.channel(0).unwrap().data(0).unwrap();
        assert_eq!(wfm.samples, vec![5.0]);
        assert_eq!(scope.channel_voltage_range(0), 0.0);
    }

    #[test]
    fn reimport_into_a_fresh_instrument_is_identical() {
        let contents = "time,A,B\n0.0,1.0,2.0\n0.002,1.5,2.5\n0.004,0.5,2.0\n";
        let first = import(contents);
        let second = import(contents);
        assert_eq!(first.channel_count(), second.channel_count());
        for i in 0..first.channel_count() {
            let a = first.channel(i).unwrap();
            let b = second.channel(i).unwrap();
            assert_eq!(a.name(), b.name());
            assert_eq!(a.data(0), b.data(0));
        }
    }

    #[test]
    fn calibration_uses_span_not_midpoint() {
        // min 1.0 / max 3.0: a midpoint rule would put the offset at +2.0;
        // the derived offset is the negative half-span.
        let scope = import("0.0,1.0\n0.1,3.0\n");
        assert_eq!(scope.channel_voltage_range(0), 2.0);
        assert_eq!(scope.channel_offset(0), -1.0);
    }

    #[test]
    fn long_lines_truncate_at_capacity() {
        let mut data = vec![b'9'; 3000];
        data.push(b'\n');
        data.extend_from_slice(b"tail\n");
        let mut reader = LineReader::new(Cursor::new(data));
        assert_eq!(reader.next_line().unwrap().len(), LINE_CAPACITY);
        assert_eq!(reader.next_line().unwrap(), b"tail");
        assert!(reader.next_line().is_none());
    }

    #[test]
    fn final_unterminated_line_is_returned() {
        let mut reader = LineReader::new(Cursor::new(b"a,b\r\n1,2".to_vec()));
        assert_eq!(reader.next_line().unwrap(), b"a,b");
        assert_eq!(reader.next_line().unwrap(), b"1,2");
        assert!(reader.next_line().is_none());
    }

    #[test]
    fn every_line_yields_at_least_one_field() {
        assert_eq!(parse_fields(b""), vec![0.0]);
        assert_eq!(parse_fields(b"1,2\r3"), vec![1.0, 2.0]);
        assert_eq!(parse_labels(b"t,A,B"), vec!["t", "A", "B"]);
    }
}
