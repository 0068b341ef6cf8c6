//! Incremental decoder for the `text/event-stream` wire format.
//!
//! The stream body arrives as arbitrary byte chunks; records may span chunk
//! boundaries. [`SseDecoder::push`] buffers bytes and yields every record
//! completed so far. A record is a group of `field: value` lines terminated
//! by a blank line:
//!
//! ```text
//! event: snapshot
//! data: {"pnl": 150}
//!
//! ```
//!
//! Handled per the SSE format: `event:` names the record type (default
//! `"message"`), multiple `data:` lines are joined with `\n`, comment lines
//! (leading `:`) and the `id:`/`retry:` fields are ignored, and both `\n`
//! and `\r\n` line endings are accepted. Unlike a strict browser
//! `EventSource`, a record with an `event:` field but empty data is still
//! dispatched — the server's heartbeat records carry no payload.

/// One decoded server-push record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseRecord {
    /// Record type from the `event:` field (`"message"` if absent).
    pub event: String,
    /// Payload from the `data:` field(s), joined with `\n`.
    pub data: String,
}

/// Stateful decoder fed from the raw response byte stream.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes; returns all records completed by this chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseRecord> {
        self.buf.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(nl) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=nl).collect();
            let mut line = String::from_utf8_lossy(&line[..nl]).into_owned();
            if line.ends_with('\r') {
                line.pop();
            }
            if let Some(record) = self.take_line(&line) {
                records.push(record);
            }
        }
        records
    }

    /// Process one complete line; a blank line may complete a record.
    fn take_line(&mut self, line: &str) -> Option<SseRecord> {
        if line.is_empty() {
            return self.flush();
        }
        if line.starts_with(':') {
            // Comment / keepalive line.
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // "id" and "retry" carry no information for this consumer.
            _ => {}
        }
        None
    }

    fn flush(&mut self) -> Option<SseRecord> {
        if self.event.is_none() && self.data.is_empty() {
            return None;
        }
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseRecord { event, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(decoder: &mut SseDecoder, bytes: &str) -> Vec<SseRecord> {
        decoder.push(bytes.as_bytes())
    }

    #[test]
    fn single_record() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, "event: snapshot\ndata: {\"pnl\": 150}\n\n");
        assert_eq!(
            recs,
            vec![SseRecord { event: "snapshot".into(), data: "{\"pnl\": 150}".into() }]
        );
    }

    #[test]
    fn record_split_across_chunks() {
        let mut d = SseDecoder::new();
        assert!(one(&mut d, "event: sta").is_empty());
        assert!(one(&mut d, "tus\ndata: {\"ok\"").is_empty());
        let recs = one(&mut d, ": true}\n\n");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].event, "status");
        assert_eq!(recs[0].data, "{\"ok\": true}");
    }

    #[test]
    fn heartbeat_without_data_is_dispatched() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, "event: hb\n\n");
        assert_eq!(recs, vec![SseRecord { event: "hb".into(), data: String::new() }]);
    }

    #[test]
    fn default_event_type_is_message() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, "data: {}\n\n");
        assert_eq!(recs[0].event, "message");
    }

    #[test]
    fn multiple_records_in_one_chunk() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, "event: hb\n\nevent: positions\ndata: {\"AAPL\": 10}\n\n");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].event, "hb");
        assert_eq!(recs[1].event, "positions");
        assert_eq!(recs[1].data, "{\"AAPL\": 10}");
    }

    #[test]
    fn multiline_data_joined_with_newline() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, "data: line1\ndata: line2\n\n");
        assert_eq!(recs[0].data, "line1\nline2");
    }

    #[test]
    fn crlf_line_endings() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, "event: snapshot\r\ndata: {}\r\n\r\n");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].event, "snapshot");
        assert_eq!(recs[0].data, "{}");
    }

    #[test]
    fn comments_and_unknown_fields_ignored() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, ": keepalive\nid: 7\nretry: 1000\ndata: x\n\n");
        assert_eq!(recs, vec![SseRecord { event: "message".into(), data: "x".into() }]);
    }

    #[test]
    fn blank_lines_between_records_ignored() {
        let mut d = SseDecoder::new();
        assert!(one(&mut d, "\n\n\n").is_empty());
    }

    #[test]
    fn value_without_space_after_colon() {
        let mut d = SseDecoder::new();
        let recs = one(&mut d, "event:hb\n\n");
        assert_eq!(recs[0].event, "hb");
    }
}
