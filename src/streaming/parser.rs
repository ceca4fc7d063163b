use crate::error::Result;
use crate::models::gemini::GeminiResponse;
use bytes::{Buf, BytesMut};

/// Stateful parser for Gemini's chunked JSON array stream.
///
/// `streamGenerateContent` returns one JSON array of response objects, but
/// the transport delivers it in arbitrary byte chunks. Feeding bytes in
/// yields every response object completed so far; incomplete trailing
/// bytes are buffered for the next feed.
pub struct StreamingJsonParser {
    buffer: BytesMut,
    array_started: bool,
}

impl StreamingJsonParser {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
            array_started: false,
        }
    }

    /// Feed new data and extract complete response objects
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<GeminiResponse>> {
        self.buffer.extend_from_slice(chunk);
        self.extract_objects()
    }

    fn extract_objects(&mut self) -> Result<Vec<GeminiResponse>> {
        let mut results = Vec::new();

        loop {
            // Skip leading whitespace, commas, and array brackets
            self.skip_noise();

            if self.buffer.is_empty() {
                break;
            }

            // Check for array end
            if self.buffer[0] == b']' {
                self.buffer.advance(1);
                continue;
            }

            // Find complete JSON object
            if let Some(obj_end) = self.find_object_boundary() {
                let obj_bytes = self.buffer.split_to(obj_end);

                match serde_json::from_slice::<GeminiResponse>(&obj_bytes) {
                    Ok(response) => results.push(response),
                    Err(e) => {
                        // Skip the undecodable object and keep going
                        tracing::warn!(
                            error = %e,
                            raw = %String::from_utf8_lossy(&obj_bytes),
                            "Failed to parse streamed response object"
                        );
                    }
                }
            } else {
                // Incomplete object, wait for more data
                break;
            }
        }

        Ok(results)
    }

    fn skip_noise(&mut self) {
        while !self.buffer.is_empty() {
            match self.buffer[0] {
                b'[' => {
                    self.array_started = true;
                    self.buffer.advance(1);
                }
                b',' | b' ' | b'\n' | b'\r' | b'\t' => {
                    self.buffer.advance(1);
                }
                _ => break,
            }
        }
    }

    fn find_object_boundary(&self) -> Option<usize> {
        let mut depth = 0;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &byte) in self.buffer.iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else {
                    match byte {
                        b'\\' => escaped = true,
                        b'"' => in_string = false,
                        _ => {}
                    }
                }
            } else {
                match byte {
                    b'"' => in_string = true,
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i + 1);
                        }
                    }
                    _ => {}
                }
            }
        }

        None
    }

    /// Reset the parser state (useful for connection reuse)
    pub fn reset(&mut self) {
        self.buffer.clear();
        if self.buffer.capacity() > 65536 {
            // 64KB max, reallocate if too large
            self.buffer = BytesMut::with_capacity(8192);
        }
        self.array_started = false;
    }
}

impl Default for StreamingJsonParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_object() {
        let mut parser = StreamingJsonParser::new();
        let data = br#"[{"candidates":[]}]"#;
        let objects = parser.feed(data).unwrap();
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_parse_incomplete_chunks() {
        let mut parser = StreamingJsonParser::new();

        // First chunk is incomplete
        let chunk1 = br#"[{"candidates":[{"content":{"parts":[{"text":"H"#;
        let results1 = parser.feed(chunk1).unwrap();
        assert_eq!(results1.len(), 0);

        // Second chunk completes first object
        let chunk2 = br#"ello"}],"role":"model"}}]}]"#;
        let results2 = parser.feed(chunk2).unwrap();
        assert_eq!(results2.len(), 1);
        assert_eq!(results2[0].text(), "Hello");
    }

    #[test]
    fn test_multiple_objects() {
        let mut parser = StreamingJsonParser::new();
        let data = br#"[{"candidates":[]},{"candidates":[]}]"#;
        let objects = parser.feed(data).unwrap();
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn test_escaped_strings() {
        let mut parser = StreamingJsonParser::new();
        let data = br#"[{"candidates":[{"content":{"parts":[{"text":"He said \"hello\""}],"role":"model"}}]}]"#;
        let objects = parser.feed(data).unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].text(), "He said \"hello\"");
    }

    #[test]
    fn test_whitespace_handling() {
        let mut parser = StreamingJsonParser::new();
        let data = b"[\n  {\"candidates\": []}\n  ,\n  {\"candidates\": []}\n]";
        let objects = parser.feed(data).unwrap();
        assert_eq!(objects.len(), 2);
    }

    #[test]
    fn test_object_split_across_multiple_feeds() {
        let mut parser = StreamingJsonParser::new();

        let chunk1 = b"[{\"candidates\":[{\"content\":";
        let chunk2 = b"{\"parts\":[{\"text\":";
        let chunk3 = b"\"test\"}],\"role\":\"model\"}}]}]";

        assert_eq!(parser.feed(chunk1).unwrap().len(), 0);
        assert_eq!(parser.feed(chunk2).unwrap().len(), 0);
        let results = parser.feed(chunk3).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_grounding_metadata_survives_reassembly() {
        let mut parser = StreamingJsonParser::new();
        let data = br#"[{"candidates":[{"content":{"parts":[{"text":"x"}],"role":"model"},"#;
        assert_eq!(parser.feed(data).unwrap().len(), 0);
        let data = br#""groundingMetadata":{"groundingChunks":[{"web":{"uri":"https://a","title":"A"}}]}}]}]"#;
        let results = parser.feed(data).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].grounding_metadata().is_some());
    }

    #[test]
    fn test_parser_reset() {
        let mut parser = StreamingJsonParser::new();
        let data = br#"[{"candidates":[]}]"#;

        parser.feed(data).unwrap();
        assert!(parser.array_started);

        parser.reset();
        assert!(!parser.array_started);
        assert!(parser.buffer.is_empty());
    }
}
