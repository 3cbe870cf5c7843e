//! Incremental JSON parser for streaming responses
//!
//! Implements bracket-matching to extract complete JSON objects from a stream
//! of bytes. Used for two things:
//! - splitting Ollama's NDJSON `/api/generate` stream into chunks
//! - pulling the decision object out of a free-form model reply

use crate::errors::{RagError, Result};
use crate::types::Decision;
use serde::Deserialize;

/// Maximum buffer size (1MB)
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// One object of the `/api/generate` stream
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Incremental JSON parser
#[derive(Debug)]
pub struct JsonParser {
    /// Accumulation buffer
    buffer: Vec<u8>,

    /// Maximum buffer size
    max_buffer_size: usize,
}

impl JsonParser {
    /// Create new JSON parser with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    /// Create parser with custom buffer capacity
    pub fn with_capacity(max_buffer_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_buffer_size,
        }
    }

    /// Add bytes to parser and attempt to extract the next complete object
    ///
    /// ```text
    /// depth ← 0, start ← None
    /// for each byte bᵢ outside a string literal:
    ///   '{' : if depth = 0 then start ← i; depth ← depth + 1
    ///   '}' : depth ← depth - 1; if depth = 0 return B[start..=i]
    /// ```
    ///
    /// Stray closing braces before any opening brace are skipped.
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<Option<String>> {
        if self.buffer.len() + bytes.len() > self.max_buffer_size {
            return Err(RagError::DecisionFormat(format!(
                "Buffer overflow: {} bytes exceeds maximum {}",
                self.buffer.len() + bytes.len(),
                self.max_buffer_size
            )));
        }

        self.buffer.extend_from_slice(bytes);
        Ok(self.next_object())
    }

    /// Extract the next complete object already in the buffer
    pub fn next_object(&mut self) -> Option<String> {
        let (start, end) = find_complete_json(&self.buffer)?;

        let json_str = String::from_utf8_lossy(&self.buffer[start..=end]).to_string();
        self.buffer.drain(..=end);
        Some(json_str)
    }

    /// Get current buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Check if buffer holds only whitespace
    pub fn is_empty(&self) -> bool {
        self.buffer.iter().all(|b| b.is_ascii_whitespace())
    }

    /// Parse one `/api/generate` stream object
    pub fn parse_generate_chunk(json_str: &str) -> Result<GenerateChunk> {
        serde_json::from_str(json_str).map_err(RagError::from)
    }

    /// Find the first complete JSON object in `text` and parse it as a decision
    pub fn parse_decision(text: &str) -> Result<Decision> {
        let json_str = extract_first_object(text).ok_or_else(|| {
            RagError::DecisionFormat(format!("No JSON object in reply: {}", preview(text)))
        })?;

        serde_json::from_str(&json_str)
            .map_err(|e| RagError::DecisionFormat(format!("{} in {}", e, preview(&json_str))))
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// First balanced `{...}` in `text`, ignoring braces inside string literals
pub fn extract_first_object(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let (start, end) = find_complete_json(bytes)?;
    Some(String::from_utf8_lossy(&bytes[start..=end]).to_string())
}

fn find_complete_json(buffer: &[u8]) -> Option<(usize, usize)> {
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &byte) in buffer.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if in_string {
            match byte {
                b'\\' => escape_next = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            // Strings only matter once an object has started
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|s| (s, i));
                }
            }
            _ => {}
        }
    }

    None
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = text.trim();
    if trimmed.chars().count() <= LIMIT {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(LIMIT).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_json_extraction() {
        let mut parser = JsonParser::new();

        let json = r#"{"type": "final", "answer": "done"}"#;
        let result = parser.add_bytes(json.as_bytes()).unwrap();

        assert_eq!(result.unwrap(), json);
    }

    #[test]
    fn test_incremental_json_extraction() {
        let mut parser = JsonParser::new();

        parser.add_bytes(br#"{"response":"#).unwrap();
        assert!(parser.add_bytes(br#" "Hel""#).unwrap().is_none());

        let result = parser.add_bytes(br#", "done": false}"#).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn test_braces_and_escapes_in_strings() {
        let mut parser = JsonParser::new();

        let json = r#"{"response": "set {x} and \"quote\" }"}"#;
        let result = parser.add_bytes(json.as_bytes()).unwrap();

        assert_eq!(result.unwrap(), json);
    }

    #[test]
    fn test_ndjson_stream_objects() {
        let mut parser = JsonParser::new();

        let data = "{\"response\":\"Hel\",\"done\":false}\n{\"response\":\"lo\",\"done\":true}\n";
        let first = parser.add_bytes(data.as_bytes()).unwrap().unwrap();
        let second = parser.next_object().unwrap();

        assert_eq!(JsonParser::parse_generate_chunk(&first).unwrap().response, "Hel");
        let last = JsonParser::parse_generate_chunk(&second).unwrap();
        assert_eq!(last.response, "lo");
        assert!(last.done);
        assert!(parser.is_empty());
    }

    #[test]
    fn test_buffer_overflow() {
        let mut parser = JsonParser::with_capacity(100);

        let result = parser.add_bytes(&vec![b'a'; 150]);
        assert!(matches!(result, Err(RagError::DecisionFormat(_))));
    }

    #[test]
    fn test_clear() {
        let mut parser = JsonParser::new();

        parser.add_bytes(b"{\"partial\": ").unwrap();
        assert!(!parser.is_empty());

        parser.clear();
        assert_eq!(parser.buffer_size(), 0);
    }

    #[test]
    fn test_parse_decision_surrounded_by_prose() {
        let reply = "Thought: I should look this up.\n\
                     {\"type\": \"tool_call\", \"tool\": \"search_knowledge_base\", \"args\": {\"query\": \"hub\"}}\n\
                     That's my action.";
        let decision = JsonParser::parse_decision(reply).unwrap();
        assert_eq!(decision, Decision::tool_call("search_knowledge_base", "hub"));
    }

    #[test]
    fn test_parse_decision_skips_stray_closing_brace() {
        let reply = "} oops {\"type\": \"final\", \"answer\": \"Paris\"}";
        let decision = JsonParser::parse_decision(reply).unwrap();
        assert_eq!(decision, Decision::final_answer("Paris"));
    }

    #[test]
    fn test_parse_decision_without_json() {
        let err = JsonParser::parse_decision("I think the answer is 4").unwrap_err();
        assert!(matches!(err, RagError::DecisionFormat(_)));
    }

    #[test]
    fn test_parse_decision_unknown_type() {
        let err = JsonParser::parse_decision(r#"{"type": "plan", "steps": []}"#).unwrap_err();
        assert!(matches!(err, RagError::DecisionFormat(_)));
    }
}
