//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Console log ingestion
//!
//! The game server's console plugin posts a line for every join and leave
//! into a chat channel. [`ConsoleParser`] turns that text into a
//! [`ConsoleSignal`]; everything else is ignored.

use regex::Regex;

/// Default join notice posted by the console plugin
pub const DEFAULT_JOIN_PATTERN: &str = "(.+?) 님이 서버에 접속하셨습니다.";

/// Default leave notice posted by the console plugin
pub const DEFAULT_LEAVE_PATTERN: &str = "(.+?) 님이 서버에서 나가셨습니다.";

/// Parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleSignal {
    Join(String),
    Leave(String),
    Ignored,
}

/// Join/leave pattern matcher
///
/// Each pattern must capture the player name in its first group. Patterns
/// are searched, not anchored, so surrounding text is tolerated.
#[derive(Debug, Clone)]
pub struct ConsoleParser {
    join: Regex,
    leave: Regex,
}

impl ConsoleParser {
    pub fn new(join_pattern: &str, leave_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            join: Regex::new(join_pattern)?,
            leave: Regex::new(leave_pattern)?,
        })
    }

    /// Classify a console line, joins taking precedence over leaves
    pub fn parse(&self, text: &str) -> ConsoleSignal {
        if let Some(name) = capture_name(&self.join, text) {
            ConsoleSignal::Join(name)
        } else if let Some(name) = capture_name(&self.leave, text) {
            ConsoleSignal::Leave(name)
        } else {
            ConsoleSignal::Ignored
        }
    }
}

impl Default for ConsoleParser {
    fn default() -> Self {
        Self {
            join: Regex::new(DEFAULT_JOIN_PATTERN).expect("default join pattern is valid"),
            leave: Regex::new(DEFAULT_LEAVE_PATTERN).expect("default leave pattern is valid"),
        }
    }
}

fn capture_name(pattern: &Regex, text: &str) -> Option<String> {
    let name = pattern.captures(text)?.get(1)?.as_str().trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_line() {
        let parser = ConsoleParser::default();
        assert_eq!(
            parser.parse("Steve 님이 서버에 접속하셨습니다."),
            ConsoleSignal::Join("Steve".to_string())
        );
    }

    #[test]
    fn test_leave_line() {
        let parser = ConsoleParser::default();
        assert_eq!(
            parser.parse("Player_1 님이 서버에서 나가셨습니다."),
            ConsoleSignal::Leave("Player_1".to_string())
        );
    }

    #[test]
    fn test_unrelated_text_is_ignored() {
        let parser = ConsoleParser::default();
        assert_eq!(parser.parse("Server is starting"), ConsoleSignal::Ignored);
        assert_eq!(parser.parse(""), ConsoleSignal::Ignored);
        assert_eq!(parser.parse(" 님이 서버에 접속하셨습니다."), ConsoleSignal::Ignored);
    }

    #[test]
    fn test_name_is_trimmed() {
        let parser = ConsoleParser::default();
        assert_eq!(
            parser.parse("  Alex  님이 서버에서 나가셨습니다."),
            ConsoleSignal::Leave("Alex".to_string())
        );
    }

    #[test]
    fn test_custom_patterns() {
        let parser = ConsoleParser::new(r"^(\w+) joined the game$", r"^(\w+) left the game$").unwrap();
        assert_eq!(parser.parse("Steve joined the game"), ConsoleSignal::Join("Steve".into()));
        assert_eq!(parser.parse("Steve left the game"), ConsoleSignal::Leave("Steve".into()));
        assert_eq!(parser.parse("Steve said hi"), ConsoleSignal::Ignored);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(ConsoleParser::new("(unclosed", "(.+) left").is_err());
    }
}
