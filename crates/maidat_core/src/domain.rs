//! crates/maidat_core/src/domain.rs
//!
//! Defines the core data structures for the program: the day index and the
//! six-section content unit shown for one day.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

//=========================================================================================
// Day
//=========================================================================================

/// A validated day of the 30-day program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(u32);

/// Raised when a day number falls outside the program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayError {
    #[error("Day {0} is outside the program range 1..=30")]
    OutOfRange(u32),
}

impl Day {
    pub const FIRST: Day = Day(1);
    pub const LAST: Day = Day(30);

    pub fn new(number: u32) -> Result<Self, DayError> {
        if (Self::FIRST.0..=Self::LAST.0).contains(&number) {
            Ok(Self(number))
        } else {
            Err(DayError::OutOfRange(number))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The following day, or `None` on the last day. Boundaries do not wrap.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    /// The preceding day, or `None` on the first day.
    pub fn prev(self) -> Option<Self> {
        self.0.checked_sub(1).and_then(|n| Self::new(n).ok())
    }
}

impl TryFrom<u32> for Day {
    type Error = DayError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//=========================================================================================
// DailyContent
//=========================================================================================

/// Opening verse and its link to daily life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Introduction {
    pub verse: String,
    pub reflection: String,
}

/// "Mihrab al-Layla": a passage from a Ramadan supplication with a reflection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mihrab {
    pub dua_passage: String,
    pub reflection: String,
}

/// "Sira wa Mawqif": a story and how to apply it today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sira {
    pub title: String,
    pub story: String,
    pub modern_application: String,
}

/// "Fiqh al-Hayah": one practical question with a simple answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fiqh {
    pub question: String,
    pub answer: String,
}

/// The content unit for one day. Every field is required; a response missing
/// any of them never becomes a `DailyContent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyContent {
    pub introduction: Introduction,
    pub mihrab: Mihrab,
    pub sira: Sira,
    pub fiqh: Fiqh,
    /// "Zad al-Sa'im": a health or psychological tip for the fasting person.
    pub zad: String,
    pub closing_prayer: String,
}

impl DailyContent {
    /// The JSON schema handed to the provider to constrain its output.
    ///
    /// Mirrors the struct above field for field. `additionalProperties: false`
    /// is set on every object so strict structured-output modes accept it.
    pub fn response_schema() -> Value {
        fn object(properties: &[&str]) -> Value {
            let props: serde_json::Map<String, Value> = properties
                .iter()
                .map(|name| (name.to_string(), json!({ "type": "string" })))
                .collect();
            json!({
                "type": "object",
                "properties": props,
                "required": properties,
                "additionalProperties": false,
            })
        }

        json!({
            "type": "object",
            "properties": {
                "introduction": object(&["verse", "reflection"]),
                "mihrab": object(&["dua_passage", "reflection"]),
                "sira": object(&["title", "story", "modern_application"]),
                "fiqh": object(&["question", "answer"]),
                "zad": { "type": "string" },
                "closing_prayer": { "type": "string" },
            },
            "required": ["introduction", "mihrab", "sira", "fiqh", "zad", "closing_prayer"],
            "additionalProperties": false,
        })
    }

    /// Every text field paired with its dotted path, in display order.
    pub fn text_fields(&self) -> [(&'static str, &str); 11] {
        [
            ("introduction.verse", &self.introduction.verse),
            ("introduction.reflection", &self.introduction.reflection),
            ("mihrab.dua_passage", &self.mihrab.dua_passage),
            ("mihrab.reflection", &self.mihrab.reflection),
            ("sira.title", &self.sira.title),
            ("sira.story", &self.sira.story),
            ("sira.modern_application", &self.sira.modern_application),
            ("fiqh.question", &self.fiqh.question),
            ("fiqh.answer", &self.fiqh.answer),
            ("zad", &self.zad),
            ("closing_prayer", &self.closing_prayer),
        ]
    }

    /// Returns the path of the first blank field, if any.
    pub fn first_empty_field(&self) -> Option<&'static str> {
        self.text_fields()
            .into_iter()
            .find(|(_, text)| text.trim().is_empty())
            .map(|(path, _)| path)
    }
}
