//! Note data model as exchanged with the remote note store.

use crate::{Result, StickyNotesError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed palette a note can be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteColor {
    /// `#ffeb3b`, the classic sticky-note yellow.
    #[default]
    Yellow,
    /// `#a7f3d0`
    Green,
    /// `#fecaca`
    Red,
    /// `#bfdbfe`
    Blue,
}

impl NoteColor {
    /// Every palette entry, in the order the recolor swatches are offered.
    pub const ALL: [NoteColor; 4] = [Self::Yellow, Self::Green, Self::Red, Self::Blue];

    /// Returns the lowercase hex token stored on the remote note.
    #[must_use]
    pub fn as_hex(self) -> &'static str {
        match self {
            Self::Yellow => "#ffeb3b",
            Self::Green => "#a7f3d0",
            Self::Red => "#fecaca",
            Self::Blue => "#bfdbfe",
        }
    }

    /// Looks up a palette entry by hex token, ignoring ASCII case and
    /// surrounding whitespace. Returns `None` for anything off-palette.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_hex().eq_ignore_ascii_case(hex))
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_hex())
    }
}

impl FromStr for NoteColor {
    type Err = StickyNotesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s).ok_or_else(|| {
            StickyNotesError::ValidationFailed(format!("'{s}' is not a palette color"))
        })
    }
}

/// A single note owned by the signed-in user.
///
/// Notes are never constructed locally in normal operation: they are decoded
/// from the remote store's responses, which own `id` and `owner_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, with = "iso_datetime")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
    #[serde(default = "default_color_hex", deserialize_with = "color_or_default")]
    pub color_hex: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position_index: i32,
    #[serde(default)]
    pub owner_id: i64,
}

impl Note {
    /// The calendar date this note is due on, ignoring time of day.
    #[must_use]
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date())
    }

    /// The palette entry matching `color_hex`, if the stored token is on-palette.
    #[must_use]
    pub fn color(&self) -> Option<NoteColor> {
        NoteColor::from_hex(&self.color_hex)
    }
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteDraft {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", with = "iso_datetime")]
    pub due_date: Option<NaiveDateTime>,
    pub is_completed: bool,
}

impl NoteDraft {
    pub fn new(content: impl Into<String>, due_date: Option<NaiveDateTime>) -> Self {
        Self {
            content: content.into(),
            due_date,
            is_completed: false,
        }
    }
}

/// Body of a partial update request. Unset fields are omitted from the JSON
/// entirely so the store leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", with = "iso_datetime")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_index: Option<i32>,
}

impl NotePatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    pub fn completed(is_completed: bool) -> Self {
        Self { is_completed: Some(is_completed), ..Self::default() }
    }

    pub fn color(color: NoteColor) -> Self {
        Self { color_hex: Some(color.as_hex().to_string()), ..Self::default() }
    }

    pub fn position(position_index: i32) -> Self {
        Self { position_index: Some(position_index), ..Self::default() }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn default_color_hex() -> String {
    NoteColor::default().as_hex().to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn color_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_color_hex))
}

/// ISO-8601 date-times as the note store emits them.
///
/// Accepts naive (`2024-03-15T10:00:00`), offset-qualified
/// (`2024-03-15T10:00:00Z`, `...+02:00`) and bare dates. Offset-qualified
/// values keep the wall-clock time they were written with; the offset is
/// dropped rather than normalized so the encoded calendar date survives.
pub(crate) mod iso_datetime {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(s.trim())
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date-time '{s}'"))),
        }
    }

    pub(crate) fn parse(s: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    }
}
