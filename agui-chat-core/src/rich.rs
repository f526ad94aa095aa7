//! Rich-content extraction from assistant text.
//!
//! Backends embed structured values in streamed text with bracketed marker
//! pairs:
//!
//! | Marker | Meaning | Multiplicity |
//! |--------|---------|--------------|
//! | `[WEATHER_ICON]url[/WEATHER_ICON]` | weather icon image | first wins |
//! | `[LINK]url[/LINK]` | related link | all, in order |
//! | `[CALC_RESULT]value[/CALC_RESULT]` | computed result | first wins |
//! | `[IMAGE_ID]id[/IMAGE_ID]` | server-side image | all, in order |
//!
//! [`segments`] scans the text once and returns it as an ordered list of
//! [`Segment`]s. [`RenderModel`] folds those into plain text plus side
//! channels, and [`format_inline`] turns the plain text into styled spans.
//!
//! A marker never spans a line terminator, and an opening tag without a
//! closing tag on the same line stays in the text as-is.
//!
//! ```
//! use agui_chat_core::rich::RenderModel;
//!
//! let model = RenderModel::parse("Result: [CALC_RESULT]42[/CALC_RESULT] done");
//! assert_eq!(model.plain_text, "Result:  done");
//! assert_eq!(model.calc_result.as_deref(), Some("42"));
//! ```

use serde::Serialize;

/// The four kinds of rich-content marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    WeatherIcon,
    Link,
    CalcResult,
    ImageId,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 4] = [
        MarkerKind::WeatherIcon,
        MarkerKind::Link,
        MarkerKind::CalcResult,
        MarkerKind::ImageId,
    ];

    pub fn open_tag(self) -> &'static str {
        match self {
            MarkerKind::WeatherIcon => "[WEATHER_ICON]",
            MarkerKind::Link => "[LINK]",
            MarkerKind::CalcResult => "[CALC_RESULT]",
            MarkerKind::ImageId => "[IMAGE_ID]",
        }
    }

    pub fn close_tag(self) -> &'static str {
        match self {
            MarkerKind::WeatherIcon => "[/WEATHER_ICON]",
            MarkerKind::Link => "[/LINK]",
            MarkerKind::CalcResult => "[/CALC_RESULT]",
            MarkerKind::ImageId => "[/IMAGE_ID]",
        }
    }

    /// Wrap `value` in this marker's tags.
    pub fn wrap(self, value: &str) -> String {
        format!("{}{}{}", self.open_tag(), value, self.close_tag())
    }

    fn segment(self, value: &str) -> Segment {
        let value = value.to_string();
        match self {
            MarkerKind::WeatherIcon => Segment::WeatherIcon(value),
            MarkerKind::Link => Segment::Link(value),
            MarkerKind::CalcResult => Segment::CalcResult(value),
            MarkerKind::ImageId => Segment::ImageRef(value),
        }
    }
}

/// A piece of assistant text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text between markers.
    Text(String),
    /// Weather icon URL.
    WeatherIcon(String),
    /// Link URL.
    Link(String),
    /// Calculation result.
    CalcResult(String),
    /// Opaque image id, resolved with [`image_url`].
    ImageRef(String),
}

/// Same set of characters a JavaScript `.` refuses to match.
fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Find `needle` in `haystack` before the first line terminator.
fn find_on_line(haystack: &str, needle: &str) -> Option<usize> {
    let line_end = haystack.find(is_line_terminator).unwrap_or(haystack.len());
    haystack[..line_end].find(needle)
}

/// Split `text` into segments in a single forward scan.
///
/// Each opening tag is paired with the nearest closing tag of the same kind
/// on the same line; everything it encloses (other tags included) becomes the
/// marker's value. Marker-free text comes back as one [`Segment::Text`].
pub fn segments(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('[') {
        let open_at = cursor + offset;
        let rest = &text[open_at..];

        let Some(kind) = MarkerKind::ALL
            .into_iter()
            .find(|kind| rest.starts_with(kind.open_tag()))
        else {
            cursor = open_at + 1;
            continue;
        };

        let value_start = open_at + kind.open_tag().len();
        match find_on_line(&text[value_start..], kind.close_tag()) {
            Some(len) => {
                push_text(&mut out, &text[text_start..open_at]);
                out.push(kind.segment(&text[value_start..value_start + len]));
                cursor = value_start + len + kind.close_tag().len();
                text_start = cursor;
            }
            // Unterminated: leave the tag in the text
            None => cursor = value_start,
        }
    }

    push_text(&mut out, &text[text_start..]);
    out
}

fn push_text(out: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Segment::Text(previous)) => previous.push_str(text),
        _ => out.push(Segment::Text(text.to_string())),
    }
}

/// Plain text plus side-channel payloads, derived from one message.
///
/// Recomputed from the message content on every render; never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    /// Text with every marker removed.
    pub plain_text: String,
    /// First weather icon URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_icon_url: Option<String>,
    /// First calculation result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calc_result: Option<String>,
    /// All links, in order of appearance.
    pub links: Vec<String>,
    /// All image ids, in order of appearance.
    pub image_ids: Vec<String>,
}

impl RenderModel {
    /// Extract the render model from raw message text.
    pub fn parse(text: &str) -> Self {
        Self::from_segments(segments(text))
    }

    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut model = Self::default();
        for segment in segments {
            match segment {
                Segment::Text(text) => model.plain_text.push_str(&text),
                Segment::WeatherIcon(url) => {
                    model.weather_icon_url.get_or_insert(url);
                }
                Segment::CalcResult(value) => {
                    model.calc_result.get_or_insert(value);
                }
                Segment::Link(url) => model.links.push(url),
                Segment::ImageRef(id) => model.image_ids.push(id),
            }
        }
        model
    }

    /// True if any side channel carries a value.
    pub fn has_attachments(&self) -> bool {
        self.weather_icon_url.is_some()
            || self.calc_result.is_some()
            || !self.links.is_empty()
            || !self.image_ids.is_empty()
    }

    /// The plain text with inline formatting applied.
    pub fn inline_spans(&self) -> Vec<InlineSpan> {
        format_inline(&self.plain_text)
    }

    /// Image URLs for every image id, against `base_url`.
    pub fn image_urls(&self, base_url: &str) -> Vec<String> {
        self.image_ids
            .iter()
            .map(|id| image_url(base_url, id))
            .collect()
    }
}

/// URL of a server-side image: `{base_url}/images/{id}`.
pub fn image_url(base_url: &str, image_id: &str) -> String {
    format!("{}/images/{}", base_url.trim_end_matches('/'), image_id)
}

/// A run of text with its inline style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    /// Inside `**…**`.
    pub strong: bool,
    /// Inside `` `…` ``.
    pub code: bool,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn strong(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: true,
            code: false,
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strong: false,
            code: true,
        }
    }
}

/// Apply the inline rewrites to marker-free text.
///
/// `**…**` pairs are resolved first, then `` `…` `` pairs inside each
/// resulting run, so code can sit inside a strong span. Neither kind of pair
/// crosses a line terminator; unpaired delimiters stay literal.
pub fn format_inline(text: &str) -> Vec<InlineSpan> {
    let mut spans: Vec<InlineSpan> = Vec::new();

    for (run, strong) in split_delimited(text, "**") {
        for (piece, code) in split_delimited(run, "`") {
            if piece.is_empty() {
                continue;
            }
            match spans.last_mut() {
                Some(last) if last.strong == strong && last.code == code => {
                    last.text.push_str(piece);
                }
                _ => spans.push(InlineSpan {
                    text: piece.to_string(),
                    strong,
                    code,
                }),
            }
        }
    }

    spans
}

/// Split into `(run, inside_pair)` pieces for one delimiter.
fn split_delimited<'a>(text: &'a str, delimiter: &str) -> Vec<(&'a str, bool)> {
    let mut runs = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(delimiter) {
        let open_at = cursor + offset;
        let inner_start = open_at + delimiter.len();
        match find_on_line(&text[inner_start..], delimiter) {
            Some(len) => {
                runs.push((&text[plain_start..open_at], false));
                runs.push((&text[inner_start..inner_start + len], true));
                cursor = inner_start + len + delimiter.len();
                plain_start = cursor;
            }
            None => cursor = inner_start,
        }
    }

    runs.push((&text[plain_start..], false));
    runs
}

#[cfg(test)]
#[path = "rich_tests.rs"]
mod tests;
