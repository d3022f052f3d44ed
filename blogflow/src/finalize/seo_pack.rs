//! Parsing of the SEO stage's free-form output.
//!
//! The SEO prompt asks for labelled lines (`SEO title: ...`) and `Q:`/`A:`
//! pairs, but models decorate freely: bullets, bold labels, numbered
//! questions. Parsing is best effort and never fails; missing fields are
//! simply absent.

use super::markdown::{heading, is_fence};
use crate::stages::{DESCRIPTION_SOFT_CAP, TITLE_SOFT_CAP};
use crate::utils::slugify;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+•][ \t]+|\d{1,2}[.)][ \t]+)").expect("valid list regex"));

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9 ()/&-]{0,40}?)[ \t]*:[ \t]*(.*)$").expect("valid label regex")
});

/// One FAQ question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqPair {
    /// Question text, without any `Q:` label.
    pub question: String,
    /// Answer text, joined onto one line.
    pub answer: String,
}

/// Structured view of the SEO stage output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeoPack {
    title: Option<String>,
    description: Option<String>,
    slug: Option<String>,
    primary_keyword: Option<String>,
    secondary_keywords: Vec<String>,
    faq: Vec<FaqPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Slug,
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    Blank,
    Field(Field, String),
    Question(String),
    Answer(String),
    /// A label this parser does not use, e.g. link recommendations.
    OtherLabel,
    Heading,
    /// Free text, flagged when it was written as a list item.
    Text { text: String, list_item: bool },
}

impl SeoPack {
    /// Parses SEO stage output.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parser = Parser::default();
        let mut in_fence = false;
        for line in raw.lines() {
            if is_fence(line) {
                in_fence = !in_fence;
                continue;
            }
            if !in_fence {
                parser.feed(classify(line));
            }
        }
        parser.finish()
    }

    /// SEO title, if one was found.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Meta description, if one was found.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// URL slug: the labelled slug when present, otherwise derived from the
    /// title.
    #[must_use]
    pub fn slug(&self) -> Option<String> {
        self.slug
            .as_deref()
            .or(self.title.as_deref())
            .map(|s| slugify(s, '-'))
            .filter(|s| !s.is_empty())
    }

    /// Primary keyword, if one was found.
    #[must_use]
    pub fn primary_keyword(&self) -> Option<&str> {
        self.primary_keyword.as_deref()
    }

    /// Secondary keywords in the order given.
    #[must_use]
    pub fn secondary_keywords(&self) -> &[String] {
        &self.secondary_keywords
    }

    /// Primary then secondary keywords, without case-insensitive duplicates.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for kw in self.primary_keyword.iter().chain(&self.secondary_keywords) {
            let folded = kw.to_lowercase();
            if !seen.contains(&folded) {
                seen.push(folded);
                out.push(kw.clone());
            }
        }
        out
    }

    /// FAQ pairs in the order given.
    #[must_use]
    pub fn faq(&self) -> &[FaqPair] {
        &self.faq
    }

    /// Whether the title is within the 60 character soft cap. Absent titles
    /// count as within.
    #[must_use]
    pub fn title_within_cap(&self) -> bool {
        self.title
            .as_ref()
            .map_or(true, |t| t.chars().count() <= TITLE_SOFT_CAP)
    }

    /// Whether the description is within the 155 character soft cap.
    #[must_use]
    pub fn description_within_cap(&self) -> bool {
        self.description
            .as_ref()
            .map_or(true, |d| d.chars().count() <= DESCRIPTION_SOFT_CAP)
    }

    /// Returns true if any metadata field was found.
    #[must_use]
    pub fn has_metadata(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.slug().is_some()
            || !self.keywords().is_empty()
    }

    /// Renders the metadata as a YAML front matter block, fences included.
    ///
    /// Returns `None` when there is no metadata to render.
    #[must_use]
    pub fn front_matter(&self) -> Option<String> {
        if !self.has_metadata() {
            return None;
        }
        let matter = FrontMatter {
            title: self.title.as_deref(),
            description: self.description.as_deref(),
            slug: self.slug(),
            keywords: self.keywords(),
        };
        let yaml = serde_yaml::to_string(&matter).ok()?;
        Some(format!("---\n{}---\n", yaml.trim_start_matches("---\n")))
    }
}

#[derive(Serialize)]
struct FrontMatter<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    keywords: Vec<String>,
}

/// Strips list markers, heading markers and emphasis from a line.
fn clean(line: &str) -> String {
    let mut text = line.trim();
    if let Some((_, rest)) = heading(text) {
        text = rest;
    }
    let text = LIST_MARKER.replace(text, "");
    text.replace("**", "")
        .replace("__", "")
        .trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '_')
        .to_string()
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('`', '`'), ('“', '”')] {
        if let Some(inner) = value.strip_prefix(open).and_then(|v| v.strip_suffix(close)) {
            return inner.trim();
        }
    }
    value
}

/// Maps a lowercased label to the field it names.
fn field_for(label: &str) -> Option<Field> {
    match label {
        "seo title" | "title" | "title tag" | "meta title" => Some(Field::Title),
        "meta description" | "description" => Some(Field::Description),
        "url slug" | "slug" => Some(Field::Slug),
        "primary keyword" | "primary" | "focus keyword" => Some(Field::Primary),
        _ if label.starts_with("secondary keyword") => Some(Field::Secondary),
        _ => None,
    }
}

fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    let cleaned = clean(trimmed);

    if let Some(caps) = LABEL.captures(&cleaned) {
        let label = caps.get(1).map_or("", |m| m.as_str()).trim();
        let value = caps.get(2).map_or("", |m| m.as_str()).to_string();
        let folded = label.to_ascii_lowercase();

        if folded == "q" || folded == "question" || is_numbered(&folded, 'q') {
            return LineKind::Question(value);
        }
        if folded == "a" || folded == "answer" || is_numbered(&folded, 'a') {
            return LineKind::Answer(value);
        }
        if let Some(field) = field_for(&folded) {
            return LineKind::Field(field, value);
        }
        if !cleaned.ends_with('?') {
            return LineKind::OtherLabel;
        }
    }

    if cleaned.ends_with('?') {
        LineKind::Question(cleaned)
    } else if heading(trimmed).is_some() {
        LineKind::Heading
    } else {
        LineKind::Text {
            text: cleaned,
            list_item: LIST_MARKER.is_match(trimmed),
        }
    }
}

/// Matches labels like `q1` or `a 2`.
fn is_numbered(label: &str, letter: char) -> bool {
    label.strip_prefix(letter).is_some_and(|rest| {
        let rest = rest.trim();
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
    })
}

#[derive(Debug, Default)]
struct Parser {
    pack: SeoPack,
    /// Field whose value is expected on the following line.
    pending_field: Option<Field>,
    question: Option<String>,
    answer: Vec<String>,
    /// Whether answer text is being collected for `question`.
    answering: bool,
    /// Whether `pending_field` is collecting a bulleted keyword list.
    in_keyword_list: bool,
}

impl Parser {
    fn feed(&mut self, kind: LineKind) {
        match kind {
            LineKind::Blank => {
                if self.in_keyword_list {
                    self.pending_field = None;
                    self.in_keyword_list = false;
                }
                if self.answering && !self.answer.is_empty() {
                    self.flush_pair();
                }
            }
            LineKind::Field(field, value) => {
                self.flush_pair();
                self.in_keyword_list = false;
                let value = unquote(&value);
                if value.is_empty() {
                    self.pending_field = Some(field);
                } else {
                    self.set_field(field, value);
                }
            }
            LineKind::Question(text) => {
                self.flush_pair();
                self.pending_field = None;
                let text = unquote(&text);
                if !text.is_empty() {
                    self.question = Some(text.to_string());
                    self.answering = true;
                }
            }
            LineKind::Answer(text) => {
                self.pending_field = None;
                if self.question.is_some() {
                    self.answering = true;
                    let text = unquote(&text);
                    if !text.is_empty() {
                        self.answer.push(text.to_string());
                    }
                }
            }
            LineKind::OtherLabel | LineKind::Heading => {
                self.flush_pair();
                self.pending_field = None;
            }
            LineKind::Text { text, list_item } => {
                if let Some(field) = self.pending_field.take() {
                    self.set_field(field, unquote(&text));
                    self.in_keyword_list = field == Field::Secondary && list_item;
                    if self.in_keyword_list {
                        self.pending_field = Some(field);
                    }
                } else if self.answering {
                    self.answer.push(text);
                }
            }
        }
    }

    fn set_field(&mut self, field: Field, value: &str) {
        if value.is_empty() {
            return;
        }
        let pack = &mut self.pack;
        match field {
            Field::Title if pack.title.is_none() => pack.title = Some(value.to_string()),
            Field::Description if pack.description.is_none() => {
                pack.description = Some(value.to_string());
            }
            Field::Slug if pack.slug.is_none() => pack.slug = Some(value.trim_matches('/').to_string()),
            Field::Primary if pack.primary_keyword.is_none() => {
                pack.primary_keyword = Some(value.to_string());
            }
            Field::Secondary => pack.secondary_keywords.extend(
                value
                    .split([',', ';'])
                    .map(|kw| unquote(kw).to_string())
                    .filter(|kw| !kw.is_empty()),
            ),
            _ => {}
        }
    }

    fn flush_pair(&mut self) {
        if let Some(question) = self.question.take() {
            if !self.answer.is_empty() {
                self.pack.faq.push(FaqPair {
                    question,
                    answer: self.answer.join(" "),
                });
            }
        }
        self.answer.clear();
        self.answering = false;
    }

    fn finish(mut self) -> SeoPack {
        self.flush_pair();
        self.pack
    }
}
