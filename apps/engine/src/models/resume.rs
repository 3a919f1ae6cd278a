//! Structured Resume — the canonical intermediate representation.
//!
//! Produced by the LLM rewrite step (or a plain parse-to-structure call) and
//! consumed by both document renderers. The JSON arriving from the LLM is
//! untrusted: section content is dispatched on the *title* (not the content's
//! shape), and every entry inside a content list is validated individually —
//! a malformed entry is logged and skipped, never fatal.

use serde::de::Deserializer;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

// ────────────────────────────────────────────────────────────────────────────
// Top-level resume
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredResume {
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub designation_line: String,
    /// Contact channel name → value. Insertion order is display order, so
    /// this is a `Vec` rather than a map type that would re-sort keys.
    /// The `Value` intermediary in [`StructuredResume::from_value`] keeps
    /// key order only because serde_json's `preserve_order` feature is on.
    #[serde(default, with = "contact_info_map")]
    pub contact_info: Vec<(String, String)>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl StructuredResume {
    /// Parses a raw JSON value (typically straight from the LLM) into a
    /// structured resume. Fails only if the top level is unusable; per-entry
    /// problems inside sections are skipped with a warning.
    pub fn from_value(value: Value) -> Result<Self, crate::errors::EngineError> {
        serde_json::from_value(value)
            .map_err(|e| crate::errors::EngineError::InvalidResume(e.to_string()))
    }

    /// Flattens the resume back to plain text, used when a rewritten resume
    /// is re-analyzed against the job description.
    pub fn to_plain_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.candidate_name.is_empty() {
            parts.push(self.candidate_name.clone());
        }
        if !self.designation_line.is_empty() {
            parts.push(self.designation_line.clone());
        }
        let contact_line = self
            .contact_info
            .iter()
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        if !contact_line.is_empty() {
            parts.push(contact_line);
        }

        for section in &self.sections {
            parts.push(format!("\n{}", section.title.to_uppercase()));
            match &section.content {
                SectionContent::Plain(text) => {
                    if !text.is_empty() {
                        parts.push(text.clone());
                    }
                }
                SectionContent::BulletList(items) => {
                    parts.extend(items.iter().map(|i| format!("- {i}")));
                }
                SectionContent::Experience(jobs) => {
                    for job in jobs {
                        let mut lines = vec![job.job_title.clone()];
                        if let Some(cd) = &job.company_and_date {
                            lines.push(cd.clone());
                        }
                        lines.extend(job.duties.iter().map(|d| format!("- {d}")));
                        parts.push(lines.join("\n"));
                    }
                }
                SectionContent::Projects(projects) => {
                    for project in projects {
                        let mut lines = vec![format!("Project: {}", project.project_name)];
                        if let Some(desc) = project.description.as_deref().filter(|d| !d.is_empty())
                        {
                            lines.push(format!("  Description: {desc}"));
                        }
                        if let Some(tech) = project.tech_stack.as_deref().filter(|t| !t.is_empty())
                        {
                            lines.push(format!("  Tech Stack: {tech}"));
                        }
                        parts.push(lines.join("\n"));
                    }
                }
                SectionContent::Skills(rows) => {
                    for row in rows {
                        if row.category.is_empty() {
                            parts.push(format!("- {}", row.skills));
                        } else {
                            parts.push(format!("- {}: {}", row.category, row.skills));
                        }
                    }
                }
            }
        }

        parts.retain(|p| !p.is_empty());
        parts.join("\n")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections and content variants
// ────────────────────────────────────────────────────────────────────────────

/// One resume section. `content`'s variant is determined entirely by the
/// title-dispatch rule at deserialization time; downstream rendering code
/// pattern-matches the variant instead of re-testing the title string.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    pub content: SectionContent,
}

/// The semantic shape of a section's content.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    /// Free-form paragraph text.
    Plain(String),
    /// One bulleted line per item.
    BulletList(Vec<String>),
    Experience(Vec<ExperienceEntry>),
    Projects(Vec<ProjectEntry>),
    Skills(Vec<SkillRow>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_and_date: Option<String>,
    #[serde(default)]
    pub duties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub project_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRow {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub skills: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Title dispatch + defensive content validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Experience,
    Projects,
    Skills,
    Generic,
}

/// The title-matching rule: case-insensitive equality for "experience" and
/// "projects", substring match for "skill", everything else is generic.
fn classify_title(title: &str) -> SectionKind {
    let normalized = title.trim().to_lowercase();
    if normalized == "experience" {
        SectionKind::Experience
    } else if normalized == "projects" {
        SectionKind::Projects
    } else if normalized.contains("skill") {
        SectionKind::Skills
    } else {
        SectionKind::Generic
    }
}

impl Section {
    /// Builds a section from an untrusted title + content value.
    ///
    /// Branches on the normalized title first, then validates the content's
    /// actual shape. A titled section whose content is not the expected list
    /// falls back to generic rendering; malformed entries inside an expected
    /// list are skipped one by one.
    fn from_untrusted(title: String, content: Value) -> Self {
        let kind = classify_title(&title);
        let content = match (kind, content) {
            (SectionKind::Experience, Value::Array(items)) => {
                SectionContent::Experience(collect_valid(&title, items))
            }
            (SectionKind::Projects, Value::Array(items)) => {
                SectionContent::Projects(collect_valid(&title, items))
            }
            (SectionKind::Skills, Value::Array(items)) => {
                SectionContent::Skills(collect_skill_rows(&title, items))
            }
            // Wrong shape for a typed section, or a generic title: coerce to
            // paragraph/bullet content rather than failing the document.
            (_, other) => generic_content(&title, other),
        };
        Section { title, content }
    }
}

/// Deserializes each array element into `T`, skipping (and logging) entries
/// whose shape does not match.
fn collect_valid<T: serde::de::DeserializeOwned>(title: &str, items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<T>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(section = title, index = i, "Skipping malformed entry: {e}");
                None
            }
        })
        .collect()
}

/// Skill rows accept three shapes: `{category, skills}` objects, a single
/// `"category: skills"` string, or a bare string treated as skills with an
/// empty category.
fn collect_skill_rows(title: &str, items: Vec<Value>) -> Vec<SkillRow> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Value::Object(_) => match serde_json::from_value::<SkillRow>(item) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(section = title, index = i, "Skipping malformed skill row: {e}");
                    None
                }
            },
            Value::String(s) => Some(match s.split_once(':') {
                Some((category, skills)) => SkillRow {
                    category: category.trim().to_string(),
                    skills: skills.trim().to_string(),
                },
                None => SkillRow {
                    category: String::new(),
                    skills: s,
                },
            }),
            other => match scalar_to_string(&other) {
                Some(s) => Some(SkillRow {
                    category: String::new(),
                    skills: s,
                }),
                None => {
                    warn!(section = title, index = i, "Skipping malformed skill row");
                    None
                }
            },
        })
        .collect()
}

fn generic_content(title: &str, content: Value) -> SectionContent {
    match content {
        Value::Array(items) => SectionContent::BulletList(
            items
                .into_iter()
                .enumerate()
                .filter_map(|(i, item)| match scalar_to_string(&item) {
                    Some(s) => Some(s),
                    None => {
                        warn!(section = title, index = i, "Skipping non-text list item");
                        None
                    }
                })
                .collect(),
        ),
        Value::Null => SectionContent::Plain(String::new()),
        other => match scalar_to_string(&other) {
            Some(s) => SectionContent::Plain(s),
            None => {
                warn!(section = title, "Section content has an unusable shape");
                SectionContent::Plain(String::new())
            }
        },
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawSection {
            #[serde(default)]
            title: String,
            #[serde(default)]
            content: Value,
        }
        let raw = RawSection::deserialize(deserializer)?;
        Ok(Section::from_untrusted(raw.title, raw.content))
    }
}

impl Serialize for SectionContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SectionContent::Plain(s) => s.serialize(serializer),
            SectionContent::BulletList(items) => items.serialize(serializer),
            SectionContent::Experience(entries) => entries.serialize(serializer),
            SectionContent::Projects(entries) => entries.serialize(serializer),
            SectionContent::Skills(rows) => rows.serialize(serializer),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ordered contact-info (de)serialization
// ────────────────────────────────────────────────────────────────────────────

mod contact_info_map {
    use super::*;
    use serde::de::{MapAccess, Visitor};
    use std::fmt;

    pub fn serialize<S>(contacts: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(contacts.len()))?;
        for (key, value) in contacts {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ContactVisitor;

        impl<'de> Visitor<'de> for ContactVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of contact channel name to value")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut contacts = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    match scalar_to_string(&value) {
                        Some(v) if !v.is_empty() => contacts.push((key, v)),
                        _ => warn!(channel = key, "Skipping empty or non-text contact value"),
                    }
                }
                Ok(contacts)
            }
        }

        deserializer.deserialize_map(ContactVisitor)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
