//! TOML question bank loader.
//!
//! Banks are static: loaded once at startup, validated, and never mutated.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::Question;

/// An ordered, read-only collection of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    /// Bank identifier from the file header.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from already-validated questions (used by tests and
    /// programmatic callers).
    pub fn new(id: impl Into<String>, name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            questions,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    #[serde(default)]
    category: String,
    content: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;
    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut seen_ids = std::collections::HashSet::new();
    let mut questions = Vec::with_capacity(parsed.questions.len());
    for q in parsed.questions {
        if q.content.trim().is_empty() {
            anyhow::bail!("question {} has empty content", q.id);
        }
        if !seen_ids.insert(q.id) {
            anyhow::bail!("duplicate question id: {}", q.id);
        }
        questions.push(Question {
            id: q.id,
            category: q.category,
            content: q.content,
        });
    }

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        questions,
    })
}
