use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::*;

use crate::document::LineSource;
use crate::error::CompletionError;
use crate::labels;
use crate::mode::CompletionMode;
use crate::tables::{self, TableEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "register")]
    Register,
    #[serde(rename = "instruction")]
    Instruction,
    #[serde(rename = "alias")]
    Alias,
    #[serde(rename = "pseudo-op")]
    PseudoOp,
    #[serde(rename = "label")]
    Label,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Register => "register",
            Category::Instruction => "instruction",
            Category::Alias => "alias",
            Category::PseudoOp => "pseudo-op",
            Category::Label => "label",
        }
    }

    fn item_kind(self) -> CompletionItemKind {
        match self {
            Category::Register => CompletionItemKind::VARIABLE,
            Category::Instruction => CompletionItemKind::KEYWORD,
            Category::Alias => CompletionItemKind::FUNCTION,
            Category::PseudoOp => CompletionItemKind::MODULE,
            Category::Label => CompletionItemKind::REFERENCE,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub value: String,
    pub score: u32,
    pub meta: Category,
}

/// Where completion was requested.
///
/// `column` counts characters consumed on the line: the text already typed
/// before the cursor is `[0, column - 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: usize,
    pub column: usize,
}

impl CursorPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionData {
    pub category: Category,
}

/// Character-indexed prefix `[0, column - 1)` of `line`, clamped to its length.
pub fn pre_cursor_text(line: &str, column: usize) -> &str {
    let take = column.saturating_sub(1);
    match line.char_indices().nth(take) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// The run of word characters ending `character` characters into `line`.
pub fn word_before(line: &str, character: usize) -> &str {
    let end = line
        .char_indices()
        .nth(character)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len());
    let head = &line[..end];
    let start = head
        .char_indices()
        .rev()
        .take_while(|&(_, c)| labels::is_word_char(c))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(end);
    &head[start..]
}

fn table_suggestions(
    entries: &'static [TableEntry],
    score: u32,
    meta: Category,
) -> impl Iterator<Item = Suggestion> {
    entries.iter().map(move |e| Suggestion {
        value: e.name.to_string(),
        score,
        meta,
    })
}

/// Produce completion suggestions for the cursor at `position`.
///
/// Suggestions come out in table order: registers, instructions, aliases,
/// pseudo-ops, then (in `Full` mode) inferred labels. Registers are dropped
/// when nothing but whitespace precedes the cursor.
pub fn generate<D: LineSource + ?Sized>(
    mode: CompletionMode,
    doc: &D,
    position: CursorPosition,
    prefix: &str,
) -> Result<Vec<Suggestion>, CompletionError> {
    if mode == CompletionMode::None {
        return Ok(Vec::new());
    }

    if prefix.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(Vec::new());
    }

    let current_line = doc
        .line(position.row)
        .ok_or(CompletionError::InvalidPosition {
            row: position.row,
            line_count: doc.line_count(),
        })?;
    let typed = pre_cursor_text(&current_line, position.column);
    if typed.contains(';') {
        return Ok(Vec::new());
    }

    let inferred = if mode == CompletionMode::Full {
        let lines = doc.all_lines();
        trace!("scanning {} line(s) for labels", lines.len());
        labels::infer_labels(&lines, prefix)
    } else {
        Vec::new()
    };

    let at_line_start = typed.trim().is_empty();

    let suggestions = table_suggestions(tables::REGISTERS, tables::REGISTER_SCORE, Category::Register)
        .chain(table_suggestions(tables::INSTRUCTIONS, tables::BUILTIN_SCORE, Category::Instruction))
        .chain(table_suggestions(tables::ALIASES, tables::BUILTIN_SCORE, Category::Alias))
        .chain(table_suggestions(tables::PSEUDO_OPS, tables::BUILTIN_SCORE, Category::PseudoOp))
        .chain(inferred.into_iter().map(|value| Suggestion {
            value,
            score: tables::LABEL_SCORE,
            meta: Category::Label,
        }))
        .filter(|s| !(at_line_start && s.meta == Category::Register))
        .collect();

    Ok(suggestions)
}

/// Convert a suggestion into an LSP item. Higher scores sort first.
pub fn to_completion_item(s: &Suggestion) -> CompletionItem {
    let detail = match tables::synopsis(&s.value).filter(|_| s.meta != Category::Label) {
        Some(synopsis) => format!("({}) {synopsis}", s.meta),
        None => format!("({})", s.meta),
    };

    let data = serde_json::to_value(CompletionData { category: s.meta }).ok();

    CompletionItem {
        label: s.value.clone(),
        kind: Some(s.meta.item_kind()),
        detail: Some(detail),
        sort_text: Some(format!("{:02}{}", 99u32.saturating_sub(s.score), s.value)),
        data,
        ..Default::default()
    }
}

fn category_documentation(category: Category) -> &'static str {
    match category {
        Category::Register => "General purpose register.",
        Category::Instruction => "LC-3 machine instruction.",
        Category::Alias => "Trap or jump alias expanding to a single instruction.",
        Category::PseudoOp => "Assembler directive; emits no instruction of its own.",
        Category::Label => "Label inferred from this document.",
    }
}

/// Fill in the documentation of an item produced by [`to_completion_item`].
/// Items without recognizable `data` are returned unchanged.
pub fn resolve_completion_item(mut item: CompletionItem) -> CompletionItem {
    let Some(data) = item
        .data
        .as_ref()
        .and_then(|d| serde_json::from_value::<CompletionData>(d.clone()).ok())
    else {
        return item;
    };

    let mut md_parts = Vec::new();
    if data.category != Category::Label {
        if let Some(synopsis) = tables::synopsis(&item.label) {
            md_parts.push(format!("```lc3\n{synopsis}\n```"));
        }
    }
    md_parts.push(category_documentation(data.category).to_string());

    item.documentation = Some(Documentation::MarkupContent(MarkupContent {
        kind: MarkupKind::Markdown,
        value: md_parts.join("\n\n"),
    }));
    item
}
