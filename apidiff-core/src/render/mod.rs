//! Renderer: turns an ordered match tree into marked diff lines.
//!
//! Output is a flat list of [`DiffLine`]s. Wholesale additions and removals
//! render their complete subtree; changed composites render their header,
//! braces and only the children that differ.

pub mod syntax;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::differ::changes::{AttributeMatch, MatchResult, MatchStatus};

/// Rendering toggles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Hide compiler-synthesized default constructors inside retained types
    /// unless they are the only change.
    pub hide_implicit_default_constructors: bool,
    /// Emit `partial` on class, struct, interface and record headers.
    pub add_partial_modifier: bool,
}

/// Marker at the start of a rendered line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineMarker {
    Added,
    Removed,
    Unchanged,
}

impl LineMarker {
    pub fn symbol(&self) -> char {
        match self {
            LineMarker::Added => '+',
            LineMarker::Removed => '-',
            LineMarker::Unchanged => ' ',
        }
    }
}

/// One rendered line of a diff document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub marker: LineMarker,
    pub depth: usize,
    pub text: String,
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = format!(
            "{} {}{}",
            self.marker.symbol(),
            "    ".repeat(self.depth),
            self.text
        );
        f.write_str(line.trim_end())
    }
}

/// Render a module's match results.
pub fn render(results: &[MatchResult<'_>], options: &RenderOptions) -> Vec<DiffLine> {
    let mut renderer = Renderer::new(options);
    for result in results {
        renderer.node(result, 0);
    }
    renderer.finish()
}

/// Line accumulator for one document. Never shared across modules.
pub struct Renderer<'o> {
    options: &'o RenderOptions,
    lines: Vec<DiffLine>,
}

impl<'o> Renderer<'o> {
    pub fn new(options: &'o RenderOptions) -> Self {
        Self {
            options,
            lines: Vec::new(),
        }
    }

    pub fn finish(self) -> Vec<DiffLine> {
        self.lines
    }

    /// Render one match result at `depth`. Unchanged results produce nothing.
    pub fn node(&mut self, result: &MatchResult<'_>, depth: usize) {
        match result.status {
            MatchStatus::Unchanged => {}
            MatchStatus::Added => self.whole(result, LineMarker::Added, depth),
            MatchStatus::Removed => self.whole(result, LineMarker::Removed, depth),
            MatchStatus::Changed if result.is_composite() => self.changed_composite(result, depth),
            MatchStatus::Changed => self.changed_leaf(result, depth),
        }
    }

    fn push(&mut self, marker: LineMarker, depth: usize, text: impl Into<String>) {
        self.lines.push(DiffLine {
            marker,
            depth,
            text: text.into(),
        });
    }

    /// A declaration present in one version only, with every descendant.
    ///
    /// Implicit default constructors are emitted here even when
    /// `hide_implicit_default_constructors` is set: a type that appears or
    /// disappears is shown complete, unlike tools that strip the constructor
    /// from every block.
    fn whole(&mut self, result: &MatchResult<'_>, marker: LineMarker, depth: usize) {
        for attribute in &result.attributes {
            let text = attribute.after.as_ref().or(attribute.before.as_ref());
            if let Some(text) = text {
                self.push(marker, depth, text.as_str());
            }
        }

        let line = result.after_line.as_ref().or(result.before_line.as_ref());
        if let Some(line) = line {
            self.push(marker, depth, line.as_str());
        }

        if result.is_composite() {
            self.push(marker, depth, "{");
            for child in &result.children {
                self.whole(child, marker, depth + 1);
            }
            self.push(marker, depth, "}");
        }
    }

    fn changed_composite(&mut self, result: &MatchResult<'_>, depth: usize) {
        self.attribute_lines(&result.attributes, depth);
        self.signature(result, depth);

        self.push(LineMarker::Unchanged, depth, "{");
        let changes = result.changed_children();
        for child in &result.children {
            if child.is_hidden_constructor(self.options.hide_implicit_default_constructors, changes) {
                continue;
            }
            self.node(child, depth + 1);
        }
        self.push(LineMarker::Unchanged, depth, "}");
    }

    fn changed_leaf(&mut self, result: &MatchResult<'_>, depth: usize) {
        self.attribute_lines(&result.attributes, depth);
        self.signature(result, depth);
    }

    /// The declaration line of a retained declaration: a removed/added pair
    /// when it differs, otherwise one context line.
    fn signature(&mut self, result: &MatchResult<'_>, depth: usize) {
        match (&result.before_line, &result.after_line) {
            (Some(before), Some(after)) if before != after => {
                self.push(LineMarker::Removed, depth, before.as_str());
                self.push(LineMarker::Added, depth, after.as_str());
            }
            (_, Some(line)) | (Some(line), None) => {
                self.push(LineMarker::Unchanged, depth, line.as_str());
            }
            (None, None) => {}
        }
    }

    fn attribute_lines(&mut self, attributes: &[AttributeMatch], depth: usize) {
        for attribute in attributes {
            match attribute.status {
                MatchStatus::Unchanged => {}
                MatchStatus::Added => {
                    if let Some(ref text) = attribute.after {
                        self.push(LineMarker::Added, depth, text.as_str());
                    }
                }
                MatchStatus::Removed => {
                    if let Some(ref text) = attribute.before {
                        self.push(LineMarker::Removed, depth, text.as_str());
                    }
                }
                MatchStatus::Changed => {
                    if let Some(ref text) = attribute.before {
                        self.push(LineMarker::Removed, depth, text.as_str());
                    }
                    if let Some(ref text) = attribute.after {
                        self.push(LineMarker::Added, depth, text.as_str());
                    }
                }
            }
        }
    }
}
