//! Text output formatting with colors.

use llxt_core::Entry;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const KEY_WIDTH: usize = 24;
const NAME_WIDTH: usize = 24;
const CATEGORY_WIDTH: usize = 12;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Header row for source listings.
    pub fn format_entries_header(&self) -> String {
        format!(
            "{} {} {} {}",
            self.bold(&pad("Key", KEY_WIDTH)),
            self.bold(&pad("Name", NAME_WIDTH)),
            self.bold(&pad("Category", CATEGORY_WIDTH)),
            self.bold("Full")
        )
    }

    /// One row of a source listing.
    pub fn format_entry_line(&self, entry: &Entry) -> String {
        let full = if entry.has_full() {
            self.green("✓")
        } else {
            self.dim("-")
        };

        format!(
            "{} {} {} {}",
            self.cyan(&pad(&entry.key, KEY_WIDTH)),
            pad(&entry.name, NAME_WIDTH),
            self.dim(&pad(entry.category.as_deref().unwrap_or("-"), CATEGORY_WIDTH)),
            full
        )
    }

    /// Multi-line details for one source.
    pub fn format_entry_details(&self, entry: &Entry) -> String {
        let mut lines = vec![format!("{} ({})", self.bold(&entry.name), self.cyan(&entry.key))];

        if let Some(description) = &entry.description {
            lines.push(self.dim(description));
        }
        lines.push(String::new());
        lines.push(format!("Domain:    {}", entry.domain));
        if let Some(category) = &entry.category {
            lines.push(format!("Category:  {category}"));
        }
        lines.push(format!("llms.txt:  {}", entry.llms_url));
        match entry.full_url() {
            Some(full) => lines.push(format!("Full:      {full}")),
            None => lines.push(format!("Full:      {}", self.dim("not available"))),
        }

        lines.join("\n")
    }

    /// Footer for listings.
    pub fn format_total(&self, count: usize, category: Option<&str>) -> String {
        match category {
            Some(c) => format!("Total: {count} sources in {c}"),
            None => format!("Total: {count} sources"),
        }
    }

    /// Formats an error with an optional hint.
    pub fn format_error(&self, message: &str, hint: Option<&str>) -> String {
        let mut out = format!("{} {}", self.red("Error:"), message);
        if let Some(hint) = hint {
            out.push('\n');
            out.push_str(&format!("{} {}", self.yellow("Hint:"), hint));
        }
        out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Pads or truncates to `width` characters so colored columns still align.
fn pad(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    } else {
        format!("{text}{}", " ".repeat(width - count))
    }
}
