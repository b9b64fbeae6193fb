use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reconcile::{Action, ExecProgress, ExecuteSummary, Reporter};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Truncate a string for display, keeping the end
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let len = path.chars().count();
    if len <= max_len {
        path.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let tail: String = path.chars().skip(len - max_len + 3).collect();
        format!("...{}", tail)
    }
}

// ============================================================================
// Planning output
// ============================================================================

fn plan_line(indent: usize, text: &str, what: &str, name: Option<&str>) -> String {
    let name = name.map(|n| format!(": {}", n)).unwrap_or_default();
    format!("{}{} {}{}", "   ".repeat(indent), text, what, name)
}

/// Renders planning progress on the terminal.
pub struct TermReporter;

impl Reporter for TermReporter {
    fn check(&self, indent: usize, what: &str, name: Option<&str>) {
        println!("{} {}", "•".yellow(), plan_line(indent, "checking", what, name));
    }

    fn add(&self, indent: usize, verb: &str, what: &str, name: Option<&str>) {
        let text = format!("need to {}", verb.green());
        println!("  {}", plan_line(indent, &text, what, name));
    }

    fn remove(&self, indent: usize, verb: &str, what: &str, name: Option<&str>) {
        let text = format!("need to {}", verb.red());
        println!("  {}", plan_line(indent, &text, what, name));
    }
}

/// Renders the `show` output.
pub struct TermDisplay;

impl reconcile::Display for TermDisplay {
    fn entity(&mut self, kind: &str, name: &str) {
        section(&format!("{} {}", kind, name));
    }

    fn field(&mut self, key: &str, value: &str) {
        kv(key, value);
    }

    fn list(&mut self, key: &str, items: &[String]) {
        if items.is_empty() {
            kv(key, &"(none)".dimmed().to_string());
        } else {
            kv(key, &items.join(", "));
        }
    }
}

// ============================================================================
// Execution output
// ============================================================================

/// Progress bar over the queued actions.
pub struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    pub fn new(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        pb.set_style(style);
        Self { pb }
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ExecProgress for BarProgress {
    fn on_action_start(&mut self, _index: usize, _total: usize, action: &Action) {
        self.pb.set_message(truncate_path(&action.describe(), 50));
    }

    fn on_action_complete(&mut self, _index: usize, action: &Action) {
        let line = action.describe();
        self.pb.suspend(|| {
            println!("  {} {}", "✓".green(), line);
        });
        self.pb.inc(1);
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.pb.abandon();
        }
    }
}

/// Print the queued actions, numbered.
pub fn print_actions(actions: &[Action]) {
    section(&format!("Planned actions ({})", actions.len()));
    for (idx, action) in actions.iter().enumerate() {
        println!(
            "  {} {}",
            format!("[{}/{}]", idx + 1, actions.len()).blue().bold(),
            action.describe()
        );
    }
}

fn summary_lines(summary: &ExecuteSummary) -> Vec<String> {
    let counts = [
        (summary.created, "created"),
        (summary.updated, "properties updated"),
        (summary.attached, "forests attached"),
        (summary.detached, "forests detached"),
        (summary.inserted, "documents inserted"),
    ];
    counts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect()
}

/// Print the execution summary.
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    println!(
        "  {} {} actions done",
        "✓".green().bold(),
        summary.total()
    );
    for line in summary_lines(summary) {
        println!("    • {}", line);
    }
}

/// Print what to do about a management error.
pub fn print_advice(err: &manage::Error) {
    let category = err.category();
    eprintln!(
        "  {} {}: {}",
        "→".cyan(),
        category.description(),
        category.advice().dimmed()
    );
}

// ============================================================================
// Tests
// ============================================================================
