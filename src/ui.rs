//! Rendering side of the list: the [`ListView`] collaborator the controller
//! drives, plus a text implementation for terminals.

use crate::models::Item;
use crate::summary::Summary;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    pub fn label(self) -> &'static str {
        match self {
            Level::Success => "ok",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Danger => "error",
        }
    }
}

/// Dismissible message that disappears after `ttl`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub level: Level,
    pub ttl: Duration,
}

pub trait ListView: Send + Sync {
    fn set_loading(&self, loading: bool);
    fn notify(&self, notification: Notification);
    /// Asks the user to confirm a destructive action.
    fn confirm(&self, prompt: &str) -> bool;
    fn show_categories(&self, categories: &[String]);
    /// The planning view: names, categories, purchased badge.
    fn render_items(&self, items: &[Item]);
    /// The in-store view: checkbox, quantity, unit price and line total.
    fn render_market(&self, items: &[Item]);
    fn render_summary(&self, summary: &Summary);
    fn set_purchased_checkbox(&self, id: i64, checked: bool);
    fn reset_form(&self) {}
}

/// Formats a value as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

/// Reads a quantity or price field. Empty, invalid or negative input is `0`.
pub fn parse_decimal(raw: &str) -> f64 {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(value) if value != 0.0 => {
            let text = format!("{value:.2}");
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "-".to_string(),
    }
}

pub fn render_categories_text(categories: &[String]) -> String {
    let mut out = String::from("Categories:\n");
    for category in categories {
        let _ = writeln!(out, "  {category}");
    }
    out
}

pub fn render_items_text(items: &[Item]) -> String {
    if items.is_empty() {
        return "The list is empty. Add an item to get started.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let badge = if item.purchased { "  [purchased]" } else { "" };
        let _ = writeln!(out, "#{:<4} {} ({}){badge}", item.id, item.name, item.category);
    }
    out
}

pub fn render_market_text(items: &[Item]) -> String {
    if items.is_empty() {
        return "Nothing to buy yet.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let check = if item.purchased { "x" } else { " " };
        let _ = writeln!(
            out,
            "[{check}] #{:<4} {:<24} {:<18} qty {:>8}  unit {:>8}  total {}",
            item.id,
            item.name,
            item.category,
            format_amount(item.quantity),
            format_amount(item.unit_price),
            format_currency(item.total()),
        );
    }
    out
}

pub fn render_summary_text(summary: &Summary) -> String {
    let filled = (summary.percent / 5.0).round().clamp(0.0, 20.0) as usize;
    format!(
        "Purchased {}/{} items  |  Total {}  |  [{}{}] {}% complete\n",
        summary.purchased_items,
        summary.total_items,
        format_currency(summary.grand_total),
        "#".repeat(filled),
        "-".repeat(20 - filled),
        summary.rounded_percent(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Categories,
    Items,
    Market,
    Summary,
}

#[derive(Debug, Default)]
struct Screen {
    categories: Option<String>,
    items: Option<String>,
    market: Option<String>,
    summary: Option<String>,
    loading: bool,
}

/// Terminal view. Renders replace the stored section text, like a page
/// region being redrawn; [`ConsoleView::present`] prints the final frame.
/// Notifications go straight to stderr.
pub struct ConsoleView {
    screen: Mutex<Screen>,
    assume_yes: bool,
}

impl ConsoleView {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            screen: Mutex::new(Screen::default()),
            assume_yes,
        }
    }

    pub fn present(&self, sections: &[Section], out: &mut impl Write) -> io::Result<()> {
        let screen = self.screen.lock().unwrap_or_else(PoisonError::into_inner);
        for section in sections {
            let text = match section {
                Section::Categories => &screen.categories,
                Section::Items => &screen.items,
                Section::Market => &screen.market,
                Section::Summary => &screen.summary,
            };
            if let Some(text) = text {
                out.write_all(text.as_bytes())?;
            }
        }
        out.flush()
    }

    pub fn is_loading(&self) -> bool {
        self.screen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .loading
    }

    fn update(&self, apply: impl FnOnce(&mut Screen)) {
        let mut screen = self.screen.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut screen);
    }
}

impl ListView for ConsoleView {
    fn set_loading(&self, loading: bool) {
        self.update(|screen| screen.loading = loading);
    }

    fn notify(&self, notification: Notification) {
        eprintln!("[{}] {}", notification.level.label(), notification.message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "sim")
    }

    fn show_categories(&self, categories: &[String]) {
        let text = render_categories_text(categories);
        self.update(|screen| screen.categories = Some(text));
    }

    fn render_items(&self, items: &[Item]) {
        let text = render_items_text(items);
        self.update(|screen| screen.items = Some(text));
    }

    fn render_market(&self, items: &[Item]) {
        let text = render_market_text(items);
        self.update(|screen| screen.market = Some(text));
    }

    fn render_summary(&self, summary: &Summary) {
        let text = render_summary_text(summary);
        self.update(|screen| screen.summary = Some(text));
    }

    // The market text is re-rendered from the cache after every write, so
    // the terminal has no separate checkbox state to roll back.
    fn set_purchased_checkbox(&self, _id: i64, _checked: bool) {}
}
