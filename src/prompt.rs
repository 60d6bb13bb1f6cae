use crate::config::Settings;
use crate::error::Result;
use crate::selection::{Action, Event, Prompter, View};
use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Done,
    Filter,
    ClearFilter,
    Preview,
    ClearAll,
    File(String),
}

impl Entry {
    fn label(&self) -> String {
        match self {
            Entry::Done => format!("{}", "[done]".green().bold()),
            Entry::Filter => format!("{}", "[filter...]".cyan()),
            Entry::ClearFilter => format!("{}", "[clear filter]".cyan()),
            Entry::Preview => format!("{}", "[preview selection]".cyan()),
            Entry::ClearAll => format!("{}", "[clear all]".red()),
            Entry::File(id) => id.clone(),
        }
    }
}

fn menu(view: &View) -> Vec<Entry> {
    let mut entries = vec![Entry::Done, Entry::Filter];
    if view.filter.is_some() {
        entries.push(Entry::ClearFilter);
    }
    if view.selected > 0 {
        entries.push(Entry::Preview);
        entries.push(Entry::ClearAll);
    }
    entries.extend(view.items.iter().cloned().map(Entry::File));
    entries
}

fn header(view: &View) -> String {
    let mut header = format!(
        "{} selected, {} tokens, {} remaining",
        view.selected, view.total, view.remaining
    );
    if let Some(ref term) = view.filter {
        header.push_str(&format!(" | filter: {} ({} matches)", term, view.items.len()));
    }
    header
}

/// Prompter that talks to the user through the terminal.
pub struct TerminalPrompter {
    theme: ColorfulTheme,
    page_size: usize,
}

impl TerminalPrompter {
    pub fn new(settings: &Settings) -> Self {
        TerminalPrompter {
            theme: ColorfulTheme::default(),
            page_size: settings.page_size,
        }
    }

    fn ask_filter(&self) -> Result<Action> {
        let term: String = Input::with_theme(&self.theme)
            .with_prompt("Filter (empty to clear)")
            .allow_empty(true)
            .interact_text()?;

        if term.trim().is_empty() {
            Ok(Action::ClearFilter)
        } else {
            Ok(Action::SetFilter(term.trim().to_string()))
        }
    }

    /// Asks for the free-text request. The caller validates it.
    pub fn prompt_request(&self) -> Result<String> {
        let request: String = Input::with_theme(&self.theme)
            .with_prompt("Request")
            .allow_empty(true)
            .interact_text()?;
        Ok(request)
    }
}

impl Prompter for TerminalPrompter {
    fn next_action(&mut self, view: &View) -> Result<Action> {
        let entries = menu(view);
        let labels: Vec<String> = entries.iter().map(Entry::label).collect();
        let first_file = entries
            .iter()
            .position(|e| matches!(e, Entry::File(_)))
            .unwrap_or(0);

        let choice = Select::with_theme(&self.theme)
            .with_prompt(header(view))
            .items(&labels)
            .default(first_file)
            .max_length(self.page_size + entries.len() - view.items.len())
            .interact_opt()?;

        let action = match choice.map(|idx| &entries[idx]) {
            None if view.filter.is_some() => Action::ClearFilter,
            None | Some(Entry::Done) => Action::Done,
            Some(Entry::Filter) => self.ask_filter()?,
            Some(Entry::ClearFilter) => Action::ClearFilter,
            Some(Entry::Preview) => Action::Preview,
            Some(Entry::ClearAll) => Action::ClearAll,
            Some(Entry::File(id)) => Action::SelectFile(id.clone()),
        };
        Ok(action)
    }

    fn report(&mut self, event: &Event) {
        match event {
            Event::FilterSet(_) | Event::FilterCleared => {}
            Event::Selected { id, tokens, total } => {
                eprintln!(
                    "{} {} ({} tokens, total {})",
                    "+".green().bold(),
                    id,
                    tokens,
                    total.to_string().bold()
                );
            }
            Event::ThresholdExceeded { total, threshold } => {
                eprintln!(
                    "{}",
                    format!(
                        "warning: {} tokens selected, over the {} token threshold",
                        total, threshold
                    )
                    .yellow()
                    .bold()
                );
            }
            Event::AlreadySelected(id) => {
                eprintln!("{}", format!("{} is already selected", id).yellow());
            }
            Event::Unavailable(id) => {
                eprintln!("{}", format!("{} is not in the current list", id).yellow());
            }
            Event::Unreadable { id, reason } => {
                eprintln!("{}", format!("cannot read {}: {}", id, reason).red());
            }
            Event::Preview { files, total } => {
                eprintln!("{}", "Selected files:".bold());
                for (n, id) in files {
                    eprintln!("  {:>3}. {}", n, id);
                }
                eprintln!("  Total: {} tokens", total.to_string().bold());
            }
            Event::NothingSelected => {
                eprintln!("{}", "No files selected yet".dimmed());
            }
            Event::Cleared { files } => {
                eprintln!("Cleared {} selected files", files);
            }
            Event::Finished { files, total } => {
                eprintln!("{} files selected, {} tokens", files, total);
            }
            Event::Exhausted { files, total } => {
                eprintln!(
                    "All candidate files selected ({} files, {} tokens)",
                    files, total
                );
            }
        }
    }
}
