//! Interactive file selection.
//!
//! The engine owns the selection state and turns one [`Action`] at a time
//! into a list of [`Event`]s. Soliciting actions and showing events is left to
//! a [`Prompter`], so the transition logic runs the same under a terminal or a
//! scripted test.

use crate::config::Settings;
use crate::document::wrap_block;
use crate::error::Result;
use crate::fuzzy::Ranker;
use crate::reader::FileReader;
use crate::tokens::Tokenizer;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetFilter(String),
    ClearFilter,
    SelectFile(String),
    Preview,
    ClearAll,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FilterSet(String),
    FilterCleared,
    Selected {
        id: String,
        tokens: usize,
        total: usize,
    },
    /// Raised once each time the running total crosses the threshold upward.
    ThresholdExceeded {
        total: usize,
        threshold: usize,
    },
    AlreadySelected(String),
    /// The file is not in the current display list.
    Unavailable(String),
    Unreadable {
        id: String,
        reason: String,
    },
    /// Selected files, numbered from 1, and the running total.
    Preview {
        files: Vec<(usize, String)>,
        total: usize,
    },
    NothingSelected,
    Cleared {
        files: usize,
    },
    Finished {
        files: usize,
        total: usize,
    },
    /// Every candidate has been selected.
    Exhausted {
        files: usize,
        total: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Browsing,
    Finished,
}

#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    selected: Vec<String>,
    running_total: usize,
    filter: Option<String>,
}

impl SelectionState {
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn running_total(&self) -> usize {
        self.running_total
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

/// What the prompter shows for one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub items: Vec<String>,
    pub filter: Option<String>,
    pub selected: usize,
    pub total: usize,
    pub remaining: usize,
}

/// The finalized selection, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub files: Vec<String>,
    pub total_tokens: usize,
}

pub trait Prompter {
    fn next_action(&mut self, view: &View) -> Result<Action>;

    fn report(&mut self, event: &Event);
}

pub struct SelectionEngine<'a> {
    pool: Vec<String>,
    state: SelectionState,
    chosen: HashSet<String>,
    phase: Phase,
    token_threshold: usize,
    page_size: usize,
    reader: &'a dyn FileReader,
    tokenizer: &'a dyn Tokenizer,
    ranker: Box<dyn Ranker + 'a>,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(
        pool: Vec<String>,
        settings: &Settings,
        reader: &'a dyn FileReader,
        tokenizer: &'a dyn Tokenizer,
        ranker: Box<dyn Ranker + 'a>,
    ) -> Self {
        let phase = if pool.is_empty() {
            Phase::Finished
        } else {
            Phase::Browsing
        };

        SelectionEngine {
            pool,
            state: SelectionState::default(),
            chosen: HashSet::new(),
            phase,
            token_threshold: settings.token_threshold,
            page_size: settings.page_size.max(1),
            reader,
            tokenizer,
            ranker,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    fn remaining(&self) -> Vec<String> {
        self.pool
            .iter()
            .filter(|id| !self.chosen.contains(*id))
            .cloned()
            .collect()
    }

    /// Unselected candidates, narrowed to the best `page_size` fuzzy matches
    /// while a non-blank filter is set.
    pub fn display_list(&mut self) -> Vec<String> {
        let remaining = self.remaining();

        match self.state.filter.as_deref() {
            Some(term) if !term.trim().is_empty() => {
                let mut ranked = self.ranker.rank(term, &remaining);
                ranked.truncate(self.page_size);
                ranked
            }
            _ => remaining,
        }
    }

    /// Returns `None` once the session is over; an exhausted pool ends it.
    pub fn view(&mut self) -> Option<View> {
        if self.phase == Phase::Finished {
            return None;
        }

        let remaining = self.remaining().len();
        if remaining == 0 {
            log::debug!("candidate pool exhausted");
            self.phase = Phase::Finished;
            return None;
        }

        Some(View {
            items: self.display_list(),
            filter: self.state.filter.clone(),
            selected: self.state.selected.len(),
            total: self.state.running_total,
            remaining,
        })
    }

    pub fn apply(&mut self, action: Action) -> Vec<Event> {
        if self.phase == Phase::Finished {
            log::debug!("ignoring {:?} after the session finished", action);
            return Vec::new();
        }

        let events = match action {
            Action::SetFilter(term) => {
                self.state.filter = Some(term.clone());
                vec![Event::FilterSet(term)]
            }
            Action::ClearFilter => {
                self.state.filter = None;
                vec![Event::FilterCleared]
            }
            Action::SelectFile(id) => self.select(id),
            Action::Preview => {
                if self.state.selected.is_empty() {
                    vec![Event::NothingSelected]
                } else {
                    let files = self
                        .state
                        .selected
                        .iter()
                        .enumerate()
                        .map(|(i, id)| (i + 1, id.clone()))
                        .collect();
                    vec![Event::Preview {
                        files,
                        total: self.state.running_total,
                    }]
                }
            }
            Action::ClearAll => {
                let files = self.state.selected.len();
                self.state.selected.clear();
                self.chosen.clear();
                self.state.running_total = 0;
                vec![Event::Cleared { files }]
            }
            Action::Done => {
                self.phase = Phase::Finished;
                vec![Event::Finished {
                    files: self.state.selected.len(),
                    total: self.state.running_total,
                }]
            }
        };

        for event in &events {
            log::debug!("{:?}", event);
        }
        events
    }

    fn select(&mut self, id: String) -> Vec<Event> {
        if self.chosen.contains(&id) {
            return vec![Event::AlreadySelected(id)];
        }

        if !self.display_list().contains(&id) {
            return vec![Event::Unavailable(id)];
        }

        let content = match self.reader.read(&id) {
            Ok(content) => content,
            Err(e) => {
                return vec![Event::Unreadable {
                    id,
                    reason: e.to_string(),
                }]
            }
        };

        let tokens = self.tokenizer.count(&wrap_block(&id, &content));
        let previous = self.state.running_total;
        self.state.running_total += tokens;
        self.chosen.insert(id.clone());
        self.state.selected.push(id.clone());

        let total = self.state.running_total;
        let mut events = vec![Event::Selected { id, tokens, total }];
        if previous <= self.token_threshold && total > self.token_threshold {
            events.push(Event::ThresholdExceeded {
                total,
                threshold: self.token_threshold,
            });
        }
        events
    }

    /// Drives the session until `Done` or until every candidate is selected.
    pub fn run(&mut self, prompter: &mut dyn Prompter) -> Result<Selection> {
        while self.phase == Phase::Browsing {
            let Some(view) = self.view() else {
                prompter.report(&Event::Exhausted {
                    files: self.state.selected.len(),
                    total: self.state.running_total,
                });
                break;
            };

            let action = prompter.next_action(&view)?;
            for event in self.apply(action) {
                prompter.report(&event);
            }
        }

        Ok(self.selection())
    }

    pub fn selection(&self) -> Selection {
        Selection {
            files: self.state.selected.clone(),
            total_tokens: self.state.running_total,
        }
    }
}
