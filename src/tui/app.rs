use ratatui::widgets::ListState;

use crate::domain::{Displayed, ScrapeMethod, ScrapeRecord, ScrapeRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Scraper,
    Dashboard,
    Results,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Scraper, Tab::Dashboard, Tab::Results];

    pub fn next(self) -> Self {
        match self {
            Tab::Scraper => Tab::Dashboard,
            Tab::Dashboard => Tab::Results,
            Tab::Results => Tab::Scraper,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Scraper => Tab::Results,
            Tab::Dashboard => Tab::Scraper,
            Tab::Results => Tab::Dashboard,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Scraper => "Scraper",
            Tab::Dashboard => "Dashboard",
            Tab::Results => "Results",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Scraper => 0,
            Tab::Dashboard => 1,
            Tab::Results => 2,
        }
    }
}

/// Sub-view of the Results tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    Analysis,
    Original,
    Raw,
}

impl ResultView {
    pub const ALL: [ResultView; 3] = [ResultView::Analysis, ResultView::Original, ResultView::Raw];

    pub fn next(self) -> Self {
        match self {
            ResultView::Analysis => ResultView::Original,
            ResultView::Original => ResultView::Raw,
            ResultView::Raw => ResultView::Analysis,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ResultView::Analysis => ResultView::Raw,
            ResultView::Original => ResultView::Analysis,
            ResultView::Raw => ResultView::Original,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResultView::Analysis => "AI Analysis",
            ResultView::Original => "Original Data",
            ResultView::Raw => "Raw JSON",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ResultView::Analysis => 0,
            ResultView::Original => 1,
            ResultView::Raw => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Url,
    Prompt,
}

/// Scraper tab input state.
#[derive(Debug, Clone)]
pub struct ScrapeForm {
    pub url: String,
    pub prompt: String,
    pub analyze_with_ai: bool,
    pub method: ScrapeMethod,
    pub focus: FormField,
    pub editing: bool,
}

impl Default for ScrapeForm {
    fn default() -> Self {
        Self {
            url: String::new(),
            prompt: String::new(),
            analyze_with_ai: true,
            method: ScrapeMethod::Auto,
            focus: FormField::Url,
            editing: false,
        }
    }
}

impl ScrapeForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Url => &mut self.url,
            FormField::Prompt => &mut self.prompt,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Url => FormField::Prompt,
            FormField::Prompt => FormField::Url,
        };
    }

    pub fn request(&self) -> ScrapeRequest {
        ScrapeRequest::new(self.url.trim())
            .with_method(self.method)
            .with_ai(self.analyze_with_ai)
            .with_prompt(Some(&self.prompt))
    }
}

pub const PAGE_SIZE: usize = 10;

pub struct TuiApp {
    pub tab: Tab,
    pub form: ScrapeForm,
    /// A scrape or preview is in flight.
    pub submitting: bool,
    pub record_index: usize,
    pub record_list_state: ListState,
    pub displayed: Option<Displayed>,
    pub result_view: ResultView,
    pub result_scroll: u16,
    pub should_quit: bool,
    // Pending delete confirmation (record_id, title)
    pub pending_delete: Option<(String, String)>,
}

impl TuiApp {
    pub fn new() -> Self {
        let mut record_list_state = ListState::default();
        record_list_state.select(Some(0));

        Self {
            tab: Tab::Scraper,
            form: ScrapeForm::default(),
            submitting: false,
            record_index: 0,
            record_list_state,
            displayed: None,
            result_view: ResultView::Analysis,
            result_scroll: 0,
            should_quit: false,
            pending_delete: None,
        }
    }

    pub fn selected_record<'a>(&self, records: &'a [ScrapeRecord]) -> Option<&'a ScrapeRecord> {
        records.get(self.record_index)
    }

    /// Keep the selection inside a list that may have shrunk.
    pub fn clamp_selection(&mut self, len: usize) {
        if self.record_index >= len {
            self.record_index = len.saturating_sub(1);
        }
        self.record_list_state.select(Some(self.record_index));
    }

    pub fn move_up(&mut self) {
        match self.tab {
            Tab::Scraper => self.form.toggle_focus(),
            Tab::Dashboard => {
                if self.record_index > 0 {
                    self.record_index -= 1;
                    self.record_list_state.select(Some(self.record_index));
                }
            }
            Tab::Results => {
                self.result_scroll = self.result_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self, record_count: usize) {
        match self.tab {
            Tab::Scraper => self.form.toggle_focus(),
            Tab::Dashboard => {
                if record_count > 0 && self.record_index < record_count - 1 {
                    self.record_index += 1;
                    self.record_list_state.select(Some(self.record_index));
                }
            }
            Tab::Results => {
                self.result_scroll = self.result_scroll.saturating_add(1);
            }
        }
    }

    pub fn next_page(&mut self, record_count: usize) {
        match self.tab {
            Tab::Dashboard => {
                let max_index = record_count.saturating_sub(1);
                self.record_index = (self.record_index + PAGE_SIZE).min(max_index);
                self.record_list_state.select(Some(self.record_index));
            }
            Tab::Results => {
                self.result_scroll = self.result_scroll.saturating_add(PAGE_SIZE as u16);
            }
            Tab::Scraper => {}
        }
    }

    pub fn prev_page(&mut self) {
        match self.tab {
            Tab::Dashboard => {
                self.record_index = self.record_index.saturating_sub(PAGE_SIZE);
                self.record_list_state.select(Some(self.record_index));
            }
            Tab::Results => {
                self.result_scroll = self.result_scroll.saturating_sub(PAGE_SIZE as u16);
            }
            Tab::Scraper => {}
        }
    }

    /// Show `displayed` in the Results tab.
    pub fn show_result(&mut self, displayed: Displayed) {
        self.displayed = Some(displayed);
        self.result_view = ResultView::Analysis;
        self.result_scroll = 0;
        self.tab = Tab::Results;
    }

    pub fn next_view(&mut self) {
        self.result_view = self.result_view.next();
        self.result_scroll = 0;
    }

    pub fn prev_view(&mut self) {
        self.result_view = self.result_view.prev();
        self.result_scroll = 0;
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
