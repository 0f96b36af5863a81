//! Page routing.
//!
//! The console shows exactly one page at a time. Navigation is a plain state
//! change here; the engine layers page-entry side effects (dashboard loads)
//! on top.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    Dashboard,
    Search,
}

impl Page {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            "dashboard" => Some(Self::Dashboard),
            "search" => Some(Self::Search),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Dashboard => "Dashboard",
            Self::Search => "Search Buses",
        }
    }
}

/// Active page plus the travel-date field of the search form. Entering the
/// search page resets the date to the current day, which is also the
/// earliest selectable day.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    current: Page,
    travel_date: NaiveDate,
    min_travel_date: NaiveDate,
}

impl ViewRouter {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current: Page::Home,
            travel_date: today,
            min_travel_date: today,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn travel_date(&self) -> NaiveDate {
        self.travel_date
    }

    pub fn min_travel_date(&self) -> NaiveDate {
        self.min_travel_date
    }

    pub fn navigate(&mut self, page: Page, today: NaiveDate) {
        self.current = page;
        if page == Page::Search {
            self.travel_date = today;
            self.min_travel_date = today;
        }
    }

    /// Set the travel date; days before the minimum are refused.
    pub fn set_travel_date(&mut self, date: NaiveDate) -> bool {
        if date < self.min_travel_date {
            return false;
        }
        self.travel_date = date;
        true
    }
}
