//! The console engine and its interactive shell.
//!
//! [`ConsoleApp`] owns all user-facing state: the view router, the
//! session, the notice board, the loaded dashboard, and the last search
//! results. Session state is never written by command handlers directly;
//! they call the provider through the gateway and then drain the
//! credential channel with [`ConsoleApp::pump_auth`], so a forced sign-out
//! in the middle of a flow lands in the same place as a user-initiated one.
//!
//! The interactive `run` loop is a thin layer on top: it prompts for form
//! fields line by line, calls one engine method, and re-renders.

use std::io::Write as _;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;

use super::auth::{AuthGateway, Registration};
use super::dashboard::{self, DashboardView, DriverPanel};
use super::forms::{
    self, BusDetailsForm, BusTypeForm, ContactDetailsForm, ContactMessageForm, CreateDriverForm,
};
use super::notices::{Notice, NoticeBoard, NoticeKind};
use super::roles::Role;
use super::router::{Page, ViewRouter};
use super::search::{self, SearchHit};
use super::session::SessionContext;
use crate::backend::collections;
use crate::backend::documents::DocumentStore;
use crate::backend::identity::{Credential, IdentityProvider};
use crate::config::Config;
use crate::logbuffer;
use crate::models::BusRecord;
use crate::validation::ValidationError;

type StdinLines = Lines<BufReader<Stdin>>;

pub struct ConsoleApp {
    config: Config,
    store: Arc<dyn DocumentStore>,
    gateway: AuthGateway,
    auth_rx: watch::Receiver<Option<Credential>>,
    session: SessionContext,
    router: ViewRouter,
    notices: NoticeBoard,
    dashboard: Option<DashboardView>,
    last_results: Option<Vec<SearchHit>>,
}

impl ConsoleApp {
    pub fn new(
        config: Config,
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let gateway = AuthGateway::new(
            provider.clone(),
            store.clone(),
            config.security.admin_registration_code.clone(),
        );
        let auth_rx = provider.subscribe();
        Self {
            config,
            store,
            gateway,
            auth_rx,
            session: SessionContext::signed_out(),
            router: ViewRouter::new(Local::now().date_naive()),
            notices: NoticeBoard::new(),
            dashboard: None,
            last_results: None,
        }
    }

    /// Resolve the provider's current credential once, then keep following
    /// transitions through [`Self::pump_auth`]. Restored sessions land on
    /// the dashboard without a fresh login.
    pub async fn start(&mut self) {
        let initial = self.auth_rx.borrow_and_update().clone();
        let next = self.gateway.resolve_transition(initial).await;
        self.apply_session(next).await;
        info!("{} initialized", self.config.console.name);
    }

    /// Drain pending credential transitions into the session. The channel
    /// collapses missed intermediates, so only settled states are resolved;
    /// resolution may itself sign out and queue another transition, hence
    /// the loop.
    pub async fn pump_auth(&mut self) {
        while self.auth_rx.has_changed().unwrap_or(false) {
            let credential = self.auth_rx.borrow_and_update().clone();
            let next = self.gateway.resolve_transition(credential).await;
            self.apply_session(next).await;
        }
    }

    async fn apply_session(&mut self, next: SessionContext) {
        let today = Local::now().date_naive();
        self.session = next;
        if self.session.is_signed_in() {
            self.router.navigate(Page::Dashboard, today);
            self.refresh_dashboard().await;
        } else {
            self.dashboard = None;
            self.router.navigate(Page::Home, today);
        }
    }

    pub async fn login(&mut self, email: &str, password: &str, claimed: Role) -> bool {
        match forms::submit_login(&self.gateway, email, password, claimed).await {
            Ok(message) => {
                self.pump_auth().await;
                self.notices.post("login", NoticeKind::Success, message);
                true
            }
            Err(e) => {
                // A rejected login may have forced a provider sign-out;
                // settle that before reporting.
                self.pump_auth().await;
                self.notices.post("login", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    pub async fn register(&mut self, registration: Registration) -> bool {
        match forms::submit_register(&self.gateway, registration).await {
            Ok(message) => {
                self.notices.post("register", NoticeKind::Success, message);
                self.router.navigate(Page::Login, Local::now().date_naive());
                true
            }
            Err(e) => {
                self.notices
                    .post("register", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.gateway.sign_out().await {
            logbuffer::failure("logout", &format!("logout error: {}", e));
        }
        self.pump_auth().await;
    }

    pub async fn navigate(&mut self, page: Page) {
        self.router.navigate(page, Local::now().date_naive());
        if page == Page::Dashboard && self.session.is_signed_in() {
            self.refresh_dashboard().await;
        }
    }

    pub async fn refresh_dashboard(&mut self) {
        match dashboard::load_dashboard(self.store.as_ref(), &self.session).await {
            Ok(view) => self.dashboard = Some(view),
            Err(_) => self.dashboard = None,
        }
    }

    pub async fn create_driver(&mut self, form: &CreateDriverForm) -> bool {
        match forms::submit_create_driver(self.store.as_ref(), &self.session, form).await {
            Ok(message) => {
                self.notices
                    .post("createDriver", NoticeKind::Success, message);
                if self.session.role() == Some(Role::Admin) {
                    self.refresh_dashboard().await;
                }
                true
            }
            Err(e) => {
                self.notices
                    .post("createDriver", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    pub async fn add_bus(&mut self, form: &BusDetailsForm) -> bool {
        match forms::submit_bus_details(self.store.as_ref(), &self.session, form).await {
            Ok(message) => {
                self.notices.post("busInfo", NoticeKind::Success, message);
                if self.session.role() == Some(Role::Driver) {
                    self.refresh_dashboard().await;
                }
                true
            }
            Err(e) => {
                self.notices.post("busInfo", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    pub async fn add_bus_type(&mut self, form: &BusTypeForm) -> bool {
        match forms::submit_bus_type(self.store.as_ref(), &self.session, form).await {
            Ok(message) => {
                self.notices.post("busType", NoticeKind::Success, message);
                true
            }
            Err(e) => {
                self.notices.post("busType", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    pub async fn update_contact(&mut self, form: &ContactDetailsForm) -> bool {
        match forms::submit_contact_details(self.store.as_ref(), &self.session, form).await {
            Ok(message) => {
                self.notices.post("contact", NoticeKind::Success, message);
                true
            }
            Err(e) => {
                self.notices.post("contact", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    pub async fn send_message(&mut self, form: &ContactMessageForm) -> bool {
        match forms::submit_contact_message(self.store.as_ref(), &self.session, form).await {
            Ok(message) => {
                self.notices
                    .post("contactForm", NoticeKind::Success, message);
                true
            }
            Err(e) => {
                self.notices
                    .post("contactForm", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    pub async fn search(&mut self, source: &str, destination: &str) -> bool {
        match forms::submit_search(self.store.as_ref(), source, destination).await {
            Ok(hits) => {
                self.last_results = Some(hits);
                true
            }
            Err(e) => {
                self.last_results = None;
                self.notices.post("search", NoticeKind::Error, e.to_string());
                false
            }
        }
    }

    /// Book by a 1-based result index or a raw document id.
    pub fn book(&self, reference: &str) -> String {
        let id = reference
            .parse::<usize>()
            .ok()
            .and_then(|n| {
                let hits = self.last_results.as_ref()?;
                hits.get(n.checked_sub(1)?)
            })
            .map(|hit| hit.id.clone())
            .unwrap_or_else(|| reference.to_string());
        search::book_bus(&id).to_string()
    }

    pub fn set_travel_date(&mut self, date: NaiveDate) -> bool {
        self.router.set_travel_date(date)
    }

    /// Probe each collection and report `Contains data`, `Empty`, or
    /// `Error - <message>`.
    pub async fn database_check(&self) -> Vec<(&'static str, String)> {
        let mut report = Vec::new();
        for collection in collections::ALL {
            let status = match self.store.get_all(collection).await {
                Ok(rows) if rows.is_empty() => "Empty".to_string(),
                Ok(_) => "Contains data".to_string(),
                Err(e) => format!("Error - {}", e),
            };
            report.push((collection, status));
        }
        report
    }

    pub async fn show_status(&self) -> Result<()> {
        println!("{} v{}", self.config.console.name, env!("CARGO_PKG_VERSION"));
        println!("Data directory: {}", self.config.backend.data_dir);
        println!(
            "Backend: {}",
            if self.config.backend.ephemeral {
                "in-memory (ephemeral)"
            } else {
                "in-memory (snapshot on write)"
            }
        );
        println!("Collections:");
        for (collection, status) in self.database_check().await {
            println!("  {collection}: {status}");
        }
        Ok(())
    }

    pub fn whoami(&self) -> String {
        match (self.session.identity(), self.session.role()) {
            (Some(cred), Some(role)) => format!("{} as {}", cred.email, role.name()),
            _ => "Not signed in.".to_string(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn dashboard(&self) -> Option<&DashboardView> {
        self.dashboard.as_ref()
    }

    pub fn last_results(&self) -> Option<&[SearchHit]> {
        self.last_results.as_deref()
    }

    pub fn active_notices(&mut self) -> Vec<Notice> {
        self.notices.active(Utc::now())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- rendering ----

    /// Render the current page followed by any active notice banners.
    pub fn render(&mut self) -> String {
        let mut out = String::new();
        match self.router.current() {
            Page::Home => self.render_home(&mut out),
            Page::Login => render_login(&mut out),
            Page::Register => render_register(&mut out),
            Page::Dashboard => self.render_dashboard(&mut out),
            Page::Search => self.render_search(&mut out),
        }
        let notices = self.notices.active(Utc::now());
        if !notices.is_empty() {
            out.push('\n');
            for notice in notices {
                out.push_str(&format!("[{}] {}\n", notice.kind.label(), notice.message));
            }
        }
        out
    }

    fn render_home(&self, out: &mut String) {
        out.push_str(&format!("{}\n", self.config.console.name));
        out.push_str(&format!("{}\n", self.config.console.welcome_message));
        out.push_str("Commands: login, register, go search, message. 'help' lists everything.\n");
    }

    fn render_dashboard(&self, out: &mut String) {
        if !self.session.is_signed_in() {
            out.push_str("Not signed in. Use 'login' first.\n");
            return;
        }
        let greeting = self.session.greeting_name().unwrap_or("there").to_string();
        match &self.dashboard {
            Some(DashboardView::Admin(stats)) => {
                out.push_str("Admin Dashboard\n");
                out.push_str(&format!("Welcome, {greeting}!\n"));
                out.push_str(&format!("  Total Buses:   {}\n", stats.buses));
                out.push_str(&format!("  Total Drivers: {}\n", stats.drivers));
                out.push_str(&format!("  Total Riders:  {}\n", stats.riders));
                out.push_str("Commands: adddriver, dbcheck\n");
            }
            Some(DashboardView::Driver(panel)) => {
                out.push_str("Driver Dashboard\n");
                out.push_str(&format!("Welcome, {greeting}!\n"));
                match panel {
                    DriverPanel::Loaded(data) => {
                        out.push_str(&format!("  My Buses: {}\n", data.count()));
                        if data.buses.is_empty() {
                            out.push_str("No buses added yet. Use 'addbus' to get started!\n");
                        } else {
                            for (_, bus) in &data.buses {
                                push_bus_card(out, bus);
                            }
                        }
                    }
                    DriverPanel::Unavailable => {
                        out.push_str("  My Buses: Error loading\n");
                    }
                }
                out.push_str("Commands: addbus, addtype, contactinfo\n");
            }
            Some(DashboardView::Rider) => {
                out.push_str("Rider Dashboard\n");
                out.push_str(&format!("Welcome, {greeting}!\n"));
                out.push_str("Use 'search' to find buses on your route.\n");
            }
            None => out.push_str("Dashboard loading...\n"),
        }
    }

    fn render_search(&self, out: &mut String) {
        out.push_str("Bus Search\n");
        out.push_str(&format!(
            "Travel date: {} (earliest {})\n",
            self.router.travel_date(),
            self.router.min_travel_date()
        ));
        match &self.last_results {
            None => out.push_str("Use 'search' to find buses between two stops.\n"),
            Some(hits) if hits.is_empty() => {
                out.push_str("No buses found\n");
                out.push_str("Try adjusting your search criteria\n");
            }
            Some(hits) => {
                for (index, hit) in hits.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. [{}] {} → {}\n",
                        index + 1,
                        hit.bus.bus_number,
                        hit.bus.source,
                        hit.bus.destination
                    ));
                    out.push_str(&format!("   Route: {}\n", hit.bus.route));
                    out.push_str(&format!(
                        "   Departure: {}  Estimated Arrival: {}\n",
                        hit.bus.departure_time,
                        hit.estimated_arrival.format("%H:%M:%S")
                    ));
                    out.push_str(&format!(
                        "   Fare: ₹{}  Available Seats: {} / {}\n",
                        hit.bus.fare, hit.available_seats, hit.seat_capacity
                    ));
                    out.push_str("   Available. 'book <n>' to book.\n");
                }
            }
        }
    }

    // ---- interactive shell ----

    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("=== {} ===", self.config.console.name);
        println!("{}", self.config.console.welcome_message);
        println!("Type 'help' for commands, 'quit' to exit.");
        self.start().await;
        println!();
        println!("{}", self.render());

        loop {
            self.pump_auth().await;
            print!("ebus> ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                println!("{}", self.render());
                continue;
            }
            let (command, rest) = match line.split_once(char::is_whitespace) {
                Some((command, rest)) => (command.to_lowercase(), rest.trim().to_string()),
                None => (line.to_lowercase(), String::new()),
            };
            match command.as_str() {
                "quit" | "exit" => break,
                "help" => print_help(),
                "go" => match Page::parse(&rest) {
                    Some(page) => {
                        self.navigate(page).await;
                        println!("{}", self.render());
                    }
                    None => println!("Unknown page '{rest}'. Pages: home, login, register, dashboard, search."),
                },
                "login" => self.repl_login(&mut lines).await?,
                "register" => self.repl_register(&mut lines).await?,
                "logout" => {
                    self.logout().await;
                    println!("{}", self.render());
                }
                "whoami" => println!("{}", self.whoami()),
                "search" => self.repl_search(&mut lines).await?,
                "date" => match rest.parse::<NaiveDate>() {
                    Ok(date) => {
                        if self.set_travel_date(date) {
                            println!("Travel date set to {date}");
                        } else {
                            println!(
                                "Travel date cannot be before {}",
                                self.router.min_travel_date()
                            );
                        }
                    }
                    Err(_) => println!("Expected a date as YYYY-MM-DD"),
                },
                "book" => {
                    if rest.is_empty() {
                        println!("Usage: book <result number or bus id>");
                    } else {
                        println!("{}", self.book(&rest));
                    }
                }
                "adddriver" => self.repl_create_driver(&mut lines).await?,
                "addbus" => self.repl_add_bus(&mut lines).await?,
                "addtype" => self.repl_add_bus_type(&mut lines).await?,
                "contactinfo" => self.repl_update_contact(&mut lines).await?,
                "message" => self.repl_send_message(&mut lines).await?,
                "log" => {
                    let count = rest.parse().unwrap_or(10);
                    let entries = logbuffer::recent(count);
                    if entries.is_empty() {
                        println!("No recent failures.");
                    }
                    for entry in entries {
                        println!(
                            "{} [{}] [{}] {}",
                            entry.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
                            entry.level,
                            entry.context,
                            entry.message
                        );
                    }
                }
                "dbcheck" => {
                    for (collection, status) in self.database_check().await {
                        println!("{collection}: {status}");
                    }
                }
                _ => println!("Unknown command '{command}'. Type 'help' for commands."),
            }
        }
        info!("Console session ended");
        Ok(())
    }

    async fn repl_login(&mut self, lines: &mut StdinLines) -> Result<()> {
        let Some(email) = prompt(lines, "Email: ").await? else {
            return Ok(());
        };
        let Some(role_raw) = prompt(lines, "User type (admin/driver/rider): ").await? else {
            return Ok(());
        };
        let claimed = match Role::parse(&role_raw) {
            Some(role) => role,
            None => {
                if role_raw.trim().is_empty() {
                    println!("{}", ValidationError::AllFieldsRequired);
                } else {
                    println!("Unknown user type '{}'.", role_raw.trim());
                }
                return Ok(());
            }
        };
        let Some(password) = prompt_secret(lines, "Password: ").await? else {
            return Ok(());
        };
        self.login(&email, &password, claimed).await;
        println!("{}", self.render());
        Ok(())
    }

    async fn repl_register(&mut self, lines: &mut StdinLines) -> Result<()> {
        let Some(first_name) = prompt(lines, "First name: ").await? else {
            return Ok(());
        };
        let Some(last_name) = prompt(lines, "Last name: ").await? else {
            return Ok(());
        };
        let Some(email) = prompt(lines, "Email: ").await? else {
            return Ok(());
        };
        let Some(phone) = prompt(lines, "Phone: ").await? else {
            return Ok(());
        };
        let Some(role_raw) = prompt(lines, "User type (admin/driver/rider): ").await? else {
            return Ok(());
        };
        let Some(role) = Role::parse(&role_raw) else {
            println!("Unknown user type '{}'.", role_raw.trim());
            return Ok(());
        };
        let admin_code = if role == Role::Admin {
            match prompt(lines, "Admin verification code: ").await? {
                Some(code) => code,
                None => return Ok(()),
            }
        } else {
            String::new()
        };
        let Some(password) = prompt_secret(lines, "Password: ").await? else {
            return Ok(());
        };
        let Some(confirm_password) = prompt_secret(lines, "Confirm password: ").await? else {
            return Ok(());
        };
        self.register(Registration {
            first_name,
            last_name,
            email,
            password,
            confirm_password,
            phone,
            role,
            admin_code,
        })
        .await;
        println!("{}", self.render());
        Ok(())
    }

    async fn repl_search(&mut self, lines: &mut StdinLines) -> Result<()> {
        if self.router.current() != Page::Search {
            self.navigate(Page::Search).await;
        }
        let Some(source) = prompt(lines, "From (source): ").await? else {
            return Ok(());
        };
        let Some(destination) = prompt(lines, "To (destination): ").await? else {
            return Ok(());
        };
        self.search(&source, &destination).await;
        println!("{}", self.render());
        Ok(())
    }

    async fn repl_create_driver(&mut self, lines: &mut StdinLines) -> Result<()> {
        let Some(name) = prompt(lines, "Driver full name: ").await? else {
            return Ok(());
        };
        let Some(email) = prompt(lines, "Driver email: ").await? else {
            return Ok(());
        };
        let Some(password) = prompt_secret(lines, "Temporary password: ").await? else {
            return Ok(());
        };
        let Some(phone) = prompt(lines, "Driver phone: ").await? else {
            return Ok(());
        };
        let Some(license_number) = prompt(lines, "License number: ").await? else {
            return Ok(());
        };
        self.create_driver(&CreateDriverForm {
            name,
            email,
            password,
            phone,
            license_number,
        })
        .await;
        println!("{}", self.render());
        Ok(())
    }

    async fn repl_add_bus(&mut self, lines: &mut StdinLines) -> Result<()> {
        let Some(bus_number) = prompt(lines, "Bus number: ").await? else {
            return Ok(());
        };
        let Some(route) = prompt(lines, "Route: ").await? else {
            return Ok(());
        };
        let Some(source) = prompt(lines, "Source: ").await? else {
            return Ok(());
        };
        let Some(destination) = prompt(lines, "Destination: ").await? else {
            return Ok(());
        };
        let Some(departure_time) = prompt(lines, "Departure time (HH:MM): ").await? else {
            return Ok(());
        };
        let Some(arrival_time) = prompt(lines, "Arrival time (HH:MM): ").await? else {
            return Ok(());
        };
        let Some(fare) = prompt(lines, "Fare (₹): ").await? else {
            return Ok(());
        };
        let Some(capacity) = prompt(lines, "Capacity (seats): ").await? else {
            return Ok(());
        };
        self.add_bus(&BusDetailsForm {
            bus_number,
            route,
            source,
            destination,
            departure_time,
            arrival_time,
            fare,
            capacity,
        })
        .await;
        println!("{}", self.render());
        Ok(())
    }

    async fn repl_add_bus_type(&mut self, lines: &mut StdinLines) -> Result<()> {
        let Some(bus_type) = prompt(lines, "Bus type (ac/nonAc/sleeper/semiSleeper/luxury): ").await?
        else {
            return Ok(());
        };
        let Some(amenities) = prompt(lines, "Amenities (optional): ").await? else {
            return Ok(());
        };
        let Some(fuel_type) = prompt(lines, "Fuel type (diesel/petrol/cng/electric/hybrid): ").await?
        else {
            return Ok(());
        };
        let Some(manufacturing_year) = prompt(lines, "Manufacturing year: ").await? else {
            return Ok(());
        };
        self.add_bus_type(&BusTypeForm {
            bus_type,
            amenities,
            fuel_type,
            manufacturing_year,
        })
        .await;
        println!("{}", self.render());
        Ok(())
    }

    async fn repl_update_contact(&mut self, lines: &mut StdinLines) -> Result<()> {
        let current = match forms::prefill_contact_details(self.store.as_ref(), &self.session).await
        {
            Ok(form) => form,
            Err(e) => {
                logbuffer::failure("contact", &format!("error loading contact data: {}", e));
                ContactDetailsForm::default()
            }
        };
        let phone = prompt_with_default(lines, "Primary phone", &current.phone).await?;
        let Some(phone) = phone else { return Ok(()) };
        let Some(secondary_phone) =
            prompt_with_default(lines, "Secondary phone", &current.secondary_phone).await?
        else {
            return Ok(());
        };
        let Some(address) = prompt_with_default(lines, "Address", &current.address).await? else {
            return Ok(());
        };
        let Some(city) = prompt_with_default(lines, "City", &current.city).await? else {
            return Ok(());
        };
        let Some(state) = prompt_with_default(lines, "State", &current.state).await? else {
            return Ok(());
        };
        let Some(emergency_contact) =
            prompt_with_default(lines, "Emergency contact", &current.emergency_contact).await?
        else {
            return Ok(());
        };
        self.update_contact(&ContactDetailsForm {
            phone,
            secondary_phone,
            address,
            city,
            state,
            emergency_contact,
        })
        .await;
        println!("{}", self.render());
        Ok(())
    }

    async fn repl_send_message(&mut self, lines: &mut StdinLines) -> Result<()> {
        let Some(name) = prompt(lines, "Your name: ").await? else {
            return Ok(());
        };
        let Some(email) = prompt(lines, "Your email: ").await? else {
            return Ok(());
        };
        let Some(subject) = prompt(lines, "Subject: ").await? else {
            return Ok(());
        };
        let Some(message) = prompt(lines, "Message: ").await? else {
            return Ok(());
        };
        self.send_message(&ContactMessageForm {
            name,
            email,
            subject,
            message,
        })
        .await;
        println!("{}", self.render());
        Ok(())
    }
}

fn push_bus_card(out: &mut String, bus: &BusRecord) {
    out.push_str(&format!(
        "  [{}] {} → {}\n",
        bus.bus_number, bus.source, bus.destination
    ));
    out.push_str(&format!("      Route: {}\n", bus.route));
    out.push_str(&format!(
        "      Departure: {}  Arrival: {}\n",
        bus.departure_time, bus.arrival_time
    ));
    out.push_str(&format!(
        "      Fare: ₹{}  Capacity: {} seats\n",
        bus.fare, bus.capacity
    ));
    out.push_str(&format!(
        "      Status: {}\n",
        if bus.is_active { "Active" } else { "Inactive" }
    ));
}

fn render_login(out: &mut String) {
    out.push_str("Login\n");
    out.push_str("Run 'login' and enter your email, user type, and password.\n");
    out.push_str("No account yet? Run 'register'.\n");
}

fn render_register(out: &mut String) {
    out.push_str("Register\n");
    out.push_str("Run 'register' to create an account as admin, driver, or rider.\n");
    out.push_str("Admin accounts need the admin verification code.\n");
}

fn print_help() {
    println!("Pages:    go <home|login|register|dashboard|search>");
    println!("Account:  login, register, logout, whoami");
    println!("Admin:    adddriver");
    println!("Driver:   addbus, addtype, contactinfo");
    println!("Search:   search, date <YYYY-MM-DD>, book <n>");
    println!("Contact:  message");
    println!("Debug:    log [n], dbcheck");
    println!("Other:    help, quit");
}

async fn prompt(lines: &mut StdinLines, label: &str) -> Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

/// Prompt showing the current value; an empty reply keeps it.
async fn prompt_with_default(
    lines: &mut StdinLines,
    label: &str,
    current: &str,
) -> Result<Option<String>> {
    let answer = prompt(lines, &format!("{label} [{current}]: ")).await?;
    Ok(answer.map(|text| {
        if text.trim().is_empty() {
            current.to_string()
        } else {
            text
        }
    }))
}

/// Read a password without echo when stdin is a terminal; scripted input
/// falls back to a plain line read.
async fn prompt_secret(lines: &mut StdinLines, label: &str) -> Result<Option<String>> {
    if atty::is(atty::Stream::Stdin) {
        let label = label.to_string();
        let password = tokio::task::spawn_blocking(move || rpassword::prompt_password(label)).await??;
        Ok(Some(password))
    } else {
        prompt(lines, label).await
    }
}
