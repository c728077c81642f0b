use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use async_channel::Receiver;
use futures::StreamExt;
use gdk_pixbuf::{Colorspace, Pixbuf};
use gtk::cairo::{self, FontSlant, FontWeight};
use gtk::prelude::*;
use gtk::{
    glib, Align, Application, ApplicationWindow, Box, Button, DrawingArea, Entry, Frame, Label,
    ListBox, Orientation, Picture, ScrolledWindow, Separator,
};

use movie_rating::{
    catalog,
    config::Config,
    details::RatingTier,
    models::SearchResult,
    poster::{self, HttpPosterSource, PosterImage},
    provider::LookupProvider,
    state::{AppState, Change, Outcome, PosterState, Reaction, READY},
    worker::Worker,
};

const APP_ID: &str = "com.example.movierating";

const CSS: &str = "
window, .details { background-color: #1e1e1e; color: #e0e0e0; }
label { color: #e0e0e0; }
entry, list, row { background-color: #3a3a3a; color: #e0e0e0; }
row:selected { background-color: #3c5f91; }
button { background-image: none; background-color: #3a3a3a; color: #e0e0e0; }
button:hover, button:active { background-color: #3c5f91; }
frame > label { font-weight: bold; }
.column-heading { font-weight: bold; }
.movie-title { font-size: 14pt; font-weight: bold; }
.rating-caption { font-size: 12pt; font-weight: bold; }
.rating-text { font-size: 16pt; font-weight: bold; }
.status-bar { padding: 4px 8px; }
";

/// Start the GTK application; returns once the main window is closed
pub fn run(config: &Config, provider: Arc<dyn LookupProvider>) -> anyhow::Result<()> {
    let posters = HttpPosterSource::new(config).context("failed to build poster HTTP client")?;
    let (worker, receiver) = Worker::new(config.workers, provider, Arc::new(posters))
        .context("failed to start worker pool")?;
    let launch = Launch::new((worker, receiver));
    let shell: Rc<RefCell<Option<Rc<Shell>>>> = Rc::default();

    let app = Application::builder().application_id(APP_ID).build();
    let slot = shell.clone();
    app.connect_activate(move |app| {
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }
        if let Some((worker, receiver)) = launch.claim() {
            *slot.borrow_mut() = Some(build_ui(app, worker, receiver));
        }
    });

    // Arguments were already consumed by clap
    app.run_with_args::<&str>(&[]);
    tracing::info!("GUI closed");

    // Last strong reference; dropping it stops the worker pool
    shell.borrow_mut().take();
    Ok(())
}

/// Parts that belong to the one and only main window
struct Launch<T> {
    parts: RefCell<Option<T>>,
}

impl<T> Launch<T> {
    fn new(parts: T) -> Self {
        Self {
            parts: RefCell::new(Some(parts)),
        }
    }

    fn claim(&self) -> Option<T> {
        self.parts.borrow_mut().take()
    }
}

struct View {
    entry: Entry,
    list: ListBox,
    poster: Picture,
    poster_note: Label,
    title: Label,
    rating_text: Label,
    disc: DrawingArea,
    disc_face: Rc<RefCell<(RatingTier, String)>>,
    info: Label,
    plot: Label,
    status: Label,
}

/// UI-thread owner of the state, the worker handle and the widgets
struct Shell {
    state: RefCell<AppState>,
    worker: Worker,
    view: View,
}

impl Shell {
    fn search(&self) {
        let text = self.view.entry.text();
        let reaction = self.state.borrow_mut().submit_search(&text);
        self.react(reaction);
    }

    fn random(&self) {
        let id = catalog::pick(&mut rand::thread_rng());
        let reaction = self.state.borrow_mut().random(id);
        self.react(reaction);
    }

    fn select_row(&self, index: usize) {
        let id = self.state.borrow().results().get(index).map(|r| r.id.clone());
        if let Some(id) = id {
            let reaction = self.state.borrow_mut().select(&id);
            self.react(reaction);
        }
    }

    fn receive(&self, outcome: Outcome) {
        let reaction = self.state.borrow_mut().apply(outcome);
        self.react(reaction);
    }

    fn react(&self, reaction: Reaction) {
        let mut select = None;
        for change in &reaction.changes {
            match change {
                Change::Status => self.render_status(),
                Change::Results => self.render_results(),
                Change::Detail => self.render_detail(),
                Change::Poster => self.render_poster(),
                Change::Select(index) => select = Some(*index),
            }
        }

        if let Some(request) = reaction.request {
            self.worker.submit(request);
        }

        // Fires row-selected, which comes back through select_row
        if let Some(index) = select {
            if let Some(row) = self.view.list.row_at_index(index as i32) {
                self.view.list.select_row(Some(&row));
            }
        }
    }

    fn render_status(&self) {
        self.view.status.set_text(self.state.borrow().status());
    }

    fn render_results(&self) {
        let rows = self.state.borrow().results().to_vec();
        let list = &self.view.list;
        while let Some(child) = list.first_child() {
            list.remove(&child);
        }
        for movie in &rows {
            list.append(&create_result_row(movie));
        }
    }

    fn render_detail(&self) {
        let state = self.state.borrow();
        let Some(detail) = state.view() else {
            return;
        };

        self.view.title.set_text(&detail.title_line);
        self.view.rating_text.set_text(&detail.rating_label);
        *self.view.disc_face.borrow_mut() = (detail.tier, detail.disc_text.clone());
        self.view.disc.queue_draw();
        self.view.info.set_text(&detail.info_line);
        self.view.plot.set_text(&detail.plot);
    }

    fn render_poster(&self) {
        let state = self.state.borrow();
        let (pixbuf, note) = match state.poster() {
            PosterState::Empty => (None, ""),
            PosterState::Loading => (None, poster::LOADING_POSTER),
            PosterState::Placeholder => (None, poster::NO_POSTER),
            PosterState::Ready(image) => (Some(poster_pixbuf(image)), ""),
        };

        // The picture keeps its own reference for as long as it is shown
        self.view.poster.set_pixbuf(pixbuf.as_ref());
        self.view.poster.set_visible(pixbuf.is_some());
        self.view.poster_note.set_text(note);
        self.view.poster_note.set_visible(!note.is_empty());
    }
}

fn poster_pixbuf(image: &PosterImage) -> Pixbuf {
    let bytes = glib::Bytes::from_owned(image.pixels.clone());
    Pixbuf::from_bytes(
        &bytes,
        Colorspace::Rgb,
        true,
        8,
        image.width as i32,
        image.height as i32,
        image.stride() as i32,
    )
}

fn create_result_row(movie: &SearchResult) -> gtk::ListBoxRow {
    let row = gtk::ListBoxRow::new();
    let hbox = Box::new(Orientation::Horizontal, 12);
    hbox.set_margin_start(8);
    hbox.set_margin_end(8);
    hbox.set_margin_top(4);
    hbox.set_margin_bottom(4);

    let title_label = Label::new(Some(&movie.title));
    title_label.set_xalign(0.0);
    title_label.set_hexpand(true);
    title_label.set_ellipsize(gtk::pango::EllipsizeMode::End);

    let year_label = Label::new(Some(&movie.year));
    year_label.set_width_chars(8);

    hbox.append(&title_label);
    hbox.append(&year_label);
    row.set_child(Some(&hbox));

    row
}

fn draw_disc(
    cr: &cairo::Context,
    width: i32,
    height: i32,
    tier: RatingTier,
    text: &str,
) -> Result<(), cairo::Error> {
    let (cx, cy) = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let radius = cx.min(cy) - 5.0;

    let (r, g, b) = tier.rgb();
    cr.arc(cx, cy, radius, 0.0, 2.0 * PI);
    cr.set_source_rgb(r, g, b);
    cr.fill_preserve()?;
    cr.set_source_rgb(1.0, 1.0, 1.0);
    cr.set_line_width(2.0);
    cr.stroke()?;

    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
    cr.set_font_size(if text.len() > 3 { 11.0 } else { 13.0 });
    let extents = cr.text_extents(text)?;
    cr.move_to(
        cx - extents.width() / 2.0 - extents.x_bearing(),
        cy - extents.height() / 2.0 - extents.y_bearing(),
    );
    cr.show_text(text)?;
    Ok(())
}

fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);
    match gtk::gdk::Display::default() {
        Some(display) => gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => tracing::warn!("No default display; dark theme not applied"),
    }
}

fn build_ui(app: &Application, worker: Worker, receiver: Receiver<Outcome>) -> Rc<Shell> {
    load_css();

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Movie Rating App")
        .default_width(800)
        .default_height(600)
        .build();

    let main_box = Box::new(Orientation::Vertical, 0);

    // Search row
    let search_box = Box::new(Orientation::Horizontal, 8);
    search_box.set_margin_start(12);
    search_box.set_margin_end(12);
    search_box.set_margin_top(12);
    search_box.set_margin_bottom(12);

    let entry = Entry::new();
    entry.set_width_chars(40);
    entry.set_placeholder_text(Some("Enter a movie title"));
    let search_button = Button::with_label("Search");
    let random_button = Button::with_label("Random Movie");

    search_box.append(&Label::new(Some("Movie Title:")));
    search_box.append(&entry);
    search_box.append(&search_button);
    search_box.append(&random_button);
    main_box.append(&search_box);

    // Results and details side by side
    let content = Box::new(Orientation::Horizontal, 10);
    content.set_margin_start(12);
    content.set_margin_end(12);
    content.set_margin_bottom(12);
    content.set_vexpand(true);

    let results_frame = Frame::new(Some("Search Results"));
    results_frame.set_hexpand(true);
    let results_box = Box::new(Orientation::Vertical, 0);

    let headings = Box::new(Orientation::Horizontal, 12);
    headings.set_margin_start(8);
    headings.set_margin_end(8);
    headings.set_margin_top(4);
    headings.set_margin_bottom(4);
    let title_heading = Label::new(Some("Movie Title"));
    title_heading.set_xalign(0.0);
    title_heading.set_hexpand(true);
    title_heading.add_css_class("column-heading");
    let year_heading = Label::new(Some("Year"));
    year_heading.set_width_chars(8);
    year_heading.add_css_class("column-heading");
    headings.append(&title_heading);
    headings.append(&year_heading);
    results_box.append(&headings);
    results_box.append(&Separator::new(Orientation::Horizontal));

    let scrolled = ScrolledWindow::new();
    scrolled.set_vexpand(true);
    let list = ListBox::new();
    list.set_selection_mode(gtk::SelectionMode::Single);
    scrolled.set_child(Some(&list));
    results_box.append(&scrolled);
    results_frame.set_child(Some(&results_box));

    let details_frame = Frame::new(Some("Movie Details"));
    details_frame.set_hexpand(true);
    let details_box = Box::new(Orientation::Vertical, 6);
    details_box.add_css_class("details");
    details_box.set_margin_start(12);
    details_box.set_margin_end(12);
    details_box.set_margin_top(10);
    details_box.set_margin_bottom(10);

    let poster_picture = Picture::new();
    poster_picture.set_size_request(poster::MAX_WIDTH as i32, poster::MAX_HEIGHT as i32);
    poster_picture.set_can_shrink(false);
    poster_picture.set_halign(Align::Center);
    poster_picture.set_visible(false);
    let poster_note = Label::new(None);
    poster_note.set_visible(false);

    let title = Label::new(None);
    title.add_css_class("movie-title");
    title.set_wrap(true);
    title.set_max_width_chars(35);

    let rating_box = Box::new(Orientation::Horizontal, 10);
    rating_box.set_margin_top(10);
    rating_box.set_margin_bottom(10);
    let rating_caption = Label::new(Some("RATING:"));
    rating_caption.add_css_class("rating-caption");
    let rating_text = Label::new(None);
    rating_text.add_css_class("rating-text");

    let disc_face = Rc::new(RefCell::new((RatingTier::Neutral, String::new())));
    let disc = DrawingArea::new();
    disc.set_content_width(60);
    disc.set_content_height(60);
    let face = disc_face.clone();
    disc.set_draw_func(move |_, cr, width, height| {
        let (tier, text) = face.borrow().clone();
        if text.is_empty() {
            return;
        }
        if let Err(e) = draw_disc(cr, width, height, tier, &text) {
            tracing::warn!(error = %e, "Failed to draw rating disc");
        }
    });

    rating_box.append(&rating_caption);
    rating_box.append(&rating_text);
    rating_box.append(&disc);

    let info = Label::new(None);
    let plot = Label::new(None);
    plot.set_wrap(true);
    plot.set_max_width_chars(45);
    plot.set_xalign(0.0);
    plot.set_justify(gtk::Justification::Left);
    plot.set_vexpand(true);
    plot.set_valign(Align::Start);

    details_box.append(&poster_picture);
    details_box.append(&poster_note);
    details_box.append(&title);
    details_box.append(&rating_box);
    details_box.append(&info);
    details_box.append(&plot);
    details_frame.set_child(Some(&details_box));

    content.append(&results_frame);
    content.append(&details_frame);
    main_box.append(&content);

    main_box.append(&Separator::new(Orientation::Horizontal));
    let status_bar = Label::new(Some(READY));
    status_bar.set_xalign(0.0);
    status_bar.add_css_class("status-bar");
    main_box.append(&status_bar);

    window.set_child(Some(&main_box));

    let shell = Rc::new(Shell {
        state: RefCell::new(AppState::new()),
        worker,
        view: View {
            entry: entry.clone(),
            list: list.clone(),
            poster: poster_picture,
            poster_note,
            title,
            rating_text,
            disc,
            disc_face,
            info,
            plot,
            status: status_bar,
        },
    });

    // Search functionality
    let weak = Rc::downgrade(&shell);
    entry.connect_activate(move |_| {
        if let Some(shell) = weak.upgrade() {
            shell.search();
        }
    });
    let weak = Rc::downgrade(&shell);
    search_button.connect_clicked(move |_| {
        if let Some(shell) = weak.upgrade() {
            shell.search();
        }
    });

    // Random movie
    let weak = Rc::downgrade(&shell);
    random_button.connect_clicked(move |_| {
        if let Some(shell) = weak.upgrade() {
            shell.random();
        }
    });

    // Movie selection
    let weak = Rc::downgrade(&shell);
    list.connect_row_selected(move |_, row| {
        if let (Some(shell), Some(row)) = (weak.upgrade(), row) {
            shell.select_row(row.index() as usize);
        }
    });

    // Worker outcomes are applied here, on the UI thread
    let weak = Rc::downgrade(&shell);
    glib::spawn_future_local(async move {
        let mut outcomes = std::pin::pin!(receiver);
        while let Some(outcome) = outcomes.next().await {
            let Some(shell) = weak.upgrade() else {
                break;
            };
            shell.receive(outcome);
        }
    });

    window.present();
    shell
}
