//! Interactive terminal viewer.
//!
//! Each frame is rendered into a fixed-size pixmap (the canvas size is read
//! once at startup) and shown through a terminal graphics protocol. Input
//! goes through [`ViewState`]; a redraw happens only when its revision
//! changes.

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use ratatui_image::{
    StatefulImage,
    picker::{Picker, ProtocolType},
    protocol::StatefulProtocol,
};
use tracing::{debug, error};

use littlebird::{Join, PatternConfig, Vector, create_little_bird_pattern};

use crate::cli::frame_work;
use crate::config::Config;
use crate::error::CliError;
use crate::input::ViewState;
use crate::skia::{render_pixmap, to_image};

/// Application state for TUI
struct App {
    config: Config,
    view: ViewState,
    pattern: Join,
    /// Debug flag the current `pattern` was built with
    pattern_debug: bool,
    /// Image picker for terminal protocol detection
    picker: Picker,
    /// Current rendered image protocol state
    image_state: Option<Box<dyn StatefulProtocol>>,
    /// Revision of `view` last rendered
    rendered_revision: Option<u64>,
    /// Where the image was drawn last frame, for mapping mouse cells
    image_area: Rect,
    frame_ms: f64,
    cells: usize,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(config: Config) -> Self {
        // Initialize image picker - force Sixel protocol
        let mut picker = Picker::from_termios().unwrap_or_else(|_| Picker::new((8, 16)));
        picker.protocol_type = ProtocolType::Sixel;

        let view = ViewState::new(&config);
        let pattern_debug = view.debug_bounds();
        let pattern = build_pattern(&config, pattern_debug);

        App {
            config,
            view,
            pattern,
            pattern_debug,
            picker,
            image_state: None,
            rendered_revision: None,
            image_area: Rect::default(),
            frame_ms: 0.0,
            cells: 0,
            status: None,
            should_quit: false,
        }
    }

    fn update_image(&mut self) {
        if self.rendered_revision == Some(self.view.revision()) {
            return;
        }
        self.rendered_revision = Some(self.view.revision());

        if self.view.debug_bounds() != self.pattern_debug {
            self.pattern_debug = self.view.debug_bounds();
            self.pattern = build_pattern(&self.config, self.pattern_debug);
        }

        match self.render_frame() {
            Ok(()) => self.status = None,
            Err(e) => {
                error!("frame failed: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn render_frame(&mut self) -> Result<(), CliError> {
        let transformation = *self.view.transformation();
        let start = Instant::now();
        let pixmap = render_pixmap(&self.pattern, &transformation, self.config.canvas.width, self.config.canvas.height)?;
        self.frame_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.cells = frame_work(self.config.canvas_rect(), &transformation)?.cells;
        debug!(cells = self.cells, frame_ms = self.frame_ms, "frame rendered");

        self.image_state = Some(self.picker.new_resize_protocol(to_image(pixmap)?));
        Ok(())
    }

    /// Map a terminal cell to canvas pixels. The image is stretched over
    /// the area for this purpose, so the mapping is approximate when the
    /// protocol letterboxes it.
    fn to_canvas(&self, column: u16, row: u16) -> Option<Vector> {
        let area = self.image_area;
        let inside = column >= area.x
            && row >= area.y
            && column < area.x.saturating_add(area.width)
            && row < area.y.saturating_add(area.height);
        if !inside {
            return None;
        }
        let fx = ((column - area.x) as f64 + 0.5) / area.width as f64;
        let fy = ((row - area.y) as f64 + 0.5) / area.height as f64;
        Some(Vector::new(
            fx * self.config.canvas.width as f64,
            fy * self.config.canvas.height as f64,
        ))
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            // Zoom controls
            KeyCode::Char('+') | KeyCode::Char('=') => self.view.zoom_in(),
            KeyCode::Char('-') | KeyCode::Char('_') => self.view.zoom_out(),
            KeyCode::Char('0') | KeyCode::Char('r') => self.view.reset(),
            KeyCode::Char('b') => self.view.toggle_debug_bounds(),
            // Pan controls (WASD / arrows)
            KeyCode::Char('w') | KeyCode::Up => self.view.step(0.0, -1.0),
            KeyCode::Char('s') | KeyCode::Down => self.view.step(0.0, 1.0),
            KeyCode::Char('a') | KeyCode::Left => self.view.step(-1.0, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.view.step(1.0, 0.0),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = self.to_canvas(mouse.column, mouse.row);
        match (mouse.kind, position) {
            (MouseEventKind::Down(MouseButton::Left), Some(p)) => self.view.pointer_down(p),
            (MouseEventKind::Drag(MouseButton::Left), Some(p)) => self.view.pointer_move(p),
            (MouseEventKind::Up(MouseButton::Left), Some(p)) => self.view.pointer_up(p),
            (MouseEventKind::Up(MouseButton::Left), None) => self.view.pointer_cancel(),
            (MouseEventKind::ScrollUp, Some(p)) => self.view.wheel(p, -1.0),
            (MouseEventKind::ScrollDown, Some(p)) => self.view.wheel(p, 1.0),
            _ => {}
        }
    }
}

fn build_pattern(config: &Config, debug_bounds: bool) -> Join {
    let pattern_config = PatternConfig {
        debug_bounds,
        ..config.pattern.clone()
    };
    create_little_bird_pattern(config.canvas_rect(), &pattern_config)
}

pub fn run_tui(config: Config) -> Result<(), CliError> {
    // Initialize terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(config);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<(), CliError> {
    loop {
        app.update_image();

        terminal.draw(|frame| ui(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(40)])
        .split(frame.area());

    let sidebar_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(10)])
        .split(main_layout[0]);

    // Stats panel
    let t = app.view.transformation();
    let stats_text = format!(
        "Scale: {:.2}\nPan: {:.0}, {:.0}\nCells: {}\nFrame: {:.1}ms\nBounds: {}",
        t.scaling,
        t.translation.x,
        t.translation.y,
        app.cells,
        app.frame_ms,
        if app.view.debug_bounds() { "on" } else { "off" }
    );
    let stats = Paragraph::new(stats_text)
        .block(Block::default()
            .title(" Stats ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)))
        .style(Style::default().fg(Color::White));
    frame.render_widget(stats, sidebar_layout[0]);

    let controls = Paragraph::new(
        "WASD/arrows  pan\n+ / -        zoom\ndrag         pan\nwheel        zoom at cursor\n0 / r        reset\nb            bounds\nq / Esc      quit",
    )
    .block(Block::default()
        .title(" Controls ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan)))
    .style(Style::default().fg(Color::Gray));
    frame.render_widget(controls, sidebar_layout[1]);

    let (title, border_color) = match &app.status {
        Some(message) => (format!(" Error: {} ", message), Color::Red),
        None => (" Little Bird ".to_string(), Color::Green),
    };
    let image_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_area = image_block.inner(main_layout[1]);
    frame.render_widget(image_block, main_layout[1]);
    app.image_area = inner_area;

    // Render the image using ratatui-image
    if let Some(ref mut image_state) = app.image_state {
        let image_widget = StatefulImage::new(None);
        frame.render_stateful_widget(image_widget, inner_area, image_state);
    }
}
