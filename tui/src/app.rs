//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - WizardClient for orchestration
//! - DisplayState for rendering
//!
//! The App:
//! 1. Converts terminal events to orchestrator calls
//! 2. Receives `WizardMessage`s and updates `DisplayState`
//! 3. Renders the screen for the current step from `DisplayState`
//!
//! Hit regions for buttons and color pickers are recorded while drawing and
//! used by the next mouse click.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use adwizard_core::{
    AdWizardConfig, ColorSlot, ContentClient, NotifyLevel, OpenAiClient, PipelineStage, Step,
    TemplateRenderer, TemplateVariant,
};

use crate::display::DisplayState;
use crate::picker::{cycle_palette, PickerLayout};
use crate::templates::TerminalTemplates;
use crate::theme::{
    BRAND_VIOLET, BUTTON_BG, BUTTON_DISABLED, DIM_GRAY, ERROR_RED, INPUT_GREEN, SPINNER_BLUE,
    WARNING_AMBER,
};
use crate::widgets::{TextBlock, TextBlockState};
use crate::wizard_client::WizardClient;

/// Description box height (lines, including border)
const INPUT_HEIGHT: u16 = 6;

/// Target frame time
const FRAME_DURATION: Duration = Duration::from_millis(50);

/// Clickable things other than color pickers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Welcome → Input
    Start,
    /// Run the generation pipeline
    Generate,
    /// Input → Result
    Next,
    /// One step back
    Back,
    /// Clear and return to input
    GenerateAgain,
    /// Pick a template
    Template(TemplateVariant),
}

/// Main application state
pub struct App<C: ContentClient + 'static> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Orchestrator Integration ===
    client: WizardClient<C>,
    /// Display state derived from WizardMessages
    display: DisplayState,

    // === Input State ===
    /// Description being typed
    input_buffer: String,
    input_state: TextBlockState,

    // === Hit Regions (from the last frame) ===
    buttons: Vec<(Rect, Action)>,
    pickers: Vec<PickerLayout>,

    /// Last frame time (for animations)
    last_frame: Instant,
}

impl App<OpenAiClient> {
    /// Create an App talking to the configured service
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AdWizardConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(WizardClient::from_config(config)?))
    }
}

impl<C: ContentClient + 'static> App<C> {
    /// Create an App around an existing client
    pub fn with_client(client: WizardClient<C>) -> Self {
        let template = client.orchestrator().snapshot().selected_template();
        Self {
            running: true,
            client,
            display: DisplayState::new(template),
            input_buffer: String::new(),
            input_state: TextBlockState::default(),
            buttons: Vec::new(),
            pickers: Vec::new(),
            last_frame: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            self.process_messages();
            self.tick();
            terminal.draw(|frame| self.draw(frame))?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// The wizard client
    pub fn client(&self) -> &WizardClient<C> {
        &self.client
    }

    /// Description typed so far
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// Where a button was drawn in the last frame
    pub fn region_for(&self, action: Action) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|(_, a)| *a == action)
            .map(|(rect, _)| *rect)
    }

    /// Where a picker was drawn in the last frame
    pub fn picker_layout(&self, slot: ColorSlot) -> Option<&PickerLayout> {
        self.pickers.iter().find(|p| p.slot == slot)
    }

    // ========================================================================
    // Messages and timers
    // ========================================================================

    /// Apply all pending orchestrator messages
    pub fn process_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
    }

    /// Advance animations
    pub fn tick(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.display.update(delta);
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handle one terminal event
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        match self.client.step() {
            Step::Welcome => match key.code {
                KeyCode::Enter => self.perform(Action::Start),
                KeyCode::Esc => self.running = false,
                _ => {}
            },
            Step::Input => self.handle_input_key(key, ctrl),
            Step::Result => match key.code {
                KeyCode::Tab | KeyCode::Right => {
                    self.perform(Action::Template(self.display.template.next()));
                }
                KeyCode::BackTab | KeyCode::Left => {
                    self.perform(Action::Template(self.display.template.previous()));
                }
                KeyCode::Char('r' | 'R') => self.perform(Action::GenerateAgain),
                KeyCode::Esc => self.perform(Action::Back),
                _ => {}
            },
        }

        self.process_messages();
    }

    fn handle_input_key(&mut self, key: KeyEvent, ctrl: bool) {
        let generating = self.client.is_generating();

        match key.code {
            KeyCode::Esc => {
                let open: Vec<ColorSlot> = ColorSlot::ALL
                    .into_iter()
                    .filter(|slot| self.client.is_picker_open(*slot))
                    .collect();
                if open.is_empty() {
                    self.perform(Action::Back);
                } else {
                    for slot in open {
                        self.client.interaction_outside(slot);
                    }
                }
            }
            KeyCode::F(n @ 1..=3) => {
                let slot = ColorSlot::ALL[usize::from(n - 1)];
                self.client.toggle_picker(slot);
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if let Some(slot) = ColorSlot::ALL
                    .into_iter()
                    .find(|slot| self.client.is_picker_open(*slot))
                {
                    let current = self.display.colors[slot.index()];
                    self.client.set_color(slot, cycle_palette(current, forward));
                }
            }
            KeyCode::Enter => self.perform(Action::Generate),
            KeyCode::PageDown => self.perform(Action::Next),
            KeyCode::Char('n') if ctrl => self.perform(Action::Next),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                if !generating {
                    self.input_buffer.push(c);
                    self.client.set_description(&self.input_buffer);
                }
            }
            KeyCode::Backspace => {
                if !generating && self.input_buffer.pop().is_some() {
                    self.client.set_description(&self.input_buffer);
                }
            }
            _ => {}
        }
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let (x, y) = (mouse.column, mouse.row);
        let position = Position::new(x, y);

        // Every click closes the pickers it lands outside of
        let closed = self.client.pointer_interaction(x, y);
        if !closed.is_empty() {
            tracing::debug!(?closed, "Closed pickers on outside click");
        }

        // Popups are drawn on top, so they win
        let swatch = self
            .pickers
            .iter()
            .find_map(|picker| picker.swatch_at(position).map(|color| (picker.slot, color)));
        let trigger = self
            .pickers
            .iter()
            .find(|picker| picker.trigger.contains(position))
            .map(|picker| picker.slot);
        let button = self
            .buttons
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, action)| *action);

        if let Some((slot, color)) = swatch {
            self.client.set_color(slot, color);
        } else if let Some(slot) = trigger {
            self.client.toggle_picker(slot);
        } else if let Some(action) = button {
            self.perform(action);
        }

        self.process_messages();
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Start => {
                self.client.advance();
            }
            Action::Generate => {
                if let Err(e) = self.client.generate() {
                    tracing::debug!("Generate ignored: {}", e);
                }
            }
            Action::Next => {
                if self.client.can_advance() {
                    self.client.advance();
                }
            }
            Action::Back => {
                self.client.retreat();
            }
            Action::GenerateAgain => {
                self.client.regenerate();
                self.input_buffer.clear();
                self.input_state = TextBlockState::default();
            }
            Action::Template(variant) => self.client.select_template(variant),
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw one frame
    pub fn draw(&mut self, frame: &mut Frame) {
        self.buttons.clear();
        self.pickers.clear();

        let [body, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        match self.display.step {
            Step::Welcome => self.draw_welcome(frame, body),
            Step::Input => self.draw_input(frame, body),
            Step::Result => self.draw_result(frame, body),
        }

        // Pickers are only on screen at the input step
        if self.display.step != Step::Input {
            for slot in ColorSlot::ALL {
                self.client.set_picker_bounds(slot, None);
            }
        }

        self.draw_status(frame, status);
    }

    fn draw_welcome(&mut self, frame: &mut Frame, area: Rect) {
        let top = area.y + area.height.saturating_sub(7) / 2;
        let line = |y: u16| Rect::new(area.x, y, area.width, 1);

        frame.render_widget(
            Paragraph::new("adwizard")
                .alignment(Alignment::Center)
                .style(
                    Style::default()
                        .fg(BRAND_VIOLET)
                        .add_modifier(Modifier::BOLD),
                ),
            line(top),
        );
        frame.render_widget(
            Paragraph::new("Describe a product, pick three colors, get an ad.")
                .alignment(Alignment::Center),
            line(top + 2),
        );

        let label = "Get started";
        let width = button_width(label);
        let x = area.x + area.width.saturating_sub(width) / 2;
        self.button(frame.buffer_mut(), x, top + 4, label, Action::Start, true);

        frame.render_widget(
            Paragraph::new("press Enter to get started")
                .alignment(Alignment::Center)
                .style(Style::default().fg(DIM_GRAY)),
            line(top + 6),
        );
    }

    fn draw_input(&mut self, frame: &mut Frame, area: Rect) {
        let [header, description, colors, _, buttons, preview] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" Step 2 of 3 · {}", Step::Input.description()))
                .style(Style::default().fg(BRAND_VIOLET)),
            header,
        );

        // Description box
        let generating = self.display.generating;
        let block = Block::bordered().title(" Description ");
        let inner = block.inner(description);
        frame.render_widget(block, description);
        let text = if generating {
            self.input_buffer.clone()
        } else {
            format!("{}_", self.input_buffer)
        };
        self.input_state.scroll_to_bottom();
        frame.render_stateful_widget(
            TextBlock::new(&text).style(Style::default().fg(INPUT_GREEN)),
            inner,
            &mut self.input_state,
        );

        // Color triggers
        frame.render_widget(Paragraph::new(" Colors:"), colors);
        let screen = frame.area();
        let mut x = colors.x + 9;
        for slot in ColorSlot::ALL {
            let open = self.client.is_picker_open(slot);
            let layout = PickerLayout::new(slot, Position::new(x, colors.y), open, screen);
            layout.render_trigger(self.display.colors[slot.index()], frame.buffer_mut());
            self.client.set_picker_bounds(slot, Some(layout.bounds()));
            x += layout.trigger.width + 2;
            self.pickers.push(layout);
        }

        // Buttons
        let buf = frame.buffer_mut();
        let mut x = buttons.x + 1;
        let generate_label = if generating {
            format!("{} Generating", self.display.spinner())
        } else {
            "Generate".to_string()
        };
        x += self.button(buf, x, buttons.y, &generate_label, Action::Generate, !generating);
        if self.client.can_advance() {
            x += self.button(buf, x, buttons.y, "Next", Action::Next, true);
        }
        self.button(buf, x, buttons.y, "Back", Action::Back, true);

        self.draw_draft_preview(frame, preview);

        // Popups last, over everything else
        for layout in &self.pickers {
            layout.render_popup(self.display.colors[layout.slot.index()], frame.buffer_mut());
        }
    }

    fn draw_draft_preview(&self, frame: &mut Frame, area: Rect) {
        if area.height < 3 {
            return;
        }
        let draft = &self.display.draft;
        let lines: Vec<Line> = PipelineStage::ALL
            .into_iter()
            .map(|stage| {
                let value = draft.field(stage);
                let shown = if !value.is_empty() {
                    Span::raw(value.to_string())
                } else if self.display.generating {
                    Span::styled(self.display.spinner(), Style::default().fg(SPINNER_BLUE))
                } else {
                    Span::styled("-", Style::default().fg(DIM_GRAY))
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<13}", stage_label(stage)),
                        Style::default().fg(DIM_GRAY),
                    ),
                    shown,
                ])
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().title(" Draft ")),
            area,
        );
    }

    fn draw_result(&mut self, frame: &mut Frame, area: Rect) {
        let [header, tabs, canvas, buttons] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" Step 3 of 3 · {}", Step::Result.description()))
                .style(Style::default().fg(BRAND_VIOLET)),
            header,
        );

        // Template selector
        let mut x = tabs.x + 1;
        for variant in TemplateVariant::ALL {
            let label = format!(" {} ", variant.label());
            #[allow(clippy::cast_possible_truncation)]
            let width = label.chars().count() as u16;
            let style = if variant == self.display.template {
                Style::default()
                    .fg(BRAND_VIOLET)
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                Style::default().fg(DIM_GRAY)
            };
            let rect = Rect::new(x, tabs.y, width, 1).intersection(tabs);
            frame.buffer_mut().set_string(rect.x, rect.y, &label, style);
            self.buttons.push((rect, Action::Template(variant)));
            x += width + 1;
        }

        // Ad
        match self.display.renderable_draft() {
            Some(draft) => {
                let rendered = TerminalTemplates.render(self.display.template, draft);
                blit(frame.buffer_mut(), &rendered, canvas);
            }
            None => {
                frame.render_widget(
                    Paragraph::new(format!("{} Generating your ad", self.display.spinner()))
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(SPINNER_BLUE)),
                    canvas,
                );
            }
        }

        let buf = frame.buffer_mut();
        let mut x = buttons.x + 1;
        x += self.button(buf, x, buttons.y, "Generate Again", Action::GenerateAgain, true);
        self.button(buf, x, buttons.y, "Back", Action::Back, true);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.display.step {
            Step::Welcome => "Enter start | Esc quit",
            Step::Input => "Enter generate | F1-F3 colors | Ctrl+N next | Esc back",
            Step::Result => "Tab template | r generate again | Esc back",
        };

        let mut spans = vec![Span::styled(
            format!(" {} | {}", self.display.step.description(), hints),
            Style::default().fg(DIM_GRAY),
        )];
        if let Some(notification) = &self.display.notification {
            let color = match notification.level {
                NotifyLevel::Info => INPUT_GREEN,
                NotifyLevel::Warning => WARNING_AMBER,
                NotifyLevel::Error => ERROR_RED,
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                notification.message.clone(),
                Style::default().fg(color),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Draw a button and record its hit region; returns the width used
    fn button(
        &mut self,
        buf: &mut Buffer,
        x: u16,
        y: u16,
        label: &str,
        action: Action,
        enabled: bool,
    ) -> u16 {
        let text = format!("[ {label} ]");
        let width = button_width(label);
        let style = if enabled {
            Style::default().bg(BUTTON_BG).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(BUTTON_DISABLED)
        };
        let rect = Rect::new(x, y, width, 1).intersection(buf.area);
        if rect.is_empty() {
            return width + 1;
        }
        buf.set_stringn(rect.x, rect.y, &text, usize::from(rect.width), style);
        if enabled {
            self.buttons.push((rect, action));
        }
        width + 1
    }
}

fn button_width(label: &str) -> u16 {
    u16::try_from(label.chars().count() + 4).unwrap_or(u16::MAX)
}

fn stage_label(stage: PipelineStage) -> &'static str {
    match stage {
        PipelineStage::Title => "Title",
        PipelineStage::Description => "Description",
        PipelineStage::Cta => "Call to action",
        PipelineStage::Image => "Image",
    }
}

/// Copy `source` into `target`, centred in `area` and clipped to it
fn blit(target: &mut Buffer, source: &Buffer, area: Rect) {
    let width = source.area.width.min(area.width);
    let height = source.area.height.min(area.height);
    let x0 = area.x + (area.width - width) / 2;
    let y0 = area.y + (area.height - height) / 2;

    for y in 0..height {
        for x in 0..width {
            let src = source.cell((source.area.x + x, source.area.y + y));
            if let (Some(src), Some(dst)) = (src, target.cell_mut((x0 + x, y0 + y))) {
                *dst = src.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_centres_and_clips() {
        let mut source = Buffer::empty(Rect::new(0, 0, 4, 2));
        source.set_string(0, 0, "abcd", Style::default());
        source.set_string(0, 1, "efgh", Style::default());

        let mut target = Buffer::empty(Rect::new(0, 0, 8, 4));
        blit(&mut target, &source, Rect::new(0, 0, 8, 4));
        assert_eq!(target[(2, 1)].symbol(), "a");
        assert_eq!(target[(5, 2)].symbol(), "h");

        let mut small = Buffer::empty(Rect::new(0, 0, 2, 1));
        blit(&mut small, &source, Rect::new(0, 0, 2, 1));
        assert_eq!(small[(0, 0)].symbol(), "a");
        assert_eq!(small[(1, 0)].symbol(), "b");
    }

    #[test]
    fn test_button_width() {
        assert_eq!(button_width("Next"), 8);
    }
}
