// Terminal UI: one strike-zone chart at a time, paged by player and switched
// by metric.
//
// All chart sets are computed before the UI starts; the loop only handles
// keys and redraws.

pub mod layout;
pub mod strike_zone;

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use zonecast_core::MetricKind;

use crate::app::{ChartSet, PlayerChart};
use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

pub struct ViewState {
    sets: Vec<ChartSet>,
    metric_index: usize,
    player_index: usize,
}

impl ViewState {
    pub fn new(sets: Vec<ChartSet>, initial: MetricKind) -> Self {
        let metric_index = sets.iter().position(|s| s.metric == initial).unwrap_or(0);
        ViewState {
            sets,
            metric_index,
            player_index: 0,
        }
    }

    pub fn current_set(&self) -> Option<&ChartSet> {
        self.sets.get(self.metric_index)
    }

    pub fn current_metric(&self) -> Option<MetricKind> {
        self.current_set().map(|s| s.metric)
    }

    pub fn current_chart(&self) -> Option<&PlayerChart> {
        self.current_set()
            .and_then(|s| s.charts.get(self.player_index))
    }

    pub fn player_count(&self) -> usize {
        self.current_set().map(|s| s.charts.len()).unwrap_or(0)
    }

    pub fn player_index(&self) -> usize {
        self.player_index
    }

    /// Switch metric, keeping the same player where possible.
    pub fn select_metric(&mut self, metric: MetricKind) {
        if let Some(idx) = self.sets.iter().position(|s| s.metric == metric) {
            self.metric_index = idx;
            let count = self.player_count();
            if self.player_index >= count {
                self.player_index = count.saturating_sub(1);
            }
        }
    }

    pub fn next_player(&mut self) {
        let count = self.player_count();
        if count > 0 {
            self.player_index = (self.player_index + 1) % count;
        }
    }

    pub fn previous_player(&mut self) {
        let count = self.player_count();
        if count > 0 {
            self.player_index = (self.player_index + count - 1) % count;
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Apply one key press to the view state.
pub fn handle_key(key: KeyEvent, state: &mut ViewState) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Continue;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Right | KeyCode::Char('l') => {
            state.next_player();
            KeyAction::Continue
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.previous_player();
            KeyAction::Continue
        }
        KeyCode::Char(c @ '1'..='5') => {
            let idx = (c as usize) - ('1' as usize);
            state.select_metric(MetricKind::ALL[idx]);
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());
    let metric = state.current_metric().unwrap_or(MetricKind::SwingAndMiss);

    frame.render_widget(metric_bar(state, metric), layout.metric_bar);
    strike_zone::render(frame, layout.chart, state.current_chart(), metric);
    render_help_bar(frame, layout.help_bar);
}

fn metric_bar(state: &ViewState, active: MetricKind) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (idx, metric) in MetricKind::ALL.into_iter().enumerate() {
        let style = if metric == active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!(" {}:{} ", idx + 1, metric.label()), style));
    }
    let count = state.player_count();
    let position = if count == 0 {
        " | no players".to_string()
    } else {
        format!(" | player {}/{}", state.player_index() + 1, count)
    };
    spans.push(Span::styled(position, Style::default().fg(Color::Gray)));

    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray))
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect) {
    let text = " q:Quit | 1-5:Metric | \u{2190}/\u{2192}:Player";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the chart viewer until the user quits.
pub async fn run(sets: Vec<ChartSet>, initial: MetricKind) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(sets, initial);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(100));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if handle_key(key_event, &mut view_state) == KeyAction::Quit {
                            break Ok(());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use zonecast_core::{PlayerId, ZoneCoord};

    fn chart(name: &str, value: f64) -> PlayerChart {
        let mut points = BTreeMap::new();
        points.insert(ZoneCoord::new(5, 1), value);
        PlayerChart {
            name: name.into(),
            player: PlayerId(1),
            games: 2,
            points,
        }
    }

    fn sets() -> Vec<ChartSet> {
        MetricKind::ALL
            .into_iter()
            .map(|metric| ChartSet {
                metric,
                charts: match metric {
                    // one player could not be named for this metric's run
                    MetricKind::OnBase => vec![chart("A", 0.1)],
                    _ => vec![chart("A", 0.1), chart("B", 0.2), chart("C", 0.3)],
                },
            })
            .collect()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn starts_on_configured_metric() {
        let state = ViewState::new(sets(), MetricKind::Slugging);
        assert_eq!(state.current_metric(), Some(MetricKind::Slugging));
        assert_eq!(state.current_chart().unwrap().name, "A");
    }

    #[test]
    fn arrows_page_players_and_wrap() {
        let mut state = ViewState::new(sets(), MetricKind::SwingAndMiss);
        handle_key(press(KeyCode::Right), &mut state);
        assert_eq!(state.current_chart().unwrap().name, "B");
        handle_key(press(KeyCode::Left), &mut state);
        handle_key(press(KeyCode::Left), &mut state);
        assert_eq!(state.current_chart().unwrap().name, "C");
        handle_key(press(KeyCode::Right), &mut state);
        assert_eq!(state.current_chart().unwrap().name, "A");
    }

    #[test]
    fn number_keys_switch_metric() {
        let mut state = ViewState::new(sets(), MetricKind::SwingAndMiss);
        handle_key(press(KeyCode::Char('5')), &mut state);
        assert_eq!(state.current_metric(), Some(MetricKind::BattingAverage));
        handle_key(press(KeyCode::Char('2')), &mut state);
        assert_eq!(state.current_metric(), Some(MetricKind::CalledStrike));
    }

    #[test]
    fn switching_to_shorter_set_clamps_player() {
        let mut state = ViewState::new(sets(), MetricKind::SwingAndMiss);
        handle_key(press(KeyCode::Right), &mut state);
        handle_key(press(KeyCode::Right), &mut state);
        handle_key(press(KeyCode::Char('4')), &mut state);
        assert_eq!(state.current_metric(), Some(MetricKind::OnBase));
        assert_eq!(state.player_index(), 0);
        assert_eq!(state.current_chart().unwrap().name, "A");
    }

    #[test]
    fn quit_keys() {
        let mut state = ViewState::new(sets(), MetricKind::SwingAndMiss);
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut state), KeyAction::Quit);
        assert_eq!(
            handle_key(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                &mut state
            ),
            KeyAction::Quit
        );
        assert_eq!(handle_key(press(KeyCode::Char('c')), &mut state), KeyAction::Continue);
    }

    #[test]
    fn empty_state_is_safe() {
        let mut state = ViewState::new(vec![], MetricKind::OnBase);
        assert!(state.current_chart().is_none());
        handle_key(press(KeyCode::Right), &mut state);
        handle_key(press(KeyCode::Char('3')), &mut state);
        assert_eq!(state.player_count(), 0);

        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }

    #[test]
    fn render_frame_shows_metric_bar() {
        let state = ViewState::new(sets(), MetricKind::OnBase);
        let backend = ratatui::backend::TestBackend::new(80, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("4:OBP"));
        assert!(text.contains("player 1/1"));
        assert!(text.contains("0.100"));
    }
}
