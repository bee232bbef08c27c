// Strike-zone chart widget: one player's pitcher-POV rates drawn on a
// canvas.
//
// The outer box spans x 0..10, y -4..6; the strike zone is x 2..8, y -2..4.
// Each of the 13 regions is filled by its shade and labelled with its rate
// at the region's plot coordinate.

use std::collections::BTreeMap;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use zonecast_core::zone::{
    polygon_contains, region_outline, GRID_LINES, OUTER_OUTLINE, STRIKE_ZONE_OUTLINE,
};
use zonecast_core::{MetricKind, ZoneCoord};

use crate::app::PlayerChart;

const X_BOUNDS: [f64; 2] = [0.0, 10.0];
const Y_BOUNDS: [f64; 2] = [-4.0, 6.0];
const FILL_STEP: f64 = 0.1;

/// Rates above this are shaded high.
pub const HIGH_THRESHOLD: f64 = 0.25;

// ---------------------------------------------------------------------------
// Shade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Neutral,
    Mid,
    High,
}

impl Shade {
    pub fn for_value(value: f64) -> Shade {
        if value <= 0.0 {
            Shade::Neutral
        } else if value > HIGH_THRESHOLD {
            Shade::High
        } else {
            Shade::Mid
        }
    }

    pub fn fill(self) -> Color {
        match self {
            Shade::Neutral => Color::DarkGray,
            Shade::Mid => Color::Blue,
            Shade::High => Color::Red,
        }
    }
}

pub fn format_rate(value: f64) -> String {
    format!("{:.3}", value)
}

/// Sample points strictly inside the region labelled at `coord`.
pub fn region_fill(coord: ZoneCoord, step: f64) -> Vec<(f64, f64)> {
    let outline = region_outline(coord);
    let mut points = Vec::new();
    let cols = ((X_BOUNDS[1] - X_BOUNDS[0]) / step) as usize;
    let rows = ((Y_BOUNDS[1] - Y_BOUNDS[0]) / step) as usize;
    for row in 0..rows {
        // offset by half a step so samples never land on a boundary
        let y = Y_BOUNDS[0] + (row as f64 + 0.5) * step;
        for col in 0..cols {
            let x = X_BOUNDS[0] + (col as f64 + 0.5) * step;
            if polygon_contains(outline, x, y) {
                points.push((x, y));
            }
        }
    }
    points
}

fn draw_polyline(ctx: &mut Context, points: &[(f64, f64)], color: Color) {
    for pair in points.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
    }
}

fn paint_chart(ctx: &mut Context, points: &BTreeMap<ZoneCoord, f64>) {
    for (coord, value) in points {
        let fill = region_fill(*coord, FILL_STEP);
        ctx.draw(&Points {
            coords: &fill,
            color: Shade::for_value(*value).fill(),
        });
    }
    ctx.layer();

    draw_polyline(ctx, &OUTER_OUTLINE, Color::White);
    draw_polyline(ctx, &STRIKE_ZONE_OUTLINE, Color::White);
    for ((x1, y1), (x2, y2)) in GRID_LINES {
        ctx.draw(&CanvasLine::new(x1, y1, x2, y2, Color::Gray));
    }
    ctx.layer();

    for (coord, value) in points {
        ctx.print(
            f64::from(coord.x),
            f64::from(coord.y),
            Span::styled(
                format_rate(*value),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }
}

pub fn chart_title(chart: &PlayerChart, metric: MetricKind) -> String {
    let games = if chart.games == 1 { "game" } else { "games" };
    format!(
        " {} - {} by zone ({} {}) ",
        chart.name,
        metric.label(),
        chart.games,
        games
    )
}

/// Render `chart` into the given area, or a placeholder when there is none.
pub fn render(frame: &mut Frame, area: Rect, chart: Option<&PlayerChart>, metric: MetricKind) {
    let Some(chart) = chart else {
        let paragraph = Paragraph::new("No players to chart").block(
            Block::default()
                .borders(Borders::ALL)
                .title(metric.label()),
        );
        frame.render_widget(paragraph, area);
        return;
    };

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(chart_title(chart, metric)),
        )
        .marker(Marker::Braille)
        .x_bounds(X_BOUNDS)
        .y_bounds(Y_BOUNDS)
        .paint(|ctx| paint_chart(ctx, &chart.points));
    frame.render_widget(canvas, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use zonecast_core::zone::zone_to_coordinates;
    use zonecast_core::{PlayerId, Zone};

    fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn chart(points: BTreeMap<ZoneCoord, f64>) -> PlayerChart {
        PlayerChart {
            name: "Mike Trout".into(),
            player: PlayerId(545361),
            games: 5,
            points,
        }
    }

    #[test]
    fn shade_thresholds() {
        assert_eq!(Shade::for_value(0.0), Shade::Neutral);
        assert_eq!(Shade::for_value(-1.0), Shade::Neutral);
        assert_eq!(Shade::for_value(0.001), Shade::Mid);
        assert_eq!(Shade::for_value(0.25), Shade::Mid);
        assert_eq!(Shade::for_value(0.251), Shade::High);
        assert_eq!(Shade::for_value(1.5), Shade::High);
    }

    #[test]
    fn shade_colors_are_distinct() {
        assert_eq!(Shade::Neutral.fill(), Color::DarkGray);
        assert_eq!(Shade::Mid.fill(), Color::Blue);
        assert_eq!(Shade::High.fill(), Color::Red);
    }

    #[test]
    fn format_rate_three_places() {
        assert_eq!(format_rate(0.0), "0.000");
        assert_eq!(format_rate(0.3333), "0.333");
        assert_eq!(format_rate(1.25), "1.250");
    }

    #[test]
    fn region_fills_are_disjoint_and_cover_the_box() {
        let mut total = 0;
        let mut seen = std::collections::HashSet::new();
        for zone in Zone::ALL {
            for (x, y) in region_fill(zone_to_coordinates(zone), 0.5) {
                assert!(seen.insert(((x * 10.0) as i64, (y * 10.0) as i64)));
                total += 1;
            }
        }
        // 10 x 10 box sampled every 0.5
        assert_eq!(total, 400);
    }

    #[test]
    fn strike_zone_cell_fill_is_square() {
        // a 2 x 2 cell sampled every 0.5 holds 16 points
        assert_eq!(region_fill(ZoneCoord::new(5, 1), 0.5).len(), 16);
    }

    #[test]
    fn title_mentions_player_metric_and_games() {
        let title = chart_title(&chart(BTreeMap::new()), MetricKind::Slugging);
        assert!(title.contains("Mike Trout"));
        assert!(title.contains("SLG"));
        assert!(title.contains("5 games"));
    }

    #[test]
    fn render_prints_rates() {
        let mut points = BTreeMap::new();
        for zone in Zone::ALL {
            points.insert(zone_to_coordinates(zone), 0.0);
        }
        points.insert(ZoneCoord::new(5, 1), 0.333);
        points.insert(ZoneCoord::new(9, -3), 0.5);
        let chart = chart(points);

        let backend = ratatui::backend::TestBackend::new(60, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), Some(&chart), MetricKind::OnBase))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("0.333"));
        assert!(text.contains("0.500"));
        assert!(text.contains("Mike Trout"));
    }

    #[test]
    fn render_without_chart_shows_placeholder() {
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), None, MetricKind::BattingAverage))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No players to chart"));
    }
}
