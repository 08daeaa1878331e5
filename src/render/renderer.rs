use std::collections::HashMap;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Position, Rgb, Snapshot};
use crate::metrics::GameMetrics;

/// Colors cycled along the body in rainbow mode
const RAINBOW: [Rgb; 6] = [
    Rgb::new(255, 0, 0),
    Rgb::new(255, 127, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 127, 255),
    Rgb::new(148, 0, 211),
];

/// Darkest a tail segment gets, so long snakes stay visible on dark terminals
const MIN_SEGMENT_BRIGHTNESS: f32 = 0.3;

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Color of the body segment at `index` (0 = head)
pub fn segment_color(snapshot: &Snapshot, index: usize) -> Rgb {
    if snapshot.snake.rainbow {
        let phase = (snapshot.elapsed.as_millis() / 100) as usize;
        return RAINBOW[(index + phase) % RAINBOW.len()];
    }
    let fade = (1.0 - index as f32 * 0.1).max(MIN_SEGMENT_BRIGHTNESS);
    snapshot.snake.color.faded(fade)
}

/// Body glyph for a given thickness; thinner snakes get lighter shading
pub fn body_glyph(thickness: f32) -> &'static str {
    if thickness >= 0.95 {
        "█ "
    } else if thickness >= 0.75 {
        "▓ "
    } else if thickness >= 0.6 {
        "▒ "
    } else {
        "░ "
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.game_over {
            frame.render_widget(self.render_game_over(snapshot, metrics), game_area);
        } else {
            frame.render_widget(self.render_grid(snapshot), game_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        // First index wins so a tail duplicated by growth keeps its brighter shade
        let mut segments: HashMap<Position, usize> = HashMap::new();
        for (index, pos) in snapshot.snake.body.iter().enumerate() {
            segments.entry(*pos).or_insert(index);
        }
        let sprites: Vec<Position> = snapshot
            .sprites
            .iter()
            .filter(|sprite| sprite.active)
            .map(|sprite| sprite.position)
            .collect();

        let mut lines = Vec::with_capacity(snapshot.grid_size as usize);
        for y in 0..snapshot.grid_size {
            let mut spans = Vec::with_capacity(snapshot.grid_size as usize);

            for x in 0..snapshot.grid_size {
                let pos = Position::new(x, y);

                let cell = if let Some(&index) = segments.get(&pos) {
                    let style = Style::default().fg(to_color(segment_color(snapshot, index)));
                    if index == 0 {
                        Span::styled("◆ ", style.add_modifier(Modifier::BOLD))
                    } else {
                        Span::styled(body_glyph(snapshot.snake.thickness), style)
                    }
                } else if sprites.contains(&pos) {
                    Span::styled(
                        "▲ ",
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if let Some(bonus) = snapshot.bonus.filter(|bonus| bonus.position == pos) {
                    Span::styled(
                        "★ ",
                        Style::default()
                            .fg(to_color(bonus.color))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if let Some(fruit) = snapshot.fruit.iter().find(|fruit| fruit.position == pos) {
                    Span::styled("● ", Style::default().fg(to_color(fruit.color)))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let border = if snapshot.snake.rainbow {
            Color::Yellow
        } else {
            Color::White
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(" Rainbow Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(snapshot.format_elapsed(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(snapshot.snake.body.len().to_string(), value),
            Span::raw("    "),
            Span::styled("Tick: ", label),
            Span::styled(format!("{}ms", snapshot.tick_interval.as_millis()), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
        ];

        if let Some(remaining) = snapshot.snake.rainbow_remaining {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("RAINBOW {:.1}s", remaining.as_secs_f32()),
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot, metrics: &GameMetrics) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Time: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.format_elapsed(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Ticks: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.steps.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Longest: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.best_length.to_string(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.games_played.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        if metrics.new_record {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                "New high score!",
                Style::default()
                    .fg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "SPACE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("★", Style::default().fg(Color::Yellow)),
            Span::raw(" rainbow | "),
            Span::styled("▲", Style::default().fg(Color::Magenta)),
            Span::raw(" hazard | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
