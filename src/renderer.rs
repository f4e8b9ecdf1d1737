use crate::director::{Director, World};
use crate::entities::{Bullet, BulletOwner, Enemy, EnemyKind, Explosion, GameState, Screen, Ship, Star};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const TIMER_WIDTH: u16 = 12;

/// Anything that can draw the world's entities.
///
/// The simulation only hands out read-only entities; a sink never mutates them.
pub trait EntitySink {
    fn star(&mut self, star: &Star);
    fn ship(&mut self, ship: &Ship);
    fn bullet(&mut self, bullet: &Bullet);
    fn enemy(&mut self, enemy: &Enemy);
    fn explosion(&mut self, explosion: &Explosion);
}

/// Feeds every live entity to `sink`, background first and the ship last
pub fn draw_world<S: EntitySink + ?Sized>(world: &World, sink: &mut S) {
    for star in &world.stars {
        sink.star(star);
    }
    for bullet in world.bullets.iter().filter(|b| b.active) {
        sink.bullet(bullet);
    }
    for enemy in world.enemies.iter().filter(|e| e.active) {
        sink.enemy(enemy);
    }
    for explosion in world.explosions.iter().filter(|e| e.active) {
        sink.explosion(explosion);
    }
    if world.ship.is_alive() {
        sink.ship(&world.ship);
    }
}

/// Scales world coordinates onto a rectangle of terminal cells
pub struct TerminalCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    screen: Screen,
}

impl<'a> TerminalCanvas<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, screen: Screen) -> Self {
        // Never draw outside the buffer even if the caller's area is stale
        let area = area.intersection(buf.area);
        Self { buf, area, screen }
    }

    /// Cell holding world point `(x, y)`, or `None` when it is off screen
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if self.area.is_empty() || !(x >= 0.0 && x < self.screen.width) {
            return None;
        }
        if !(y >= 0.0 && y < self.screen.height) {
            return None;
        }
        let col = (x / self.screen.width * self.area.width as f32) as u16;
        let row = (y / self.screen.height * self.area.height as f32) as u16;
        Some((
            self.area.x + col.min(self.area.width - 1),
            self.area.y + row.min(self.area.height - 1),
        ))
    }

    fn put(&mut self, col: i32, row: i32, symbol: char, style: Style) {
        let inside_x = col >= self.area.left() as i32 && col < self.area.right() as i32;
        let inside_y = row >= self.area.top() as i32 && row < self.area.bottom() as i32;
        if !(inside_x && inside_y) || symbol == ' ' {
            return;
        }
        if let Some(cell) = self.buf.cell_mut((col as u16, row as u16)) {
            cell.set_char(symbol).set_style(style);
        }
    }

    /// Draws a multi-line sprite centered on a world point, clipped at the edges.
    /// Sprites partly above the top edge (fresh spawns) still show their lower rows.
    fn sprite(&mut self, x: f32, y: f32, lines: &[&str], style: Style) {
        if self.area.is_empty() || !x.is_finite() || !y.is_finite() {
            return;
        }
        let col = self.area.x as f32 + x / self.screen.width * self.area.width as f32;
        let row = self.area.y as f32 + y / self.screen.height * self.area.height as f32;
        let height = lines.len() as i32;

        for (dy, line) in lines.iter().enumerate() {
            let width = line.chars().count() as i32;
            let start_col = col.floor() as i32 - width / 2;
            let line_row = row.floor() as i32 - height / 2 + dy as i32;
            for (dx, symbol) in line.chars().enumerate() {
                self.put(start_col + dx as i32, line_row, symbol, style);
            }
        }
    }
}

impl EntitySink for TerminalCanvas<'_> {
    fn star(&mut self, star: &Star) {
        let Some((col, row)) = self.to_cell(star.x, star.y) else {
            return;
        };
        let symbol = if star.size > 2.5 { '*' } else { '.' };
        let color = if star.brightness > 0.8 {
            Color::White
        } else {
            Color::DarkGray
        };
        self.put(col as i32, row as i32, symbol, Style::default().fg(color));
    }

    fn ship(&mut self, ship: &Ship) {
        let style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        self.sprite(ship.x, ship.y, &ship.get_sprite_lines(), style);
    }

    fn bullet(&mut self, bullet: &Bullet) {
        let Some((col, row)) = self.to_cell(bullet.x, bullet.y) else {
            return;
        };
        let (symbol, color) = match bullet.owner {
            BulletOwner::Player => ('|', Color::Yellow),
            BulletOwner::Enemy => ('!', Color::Magenta),
        };
        self.put(col as i32, row as i32, symbol, Style::default().fg(color));
    }

    fn enemy(&mut self, enemy: &Enemy) {
        let color = match enemy.kind {
            EnemyKind::Basic => Color::Red,
            EnemyKind::Zigzag => Color::Magenta,
            EnemyKind::Aggressive => Color::Yellow,
        };
        let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        self.sprite(enemy.x, enemy.y, &enemy.get_sprite_lines(), style);
    }

    fn explosion(&mut self, explosion: &Explosion) {
        // Fade from red through orange to yellow as alpha drops
        let color = if explosion.alpha > 0.66 {
            Color::Red
        } else if explosion.alpha > 0.33 {
            Color::LightRed
        } else {
            Color::Yellow
        };
        let style = Style::default().fg(color).add_modifier(Modifier::BOLD);

        if let Some((col, row)) = self.to_cell(explosion.x, explosion.y) {
            self.put(col as i32, row as i32, '@', style);
        }
        for particle in &explosion.particles {
            if let Some((col, row)) =
                self.to_cell(explosion.x + particle.x, explosion.y + particle.y)
            {
                self.put(col as i32, row as i32, '*', style);
            }
        }
    }
}

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub game_state: GameState,
    pub world: &'a World,
    pub screen: Screen,
    pub score: u64,
    pub lives: u32,
    pub fps: u32,
}

impl<'a> RenderView<'a> {
    pub fn from_director(director: &'a Director, fps: u32) -> Self {
        Self {
            game_state: director.state(),
            world: director.world(),
            screen: director.screen(),
            score: director.score(),
            lives: director.lives(),
            fps,
        }
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Main render method that dispatches to state-specific renderers
    pub fn render(&self, frame: &mut Frame, view: &RenderView) {
        self.render_game(frame, view);
        match view.game_state {
            GameState::Playing => {}
            GameState::Paused => self.render_paused(frame),
            GameState::GameOverWithLivesRemaining => self.render_round_over(frame, view),
            GameState::GameOverNoLives => self.render_game_over(frame, view),
        }
    }

    /// Renders the play field, HUD and controls hint
    fn render_game(&self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        if area.height < 3 {
            return;
        }

        // Header and footer rows sit outside the bordered field
        let field = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height - 2,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(field);
        frame.render_widget(block, field);

        let mut canvas = TerminalCanvas::new(frame.buffer_mut(), inner, view.screen);
        draw_world(view.world, &mut canvas);

        // Timer takes the right end of the header row
        let header_width = area.width.saturating_sub(2);
        let timer_width = TIMER_WIDTH.min(header_width);
        let header = Rect {
            x: area.x + 1,
            y: area.y,
            width: header_width - timer_width,
            height: 1,
        };
        let timer_area = Rect {
            x: header.right(),
            width: timer_width,
            ..header
        };
        frame.render_widget(Paragraph::new(stats_line(view)), header);

        let seconds = (view.world.elapsed_ms / 1000.0) as u64;
        let timer = Line::from(vec![
            Span::styled("Time: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:02}:{:02}", seconds / 60, seconds % 60),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(timer).right_aligned(), timer_area);

        let controls = Line::from(vec![Span::styled(
            "[WASD/Arrows: Move] [Space: Fire] [P: Pause] [R: Restart] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let footer = Rect {
            x: area.x + 1,
            y: area.bottom() - 1,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), footer);
    }

    fn render_paused(&self, frame: &mut Frame) {
        let text = vec![
            Line::from(""),
            Line::from("PAUSED").centered().bold().yellow(),
            Line::from(""),
            Line::from("Press P to resume").centered().white(),
        ];
        render_overlay(frame, text, 30, 6, Color::Yellow);
    }

    /// Ship lost with lives to spare
    fn render_round_over(&self, frame: &mut Frame, view: &RenderView) {
        let text = vec![
            Line::from(""),
            Line::from("SHIP DESTROYED").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Score: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from(format!("Lives left: {}", view.lives))
                .centered()
                .cyan()
                .bold(),
            Line::from(""),
            Line::from("Press R to continue").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];
        render_overlay(frame, text, 34, 10, Color::Red);
    }

    fn render_game_over(&self, frame: &mut Frame, view: &RenderView) {
        let text = vec![
            Line::from(""),
            Line::from("╔═══════════════════════════╗").centered().red(),
            Line::from("║      GAME OVER!           ║")
                .centered()
                .red()
                .bold(),
            Line::from("╚═══════════════════════════╝").centered().red(),
            Line::from(""),
            Line::from(format!("Final Score: {}", view.score))
                .centered()
                .yellow()
                .bold(),
            Line::from("No lives left").centered().cyan().bold(),
            Line::from(""),
            Line::from("Press Q to quit").centered().white(),
        ];
        render_overlay(frame, text, 36, 11, Color::Red);
    }
}

fn stats_line(view: &RenderView) -> Line<'static> {
    let health = view.world.ship.health_fraction();
    let health_color = if health < 0.3 {
        Color::Red
    } else if health < 0.6 {
        Color::Yellow
    } else {
        Color::Green
    };
    let label = Style::default().fg(Color::DarkGray);
    let value = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled("Score: ", label),
        Span::styled(view.score.to_string(), value(Color::Yellow)),
        Span::styled("  Lives: ", label),
        Span::styled(view.lives.to_string(), value(Color::Cyan)),
        Span::styled("  HP: ", label),
        Span::styled(
            format!("{}%", (health * 100.0).round() as u32),
            value(health_color),
        ),
        Span::styled("  Level: ", label),
        Span::styled(format!("{:.1}", view.world.difficulty), value(Color::Magenta)),
        Span::styled("  FPS: ", label),
        Span::styled(view.fps.to_string(), value(Color::White)),
    ])
}

/// Centered box over the play field, shrunk to fit small terminals
fn render_overlay(frame: &mut Frame, text: Vec<Line>, width: u16, height: u16, border: Color) {
    let area = frame.area();
    let width = width.min(area.width);
    let height = height.min(area.height);
    let overlay = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .alignment(Alignment::Center),
        overlay,
    );
}
