//! Terminal bar chart of the top violations by total fines.

use std::io::{self, Stdout};
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Paragraph};
use ratatui::{Frame, Terminal};

use crate::domain::model::TopSelection;
use crate::utils::error::Result;

pub const CHART_TITLE: &str = "Top Five Parking Citations in Los Angeles, by Total Citation Amount";
pub const Y_AXIS_LABEL: &str = "Dollars Collected in Fines";
const EMPTY_MESSAGE: &str = "No citations in the selected date range.";
const CLOSE_HINT: &str = "q / Esc / Enter to close";

const MAX_BAR_WIDTH: u16 = 30;

fn bar_width(available: u16, bars: usize) -> u16 {
    let bars = u16::try_from(bars).unwrap_or(u16::MAX).max(1);
    let gaps = bars - 1;
    (available.saturating_sub(gaps) / bars).clamp(1, MAX_BAR_WIDTH)
}

pub fn render(f: &mut Frame, area: Rect, selection: &TopSelection) {
    let block = Block::bordered().title(Line::from(CHART_TITLE).centered());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [label_area, chart_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(Y_AXIS_LABEL), label_area);

    if selection.is_empty() {
        f.render_widget(Paragraph::new(EMPTY_MESSAGE), chart_area);
    } else {
        let bars: Vec<Bar> = selection
            .entries
            .iter()
            .map(|entry| {
                Bar::default()
                    .value(u64::try_from(entry.value).unwrap_or(0))
                    .label(Line::from(entry.category.clone()))
                    .text_value(format!("${}", entry.value))
            })
            .collect();

        let chart = BarChart::default()
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width(chart_area.width, bars.len()))
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        f.render_widget(chart, chart_area);
    }

    f.render_widget(
        Paragraph::new(CLOSE_HINT).style(Style::default().fg(Color::DarkGray)),
        hint_area,
    );
}

type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static;

/// Runs `restore` before the previous panic hook while alive; puts the
/// previous hook back on drop.
struct PanicGuard {
    previous: Arc<PanicHook>,
}

impl PanicGuard {
    fn install(restore: impl Fn() + Send + Sync + 'static) -> Self {
        let previous: Arc<PanicHook> = Arc::from(panic::take_hook());
        let chained = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            restore();
            chained(info);
        }));
        Self { previous }
    }
}

impl Drop for PanicGuard {
    fn drop(&mut self) {
        // take_hook panics on a panicking thread
        if std::thread::panicking() {
            return;
        }
        drop(panic::take_hook());
        let previous = Arc::clone(&self.previous);
        panic::set_hook(Box::new(move |info| previous(info)));
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stderr(), LeaveAlternateScreen);
}

/// Shows the chart in the alternate screen until the user closes it.
pub fn show(selection: &TopSelection) -> Result<()> {
    let _guard = PanicGuard::install(restore_terminal);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e.into());
        }
    };

    let result = run(&mut terminal, selection);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, selection: &TopSelection) -> Result<()> {
    terminal.clear()?;
    loop {
        terminal.draw(|f| {
            let area = f.area();
            render(f, area, selection);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TopEntry;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn screen_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn draw(selection: &TopSelection) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, selection);
            })
            .unwrap();
        screen_text(terminal.backend().buffer())
    }

    #[test]
    fn test_renders_title_and_axis_label() {
        let selection = TopSelection {
            cutoff: Some(10),
            entries: vec![
                TopEntry {
                    category: "A".to_string(),
                    value: 75,
                },
                TopEntry {
                    category: "B".to_string(),
                    value: 10,
                },
            ],
        };

        let text = draw(&selection);
        assert!(text.contains(CHART_TITLE));
        assert!(text.contains(Y_AXIS_LABEL));
        assert!(text.contains(CLOSE_HINT));
        assert!(!text.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_empty_selection_shows_placeholder() {
        let text = draw(&TopSelection::default());
        assert!(text.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_panic_guard_chains_then_restores_previous_hook() {
        static PREVIOUS: AtomicUsize = AtomicUsize::new(0);
        static RESTORED: AtomicUsize = AtomicUsize::new(0);

        let saved = panic::take_hook();
        panic::set_hook(Box::new(|_| {
            PREVIOUS.fetch_add(1, Ordering::SeqCst);
        }));

        let guard = PanicGuard::install(|| {
            RESTORED.fetch_add(1, Ordering::SeqCst);
        });
        let _ = panic::catch_unwind(|| panic!("while the chart is open"));
        assert_eq!(RESTORED.load(Ordering::SeqCst), 1);
        assert_eq!(PREVIOUS.load(Ordering::SeqCst), 1);

        drop(guard);
        let _ = panic::catch_unwind(|| panic!("after the chart closed"));
        assert_eq!(RESTORED.load(Ordering::SeqCst), 1);
        assert_eq!(PREVIOUS.load(Ordering::SeqCst), 2);

        panic::set_hook(saved);
    }

    #[test]
    fn test_bar_width_fills_space_within_limits() {
        assert_eq!(bar_width(100, 5), 19);
        assert_eq!(bar_width(200, 2), MAX_BAR_WIDTH);
        assert_eq!(bar_width(4, 9), 1);
        assert_eq!(bar_width(10, 0), 10);
    }
}
