//! Diagnostic board dumps.
//!
//! A renderer receives a read-only board and must copy out anything it wants
//! to keep before returning; the caller carries on mutating the board right after.

use crate::engine::Board;

pub trait BoardRenderer {
    fn render(&mut self, board: &Board);
}

/// Prints the board to stdout, six columns per tile, followed by the score.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

impl BoardRenderer for ConsoleRenderer {
    fn render(&mut self, board: &Board) {
        print!("{board}");
        println!("score {}", board.score());
    }
}

/// Writes the board through the `log` facade, one record per row.
#[derive(Debug, Clone, Copy)]
pub struct LogRenderer {
    pub level: log::Level,
}

impl Default for LogRenderer {
    fn default() -> Self { Self { level: log::Level::Debug } }
}

impl BoardRenderer for LogRenderer {
    fn render(&mut self, board: &Board) {
        if !log::log_enabled!(self.level) {
            return;
        }
        let dump = board.to_string();
        for line in dump.lines() {
            log::log!(self.level, "{line}");
        }
        log::log!(self.level, "score {}", board.score());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl BoardRenderer for NullRenderer {
    fn render(&mut self, _board: &Board) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Keeps `Info` and above from this module; everything else is disabled.
    struct Capture(Mutex<Vec<String>>);

    impl log::Log for Capture {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.target() == module_path!() && metadata.level() <= log::Level::Info
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut lines) = self.0.lock() {
                    lines.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    fn captured() -> Vec<String> { std::mem::take(&mut *CAPTURE.0.lock().unwrap()) }

    #[test]
    fn log_renderer_writes_rows_only_when_enabled() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);
        let board = Board::from_cells(vec![2, 4, 8, 1024]).unwrap();

        LogRenderer::default().render(&board);
        assert!(captured().is_empty());

        LogRenderer { level: log::Level::Info }.render(&board);
        assert_eq!(captured(), vec!["     2     4", "     8  1024", "score 0"]);
    }
}
