use lineup_engine::batch::BatchObserver;
use lineup_engine::gate::OutputHandlers;
use lineup_engine::model::{ActionOutcome, TrackRequest};

pub const RULE: &str = "==================================================";

/// Long featured-credit titles are cut so a progress line fits one row.
const PROGRESS_TITLE_CHARS: usize = 40;

pub const OUTPUT: OutputHandlers = OutputHandlers {
    out: print_out,
    err: print_err,
};

fn print_out(msg: &str) {
    println!("{}", msg);
}

fn print_err(msg: &str) {
    eprintln!("{}", msg);
}

/// Prints one line per track as the batch advances.
pub struct ConsoleProgress;

impl BatchObserver for ConsoleProgress {
    fn on_start(&mut self, index: usize, total: usize, request: &TrackRequest) {
        println!("\n{}", progress_line(index, total, request));
    }

    fn on_outcome(&mut self, _index: usize, _total: usize, outcome: &ActionOutcome) {
        if outcome.is_added() {
            println!("  [OK] {}", outcome);
        } else {
            println!("  [!] {}", outcome);
        }
    }
}

fn progress_line(index: usize, total: usize, request: &TrackRequest) -> String {
    let title: String = request
        .track_title
        .chars()
        .take(PROGRESS_TITLE_CHARS)
        .collect();
    format!(
        "[{}/{}] {} - {}...",
        index + 1,
        total,
        request.artist_name,
        title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_shows_position() {
        let request = TrackRequest::new("X", "Song");
        assert_eq!(progress_line(2, 10, &request), "[3/10] X - Song...");
    }

    #[test]
    fn test_progress_line_truncates_long_titles_by_chars() {
        let title = format!("{} (feat. Someone Else)", "é".repeat(38));
        let request = TrackRequest::new("X", &title);
        let line = progress_line(0, 1, &request);
        assert_eq!(line, format!("[1/1] X - {} (...", "é".repeat(38)));
    }
}
