//! One-time blocking prompts that wait for a human before (and after) a batch.
//!
//! A gate prints its instructions and waits for a single line of input. It carries
//! no payload: any line acknowledges it, end of input or Ctrl-C aborts.

use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
    pub err: fn(&str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Acknowledged,
    Aborted,
}

const RULE: &str = "==================================================";

pub fn login_prompt() -> Vec<String> {
    vec![
        String::new(),
        RULE.to_string(),
        "Please log in to the web player in the browser window.".to_string(),
        "Once logged in and you see the main player, press ENTER...".to_string(),
        RULE.to_string(),
    ]
}

pub fn playlist_creation_prompt(playlist: &str) -> Vec<String> {
    vec![
        String::new(),
        RULE.to_string(),
        format!("Please CREATE A PLAYLIST named '{}' manually:", playlist),
        "  1. Click 'Your Library' on the left".to_string(),
        "  2. Click the '+' button".to_string(),
        "  3. Click 'Create a new playlist'".to_string(),
        format!("  4. Name it: {}", playlist),
        String::new(),
        "Press ENTER once the playlist is created...".to_string(),
        RULE.to_string(),
    ]
}

pub fn close_prompt() -> Vec<String> {
    vec![
        String::new(),
        "Browser will stay open for you to review.".to_string(),
        "Press ENTER to close...".to_string(),
    ]
}

/// Print `lines` and block until one line of input arrives.
pub async fn acknowledge<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    lines: &[String],
    output: OutputHandlers,
    handle_ctrl_c: bool,
) -> io::Result<Gate> {
    for line in lines {
        (output.out)(line);
    }

    let mut input = String::new();
    let read = if handle_ctrl_c {
        tokio::select! {
            read = reader.read_line(&mut input) => read,
            _ = tokio::signal::ctrl_c() => {
                (output.err)("Interrupted.");
                return Ok(Gate::Aborted);
            }
        }
    } else {
        reader.read_line(&mut input).await
    };

    match read {
        Ok(0) => Ok(Gate::Aborted),
        Ok(_) => Ok(Gate::Acknowledged),
        Err(e) => Err(e),
    }
}
