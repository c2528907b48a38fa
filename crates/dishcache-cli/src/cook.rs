//! Step-by-step cooking mode for the `cook` command.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use dishcache_core::models::StepCursor;

/// What a line of input asks the cursor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKey {
    Next,
    Prev,
    Quit,
}

impl StepKey {
    /// Enter or `n` advances, `p` goes back, `q` quits. Anything else is
    /// ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "" | "n" | "next" => Some(StepKey::Next),
            "p" | "prev" => Some(StepKey::Prev),
            "q" | "quit" => Some(StepKey::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookState {
    Cooking,
    Finished,
    Stopped,
}

/// Apply a key to the cursor. Moving past the last step finishes.
pub fn apply(cursor: &mut StepCursor, key: StepKey) -> CookState {
    match key {
        StepKey::Next => {
            if cursor.next() {
                CookState::Cooking
            } else {
                CookState::Finished
            }
        }
        StepKey::Prev => {
            cursor.prev();
            CookState::Cooking
        }
        StepKey::Quit => CookState::Stopped,
    }
}

fn print_step(cursor: &StepCursor) {
    let step = cursor.current();
    let number = step
        .step_number
        .unwrap_or(cursor.index() as i32 + 1);
    println!(
        "\nStep {} of {} (#{})\n  {}",
        cursor.index() + 1,
        cursor.len(),
        number,
        step.description.as_deref().unwrap_or("")
    );
}

/// Walk through the steps on stdin until done, quit, or end of input.
pub fn run(mut cursor: StepCursor) -> Result<CookState> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_step(&cursor);
        print!("[enter/n] next  [p] prev  [q] quit > ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(CookState::Stopped);
        };
        let Some(key) = StepKey::parse(&line?) else {
            continue;
        };
        match apply(&mut cursor, key) {
            CookState::Cooking => {}
            done => return Ok(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishcache_core::models::DishStep;

    fn cursor(n: i32) -> StepCursor {
        let steps = (1..=n)
            .map(|i| DishStep {
                id: None,
                dish_id: Some(1),
                step_number: Some(i),
                description: Some(format!("step {}", i)),
                image: None,
            })
            .collect();
        StepCursor::new(steps).unwrap()
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(StepKey::parse(""), Some(StepKey::Next));
        assert_eq!(StepKey::parse(" N "), Some(StepKey::Next));
        assert_eq!(StepKey::parse("p"), Some(StepKey::Prev));
        assert_eq!(StepKey::parse("quit"), Some(StepKey::Quit));
        assert_eq!(StepKey::parse("x"), None);
    }

    #[test]
    fn test_walk_to_the_end_finishes() {
        let mut c = cursor(2);
        assert_eq!(apply(&mut c, StepKey::Prev), CookState::Cooking);
        assert_eq!(c.index(), 0);
        assert_eq!(apply(&mut c, StepKey::Next), CookState::Cooking);
        assert_eq!(c.current().step_number, Some(2));
        assert_eq!(apply(&mut c, StepKey::Next), CookState::Finished);
    }

    #[test]
    fn test_quit_stops_in_place() {
        let mut c = cursor(3);
        apply(&mut c, StepKey::Next);
        assert_eq!(apply(&mut c, StepKey::Quit), CookState::Stopped);
        assert_eq!(c.index(), 1);
    }
}
