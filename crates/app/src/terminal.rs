//! Line-oriented rendering and input parsing for the terminal quiz.

use std::fmt::Write as _;

use quiz_core::model::{QuestionKind, QuizResult};
use services::{PoolState, SessionPhase, SessionSnapshot};
use storage::repository::ResultRow;

/// One line of user input, interpreted for the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start,
    Select(usize),
    Text(String),
    Next,
    Previous,
    Finish,
    Restart,
    Home,
    Help,
    Quit,
    Ignored,
}

/// Parses a line. Commands start with `:` so text answers can be anything else.
///
/// On choice questions a bare number selects (or toggles) the 1-based option.
#[must_use]
pub fn parse_input(line: &str, phase: SessionPhase, kind: Option<QuestionKind>) -> Input {
    let trimmed = line.trim();
    if let Some(command) = trimmed.strip_prefix(':') {
        return match command.trim() {
            "s" | "start" => Input::Start,
            "n" | "next" => Input::Next,
            "p" | "prev" => Input::Previous,
            "f" | "finish" => Input::Finish,
            "r" | "restart" => Input::Restart,
            "h" | "home" => Input::Home,
            "?" | "help" => Input::Help,
            "q" | "quit" => Input::Quit,
            _ => Input::Ignored,
        };
    }

    match (phase, kind) {
        (SessionPhase::InProgress, Some(QuestionKind::Single | QuestionKind::Multiple)) => trimmed
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map_or(Input::Ignored, Input::Select),
        (SessionPhase::InProgress, Some(QuestionKind::Text)) => Input::Text(line.to_owned()),
        _ => Input::Ignored,
    }
}

/// Formats seconds as `MM:SS`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[must_use]
pub fn render_timer(snapshot: &SessionSnapshot) -> String {
    let clock = format_clock(snapshot.time_remaining);
    if snapshot.is_low_time {
        format!("[{clock}] hurry up!")
    } else {
        format!("[{clock}]")
    }
}

#[must_use]
pub fn render_home(pool: &PoolState, last: Option<&ResultRow>) -> String {
    let mut out = String::from("=== Quiz ===\n");
    match pool {
        PoolState::Loading => out.push_str("Loading questions...\n"),
        PoolState::Failed(reason) => {
            let _ = writeln!(out, "Could not load questions: {reason}");
        }
        PoolState::Ready(pool) => {
            let _ = writeln!(out, "{} questions available.", pool.len());
        }
    }
    if let Some(row) = last {
        let record = &row.record;
        let _ = writeln!(
            out,
            "Last result: {} points, {}/{} correct ({})",
            record.score,
            record.correct_count,
            record.question_count(),
            record.completed_at.format("%Y-%m-%d %H:%M"),
        );
    }
    out.push_str("Type :start to begin, :quit to exit.");
    out
}

#[must_use]
pub fn render_question(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let Some(question) = &snapshot.question else {
        return out;
    };

    let _ = writeln!(
        out,
        "\nQuestion {}/{}  ({} pts)  {}",
        snapshot.progress.display_number(),
        snapshot.progress.total,
        question.points,
        render_timer(snapshot),
    );
    let _ = writeln!(out, "{}", question.prompt);
    match question.kind {
        QuestionKind::Single | QuestionKind::Multiple => {
            for option in &question.options {
                let mark = match (question.kind, option.selected) {
                    (QuestionKind::Multiple, true) => "[x]",
                    (QuestionKind::Multiple, false) => "[ ]",
                    (_, true) => "(*)",
                    (_, false) => "( )",
                };
                let _ = writeln!(out, "  {} {} {}", option.index + 1, mark, option.text);
            }
            if question.kind == QuestionKind::Multiple {
                out.push_str("Numbers toggle options.\n");
            }
        }
        QuestionKind::Text => {
            if let Some(text) = &question.text {
                let _ = writeln!(out, "  your answer: {text}");
            }
            out.push_str("Type your answer.\n");
        }
    }
    out.push_str(":prev  :next  :finish");
    out
}

#[must_use]
pub fn render_result(result: &QuizResult) -> String {
    let mut out = String::from("\n=== Results ===\n");
    let _ = writeln!(
        out,
        "Score: {}/{}  Correct: {}  Incorrect: {}",
        result.total_score(),
        result.max_score(),
        result.correct_count(),
        result.incorrect_count(),
    );
    for item in result.review() {
        let verdict = if item.is_correct { "correct" } else { "wrong" };
        let _ = writeln!(
            out,
            "{}. {} [{verdict}, {} pts]",
            item.position + 1,
            item.question.prompt(),
            item.awarded_points,
        );
        let answer = item.user_answer_text().unwrap_or_else(|| "no answer".to_owned());
        let _ = writeln!(out, "   your answer: {answer}");
        if let Some(correction) = item.correction() {
            let _ = writeln!(out, "   correct answer: {correction}");
        }
        if let Some(explanation) = item.explanation() {
            let _ = writeln!(out, "   {explanation}");
        }
    }
    out.push_str(":restart  :home  :quit");
    out
}

#[must_use]
pub fn help() -> &'static str {
    "Commands: :start :next :prev :finish :restart :home :quit\n\
     Choice questions: type an option number. Text questions: type the answer."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(30), "00:30");
        assert_eq!(format_clock(125), "02:05");
    }

    #[test]
    fn commands_need_a_colon() {
        let phase = SessionPhase::InProgress;
        assert_eq!(parse_input(":n", phase, Some(QuestionKind::Text)), Input::Next);
        assert_eq!(parse_input(" :finish ", phase, None), Input::Finish);
        assert_eq!(
            parse_input("next", phase, Some(QuestionKind::Text)),
            Input::Text("next".into())
        );
        assert_eq!(parse_input(":bogus", phase, None), Input::Ignored);
    }

    #[test]
    fn numbers_select_one_based_options() {
        let phase = SessionPhase::InProgress;
        assert_eq!(
            parse_input("2", phase, Some(QuestionKind::Single)),
            Input::Select(1)
        );
        assert_eq!(parse_input("0", phase, Some(QuestionKind::Multiple)), Input::Ignored);
        assert_eq!(parse_input("x", phase, Some(QuestionKind::Single)), Input::Ignored);
        assert_eq!(
            parse_input("2", SessionPhase::Finished, Some(QuestionKind::Single)),
            Input::Ignored
        );
    }

    #[test]
    fn home_reports_failed_pool() {
        let home = render_home(&PoolState::Failed("bad json".into()), None);
        assert!(home.contains("Could not load questions: bad json"));
    }
}
