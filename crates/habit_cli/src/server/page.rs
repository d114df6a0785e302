use habit_core::{DayStatus, HabitSnapshot};
use std::fmt::Write;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; background: #fafafa; }
.habit { margin-bottom: 1.5rem; padding: 1rem; background: #fff; border-radius: 6px; }
.stats { color: #555; font-size: 0.9rem; }
.timeline { display: grid; grid-template-columns: repeat(50, 10px); gap: 2px; margin-top: 0.5rem; }
.day { width: 10px; height: 10px; border-radius: 2px; }
.future { background: #eee; }
.complete { background: #2e9e4f; }
.inProgress { background: #f2c14e; }
.incomplete { background: #d9534f; }
";

/// Renders the habit list as a standalone HTML page.
pub fn render_index(habits: &[HabitSnapshot]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Habits</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<h1>Habits</h1>\n");

    if habits.is_empty() {
        html.push_str("<p class=\"empty\">No habits yet.</p>\n");
    }

    for habit in habits {
        let name = escape_html(&habit.name);
        let _ = writeln!(html, "<section class=\"habit\" data-id=\"{name}\">");
        let _ = writeln!(
            html,
            "<h2>{name} <small>{} / {}</small></h2>",
            habit.current, habit.target
        );
        let _ = writeln!(
            html,
            "<p class=\"stats\">streak {} &middot; 3 days {} &middot; 7 days {} &middot; all time {}</p>",
            habit.streak, habit.actions_last3_days, habit.actions_last7_days, habit.actions_all_time
        );
        html.push_str("<div class=\"timeline\">\n");
        for day in &habit.history100 {
            let _ = writeln!(
                html,
                "<div class=\"day {}\" title=\"{}: {}\"></div>",
                status_class(day.status),
                day.date,
                day.count
            );
        }
        html.push_str("</div>\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn status_class(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Future => "future",
        DayStatus::Complete => "complete",
        DayStatus::InProgress => "inProgress",
        DayStatus::Incomplete => "incomplete",
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
