//! Terminal rendering: status lines and two-column tables.

use weather_core::WeatherError;

pub const BRIGHT: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const RED: &str = "\x1b[31m";
pub const MAGENTA: &str = "\x1b[35m";

pub fn print_on_success(message: &str) {
    println!("{BRIGHT}{GREEN}{:<12}{RESET}{message}", "[  OK  ]");
}

pub fn print_on_warning(message: &str) {
    println!("{YELLOW}{:<12}{RESET}{message}", "[ WARNING ]");
}

pub fn print_on_error(message: &str) {
    eprintln!("{BRIGHT}{RED}{:<12}{RESET}{message}", "[ ERROR ]");
}

/// Print `rows` under two column titles, aligning the value column.
pub fn print_table(title_left: &str, title_right: &str, rows: &[(&str, String)]) {
    let width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .chain(std::iter::once(title_left.len()))
        .max()
        .unwrap_or_default()
        + 4;

    println!();
    println!("{BRIGHT}{GREEN}{title_left:<width$}{title_right}{RESET}");
    println!("{:<width$}{}", "-".repeat(title_left.len()), "-".repeat(title_right.len()));
    for (key, value) in rows {
        println!("{key:<width$}{value}");
    }
    println!();
}

/// User-facing message for a failed command.
pub fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<WeatherError>() {
        Some(WeatherError::Authorization(_)) => {
            "Unauthorized access: OpenWeather denied servicing your request.".to_string()
        }
        Some(WeatherError::Network(_)) => {
            "Could not reach OpenWeather. Check your network connection.".to_string()
        }
        Some(WeatherError::Api { status, .. }) => {
            format!("OpenWeather could not service your request (status {status}).")
        }
        Some(WeatherError::Parse(_)) => {
            "OpenWeather sent a response this tool does not understand.".to_string()
        }
        Some(known) => capitalize(&known.to_string()),
        None => format!("{err:#}"),
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
