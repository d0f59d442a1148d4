// ABOUTME: Text layout for the interactive preview screen
// ABOUTME: Title bar, control bar, protocol, status line, then the rendered frame

use super::{MapPreview, PreviewState};
use owo_colors::OwoColorize;
use std::fmt::Write;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Lines are separated by `\n`; the runtime translates for raw mode.
pub fn render(preview: &MapPreview, use_color: bool) -> String {
    let mut out = String::new();
    if preview.is_closed() {
        return out;
    }

    let title = format!(" Layer Preview: {} ", preview.qualified_layer());
    if use_color {
        let _ = writeln!(out, "{}", title.bold().reversed());
    } else {
        let _ = writeln!(out, "{}", title);
    }
    out.push('\n');

    let _ = writeln!(out, "{}", control_bar(preview, use_color));
    let protocol = format!("Protocol: {}", preview.protocol());
    if use_color {
        let _ = writeln!(out, "{}", protocol.dimmed());
    } else {
        let _ = writeln!(out, "{}", protocol);
    }
    out.push('\n');

    match preview.state() {
        PreviewState::Error(message) => {
            let line = format!("Error: {}", message);
            if use_color {
                let _ = writeln!(out, "{}", line.red());
            } else {
                let _ = writeln!(out, "{}", line);
            }
        }
        PreviewState::Loading => {
            let spinner = SPINNER[preview.spinner_frame() % SPINNER.len()];
            let _ = writeln!(out, "{} Loading map...", spinner);
        }
        PreviewState::Ready => {
            if let Some(frame) = preview.frame() {
                out.push_str(frame);
            }
        }
        PreviewState::Closed => {}
    }

    out
}

fn control_bar(preview: &MapPreview, use_color: bool) -> String {
    let key = |k: &str| -> String {
        if use_color {
            k.cyan().bold().to_string()
        } else {
            k.to_string()
        }
    };

    let style = preview.styles().current().unwrap_or("default");
    let bar = format!(
        "Zoom: {} {:.1} {}  │  Pan: {} {} {} {}  │  Style: {}  │  {} refresh  {} close",
        key("-"),
        preview.viewport().zoom(),
        key("+"),
        key("←"),
        key("↑"),
        key("↓"),
        key("→"),
        style,
        key("r"),
        key("esc"),
    );

    if use_color { bar.dimmed().to_string() } else { bar }
}
