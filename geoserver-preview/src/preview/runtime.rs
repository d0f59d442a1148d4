// ABOUTME: Terminal event loop that drives the map preview state machine
// ABOUTME: Owns raw mode, the input thread, the spinner ticker, and spawned fetches

use super::fetcher::{spawn_fetch, spawn_metadata};
use super::{Effect, MapPreview, PreviewMessage, PreviewState, view};
use crate::constants::event_loop::{INPUT_POLL, MAILBOX_CAPACITY, SPINNER_TICK};
use crate::image_protocols::Protocol;
use anyhow::{Context, Result};
use crossterm::{
    cursor, event, execute, queue,
    style::Print,
    terminal::{self, ClearType},
};
use geoserver_sdk::GeoServerClient;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tokio::sync::mpsc;

/// Deletes every kitty graphics placement so a redraw doesn't stack images.
const KITTY_DELETE_ALL: &str = "\x1b_Ga=d,d=A\x1b\\";

/// Raw mode and the alternate screen for as long as the guard lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = Self;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .context("Failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Run the interactive preview until it closes or input ends.
pub async fn run(client: GeoServerClient, mut preview: MapPreview, use_color: bool) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let (tx, mut rx) = mpsc::channel(MAILBOX_CAPACITY);
    let shutdown = Arc::new(AtomicBool::new(false));

    let input = spawn_input_thread(tx.clone(), Arc::clone(&shutdown));
    let ticker = tokio::spawn(tick(tx.clone()));

    if preview.awaiting_metadata() {
        spawn_metadata(
            client.clone(),
            preview.workspace().to_string(),
            preview.layer().to_string(),
            tx.clone(),
        );
    }
    if let Some(Effect::Fetch(request)) = preview.start() {
        spawn_fetch(client.clone(), request, tx.clone());
    }

    let mut stdout = io::stdout();
    draw(&mut stdout, &preview, use_color)?;

    while let Some(msg) = rx.recv().await {
        let is_tick = matches!(msg, PreviewMessage::Tick);

        // Rendering may wait on a helper process
        let effect = tokio::task::block_in_place(|| preview.update(msg));

        match effect {
            Some(Effect::Fetch(request)) => {
                spawn_fetch(client.clone(), request, tx.clone());
            }
            Some(Effect::Close) => break,
            None => {}
        }

        if !is_tick || preview.state() == &PreviewState::Loading {
            draw(&mut stdout, &preview, use_color)?;
        }
    }

    shutdown.store(true, Ordering::SeqCst);
    ticker.abort();
    // Unblocks an input thread waiting on a full mailbox
    drop(rx);
    if input.join().is_err() {
        log::warn!("Input thread panicked");
    }

    Ok(())
}

fn draw(stdout: &mut io::Stdout, preview: &MapPreview, use_color: bool) -> Result<()> {
    if preview.protocol() == Protocol::Native {
        queue!(stdout, Print(KITTY_DELETE_ALL))?;
    }

    let screen = view::render(preview, use_color).replace('\n', "\r\n");
    queue!(
        stdout,
        cursor::MoveTo(0, 0),
        terminal::Clear(ClearType::All),
        Print(screen)
    )?;
    stdout.flush()?;
    Ok(())
}

async fn tick(tx: mpsc::Sender<PreviewMessage>) {
    let mut interval = tokio::time::interval(SPINNER_TICK);
    loop {
        interval.tick().await;
        if tx.send(PreviewMessage::Tick).await.is_err() {
            break;
        }
    }
}

/// crossterm reads block, so input lives on a plain thread that polls with a
/// timeout and checks `shutdown` between polls.
fn spawn_input_thread(
    tx: mpsc::Sender<PreviewMessage>,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while !shutdown.load(Ordering::SeqCst) {
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    log::error!("Terminal input failed: {}", e);
                    let _ = tx.blocking_send(PreviewMessage::InputClosed);
                    break;
                }
            }

            let msg = match event::read() {
                Ok(event::Event::Key(key)) => PreviewMessage::Key(key),
                Ok(event::Event::Resize(cols, rows)) => PreviewMessage::Resize { cols, rows },
                Ok(_) => continue,
                Err(e) => {
                    log::error!("Terminal input failed: {}", e);
                    let _ = tx.blocking_send(PreviewMessage::InputClosed);
                    break;
                }
            };

            if tx.blocking_send(msg).is_err() {
                break;
            }
        }
    })
}
