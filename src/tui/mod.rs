pub mod render;
pub mod state;

use crate::action::PendingCall;
use crate::api::Backend;
use crate::app::{App, Msg};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::HitMap;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Run the console until the user quits. Requests go to `backend` on
/// spawned tasks; `tick` drives toasts, effects and deferred follow-ups.
pub async fn run_tui(app: App, backend: Arc<dyn Backend>, tick: Duration) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, app, backend, tick).await;

    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: App,
    backend: Arc<dyn Backend>,
    tick: Duration,
) -> Result<()> {
    let (done_tx, mut done_rx) = mpsc::channel::<Msg>(64);
    let mut events = EventStream::new();
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    if let Some(action) = app.initial_load() {
        let backend = backend.clone();
        let tx = done_tx.clone();
        tokio::spawn(async move {
            let result = action.execute(backend.as_ref()).await;
            let _ = tx.send(Msg::Initial(result)).await;
        });
    }

    while !app.should_quit {
        let now = Instant::now();
        let mut hits = HitMap::default();
        terminal.draw(|f| hits = render::draw(f, &app, now))?;
        app.set_hits(hits);
        app.observe_scroll(now);

        let calls = tokio::select! {
            _ = interval.tick() => {
                app.tick(Instant::now());
                Vec::new()
            }
            Some(msg) = done_rx.recv() => {
                app.on_message(msg, Instant::now());
                Vec::new()
            }
            event = events.next() => match event {
                Some(Ok(event)) => app.on_event(event, Instant::now()),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "terminal event error");
                    Vec::new()
                }
                None => {
                    app.should_quit = true;
                    Vec::new()
                }
            },
        };

        for call in calls {
            spawn_call(call, backend.clone(), done_tx.clone());
        }
    }

    tracing::debug!(in_flight = app.dispatcher.in_flight(), "tui loop exiting");
    Ok(())
}

fn spawn_call(call: PendingCall, backend: Arc<dyn Backend>, tx: mpsc::Sender<Msg>) {
    tokio::spawn(async move {
        let result = call.action.execute(backend.as_ref()).await;
        if tx.send(Msg::Finished(call, result)).await.is_err() {
            tracing::debug!("completion dropped: loop already closed");
        }
    });
}
