//! OS cursor backend on top of `enigo`.
//!
//! The `Enigo` handle is not `Send` on every platform, so it lives on a
//! dedicated thread and the sink talks to it over a rendezvous channel: each
//! call waits for the worker, so a slow backend slows the frame loop instead
//! of building a backlog.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use log::warn;
use refurboard_core::PixelCoordinate;

use crate::sink::{PointerSink, SinkError};

enum Command {
    Move(i32, i32),
    Button(Direction, i32, i32),
}

/// Moves the real cursor. Each call blocks until the worker takes it;
/// backend failures are logged on the worker thread.
#[derive(Debug)]
pub struct EnigoSink {
    tx: SyncSender<Command>,
}

fn command_channel() -> (SyncSender<Command>, Receiver<Command>) {
    mpsc::sync_channel(0)
}

fn to_screen(p: PixelCoordinate) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

impl EnigoSink {
    /// Start the worker and connect to the platform input backend.
    pub fn spawn() -> Result<Self, SinkError> {
        let (tx, rx) = command_channel();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SinkError>>();

        thread::Builder::new()
            .name("refurboard-enigo".into())
            .spawn(move || {
                let mut enigo = match Enigo::new(&Settings::default()) {
                    Ok(enigo) => {
                        let _ = ready_tx.send(Ok(()));
                        enigo
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(SinkError::Unavailable(err.to_string())));
                        return;
                    }
                };
                for cmd in rx {
                    let res = match cmd {
                        Command::Move(x, y) => enigo.move_mouse(x, y, Coordinate::Abs),
                        Command::Button(dir, x, y) => enigo
                            .move_mouse(x, y, Coordinate::Abs)
                            .and_then(|_| enigo.button(Button::Left, dir)),
                    };
                    if let Err(err) = res {
                        warn!("enigo input failed: {err}");
                    }
                }
            })
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| SinkError::Unavailable("enigo worker exited during start-up".into()))??;
        Ok(Self { tx })
    }

    fn send(&self, cmd: Command) -> Result<(), SinkError> {
        self.tx
            .send(cmd)
            .map_err(|_| SinkError::Backend("enigo worker is gone".into()))
    }
}

impl PointerSink for EnigoSink {
    fn move_to(&self, target: PixelCoordinate) -> Result<(), SinkError> {
        let (x, y) = to_screen(target);
        self.send(Command::Move(x, y))
    }

    fn press(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        let (x, y) = to_screen(at);
        self.send(Command::Button(Direction::Press, x, y))
    }

    fn release(&self, at: PixelCoordinate) -> Result<(), SinkError> {
        let (x, y) = to_screen(at);
        self.send(Command::Button(Direction::Release, x, y))
    }

    fn name(&self) -> &'static str {
        "enigo"
    }
}
