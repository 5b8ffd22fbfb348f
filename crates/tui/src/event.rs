use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use log::{debug, error};
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::store;

/// How often the terminal listener wakes up, and so how often [`Event::Tick`] is sent
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// An event our app may receive
#[derive(Debug)]
pub enum Event {
    /// Key press.
    Key(KeyEvent),

    /// Mouse click/scroll.
    Mouse(MouseEvent),

    /// Terminal resize.
    Resize(u16, u16),

    /// Sent regularly when nothing else is happening, for timers.
    Tick,

    /// A result from the store worker.
    Store(store::Event),
}

/// The event bus aggregates events from multiple threads into one channel for the UI thread.
/// Threads are told to stop and joined when it's dropped.
#[derive(Debug)]
pub struct EventBus {
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
    running: Arc<AtomicBool>,
    handles: RefCell<Vec<thread::JoinHandle<()>>>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(true)),
            handles: Default::default(),
        }
    }

    /// Receive the next event, blocking until there is one.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }

    /// Spawn a new thread that can publish to this event bus
    pub fn spawn<F>(&self, name: impl ToString, f: F) -> Result<()>
    where
        F: 'static + Send + FnOnce(Arc<AtomicBool>, Sender<Event>),
    {
        let sender = self.sender.clone();
        let running = self.running.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || f(running, sender))
            .context("error spawning thread")?;
        self.handles.borrow_mut().push(handle);

        Ok(())
    }

    /// Spawn a thread to publish terminal events and ticks to this bus
    pub fn spawn_terminal_listener(&self) -> Result<()> {
        self.spawn("terminal_events", Self::terminal_events)
    }

    fn terminal_events(running: Arc<AtomicBool>, sender: Sender<Event>) {
        while running.load(Ordering::Relaxed) {
            let event = match event::poll(TICK_RATE) {
                Ok(true) => match event::read() {
                    Ok(CrosstermEvent::Key(e)) => Event::Key(e),
                    Ok(CrosstermEvent::Mouse(e)) => Event::Mouse(e),
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    Ok(_) => continue,
                    Err(e) => {
                        error!("unable to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => Event::Tick,
                Err(e) => {
                    error!("unable to poll for terminal events: {}", e);
                    break;
                }
            };

            if sender.send(event).is_err() {
                break;
            }
        }
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        self.handles.borrow_mut().drain(..).for_each(|h| {
            debug!("joining thread {:?}", h.thread().name());
            if h.join().is_err() {
                error!("thread panicked");
            }
        });
    }
}
