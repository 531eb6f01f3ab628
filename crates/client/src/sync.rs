//! The revision-tracking sync loop.
//!
//! [`SyncClient`] owns the merge mirrors and a [`ViewBinding`], and runs a
//! single long-poll cycle forever: request everything past the revision on
//! screen, wait for the server to answer, merge, repeat. A [`SyncHandle`]
//! feeds commands into the loop from outside; nothing else touches the
//! mirrors, so every binding call happens from the loop's own task.

#[cfg(test)]
#[path = "tests/sync.rs"]
mod tests;

use core::fmt::{self, Formatter};
use std::pin::pin;

use disview_merge::{AreaTree, RowTable, ViewBinding};
use disview_primitives::addr::{Addr, AddressRange};
use disview_primitives::changeset::{Changeset, Revision};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::events::{SyncEvent, SyncPhase};
use crate::feed::{ChangesetRequest, ChangesetSource};

#[derive(Debug)]
enum Command {
    Reload { window: Option<AddressRange> },
    LineSelected { addr: Addr },
    Stop,
}

/// What ended one wait on the long poll.
enum Step {
    Response(Result<Changeset, SyncError>),
    Reload { window: Option<AddressRange> },
    Stop,
}

/// Request generation counter.
///
/// Every issued request gets the next sequence number; a response is merged
/// only if its number is still the latest one handed out. Invalidation
/// bumps the counter without issuing, outdating whatever is in flight.
#[derive(Debug, Default)]
struct Sequencer {
    current: u64,
}

impl Sequencer {
    fn next(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    const fn is_current(&self, seq: u64) -> bool {
        self.current == seq
    }

    fn invalidate(&mut self) {
        self.current += 1;
    }
}

/// Control handle for a running [`SyncClient`].
///
/// Cheap to clone; all methods are fire-and-forget sends onto the loop's
/// command channel. Dropping every handle ends the loop.
#[derive(Clone, Debug)]
pub struct SyncHandle {
    commands: mpsc::UnboundedSender<Command>,
    phase: watch::Receiver<SyncPhase>,
}

impl SyncHandle {
    /// Discards the mirror and restarts from a revision-zero snapshot,
    /// optionally moving to a new address window.
    pub fn reload(&self, window: Option<AddressRange>) {
        let _ignored = self.commands.send(Command::Reload { window });
    }

    /// Reports a line selection; the loop forwards it on the event stream.
    pub fn line_selected(&self, addr: Addr) {
        let _ignored = self.commands.send(Command::LineSelected { addr });
    }

    /// Asks the loop to exit after its current wait.
    pub fn stop(&self) {
        let _ignored = self.commands.send(Command::Stop);
    }

    /// The most recently published phase.
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }
}

/// Owner of the synchronized view state.
///
/// Construction wires up the command and event channels and seeds the area
/// mirror with the binding's root list. The client starts with its reload
/// latch set, so the first request always asks for a full snapshot.
pub struct SyncClient<F, V: ViewBinding> {
    config: SyncConfig,
    feed: F,
    binding: V,
    rows: RowTable<V>,
    areas: AreaTree<V>,
    rev: Revision,
    reload: bool,
    window: AddressRange,
    sequencer: Sequencer,
    commands: mpsc::UnboundedReceiver<Command>,
    phase: watch::Sender<SyncPhase>,
    events: mpsc::UnboundedSender<SyncEvent>,
}

impl<F, V> SyncClient<F, V>
where
    F: ChangesetSource,
    V: ViewBinding,
{
    /// Builds a client plus its control handle and event stream.
    pub fn new(
        config: SyncConfig,
        feed: F,
        mut binding: V,
    ) -> (Self, SyncHandle, mpsc::UnboundedReceiver<SyncEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (phase_tx, phase_rx) = watch::channel(SyncPhase::Idle);

        let areas = AreaTree::new(binding.root_list());
        let window = config.window;

        let client = Self {
            config,
            feed,
            binding,
            rows: RowTable::new(),
            areas,
            rev: Revision::ZERO,
            reload: true,
            window,
            sequencer: Sequencer::default(),
            commands: command_rx,
            phase: phase_tx,
            events: event_tx,
        };

        let handle = SyncHandle {
            commands: command_tx,
            phase: phase_rx,
        };

        (client, handle, event_rx)
    }

    /// Runs the sync loop until stopped or abandoned.
    ///
    /// Each cycle drains pending commands, issues one long-poll request and
    /// waits on it while still serving commands. A reload command drops the
    /// in-flight request on the floor; the sequencer outdates its response
    /// in case one was already racing back. After a failed cycle the loop
    /// parks on the command channel until a reload restarts it.
    pub async fn run(mut self) {
        info!(db = %self.config.db, window = %self.window, "sync loop started");

        loop {
            self.set_phase(SyncPhase::Idle);

            loop {
                match self.commands.try_recv() {
                    Ok(Command::Reload { window }) => self.begin_reload(window),
                    Ok(Command::LineSelected { addr }) => self.forward_selection(addr),
                    Ok(Command::Stop) | Err(TryRecvError::Disconnected) => return,
                    Err(TryRecvError::Empty) => break,
                }
            }

            let request = ChangesetRequest {
                db: self.config.db.clone(),
                minrev: self.next_minrev(),
                window: self.window,
            };
            let seq = self.sequencer.next();

            self.set_phase(SyncPhase::AwaitingResponse);
            debug!(minrev = %request.minrev, seq, "issuing long poll");

            let step = {
                let mut fetch = pin!(self.feed.fetch(&request));

                loop {
                    tokio::select! {
                        result = &mut fetch => break Step::Response(result),
                        command = self.commands.recv() => match command {
                            Some(Command::Reload { window }) => break Step::Reload { window },
                            Some(Command::LineSelected { addr }) => {
                                let _ignored =
                                    self.events.send(SyncEvent::LineSelected { addr });
                            }
                            Some(Command::Stop) | None => break Step::Stop,
                        },
                    }
                }
            };

            match step {
                Step::Response(result) => {
                    let merged = self.on_response(seq, result);

                    if !merged && !self.park().await {
                        return;
                    }
                }
                Step::Reload { window } => self.begin_reload(window),
                Step::Stop => return,
            }
        }
    }

    /// Handles one completed fetch. Returns `false` when the loop should
    /// park instead of polling again.
    fn on_response(&mut self, seq: u64, result: Result<Changeset, SyncError>) -> bool {
        if !self.sequencer.is_current(seq) {
            warn!(
                seq,
                current = self.sequencer.current,
                "discarding response to an abandoned request"
            );
            return true;
        }

        match result {
            Ok(changeset) => {
                self.set_phase(SyncPhase::Applying);
                self.apply(changeset);
                true
            }
            Err(error) => {
                error!(%error, "sync cycle failed");
                self.set_phase(SyncPhase::Failed);
                let _ignored = self.events.send(SyncEvent::Failed { error });
                false
            }
        }
    }

    /// Merges one decoded changeset into the mirrors.
    fn apply(&mut self, changeset: Changeset) {
        let Changeset { rev, areas, lines } = changeset;

        if self.reload {
            debug!("tearing down mirror for full reload");
            self.rows.clear(&mut self.binding);
            self.areas.clear(&mut self.binding);
            self.reload = false;
        }

        if let Some(updates) = areas {
            self.areas.apply(&mut self.binding, updates);
        }
        if let Some(updates) = lines {
            self.rows.apply(&mut self.binding, updates);
        }

        if rev < self.rev {
            warn!(%rev, current = %self.rev, "feed revision went backwards");
        }
        self.rev = rev;

        info!(
            %rev,
            rows = self.rows.len(),
            areas = self.areas.len(),
            "changeset applied"
        );

        let _ignored = self.events.send(SyncEvent::Applied { rev });
    }

    /// Waits out a failure. Returns `false` when the loop should exit.
    async fn park(&mut self) -> bool {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Reload { window } => {
                    self.begin_reload(window);
                    return true;
                }
                Command::LineSelected { addr } => self.forward_selection(addr),
                Command::Stop => return false,
            }
        }

        false
    }

    fn begin_reload(&mut self, window: Option<AddressRange>) {
        info!(window = ?window, "full reload requested");

        self.reload = true;
        if let Some(window) = window {
            self.window = window;
        }
        self.sequencer.invalidate();
    }

    const fn next_minrev(&self) -> Revision {
        if self.reload {
            Revision::ZERO
        } else {
            self.rev.next()
        }
    }

    fn forward_selection(&mut self, addr: Addr) {
        let _ignored = self.events.send(SyncEvent::LineSelected { addr });
    }

    fn set_phase(&self, phase: SyncPhase) {
        let _previous = self.phase.send_replace(phase);
    }
}

impl<F, V: ViewBinding> fmt::Debug for SyncClient<F, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient")
            .field("db", &self.config.db)
            .field("rev", &self.rev)
            .field("window", &self.window)
            .field("reload", &self.reload)
            .finish_non_exhaustive()
    }
}
