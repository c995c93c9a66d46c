use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use sync_logging::{sync_debug, sync_warn};
use tokio::task::JoinHandle;

use crate::{EngineEvent, SyncCommand, SyncDriver, SyncError, SyncOutcome, Vault};

/// Background executor for sync commands.
///
/// Commands are spawned in the order they are enqueued. Two commands for
/// different documents may run concurrently; the vault serialises writes to the
/// same document.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<SyncCommand>>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(vault: Arc<dyn Vault>, driver: SyncDriver) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("wordsync-engine")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<SyncCommand>();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::Builder::new()
            .name("wordsync-dispatch".into())
            .spawn(move || {
                let mut in_flight: Vec<JoinHandle<()>> = Vec::new();
                while let Ok(command) = cmd_rx.recv() {
                    in_flight.retain(|task| !task.is_finished());
                    let vault = vault.clone();
                    let driver = driver.clone();
                    let event_tx = event_tx.clone();
                    in_flight.push(runtime.spawn(async move {
                        let result = handle_command(&driver, vault.as_ref(), &command).await;
                        let _ = event_tx.send(EngineEvent::Completed { command, result });
                    }));
                }
                sync_debug!("Engine draining {} in-flight commands", in_flight.len());
                runtime.block_on(async {
                    for task in in_flight {
                        let _ = task.await;
                    }
                });
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            worker: Some(worker),
        })
    }

    /// Queues a command; dropped with a warning once the engine has shut down.
    pub fn enqueue(&self, command: SyncCommand) {
        let sent = self
            .cmd_tx
            .as_ref()
            .is_some_and(|tx| tx.send(command.clone()).is_ok());
        if !sent {
            sync_warn!("Engine stopped; dropping command for {}", command.document());
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops accepting commands and waits for in-flight ones to finish.
    pub fn shutdown(&mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                sync_warn!("Engine worker panicked during shutdown");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn handle_command(
    driver: &SyncDriver,
    vault: &dyn Vault,
    command: &SyncCommand,
) -> Result<SyncOutcome, SyncError> {
    match command {
        SyncCommand::Sync {
            document,
            property_name,
            trigger,
        } => driver.sync(vault, document, property_name, *trigger).await,
        SyncCommand::RemoveProperty {
            document,
            property_name,
        } => driver.remove_property(vault, document, property_name).await,
    }
}
