use log::{error, info};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    UserInt,
}

/// Terminator broadcasts the reason the application has to stop to every main loop
#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    pub fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    pub fn terminate(&mut self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }
}

async fn terminate_by_os_signal(mut terminator: Terminator) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("could not listen for the interrupt signal: {err}");
        return;
    }

    info!("received interrupt signal");

    if let Err(err) = terminator.terminate(Interrupted::OsSigInt) {
        error!("failed to broadcast the interrupt signal: {err}");
    }
}

// create a broadcast channel for retrieving the application kill signal
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    tokio::spawn(terminate_by_os_signal(terminator.clone()));

    (terminator, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_receiver_sees_the_interrupt() {
        let (mut terminator, mut first_rx) = create_termination();
        let mut second_rx = first_rx.resubscribe();

        terminator.terminate(Interrupted::UserInt).unwrap();

        assert_eq!(first_rx.recv().await.unwrap(), Interrupted::UserInt);
        assert_eq!(second_rx.recv().await.unwrap(), Interrupted::UserInt);
    }
}
