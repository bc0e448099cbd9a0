/*!
A link between a channel and some external search device.

A link is made by [accelerator_link], which returns:
- An [AcceleratorLink], which is given to a channel as a [SyncBackend].
- An [AcceleratorHandle], which is given to the device.

Everything passed over a link is passed through bounded [crossbeam] channels, without blocking.
So, if the device is slow to read, long clauses and trail snapshots offered to the device are dropped, and if the engine is slow to synchronise, clauses and assignments pushed by the device are refused.

Assignments pushed by the device are taken to be top-level facts, and clauses pushed by the device are taken to follow from the formula.

```rust
# use raft_sat::transport::{accelerator::accelerator_link, SyncBackend};
# use raft_sat::structures::literal::CLiteral;
let (mut link, mut device) = accelerator_link(8);

link.offer_long_clause(&[CLiteral::from(1), CLiteral::from(2), CLiteral::from(-3)]);
assert_eq!(device.pull_clauses().len(), 1);

device.push_assignment(4, false).unwrap();
assert_eq!(link.import().unwrap().units, vec![(4, false)]);
```
*/

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use crate::{
    misc::log::targets::{self},
    structures::{atom::Atom, literal::CLiteral},
    transport::{Exchange, SyncBackend},
    types::err::TransportError,
};

/// Messages to the device.
#[derive(Clone, Debug)]
enum ToDevice {
    Clause(Vec<CLiteral>),
    Trail(Vec<CLiteral>),
}

/// Messages from the device.
#[derive(Clone, Debug)]
enum FromDevice {
    Clause(Vec<CLiteral>),
    Assignment(Atom, bool),
}

/// Makes a link, with room for `capacity` messages in each direction.
pub fn accelerator_link(capacity: usize) -> (AcceleratorLink, AcceleratorHandle) {
    let (to_device_tx, to_device_rx) = bounded(capacity);
    let (from_device_tx, from_device_rx) = bounded(capacity);

    let link = AcceleratorLink {
        to_device: to_device_tx,
        from_device: from_device_rx,
        dropped: 0,
    };

    let handle = AcceleratorHandle {
        to_host: from_device_tx,
        from_host: to_device_rx,
        clauses: Vec::default(),
        trail: None,
    };

    (link, handle)
}

/// The end of a link held by a channel.
pub struct AcceleratorLink {
    to_device: Sender<ToDevice>,
    from_device: Receiver<FromDevice>,
    dropped: usize,
}

impl AcceleratorLink {
    /// A count of messages to the device dropped as the link was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn offer(&mut self, message: ToDevice) -> Result<(), TransportError> {
        match self.to_device.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                Err(TransportError::Full)
            }
            Err(TrySendError::Disconnected(_)) => Err(TransportError::Disconnected),
        }
    }
}

impl SyncBackend for AcceleratorLink {
    fn export(&mut self, exchange: &Exchange) -> Result<(), TransportError> {
        for binary in &exchange.binaries {
            self.offer(ToDevice::Clause(binary.literals().to_vec()))?;
        }
        Ok(())
    }

    fn import(&mut self) -> Result<Exchange, TransportError> {
        let mut exchange = Exchange::default();
        loop {
            match self.from_device.try_recv() {
                Ok(FromDevice::Clause(clause)) => exchange.clauses.push(clause),
                Ok(FromDevice::Assignment(atom, value)) => exchange.units.push((atom, value)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => match exchange.is_empty() {
                    true => return Err(TransportError::Disconnected),
                    false => break,
                },
            }
        }
        Ok(exchange)
    }

    fn offer_long_clause(&mut self, clause: &[CLiteral]) {
        if let Err(e) = self.offer(ToDevice::Clause(clause.to_vec())) {
            log::trace!(target: targets::TRANSPORT, "Long clause not offered: {e:?}");
        }
    }

    fn offer_trail(&mut self, trail: &[CLiteral]) {
        if let Err(e) = self.offer(ToDevice::Trail(trail.to_vec())) {
            log::trace!(target: targets::TRANSPORT, "Trail not offered: {e:?}");
        }
    }
}

/// The end of a link held by a device.
pub struct AcceleratorHandle {
    to_host: Sender<FromDevice>,
    from_host: Receiver<ToDevice>,
    clauses: Vec<Vec<CLiteral>>,
    trail: Option<Vec<CLiteral>>,
}

impl AcceleratorHandle {
    fn push(&self, message: FromDevice) -> Result<(), TransportError> {
        match self.to_host.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(TransportError::Full),
            Err(TrySendError::Disconnected(_)) => Err(TransportError::Disconnected),
        }
    }

    /// Offers a clause to the engine, which must follow from the formula.
    pub fn push_clause(&self, clause: Vec<CLiteral>) -> Result<(), TransportError> {
        self.push(FromDevice::Clause(clause))
    }

    /// Offers a top-level fact to the engine.
    pub fn push_assignment(&self, atom: Atom, value: bool) -> Result<(), TransportError> {
        self.push(FromDevice::Assignment(atom, value))
    }

    fn drain(&mut self) {
        while let Ok(message) = self.from_host.try_recv() {
            match message {
                ToDevice::Clause(clause) => self.clauses.push(clause),
                ToDevice::Trail(trail) => self.trail = Some(trail),
            }
        }
    }

    /// Takes every clause offered by the engine so far.
    pub fn pull_clauses(&mut self) -> Vec<Vec<CLiteral>> {
        self.drain();
        std::mem::take(&mut self.clauses)
    }

    /// The most recent snapshot of the top-level trail offered by the engine, if any.
    pub fn latest_trail(&mut self) -> Option<Vec<CLiteral>> {
        self.drain();
        self.trail.clone()
    }
}
