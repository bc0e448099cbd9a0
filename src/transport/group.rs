/*!
A group of members exchanging facts by message.

A group of some size is formed by [SyncGroup::join], which returns one [GroupMember] for each rank of the group.
Each member has an inbox, and a sender to the inbox of each other member, all built from [crossbeam] channels.

As a [SyncBackend]:
- An export sends units and binary clauses to every other member.
- An import drains the inbox.
- A [finished](SyncBackend::finished) notice is sent to every other member, and a member which has received a finished notice requests an interrupt at the next exchange.
  The request is made once for each notice, so a later solve of the member runs to completion, unless another notice arrives.

When a member is dropped it sends a leave notice, and other members stop sending to it.

```rust
# use raft_sat::transport::{group::SyncGroup, Exchange, SyncBackend};
let mut members = SyncGroup::join(2);
let mut second = members.pop().unwrap();
let mut first = members.pop().unwrap();

let exchange = Exchange {
    units: vec![(1, true)],
    ..Default::default()
};
first.export(&exchange).unwrap();
assert_eq!(second.import().unwrap().units, vec![(1, true)]);
```
*/

use crossbeam::channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::{
    misc::log::targets::{self},
    reports::Report,
    structures::atom::Atom,
    sync::pool::SharedBinary,
    transport::{Exchange, SyncBackend},
    types::err::TransportError,
};

/// Messages passed between members of a group.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Units(Vec<(Atom, bool)>),
    Binaries(Vec<SharedBinary>),

    /// The sender has finished, with the given report.
    Finished(Report),

    /// The sender has left the group.
    Leave,
}

/// The entry point for forming a group.
pub struct SyncGroup;

impl SyncGroup {
    /// Forms a group of `size` members, returned in order of rank.
    pub fn join(size: usize) -> Vec<GroupMember> {
        let (senders, inboxes): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();

        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| GroupMember {
                rank,
                size,
                inbox,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(peer, sender)| (peer != rank).then(|| sender.clone()))
                    .collect(),
                remote_finish: None,
                finish_pending: false,
            })
            .collect()
    }
}

/// A member of a group.
pub struct GroupMember {
    rank: usize,
    size: usize,
    inbox: Receiver<(usize, Message)>,

    /// A sender to each other member still in the group, indexed by rank.
    peers: Vec<Option<Sender<(usize, Message)>>>,

    /// The latest finished notice received, if any.
    remote_finish: Option<(usize, Report)>,

    /// Whether a finished notice has been received and not yet acted on.
    finish_pending: bool,
}

impl GroupMember {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The rank and report of the latest other member known to have finished, if any.
    pub fn remote_finish(&self) -> Option<(usize, Report)> {
        self.remote_finish
    }

    /// A count of other members still in the group.
    pub fn peer_count(&self) -> usize {
        self.peers.iter().flatten().count()
    }

    /// Sends `message` to each other member, dropping any member which has gone away.
    fn broadcast(&mut self, message: Message) -> Result<(), TransportError> {
        let mut lost = false;
        for peer in self.peers.iter_mut() {
            if let Some(sender) = peer {
                if sender.send((self.rank, message.clone())).is_err() {
                    *peer = None;
                    lost = true;
                }
            }
        }

        match lost {
            true => Err(TransportError::Disconnected),
            false => Ok(()),
        }
    }
}

impl SyncBackend for GroupMember {
    fn export(&mut self, exchange: &Exchange) -> Result<(), TransportError> {
        let mut result = Ok(());
        if !exchange.units.is_empty() {
            result = result.and(self.broadcast(Message::Units(exchange.units.clone())));
        }
        if !exchange.binaries.is_empty() {
            result = result.and(self.broadcast(Message::Binaries(exchange.binaries.clone())));
        }
        result
    }

    fn import(&mut self) -> Result<Exchange, TransportError> {
        let mut exchange = Exchange::default();

        loop {
            match self.inbox.try_recv() {
                Ok((_, Message::Units(units))) => exchange.units.extend(units),

                Ok((_, Message::Binaries(binaries))) => exchange.binaries.extend(binaries),

                Ok((from, Message::Finished(report))) => {
                    log::info!(target: targets::TRANSPORT, "Member {} heard {from} finished: {report}", self.rank);
                    self.remote_finish = Some((from, report));
                    self.finish_pending = true;
                }

                Ok((from, Message::Leave)) => {
                    log::debug!(target: targets::TRANSPORT, "Member {from} left the group of {}", self.rank);
                    if let Some(peer) = self.peers.get_mut(from) {
                        *peer = None;
                    }
                }

                Err(TryRecvError::Empty) => break,

                // Every other member has left.
                Err(TryRecvError::Disconnected) => match exchange.is_empty() {
                    true => return Err(TransportError::Disconnected),
                    false => break,
                },
            }
        }

        Ok(exchange)
    }

    /// A finished notice interrupts a single solve.
    fn interrupt_requested(&mut self) -> bool {
        std::mem::take(&mut self.finish_pending)
    }

    fn finished(&mut self, report: Report) {
        self.finish_pending = false;
        if let Err(e) = self.broadcast(Message::Finished(report)) {
            log::warn!(target: targets::TRANSPORT, "Finish notice from {} incomplete: {e:?}", self.rank);
        }
    }
}

impl Drop for GroupMember {
    fn drop(&mut self) {
        let _ = self.broadcast(Message::Leave);
    }
}
