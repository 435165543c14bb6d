//! In-process broker and feed client.
//!
//! # Responsibility
//! - Route JSON feed frames between clients joined to the same channel.
//! - Simulate broker outages so reconnect paths can be exercised.
//!
//! # Invariants
//! - Frames are delivered to each subscriber in publish order.
//! - `publish` never echoes a frame back to the publishing client.
//! - Taking the broker offline drops every subscription.
//! - Frames already queued for a client survive a disconnect and are
//!   drained before the disconnect is reported.

use crate::feed::client::{FeedClient, FeedError, FeedResult};
use crate::feed::frame::FeedFrame;
use crate::model::message::Message;
use log::{debug, info};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};

type ClientId = u64;

struct Subscription {
    client_id: ClientId,
    channel: String,
    sender: Sender<String>,
}

#[derive(Default)]
struct BrokerState {
    offline: bool,
    next_client_id: ClientId,
    subscriptions: Vec<Subscription>,
}

impl BrokerState {
    fn unsubscribe(&mut self, client_id: ClientId) {
        self.subscriptions
            .retain(|subscription| subscription.client_id != client_id);
    }

    /// Sends `raw` to every live subscriber of `channel`, pruning dead ones.
    fn fan_out(&mut self, channel: &str, raw: &str, except: Option<ClientId>) -> usize {
        let mut delivered = 0;
        self.subscriptions.retain(|subscription| {
            if subscription.channel != channel || Some(subscription.client_id) == except {
                return true;
            }
            match subscription.sender.send(raw.to_string()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        delivered
    }
}

/// Shared in-process message broker. Cloning yields another handle to the
/// same broker.
#[derive(Clone, Default)]
pub struct LocalBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl LocalBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, unconnected client bound to this broker.
    pub fn client(&self) -> FeedResult<LocalFeedClient> {
        let mut state = self.lock()?;
        state.next_client_id += 1;
        Ok(LocalFeedClient {
            broker: self.clone(),
            client_id: state.next_client_id,
            connected: false,
            inbox: None,
            backlog: VecDeque::new(),
        })
    }

    /// Server-side push of one message to every subscriber of `channel`.
    ///
    /// Returns the number of subscribers the frame was handed to.
    pub fn deliver(&self, channel: &str, message: &Message) -> FeedResult<usize> {
        let raw = FeedFrame::GetChat(message.clone()).encode()?;
        self.deliver_raw(channel, &raw)
    }

    /// Pushes an already-encoded frame; no validation is applied.
    pub fn deliver_raw(&self, channel: &str, raw: &str) -> FeedResult<usize> {
        let mut state = self.lock()?;
        if state.offline {
            return Err(FeedError::Disconnected);
        }
        Ok(state.fan_out(channel, raw, None))
    }

    /// Toggles broker availability; going offline drops all subscriptions.
    pub fn set_online(&self, online: bool) -> FeedResult<()> {
        let mut state = self.lock()?;
        state.offline = !online;
        if !online {
            let dropped = state.subscriptions.len();
            state.subscriptions.clear();
            info!("event=broker_offline module=feed status=warn dropped_subscriptions={dropped}");
        }
        Ok(())
    }

    pub fn is_online(&self) -> bool {
        self.lock().map(|state| !state.offline).unwrap_or(false)
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.lock()
            .map(|state| {
                state
                    .subscriptions
                    .iter()
                    .filter(|subscription| subscription.channel == channel)
                    .count()
            })
            .unwrap_or(0)
    }

    fn lock(&self) -> FeedResult<MutexGuard<'_, BrokerState>> {
        self.state
            .lock()
            .map_err(|_| FeedError::Transport("broker state lock poisoned".to_string()))
    }

    fn handle_join(&self, client_id: ClientId, raw: &str) -> FeedResult<Receiver<String>> {
        let channel = match FeedFrame::decode(raw)? {
            FeedFrame::Join(channel) => channel,
            FeedFrame::GetChat(_) => {
                return Err(FeedError::Decode("expected join frame".to_string()));
            }
        };

        let mut state = self.lock()?;
        if state.offline {
            return Err(FeedError::Disconnected);
        }
        state.unsubscribe(client_id);
        let (sender, receiver) = mpsc::channel();
        state.subscriptions.push(Subscription {
            client_id,
            channel,
            sender,
        });
        Ok(receiver)
    }
}

/// Feed client backed by a [`LocalBroker`].
pub struct LocalFeedClient {
    broker: LocalBroker,
    client_id: ClientId,
    connected: bool,
    inbox: Option<Receiver<String>>,
    /// Frames taken off a retired inbox, read before the current one.
    backlog: VecDeque<String>,
}

impl LocalFeedClient {
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Moves everything still queued on the inbox into the backlog.
    fn retire_inbox(&mut self) {
        if let Some(inbox) = self.inbox.take() {
            self.backlog.extend(inbox.try_iter());
        }
    }

    fn mark_lost(&mut self) -> FeedError {
        self.connected = false;
        self.retire_inbox();
        FeedError::Disconnected
    }
}

impl FeedClient for LocalFeedClient {
    fn connect(&mut self) -> FeedResult<()> {
        if !self.broker.is_online() {
            return Err(self.mark_lost());
        }
        self.connected = true;
        debug!(
            "event=feed_connect module=feed status=ok client_id={}",
            self.client_id
        );
        Ok(())
    }

    fn join_channel(&mut self, channel: &str) -> FeedResult<()> {
        if !self.connected {
            return Err(FeedError::NotConnected);
        }
        let raw = FeedFrame::Join(channel.to_string()).encode()?;
        match self.broker.handle_join(self.client_id, &raw) {
            Ok(receiver) => {
                self.retire_inbox();
                self.inbox = Some(receiver);
                debug!(
                    "event=feed_join module=feed status=ok client_id={} channel={channel} backlog={}",
                    self.client_id,
                    self.backlog.len()
                );
                Ok(())
            }
            Err(FeedError::Disconnected) => Err(self.mark_lost()),
            Err(err) => Err(err),
        }
    }

    fn next_message(&mut self) -> FeedResult<Option<Message>> {
        let raw = match self.backlog.pop_front() {
            Some(raw) => raw,
            None => {
                if !self.connected {
                    return Err(FeedError::NotConnected);
                }
                let Some(inbox) = self.inbox.as_ref() else {
                    return Ok(None);
                };
                match inbox.try_recv() {
                    Ok(raw) => raw,
                    Err(TryRecvError::Empty) => return Ok(None),
                    Err(TryRecvError::Disconnected) => return Err(self.mark_lost()),
                }
            }
        };

        match FeedFrame::decode(&raw)? {
            FeedFrame::GetChat(message) => Ok(Some(message)),
            FeedFrame::Join(_) => Err(FeedError::Decode(
                "unexpected join frame on inbound channel".to_string(),
            )),
        }
    }

    fn publish(&mut self, channel: &str, message: &Message) -> FeedResult<()> {
        if !self.connected {
            return Err(FeedError::NotConnected);
        }
        let raw = FeedFrame::GetChat(message.clone()).encode()?;
        let mut state = self.broker.lock()?;
        if state.offline {
            drop(state);
            return Err(self.mark_lost());
        }
        let delivered = state.fan_out(channel, &raw, Some(self.client_id));
        debug!(
            "event=feed_publish module=feed status=ok client_id={} channel={channel} delivered={delivered}",
            self.client_id
        );
        Ok(())
    }

    fn close(&mut self) -> FeedResult<()> {
        if self.connected || self.inbox.is_some() {
            self.broker.lock()?.unsubscribe(self.client_id);
        }
        self.connected = false;
        self.inbox = None;
        self.backlog.clear();
        Ok(())
    }
}
