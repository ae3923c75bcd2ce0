//! Non-blocking model loading
//!
//! Each request runs fetch + decode on its own worker thread and reports
//! back over a channel. Workers never touch the registry: completed loads
//! are collected by [`LoadQueue::poll`] on the frame thread and applied
//! there. A [`LoadTicket`] cancels a request whose result is no longer
//! wanted.

use crate::descriptor::{ModelDescriptor, Scale};
use plinth_core::{Color, ContentHash, ObjectId, PlinthError, Result};
use plinth_import::{unit_cube, ImportedModel, LoadRequest, ModelLoader, PartMaterial, SourceFormat};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Handle to an in-flight load
#[derive(Debug, Clone)]
pub struct LoadTicket {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl LoadTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Drop the result when it arrives
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A finished load, ready to be placed
#[derive(Debug)]
pub struct CompletedLoad {
    /// Descriptor with its id filled in
    pub descriptor: ModelDescriptor,
    pub scale: Scale,
    pub result: Result<ImportedModel>,
}

struct Pending {
    descriptor: ModelDescriptor,
    scale: Scale,
    cancelled: Arc<AtomicBool>,
}

struct Message {
    ticket: u64,
    result: Result<ImportedModel>,
}

pub struct LoadQueue {
    loader: ModelLoader,
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    pending: HashMap<u64, Pending>,
    next_ticket: u64,
}

impl LoadQueue {
    pub fn new(loader: ModelLoader) -> Self {
        let (sender, receiver) = channel();
        Self {
            loader,
            sender,
            receiver,
            pending: HashMap::new(),
            next_ticket: 1,
        }
    }

    /// Number of loads not yet collected
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Start loading. Descriptors without an id get a generated one here so
    /// the id is known before the load finishes.
    pub fn submit(&mut self, mut descriptor: ModelDescriptor, scale: Scale) -> LoadTicket {
        let id = descriptor.id.get_or_insert_with(ObjectId::generate).clone();
        let ticket = LoadTicket {
            id: self.next_ticket,
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        self.next_ticket += 1;

        let sender = self.sender.clone();
        match (descriptor.source_url.clone(), descriptor.resolved_format()) {
            (Some(source_url), Some(format)) => {
                let request = LoadRequest {
                    label: id.to_string(),
                    source_url,
                    material_url: descriptor.material_url.clone(),
                    format,
                };
                let loader = self.loader.clone();
                let ticket_id = ticket.id;
                std::thread::spawn(move || {
                    let result = loader.load(&request);
                    // The queue may be gone after teardown
                    let _ = sender.send(Message {
                        ticket: ticket_id,
                        result,
                    });
                });
            }
            _ => {
                log::debug!("{} has no source, synthesizing default cube", id);
                let _ = sender.send(Message {
                    ticket: ticket.id,
                    result: Ok(default_cube(&id)),
                });
            }
        }

        self.pending.insert(
            ticket.id,
            Pending {
                descriptor,
                scale,
                cancelled: ticket.cancelled.clone(),
            },
        );
        ticket
    }

    /// Collect every load that has finished, without blocking
    pub fn poll(&mut self) -> Vec<CompletedLoad> {
        let mut done = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            if let Some(completed) = self.complete(message) {
                done.push(completed);
            }
        }
        done
    }

    /// Block until every in-flight load has finished or `timeout` passes
    pub fn wait_all(&mut self, timeout: Duration) -> Result<Vec<CompletedLoad>> {
        let deadline = Instant::now() + timeout;
        let mut done = Vec::new();
        while !self.pending.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(message) => {
                    if let Some(completed) = self.complete(message) {
                        done.push(completed);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(PlinthError::Fetch(format!(
                        "{} loads still running after {:?}",
                        self.pending.len(),
                        timeout
                    )));
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(done)
    }

    /// Cancel everything in flight
    pub fn cancel_all(&mut self) {
        for pending in self.pending.values() {
            pending.cancelled.store(true, Ordering::Relaxed);
        }
        self.pending.clear();
    }

    fn complete(&mut self, message: Message) -> Option<CompletedLoad> {
        let pending = self.pending.remove(&message.ticket)?;
        if pending.cancelled.load(Ordering::Relaxed) {
            log::debug!("Dropping cancelled load of {:?}", pending.descriptor.id);
            return None;
        }
        Some(CompletedLoad {
            descriptor: pending.descriptor,
            scale: pending.scale,
            result: message.result,
        })
    }
}

/// Unit cube colored from the object id
fn default_cube(id: &ObjectId) -> ImportedModel {
    let color = Color::from_hex(ContentHash::from_str(id.as_str()).to_rgb_hex());
    ImportedModel {
        format: SourceFormat::Obj,
        parts: vec![unit_cube("cube", PartMaterial::solid(color))],
        materials_bound: false,
        source_hash: None,
    }
}
