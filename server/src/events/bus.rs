//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Event bus implementation

use super::types::BotEvent;
use std::sync::RwLock;

pub type EventHandler = Box<dyn Fn(&BotEvent) + Send + Sync>;

/// Event bus for publishing and subscribing to bot events
pub struct EventBus {
    handlers: RwLock<Vec<EventHandler>>,
    event_queue: RwLock<Vec<BotEvent>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            event_queue: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to events with a handler function
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&BotEvent) + Send + Sync + 'static,
    {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.push(Box::new(handler));
    }

    /// Publish an event to the queue
    pub fn publish(&self, event: BotEvent) {
        let mut queue = self.event_queue.write().unwrap_or_else(|e| e.into_inner());
        queue.push(event);
    }

    /// Deliver all queued events to every handler, in publish order
    pub fn process_events(&self) -> usize {
        let mut queue = self.event_queue.write().unwrap_or_else(|e| e.into_inner());
        let events: Vec<_> = queue.drain(..).collect();
        drop(queue);

        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        for event in &events {
            for handler in handlers.iter() {
                handler(event);
            }
        }
        events.len()
    }

    /// Get the number of queued events
    pub fn queue_len(&self) -> usize {
        let queue = self.event_queue.read().unwrap_or_else(|e| e.into_inner());
        queue.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
