//! Input plumbing between the host's devices and the controller.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use drill_core::{ButtonLayout, InputEvent, Symbol};
use rustc_hash::{FxHashMap, FxHashSet};

pub type InputCallback = Box<dyn FnMut(InputEvent)>;

/// Push-based producer of discrete input events.
pub trait InputSource {
    fn subscribe(&mut self, callback: InputCallback);
}

/// Fans each emitted event out to every subscriber.
#[derive(Default)]
pub struct Broadcaster {
    subscribers: Vec<InputCallback>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: InputEvent) {
        for callback in &mut self.subscribers {
            callback(event);
        }
    }
}

impl InputSource for Broadcaster {
    fn subscribe(&mut self, callback: InputCallback) {
        self.subscribers.push(callback);
    }
}

/// Buffer that a source writes into and the event loop drains.
#[derive(Clone, Default)]
pub struct InputQueue {
    pending: Rc<RefCell<VecDeque<InputEvent>>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback suitable for [`InputSource::subscribe`].
    pub fn sink(&self) -> InputCallback {
        let pending = Rc::clone(&self.pending);
        Box::new(move |event| pending.borrow_mut().push_back(event))
    }

    pub fn push(&self, event: InputEvent) {
        self.pending.borrow_mut().push_back(event);
    }

    pub fn drain(&self) -> Vec<InputEvent> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

/// Raw key or button names to logical symbols.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyMap {
    bindings: FxHashMap<String, Symbol>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// WASD movement, U/I/O punches, J/K/L kicks.
    pub fn keyboard_default() -> Self {
        let mut map = Self::new();
        for (key, symbol) in [
            ("w", Symbol::Up),
            ("s", Symbol::Down),
            ("a", Symbol::Left),
            ("d", Symbol::Right),
            ("arrowup", Symbol::Up),
            ("arrowdown", Symbol::Down),
            ("arrowleft", Symbol::Left),
            ("arrowright", Symbol::Right),
            ("u", Symbol::Lp),
            ("i", Symbol::Mp),
            ("o", Symbol::Hp),
            ("j", Symbol::Lk),
            ("k", Symbol::Mk),
            ("l", Symbol::Hk),
        ] {
            map.bind(key, symbol);
        }
        map
    }

    pub fn bind(&mut self, key: &str, symbol: Symbol) {
        self.bindings.insert(key.to_ascii_lowercase(), symbol);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Symbol> {
        self.bindings.remove(&key.to_ascii_lowercase())
    }

    pub fn resolve(&self, key: &str) -> Option<Symbol> {
        self.bindings.get(&key.to_ascii_lowercase()).copied()
    }
}

/// Settings-provider view the core cares about.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub layout: ButtonLayout,
    pub keymap: KeyMap,
}

impl Settings {
    pub fn new(layout: ButtonLayout) -> Self {
        Self {
            layout,
            keymap: KeyMap::keyboard_default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(ButtonLayout::default())
    }
}

/// Turns held-state snapshots (gamepad polling) into press events.
///
/// Only symbols that were up on the previous poll and are down now are
/// emitted, so repeated identical polls produce nothing.
#[derive(Clone, Debug, Default)]
pub struct PollEdge {
    held: FxHashSet<Symbol>,
}

impl PollEdge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, held_now: &[Symbol], timestamp: u64) -> Vec<InputEvent> {
        let now: FxHashSet<Symbol> = held_now.iter().copied().collect();
        let mut pressed: Vec<Symbol> = now.difference(&self.held).copied().collect();
        pressed.sort();
        self.held = now;
        pressed
            .into_iter()
            .map(|symbol| InputEvent::new(symbol, timestamp))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcaster_feeds_queue() {
        let queue = InputQueue::new();
        let mut source = Broadcaster::new();
        source.subscribe(queue.sink());
        source.emit(InputEvent::new(Symbol::Down, 1));
        source.emit(InputEvent::new(Symbol::Lp, 2));
        assert_eq!(queue.len(), 2);
        let drained = queue.drain();
        assert_eq!(drained[1].symbol, Symbol::Lp);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_keymap_case_insensitive() {
        let map = KeyMap::keyboard_default();
        assert_eq!(map.resolve("W"), Some(Symbol::Up));
        assert_eq!(map.resolve("ArrowRight"), Some(Symbol::Right));
        assert_eq!(map.resolve("z"), None);
    }

    #[test]
    fn test_keymap_rebind() {
        let mut map = KeyMap::keyboard_default();
        map.bind("z", Symbol::Hk);
        assert_eq!(map.resolve("z"), Some(Symbol::Hk));
        assert_eq!(map.unbind("z"), Some(Symbol::Hk));
        assert_eq!(map.resolve("z"), None);
    }

    #[test]
    fn test_poll_edge_emits_rising_edges_only() {
        let mut edge = PollEdge::new();
        let first = edge.poll(&[Symbol::Down], 0);
        assert_eq!(first, vec![InputEvent::new(Symbol::Down, 0)]);
        assert!(edge.poll(&[Symbol::Down], 16).is_empty());
        let next = edge.poll(&[Symbol::Down, Symbol::Lp], 33);
        assert_eq!(next, vec![InputEvent::new(Symbol::Lp, 33)]);
        assert!(edge.poll(&[], 50).is_empty());
        assert_eq!(edge.poll(&[Symbol::Lp], 66).len(), 1);
    }
}
