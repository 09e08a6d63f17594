//! The `MobilityStore`: movement state for every live agent.

use gw_core::AgentId;

use crate::MovementState;

/// Movement state indexed by `AgentId`.
///
/// Ids are handed out densely and never reused, so a path result that
/// arrives for a despawned agent can never be mistaken for a newer one.
/// Despawned slots stay as `None`.
#[derive(Debug, Default)]
pub struct MobilityStore {
    states: Vec<Option<MovementState>>,
    live:   usize,
}

impl MobilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next [`insert`](Self::insert) will return.
    #[inline]
    pub fn next_id(&self) -> AgentId {
        AgentId(self.states.len() as u32)
    }

    pub fn insert(&mut self, state: MovementState) -> AgentId {
        let id = self.next_id();
        self.states.push(Some(state));
        self.live += 1;
        id
    }

    pub fn remove(&mut self, agent: AgentId) -> Option<MovementState> {
        let removed = self.states.get_mut(agent.index())?.take();
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&MovementState> {
        self.states.get(agent.index())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut MovementState> {
        self.states.get_mut(agent.index())?.as_mut()
    }

    /// Number of live agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &MovementState)> {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (AgentId(i as u32), s)))
    }

    /// Mutable variant of [`iter`](Self::iter).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut MovementState)> {
        self.states
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|s| (AgentId(i as u32), s)))
    }
}
