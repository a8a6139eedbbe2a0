//! Ad hoc signature queries
//!
//! Read-only lookups outside of systems: scan the entity registry's signature
//! slots in id order and yield every live entity whose signature is a superset
//! of the query.

use std::iter::FusedIterator;

use super::{Entity, EntityRegistry, Signature};

/// Lazy, restartable scan over live entities matching a signature
///
/// Stopping early costs only the scan up to the last yielded entity.
#[derive(Debug, Clone)]
pub struct SignatureQuery<'a> {
    registry: &'a EntityRegistry,
    query: Signature,
    next: usize,
}

impl<'a> SignatureQuery<'a> {
    /// Query `registry` for entities carrying every type in `query`
    pub fn new(registry: &'a EntityRegistry, query: Signature) -> Self {
        // slot 0 is the null sentinel
        Self { registry, query, next: 1 }
    }
    
    /// The signature being matched
    pub fn signature(&self) -> Signature {
        self.query
    }
    
    /// Rewind to the first entity
    pub fn restart(&mut self) {
        self.next = 1;
    }
}

impl Iterator for SignatureQuery<'_> {
    type Item = Entity;
    
    fn next(&mut self) -> Option<Entity> {
        while self.next < self.registry.slot_count() {
            let index = self.next;
            self.next += 1;
            
            let matched = self
                .registry
                .live_signature_at(index)
                .is_some_and(|signature| signature.matches(self.query));
            if matched {
                return Some(Entity::from_raw(index as u32));
            }
        }
        None
    }
    
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.registry.slot_count().saturating_sub(self.next)))
    }
}

impl FusedIterator for SignatureQuery<'_> {}

impl EntityRegistry {
    /// Live entities whose signature contains `query`, in id order
    pub fn entities_with_signature(&self, query: Signature) -> SignatureQuery<'_> {
        SignatureQuery::new(self, query)
    }
}
