//! Live entity collections
//!
//! Each collection exclusively owns its members. Membership is liveness: an entity
//! that has been removed no longer exists anywhere in the simulation. Iteration is
//! insertion order, which keeps sweeps stable frame to frame.

use serde::{Deserialize, Serialize};

use super::state::{Bullet, Enemy, PowerUp};

/// Ordered, index-addressable set of live entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Remove and return the entity at `index`, keeping the order of the rest.
    ///
    /// # Panics
    /// If `index` is out of range; a stale index is a logic error.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.items.len(),
            "entity index {index} out of range (len {})",
            self.items.len()
        );
        self.items.remove(index)
    }

    /// Remove every entity, returning them in order
    pub fn drain_all(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }

    /// Remove every entity for which `keep` returns false, handing each
    /// removed entity to `on_removed`
    pub fn retain_or(&mut self, mut keep: impl FnMut(&T) -> bool, mut on_removed: impl FnMut(T)) {
        let mut index = 0;
        while index < self.items.len() {
            if keep(&self.items[index]) {
                index += 1;
            } else {
                on_removed(self.items.remove(index));
            }
        }
    }
}

impl<T> std::ops::Index<usize> for Collection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> std::ops::IndexMut<usize> for Collection<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Hands out entity ids; never reuses one within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// All non-player entity collections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    pub enemies: Collection<Enemy>,
    pub player_bullets: Collection<Bullet>,
    pub enemy_bullets: Collection<Bullet>,
    pub power_ups: Collection<PowerUp>,
    pub ids: IdAllocator,
}

impl Entities {
    /// Empty every collection. Ids keep counting so stale handles never alias.
    pub fn clear(&mut self) {
        let enemies = self.enemies.drain_all().len();
        let bullets = self.player_bullets.drain_all().len() + self.enemy_bullets.drain_all().len();
        let power_ups = self.power_ups.drain_all().len();
        log::debug!("Cleared {enemies} enemies, {bullets} bullets, {power_ups} power-ups");
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
            && self.player_bullets.is_empty()
            && self.enemy_bullets.is_empty()
            && self.power_ups.is_empty()
    }

    pub fn total(&self) -> usize {
        self.enemies.len() + self.player_bullets.len() + self.enemy_bullets.len() + self.power_ups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_keeps_order() {
        let mut c = Collection::new();
        for i in 0..5 {
            c.add(i);
        }
        assert_eq!(c.remove(1), 1);
        assert_eq!(c.as_slice(), &[0, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_remove_out_of_range_panics() {
        let mut c: Collection<u8> = Collection::new();
        c.add(7);
        c.remove(1);
    }

    #[test]
    fn test_retain_or_reports_removed() {
        let mut c = Collection::new();
        for i in 0..6 {
            c.add(i);
        }
        let mut removed = Vec::new();
        c.retain_or(|&x| x % 2 == 0, |x| removed.push(x));
        assert_eq!(c.as_slice(), &[0, 2, 4]);
        assert_eq!(removed, vec![1, 3, 5]);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(a, 1);
    }

    #[test]
    fn test_drain_all_empties() {
        let mut c = Collection::new();
        c.add("x");
        c.add("y");
        assert_eq!(c.drain_all(), vec!["x", "y"]);
        assert!(c.is_empty());
    }
}
