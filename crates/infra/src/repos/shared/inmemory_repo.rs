use anyhow::anyhow;
use frontdesk_domain::{Entity, ID};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|item| compare(item)).cloned().collect()
}

/// Applies `update` to the entity with the given id and returns whether it existed
pub fn update<T: Clone + Entity, U: FnOnce(&mut T)>(
    val_id: &ID,
    collection: &Mutex<Vec<T>>,
    update: U,
) -> bool {
    let mut collection = collection.lock().unwrap();
    match collection.iter_mut().find(|item| item.id() == val_id) {
        Some(item) => {
            update(item);
            true
        }
        None => false,
    }
}

/// Makes calls of an inmemory repository fail, like an unreachable record
/// store would
#[derive(Debug, Default)]
pub struct FailureToggle {
    reads: AtomicBool,
    writes: AtomicBool,
}

impl FailureToggle {
    pub fn set(&self, failing: bool) {
        self.reads.store(failing, Ordering::SeqCst);
        self.writes.store(failing, Ordering::SeqCst);
    }

    pub fn set_writes(&self, failing: bool) {
        self.writes.store(failing, Ordering::SeqCst);
    }

    pub fn check_read(&self, table: &str) -> anyhow::Result<()> {
        Self::check(&self.reads, table)
    }

    pub fn check_write(&self, table: &str) -> anyhow::Result<()> {
        Self::check(&self.writes, table)
    }

    fn check(flag: &AtomicBool, table: &str) -> anyhow::Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(anyhow!("The {} table is unavailable", table))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_writes_keeps_reads_working() {
        let toggle = FailureToggle::default();
        assert!(toggle.check_read("appointments").is_ok());

        toggle.set_writes(true);
        assert!(toggle.check_read("appointments").is_ok());
        assert!(toggle.check_write("appointments").is_err());

        toggle.set(true);
        assert!(toggle.check_read("appointments").is_err());
        toggle.set(false);
        assert!(toggle.check_write("appointments").is_ok());
    }
}
