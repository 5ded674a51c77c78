//! Process-wide identifier allocation
//!
//! Every KML object receives an identifier of the form `{prefix}{kind}_{n}`
//! when it is constructed. The counter `n` is shared across all kinds, so two
//! objects never receive the same identifier within one process, even when
//! the prefix changes in between.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

static PREFIX: Lazy<RwLock<String>> = Lazy::new(|| RwLock::new(String::new()));

/// Issue the next identifier for an object of the given kind
#[must_use = "identifiers are never reissued"]
pub fn next_id(kind: &str) -> String {
    let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{}{kind}_{n}", prefix())
}

/// Change the prefix used for identifiers issued from now on
///
/// Identifiers that were already handed out are not touched.
pub fn set_prefix(prefix: impl Into<String>) {
    let prefix = prefix.into();
    log::debug!("identifier prefix set to {prefix:?}");
    match PREFIX.write() {
        Ok(mut guard) => *guard = prefix,
        Err(poisoned) => *poisoned.into_inner() = prefix,
    }
}

/// The prefix currently applied to new identifiers
#[must_use]
pub fn prefix() -> String {
    match PREFIX.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_kinds() {
        let a = next_id("Point");
        let b = next_id("Point");
        let c = next_id("Placemark");
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(c.contains("Placemark_"));
    }

    #[test]
    fn test_counter_strictly_increases() {
        let parse = |id: String| -> u64 {
            id.rsplit('_')
                .next()
                .and_then(|n| n.parse().ok())
                .expect("numeric suffix")
        };
        let first = parse(next_id("Wait"));
        let second = parse(next_id("FlyTo"));
        assert!(second > first);
    }
}
