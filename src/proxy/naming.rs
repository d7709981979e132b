use std::collections::{HashMap, HashSet};

use crate::assemble::{AUTO_GROUP, SELECT_GROUP};
use crate::proxy::vless::ProxyDescriptor;

pub const SUFFIX_SEPARATOR: &str = "_";
pub const COLLISION_SEPARATOR: &str = " ~";

/// Names a proxy may not take: the generated groups and Clash's built-in
/// outbounds.
pub const RESERVED_NAMES: &[&str] = &[
    SELECT_GROUP,
    AUTO_GROUP,
    "DIRECT",
    "REJECT",
    "REJECT-DROP",
    "PASS",
    "COMPATIBLE",
];

/// Hands out unique display names in input order.
///
/// The n-th repeat of a name gets `_n`, counting prior occurrences (so the
/// second `Node` is `Node_1`, not `Node_2`). If that still clashes with a
/// name already handed out or reserved, ` ~1`, ` ~2`, ... is appended until
/// it doesn't.
#[derive(Debug, Default)]
pub struct NameDeduplicator {
    seen: HashMap<String, usize>,
    assigned: HashSet<String>,
}

impl NameDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `reserved` already taken.
    pub fn with_reserved(reserved: &[&str]) -> Self {
        Self {
            seen: HashMap::new(),
            assigned: reserved.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn assign(&mut self, base: &str) -> String {
        let count = self.seen.entry(base.to_string()).or_insert(0);
        let candidate = if *count == 0 {
            base.to_string()
        } else {
            format!("{}{}{}", base, SUFFIX_SEPARATOR, count)
        };
        *count += 1;

        let mut name = candidate.clone();
        let mut attempt = 1;
        while self.assigned.contains(&name) {
            name = format!("{}{}{}", candidate, COLLISION_SEPARATOR, attempt);
            attempt += 1;
        }

        self.assigned.insert(name.clone());
        name
    }
}

pub fn deduplicate(mut proxies: Vec<ProxyDescriptor>) -> Vec<ProxyDescriptor> {
    let mut names = NameDeduplicator::with_reserved(RESERVED_NAMES);
    for proxy in &mut proxies {
        proxy.name = names.assign(&proxy.name);
    }
    proxies
}
