use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Ordering overrides: which names are shown, and in which order
// ---------------------------------------------------------------------------

/// Resolve the display order of models or datasets.
///
/// * No override → `present` as-is (the pivot's sorted order).
/// * Override → its names, in override order, restricted to names that are
///   actually `present`.  Unknown names are dropped and names the override
///   leaves out are not shown.  A repeated name is kept once.
pub fn apply_order(present: &[String], order: Option<&[String]>) -> Vec<String> {
    let Some(order) = order else {
        return present.to_vec();
    };

    let available: BTreeSet<&str> = present.iter().map(String::as_str).collect();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut resolved = Vec::with_capacity(order.len());
    for name in order {
        if !available.contains(name.as_str()) {
            log::debug!("Ignoring unknown name '{name}' in ordering override");
            continue;
        }
        if seen.insert(name.as_str()) {
            resolved.push(name.clone());
        }
    }
    resolved
}
