//! Event partitioning
//!
//! Slices every real/buffer event into granularity-sized ordered parts for
//! the solver, then merges buffer parts into their real event's sequence:
//! pre-buffer parts splice in ahead of the real parts, post-buffer parts
//! after, and the whole pre/real/post chain ends up sharing one group id and
//! one contiguous `1..=last_part` numbering.

use std::collections::HashSet;

use tessera_domain::{Event, Granularity, PartedEvent};
use uuid::Uuid;

/// Slice an event into granularity-sized parts numbered `1..=n`.
///
/// A remainder shorter than one granularity unit still gets a final part, so
/// `n = ceil(duration / granularity)`; every part carries the same
/// `last_part`.
pub fn partition_event(event: &Event, host_id: &str, granularity: Granularity) -> Vec<PartedEvent> {
    let minutes = event.duration_minutes();
    if minutes <= 0 {
        return Vec::new();
    }

    let whole = (minutes / granularity.minutes()) as u32;
    let remainder = minutes % granularity.minutes();
    let total = if remainder > 0 { whole + 1 } else { whole };

    (1..=total)
        .map(|part| PartedEvent {
            group_id: event.id.clone(),
            event: event.clone(),
            part,
            last_part: total,
            meeting_part: part,
            meeting_last_part: total,
            host_id: host_id.to_string(),
        })
        .collect()
}

/// Merge one real event's pre-buffer parts ahead of its own parts.
///
/// Both groups get a fresh shared group id and are renumbered `1..=n`.
pub fn merge_pre_buffer_parts(parts: &[PartedEvent], for_event_id: &str) -> Vec<PartedEvent> {
    let group_id = Uuid::new_v4().to_string();

    let mut buffer_parts: Vec<PartedEvent> = parts
        .iter()
        .filter(|p| p.event.is_pre_event && p.event.for_event_id.as_deref() == Some(for_event_id))
        .cloned()
        .collect();
    let mut real_parts: Vec<PartedEvent> =
        parts.iter().filter(|p| p.event.id == for_event_id).cloned().collect();

    buffer_parts.sort_by_key(|p| p.part);
    real_parts.sort_by_key(|p| p.part);

    let mut merged = buffer_parts;
    merged.append(&mut real_parts);

    let total = merged.len() as u32;
    for (index, part) in merged.iter_mut().enumerate() {
        part.group_id = group_id.clone();
        part.part = index as u32 + 1;
        part.last_part = total;
    }

    merged
}

/// Merge one real event's post-buffer parts after its own parts.
///
/// When the real event was already merged with a pre-buffer (it carries a
/// `pre_event_id`), the existing numbering is preserved and extended by the
/// post-buffer count, and the pre-buffer parts are pulled onto the new group
/// so the whole chain shares one group and one monotonic sequence. Otherwise
/// the real+post concatenation is renumbered from 1.
pub fn merge_post_buffer_parts(parts: &[PartedEvent], for_event_id: &str) -> Vec<PartedEvent> {
    let group_id = Uuid::new_v4().to_string();

    let mut real_parts: Vec<PartedEvent> =
        parts.iter().filter(|p| p.event.id == for_event_id).cloned().collect();
    let mut buffer_parts: Vec<PartedEvent> = parts
        .iter()
        .filter(|p| p.event.is_post_event && p.event.for_event_id.as_deref() == Some(for_event_id))
        .cloned()
        .collect();

    real_parts.sort_by_key(|p| p.part);
    buffer_parts.sort_by_key(|p| p.part);

    let real_count = real_parts.len();
    let post_count = buffer_parts.len() as u32;

    let mut merged = real_parts;
    merged.append(&mut buffer_parts);

    let Some(first) = merged.first() else {
        return merged;
    };
    let pre_event_id = first.event.pre_event_id.clone();
    let previous_last_part = first.last_part;

    if let Some(pre_event_id) = pre_event_id {
        // Extend the already-assigned sequence instead of renumbering
        let chain_last = previous_last_part + post_count;
        for part in merged.iter_mut() {
            part.group_id = group_id.clone();
            part.last_part = chain_last;
        }
        for (offset, part) in merged.iter_mut().skip(real_count).enumerate() {
            part.part = previous_last_part + offset as u32 + 1;
        }

        // Propagate the group onto the pre-buffer parts found via the back
        // pointer so the pre+real+post chain stays one sequence
        let mut chain: Vec<PartedEvent> = parts
            .iter()
            .filter(|p| p.event.id == pre_event_id)
            .cloned()
            .map(|mut p| {
                p.group_id = group_id.clone();
                p.last_part = chain_last;
                p
            })
            .collect();
        chain.append(&mut merged);
        return chain;
    }

    let total = merged.len() as u32;
    for (index, part) in merged.iter_mut().enumerate() {
        part.group_id = group_id.clone();
        part.part = index as u32 + 1;
        part.last_part = total;
    }

    merged
}

/// Apply the pre-buffer merge across every distinct `for_event_id` in the
/// batch, splicing merged groups back in place of the originals.
pub fn merge_all_pre_buffer_parts(parts: Vec<PartedEvent>) -> Vec<PartedEvent> {
    let targets = distinct_buffer_targets(&parts, |e| e.is_pre_event);
    if targets.is_empty() {
        return parts;
    }

    let mut merged_total: Vec<PartedEvent> = Vec::new();
    for target in &targets {
        merged_total.extend(merge_pre_buffer_parts(&parts, target));
    }

    splice(parts, merged_total)
}

/// Apply the post-buffer merge across every distinct `for_event_id`.
pub fn merge_all_post_buffer_parts(parts: Vec<PartedEvent>) -> Vec<PartedEvent> {
    let targets = distinct_buffer_targets(&parts, |e| e.is_post_event);
    if targets.is_empty() {
        return parts;
    }

    let mut merged_total: Vec<PartedEvent> = Vec::new();
    for target in &targets {
        merged_total.extend(merge_post_buffer_parts(&parts, target));
    }

    splice(parts, merged_total)
}

/// Pre-merge then post-merge a whole batch.
pub fn merge_buffer_parts(parts: Vec<PartedEvent>) -> Vec<PartedEvent> {
    merge_all_post_buffer_parts(merge_all_pre_buffer_parts(parts))
}

/// Distinct real-event ids referenced by buffer parts, in first-seen order.
fn distinct_buffer_targets(
    parts: &[PartedEvent],
    is_buffer_side: impl Fn(&Event) -> bool,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for part in parts {
        if !is_buffer_side(&part.event) {
            continue;
        }
        if let Some(target) = &part.event.for_event_id {
            if seen.insert(target.clone()) {
                targets.push(target.clone());
            }
        }
    }
    targets
}

/// Replace every part belonging to a merged event with its merged form,
/// keeping unrelated parts untouched and never duplicating.
fn splice(parts: Vec<PartedEvent>, merged: Vec<PartedEvent>) -> Vec<PartedEvent> {
    let merged_ids: HashSet<&str> = merged.iter().map(|p| p.event.id.as_str()).collect();
    let mut result: Vec<PartedEvent> =
        parts.into_iter().filter(|p| !merged_ids.contains(p.event.id.as_str())).collect();
    result.extend(merged);
    result
}
