//! Every id the pipeline synthesizes, in one place. Ids are stable across
//! rebuilds: authored junction settings reference endpoints and cuts by these
//! strings, so the formats and the hash below must never drift.

/// FNV-1a, 32 bit. Pinned: offset basis 0x811c9dc5, prime 0x01000193.
pub fn fnv1a_32(input: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in input.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Sorts, de-duplicates, joins with `|`, hashes. The one way all id sets turn
/// into digests.
pub fn hash_id_set<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = ids.into_iter().map(|s| s.as_ref().to_string()).collect();
    sorted.sort();
    sorted.dedup();
    format!("{:08x}", fnv1a_32(&sorted.join("|")))
}

pub fn road_point_id(road_id: &str, index: usize) -> String {
    format!("pt_{}_{}", road_id, index)
}

pub fn segment_id(road_id: &str, a_point_id: &str, b_point_id: &str) -> String {
    format!("seg_{}__{}__{}", road_id, a_point_id, b_point_id)
}

pub fn corner_id(road_id: &str, point_id: &str) -> String {
    format!("corner_{}__{}", road_id, point_id)
}

pub fn overlap_id(seg_a: &str, seg_b: &str) -> String {
    format!("ov_{}__{}", seg_a, seg_b)
}

/// The literal ids for a segment's true ends.
pub fn end_endpoint_id(segment_id: &str, end_b: bool) -> String {
    format!("ep_{}__{}", segment_id, if end_b { "b" } else { "a" })
}

/// A cut boundary's id hashes the contributing trim sources, plus the owning
/// segment and which end the boundary faces -- one removal interval produces
/// a distinct, stable endpoint on each of its sides.
pub fn cut_endpoint_id(source_ids: &[String], segment_id: &str, end_b: bool) -> String {
    let mut parts: Vec<String> = source_ids.to_vec();
    parts.sort();
    parts.dedup();
    parts.push(segment_id.to_string());
    parts.push(if end_b { "b" } else { "a" }.to_string());
    format!("cut_{:08x}", fnv1a_32(&parts.join("|")))
}

pub fn junction_id(candidate_ids: &[String]) -> String {
    format!("junc_{}", hash_id_set(candidate_ids))
}

/// Endpoint ids in sorted order, so both directions name the same connector.
pub fn connector_id(endpoint_a: &str, endpoint_b: &str) -> String {
    if endpoint_a <= endpoint_b {
        format!("conn_{}__{}", endpoint_a, endpoint_b)
    } else {
        format!("conn_{}__{}", endpoint_b, endpoint_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_reference_vectors() {
        // Published FNV-1a 32-bit digests.
        assert_eq!(fnv1a_32(""), 0x811c_9dc5);
        assert_eq!(fnv1a_32("a"), 0xe40c_292c);
        assert_eq!(fnv1a_32("foobar"), 0xbf9c_f968);
    }

    #[test]
    fn hash_ignores_order_and_dupes() {
        let a = hash_id_set(["ov_1", "ov_2"]);
        let b = hash_id_set(["ov_2", "ov_1", "ov_2"]);
        assert_eq!(a, b);
        assert_ne!(a, hash_id_set(["ov_1"]));
    }

    #[test]
    fn connector_id_is_symmetric() {
        assert_eq!(connector_id("ep_x", "ep_y"), connector_id("ep_y", "ep_x"));
    }
}
