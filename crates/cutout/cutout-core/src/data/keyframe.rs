/// Anything placed on a track at an integer time.
pub trait Keyframe {
    fn time(&self) -> f64;
}

/// Index of the last keyframe with `time <= query`, by bisection.
///
/// `None` when `keys` is empty or `query` precedes the first keyframe. At or
/// past the last keyframe the last index is returned; wrapping is the
/// caller's business.
pub fn find<K: Keyframe>(keys: &[K], time: f64) -> Option<usize> {
    let first = keys.first()?;
    if time < first.time() {
        return None;
    }
    let last = keys.len() - 1;
    if time >= keys[last].time() {
        return Some(last);
    }
    // keys[lo].time <= time < keys[hi].time
    let mut lo = 0;
    let mut hi = last;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if keys[mid].time() <= time {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(lo)
}

/// Stable ascending sort by time.
pub(crate) fn sort_by_time<K: Keyframe>(keys: &mut [K]) {
    keys.sort_by(|a, b| a.time().total_cmp(&b.time()));
}
