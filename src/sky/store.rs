// Shared blackboard of live cloud descriptors.
//
// The day renderer is the only writer and receives `&mut SkyStore`; the
// precipitation renderer reads through `&SkyStore`. Slots are stable: slot i
// always describes the same cloud until the next `reset`.

/// A cloud as seen by other renderers, in virtual pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudSnapshot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub is_visible: bool,
    /// Draw/attenuation rank. Larger and lower-on-screen clouds rank higher.
    pub z_index: i32,
}

impl CloudSnapshot {
    /// Bottom edge of the cloud body, where raindrops emerge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Depth rank derived from a cloud's size and vertical position.
pub fn depth_order(width: f64, y: f64) -> i32 {
    (width / 50.0 + y / 100.0).floor() as i32
}

#[derive(Debug, Default)]
pub struct SkyStore {
    clouds: Vec<CloudSnapshot>,
}

impl SkyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cloud set (initialization and resize).
    pub fn reset(&mut self, clouds: Vec<CloudSnapshot>) {
        self.clouds = clouds;
    }

    pub fn clear(&mut self) {
        self.clouds.clear();
    }

    /// Overwrite the snapshot in `slot`. Writes past the end are ignored so a
    /// stale writer can never grow the set.
    pub fn publish(&mut self, slot: usize, snapshot: CloudSnapshot) {
        if let Some(existing) = self.clouds.get_mut(slot) {
            *existing = snapshot;
        }
    }

    pub fn get(&self, slot: usize) -> Option<&CloudSnapshot> {
        self.clouds.get(slot)
    }

    pub fn clouds(&self) -> &[CloudSnapshot] {
        &self.clouds
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(x: f64) -> CloudSnapshot {
        CloudSnapshot {
            x,
            y: 40.0,
            width: 120.0,
            height: 72.0,
            speed: 0.2,
            is_visible: true,
            z_index: depth_order(120.0, 40.0),
        }
    }

    #[test]
    fn publish_replaces_in_place() {
        let mut store = SkyStore::new();
        store.reset(vec![cloud(0.0), cloud(10.0)]);
        store.publish(1, cloud(99.0));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().x, 99.0);
        assert_eq!(store.get(0).unwrap().x, 0.0);
    }

    #[test]
    fn publish_out_of_range_is_ignored() {
        let mut store = SkyStore::new();
        store.reset(vec![cloud(0.0)]);
        store.publish(5, cloud(1.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn depth_order_grows_with_size_and_depth() {
        assert_eq!(depth_order(100.0, 0.0), 2);
        assert_eq!(depth_order(100.0, 250.0), 4);
        assert!(depth_order(250.0, 10.0) > depth_order(80.0, 10.0));
    }
}
