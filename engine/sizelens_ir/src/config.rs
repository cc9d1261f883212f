//! Engine configuration.

/// Knobs recognized by the attribution engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttrConfig {
    /// Size charged to a node that has only a bare start address and no
    /// ranges. `0` disables attribution for such nodes entirely.
    pub single_address_size: u64,

    /// When set, anonymous nodes are not reported; their bytes still
    /// flow into their parent's accounting.
    pub ignore_unnamed: bool,
}

impl Default for AttrConfig {
    fn default() -> Self {
        AttrConfig {
            single_address_size: 1,
            ignore_unnamed: false,
        }
    }
}
