//! Byte-lane and sign-extension helpers used by the register adapter.
//!
//! These are public so host-side tooling can prepare strobed writes the same
//! way the adapter applies them.

use arbitrary_int::u4;

/// Byte-enable mask selecting all four lanes.
pub const STROBE_ALL: u4 = u4::new(0xF);

/// Expands a 4-bit byte-enable mask into a 32-bit lane mask.
///
/// Bit `n` of `strobe` enables byte lane `n` (bits `8n..8n+8`).
///
/// # Example
/// ```
/// use arbitrary_int::u4;
/// use gnss_track_bridge::bridge::helpers::lane_mask;
///
/// assert_eq!(lane_mask(u4::new(0b1010)), 0xFF00_FF00);
/// assert_eq!(lane_mask(u4::new(0b0001)), 0x0000_00FF);
/// ```
pub fn lane_mask(strobe: u4) -> u32 {
    let bits = strobe.value();
    let mut mask = 0u32;
    for lane in 0..4 {
        if bits & (1 << lane) != 0 {
            mask |= 0xFF << (lane * 8);
        }
    }
    mask
}

/// Merges `new` into `old`, replacing only the lanes enabled in `strobe`.
///
/// # Example
/// ```
/// use arbitrary_int::u4;
/// use gnss_track_bridge::bridge::helpers::merge_lanes;
///
/// let merged = merge_lanes(0x1122_3344, 0xAABB_CCDD, u4::new(0b1010));
/// assert_eq!(merged, 0xAA22_CC44);
/// ```
pub fn merge_lanes(old: u32, new: u32, strobe: u4) -> u32 {
    let mask = lane_mask(strobe);
    (old & !mask) | (new & mask)
}

/// Sign-extends a 16-bit accumulator to a 32-bit register word.
#[inline]
pub fn sign_extend_i16(value: i16) -> u32 {
    i32::from(value) as u32
}

#[test]
fn lane_mask_edge_cases() {
    assert_eq!(lane_mask(u4::new(0)), 0);
    assert_eq!(lane_mask(STROBE_ALL), u32::MAX);
    assert_eq!(lane_mask(u4::new(0b0100)), 0x00FF_0000);
}

#[test]
fn merge_keeps_disabled_lanes() {
    assert_eq!(merge_lanes(0xDEAD_BEEF, 0, u4::new(0)), 0xDEAD_BEEF);
    assert_eq!(merge_lanes(0xDEAD_BEEF, 0x1234_5678, STROBE_ALL), 0x1234_5678);
    assert_eq!(merge_lanes(0x0000_0000, 0xFFFF_FFFF, u4::new(0b0001)), 0xFF);
}

#[test]
fn sign_extension() {
    assert_eq!(sign_extend_i16(-1), 0xFFFF_FFFF);
    assert_eq!(sign_extend_i16(-32768), 0xFFFF_8000);
    assert_eq!(sign_extend_i16(0x7FFF), 0x0000_7FFF);
}
