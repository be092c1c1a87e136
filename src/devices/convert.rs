//! Raw-value conversions shared by the drivers

/// Piecewise-linear lookup table
///
/// Maps raw counts to engineering units. Counts at or below the first
/// breakpoint clamp to the first value, counts at or above the last
/// breakpoint clamp to the last value, and anything in between is
/// interpolated between the two surrounding breakpoints.
#[derive(Debug, Clone, Copy)]
pub struct LookupTable<'a> {
    counts: &'a [u16],
    values: &'a [f32],
}

/// Lookup table construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Tables need at least one breakpoint
    Empty,
    /// `counts` and `values` differ in length
    LengthMismatch,
    /// Breakpoints must be strictly increasing
    NotIncreasing,
}

impl<'a> LookupTable<'a> {
    /// Build a table from matching breakpoint and value slices
    pub fn new(counts: &'a [u16], values: &'a [f32]) -> Result<Self, TableError> {
        if counts.is_empty() {
            return Err(TableError::Empty);
        }
        if counts.len() != values.len() {
            return Err(TableError::LengthMismatch);
        }
        if counts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TableError::NotIncreasing);
        }
        Ok(Self { counts, values })
    }

    /// Build a table from compile-time constants
    ///
    /// Applies the same checks as [`LookupTable::new`]. Bound to a `const`,
    /// a malformed table fails the build.
    ///
    /// # Panics
    ///
    /// If the slices are empty, differ in length or the breakpoints are not
    /// strictly increasing.
    pub const fn from_static(counts: &'a [u16], values: &'a [f32]) -> Self {
        assert!(!counts.is_empty(), "lookup table is empty");
        assert!(
            counts.len() == values.len(),
            "lookup table length mismatch"
        );
        let mut i = 1;
        while i < counts.len() {
            assert!(counts[i - 1] < counts[i], "lookup table not increasing");
            i += 1;
        }
        Self { counts, values }
    }

    /// Convert raw counts to the table's unit
    pub fn interpolate(&self, raw: u16) -> f32 {
        let (Some(&first), Some(&last)) = (self.counts.first(), self.counts.last()) else {
            return 0.0;
        };
        if raw <= first {
            return self.values[0];
        }
        if raw >= last {
            return self.values[self.values.len() - 1];
        }

        // First breakpoint strictly above `raw`; always in 1..len here
        let upper = self.counts.partition_point(|&c| c <= raw);
        let (c0, c1) = (self.counts[upper - 1] as f32, self.counts[upper] as f32);
        let (v0, v1) = (self.values[upper - 1], self.values[upper]);

        v0 + (v1 - v0) * (raw as f32 - c0) / (c1 - c0)
    }
}

/// Packed BCD byte to decimal
pub const fn bcd_to_dec(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// Decimal (0..=99) to packed BCD
pub const fn dec_to_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}

/// Sign-extend the low `bits` bits of `value`
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

/// Big-endian u16 from two bytes
pub const fn be_u16(hi: u8, lo: u8) -> u16 {
    ((hi as u16) << 8) | lo as u16
}

/// Big-endian u32 from the first four bytes of a frame
pub const fn be_u32(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}
