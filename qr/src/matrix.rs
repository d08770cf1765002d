//! Matrix construction: the module grid, function patterns, zig-zag
//! codeword placement, data masking and format/version information
//! (ISO 18004 Sections 6, 9 and 10, Annex C).
//!
//! The grid speaks in modules only; translating modules to pixels is
//! the renderer's job.

use crate::bits::BitBuffer;
use crate::EcLevel;

/// State of one cell of the matrix.
///
/// `Unset` and `Reserved` only occur while the symbol is under
/// construction: data placement writes every `Unset` cell and the
/// format/version information fills the `Reserved` ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Module {
    Unset,
    Dark,
    Light,
    Reserved,
}

/// An N x N module grid, N = 21 + 4 * (version - 1).
#[derive(Clone, Debug)]
pub struct Matrix {
    side: usize,
    cells: Vec<Module>,
    /// Cells fixed before data placement: function patterns and
    /// reserved information regions. These are never masked.
    func: Vec<bool>,
}

impl Matrix {
    pub(crate) fn new(version: usize) -> Self {
        debug_assert!((1..=40).contains(&version));
        let side = 21 + 4 * (version - 1);
        Self {
            side,
            cells: vec![Module::Unset; side * side],
            func: Vec::new(),
        }
    }

    /// Side length in modules.
    pub fn side(&self) -> usize {
        self.side
    }

    /// The cell state at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Module {
        self.cells[y * self.side + x]
    }

    /// The finished module at (x, y) for drawing: anything not dark
    /// reports light.
    pub fn module(&self, x: usize, y: usize) -> Module {
        match self.get(x, y) {
            Module::Dark => Module::Dark,
            _ => Module::Light,
        }
    }

    fn set(&mut self, x: usize, y: usize, module: Module) {
        self.cells[y * self.side + x] = module;
    }

    fn set_dark(&mut self, x: usize, y: usize, dark: bool) {
        self.set(x, y, if dark { Module::Dark } else { Module::Light });
    }

    fn is_dark(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Module::Dark
    }

    /// Stamp every function pattern and reserved region. Order matters:
    /// finders and separators first, then the dark module, alignment
    /// patterns, timing patterns (which fill only still-unset cells)
    /// and the information regions.
    pub(crate) fn stamp_function_patterns(&mut self, version: usize) {
        let n = self.side;

        for (x, y) in [(0, 0), (n - 7, 0), (0, n - 7)] {
            self.stamp_finder(x, y);
        }
        self.stamp_separators();
        self.set(8, n - 8, Module::Dark);
        self.stamp_alignment_patterns(version);
        self.stamp_timing_patterns();
        self.reserve_format_info();
        if version >= 7 {
            self.reserve_version_info();
        }

        self.func = self.cells.iter().map(|&c| c != Module::Unset).collect();
    }

    /// A 7x7 finder: dark border, light ring, dark 3x3 centre.
    fn stamp_finder(&mut self, x0: usize, y0: usize) {
        for dy in 0..7 {
            for dx in 0..7 {
                let border = dx == 0 || dx == 6 || dy == 0 || dy == 6;
                let centre = (2..=4).contains(&dx) && (2..=4).contains(&dy);
                self.set_dark(x0 + dx, y0 + dy, border || centre);
            }
        }
    }

    /// The one-module light ring inside each finder's data-facing edges.
    fn stamp_separators(&mut self) {
        let n = self.side;
        for i in 0..8 {
            // Top-left finder: column 7 and row 7.
            self.set(7, i, Module::Light);
            self.set(i, 7, Module::Light);
            // Top-right finder: column n-8 and row 7.
            self.set(n - 8, i, Module::Light);
            self.set(n - 1 - i, 7, Module::Light);
            // Bottom-left finder: row n-8 and column 7.
            self.set(i, n - 8, Module::Light);
            self.set(7, n - 1 - i, Module::Light);
        }
    }

    /// 5x5 alignment patterns centred on every pair of listed
    /// coordinates, except where the region would overlap a finder
    /// (detected by probing the centre cell).
    fn stamp_alignment_patterns(&mut self, version: usize) {
        let centres = crate::tables::alignment_pattern_centres(version);
        for &cy in centres {
            for &cx in centres {
                if self.get(cx, cy) != Module::Unset {
                    continue;
                }
                for dy in 0..5 {
                    for dx in 0..5 {
                        let border = dx == 0 || dx == 4 || dy == 0 || dy == 4;
                        let centre = dx == 2 && dy == 2;
                        self.set_dark(cx + dx - 2, cy + dy - 2, border || centre);
                    }
                }
            }
        }
    }

    /// Alternating modules in row 6 and column 6 between the finders,
    /// dark on even coordinates. Cells already claimed by an alignment
    /// pattern stay as they are.
    fn stamp_timing_patterns(&mut self) {
        let n = self.side;
        for i in 8..=n - 9 {
            let module = if i % 2 == 0 { Module::Dark } else { Module::Light };
            if self.get(i, 6) == Module::Unset {
                self.set(i, 6, module);
            }
            if self.get(6, i) == Module::Unset {
                self.set(6, i, module);
            }
        }
    }

    /// Reserve the 15 format cells along the top-left finder and the
    /// mirror strips along the top-right and bottom-left finders.
    fn reserve_format_info(&mut self) {
        let n = self.side;
        for i in 0..9 {
            if i != 6 {
                self.set(i, 8, Module::Reserved);
                self.set(8, i, Module::Reserved);
            }
        }
        for i in 0..8 {
            self.set(n - 1 - i, 8, Module::Reserved);
        }
        for i in 0..7 {
            self.set(8, n - 1 - i, Module::Reserved);
        }
    }

    /// Reserve the two 6x3 version information blocks (versions >= 7).
    fn reserve_version_info(&mut self) {
        let n = self.side;
        for a in 0..6 {
            for b in n - 11..=n - 9 {
                self.set(a, b, Module::Reserved);
                self.set(b, a, Module::Reserved);
            }
        }
    }

    /// Walk the zig-zag placement and paint the codeword stream: column
    /// pairs from the right edge, alternating up and down, skipping
    /// column 6 entirely. Only unset cells consume bits; a 1 bit paints
    /// dark.
    pub(crate) fn place_codewords(&mut self, stream: &BitBuffer) {
        let n = self.side as i32;
        let mut x = n - 1;
        let mut y = n - 1;
        let mut step = -1i32;
        let mut index = 0usize;

        while x > 0 {
            if x == 6 {
                x -= 1;
            }
            for dx in 0..2 {
                let (px, py) = ((x - dx) as usize, y as usize);
                if self.get(px, py) == Module::Unset {
                    self.set_dark(px, py, stream.bit(index));
                    index += 1;
                }
            }
            y += step;
            if y < 0 || y >= n {
                step = -step;
                y += step;
                x -= 2;
            }
        }

        assert_eq!(
            index,
            stream.len(),
            "codeword stream does not fill the data area exactly"
        );
    }

    /// Whether the mask with the given id inverts the module at (x, y).
    /// The eight predicates of ISO 18004 Section 10, with y as the row.
    fn mask_bit(mask: u8, x: usize, y: usize) -> bool {
        match mask {
            0 => (x + y) % 2 == 0,
            1 => y % 2 == 0,
            2 => x % 3 == 0,
            3 => (x + y) % 3 == 0,
            4 => (y / 2 + x / 3) % 2 == 0,
            5 => (x * y) % 2 + (x * y) % 3 == 0,
            6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
            7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
            _ => unreachable!("mask id out of range"),
        }
    }

    /// XOR a mask into the data modules. Applying the same mask twice
    /// restores the previous state.
    fn apply_mask(&mut self, mask: u8) {
        for y in 0..self.side {
            for x in 0..self.side {
                if !self.func[y * self.side + x] && Self::mask_bit(mask, x, y) {
                    let flipped = !self.is_dark(x, y);
                    self.set_dark(x, y, flipped);
                }
            }
        }
    }

    /// Try all eight masks, score each with the four penalty rules and
    /// keep the cheapest. Returns the chosen mask id.
    pub(crate) fn apply_best_mask(&mut self) -> u8 {
        let mut best = 0u8;
        let mut best_penalty = u32::MAX;

        for mask in 0..8 {
            self.apply_mask(mask);
            let penalty = self.penalty();
            if penalty < best_penalty {
                best_penalty = penalty;
                best = mask;
            }
            self.apply_mask(mask);
        }

        self.apply_mask(best);
        best
    }

    /// The four penalty rules of ISO 18004 Section 10.3. Cells that are
    /// not dark count as light.
    fn penalty(&self) -> u32 {
        let n = self.side;
        let mut penalty = 0u32;

        // Rule 1: runs of five or more same-coloured modules.
        for y in 0..n {
            penalty += run_penalty((0..n).map(|x| self.is_dark(x, y)));
        }
        for x in 0..n {
            penalty += run_penalty((0..n).map(|y| self.is_dark(x, y)));
        }

        // Rule 2: 2x2 blocks of one colour.
        for y in 0..n - 1 {
            for x in 0..n - 1 {
                let c = self.is_dark(x, y);
                if c == self.is_dark(x + 1, y)
                    && c == self.is_dark(x, y + 1)
                    && c == self.is_dark(x + 1, y + 1)
                {
                    penalty += 3;
                }
            }
        }

        // Rule 3: 1:1:3:1:1 finder-like sequences with a four-module
        // light margin on either side.
        const PATTERN: [bool; 11] = [
            true, false, true, true, true, false, true, false, false, false, false,
        ];
        let matches = |probe: &dyn Fn(usize) -> bool| {
            let forward = (0..11).all(|i| probe(i) == PATTERN[i]);
            let backward = (0..11).all(|i| probe(i) == PATTERN[10 - i]);
            forward || backward
        };
        for y in 0..n {
            for x0 in 0..=n - 11 {
                if matches(&|i| self.is_dark(x0 + i, y)) {
                    penalty += 40;
                }
            }
        }
        for x in 0..n {
            for y0 in 0..=n - 11 {
                if matches(&|i| self.is_dark(x, y0 + i)) {
                    penalty += 40;
                }
            }
        }

        // Rule 4: deviation of the dark-module proportion from 50%.
        let dark = self.cells.iter().filter(|&&c| c == Module::Dark).count();
        let percent = dark * 100 / (n * n);
        let deviation = (percent as i32 - 50).unsigned_abs();
        penalty += deviation / 5 * 10;

        penalty
    }

    /// Place both copies of the 15 format information bits for the
    /// given level and mask (ISO 18004 Annex C).
    pub(crate) fn place_format_info(&mut self, level: EcLevel, mask: u8) {
        let n = self.side;
        let word = format_bits(((level.format_indicator()) << 3) | mask as u32);
        let bit = |i: usize| word >> i & 1 == 1;

        // First copy, bent around the top-left finder: bits 0..5 down
        // column 8, the corner cells, then bits 9..14 leftward along
        // row 8.
        for i in 0..6 {
            self.set_dark(8, i, bit(i));
        }
        self.set_dark(8, 7, bit(6));
        self.set_dark(8, 8, bit(7));
        self.set_dark(7, 8, bit(8));
        for i in 9..15 {
            self.set_dark(14 - i, 8, bit(i));
        }

        // Second copy, split between the top-right and bottom-left
        // strips.
        for i in 0..8 {
            self.set_dark(n - 1 - i, 8, bit(i));
        }
        for i in 8..15 {
            self.set_dark(8, n - 15 + i, bit(i));
        }
    }

    /// Place both copies of the 18 version information bits
    /// (versions >= 7).
    pub(crate) fn place_version_info(&mut self, version: usize) {
        let n = self.side;
        let word = version_bits(version as u32);
        for i in 0..18 {
            let dark = word >> i & 1 == 1;
            let (a, b) = (i / 3, n - 11 + i % 3);
            self.set_dark(a, b, dark);
            self.set_dark(b, a, dark);
        }
    }
}

fn run_penalty(line: impl Iterator<Item = bool>) -> u32 {
    let mut penalty = 0u32;
    let mut run = 0usize;
    let mut colour = None;

    for module in line {
        if Some(module) == colour {
            run += 1;
        } else {
            if run >= 5 {
                penalty += run as u32 - 2;
            }
            colour = Some(module);
            run = 1;
        }
    }
    if run >= 5 {
        penalty += run as u32 - 2;
    }
    penalty
}

/// BCH(15,5)-encode the five data bits (level indicator and mask id)
/// and apply the fixed XOR mask that keeps the word non-zero.
fn format_bits(data: u32) -> u32 {
    debug_assert!(data < 32);
    let mut rem = data << 10;
    let generator = 0b101_0011_0111;
    for i in (0..=4).rev() {
        if rem >> (i + 10) & 1 == 1 {
            rem ^= generator << i;
        }
    }
    ((data << 10) | rem) ^ 0b101_0100_0001_0010
}

/// BCH(18,6)-encode the six version bits.
fn version_bits(version: u32) -> u32 {
    debug_assert!((7..=40).contains(&version));
    let mut rem = version << 12;
    let generator = 0b1_1111_0010_0101;
    for i in (0..=5).rev() {
        if rem >> (i + 12) & 1 == 1 {
            rem ^= generator << i;
        }
    }
    (version << 12) | rem
}
