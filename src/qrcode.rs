#![forbid(unsafe_code)]
//! QR code encoding.
//!
//! Turns text into a QR Code Model 2 module matrix. Versions 1 to 40 and all four error
//! correction levels are supported; text is packed as a single numeric, alphanumeric or byte
//! segment, whichever is the most compact one that can hold every character.

/// A QR Code symbol: a square grid of dark and light modules.
///
/// Instances are immutable once [`QrCode::encode_text`] or [`QrCode::encode_segments`] returns.
///
/// # Example
///
/// ```rust
/// use qrstyle::qrcode::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("HELLO", QrCodeEcc::High).unwrap();
/// assert_eq!(qr.version().value(), 1);
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,
    size: i32,
    ecl: QrCodeEcc,
    mask: Mask,
    /// Row-major, `true` = dark.
    modules: Vec<bool>,
    /// Marks function patterns while the symbol is being built; emptied afterwards.
    isfunction: Vec<bool>,
}

impl QrCode {
    /// Encodes a text string at exactly the given error correction level.
    ///
    /// The smallest version that can hold the text is selected automatically, and the mask
    /// pattern with the lowest penalty score is applied.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to encode.
    /// * `ecl` - Error correction level.
    ///
    /// # Returns
    ///
    /// The QR code, or [`DataTooLong`] if the text exceeds the capacity of version 40.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self, DataTooLong> {
        let segs: Vec<QrSegment> = if text.is_empty() {
            Vec::new()
        } else {
            vec![QrSegment::make_segment(text)]
        };
        QrCode::encode_segments(&segs, ecl, Version::MIN, Version::MAX, None)
    }

    /// Encodes the given segments, choosing the smallest version in
    /// `minversion..=maxversion` that fits them.
    ///
    /// `mask` can be `None` for automatic selection.
    pub fn encode_segments(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>
    ) -> Result<Self, DataTooLong> {
        assert!(minversion <= maxversion, "Invalid version range");

        // Find the minimal version number to use
        let mut version: Version = minversion;
        let datausedbits: usize = loop {
            let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
            let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
            match dataused {
                Some(n) if n <= datacapacitybits => break n,
                _ if version >= maxversion => {
                    return Err(match dataused {
                        None => DataTooLong::SegmentTooLong,
                        Some(n) => DataTooLong::DataOverCapacity(n, datacapacitybits),
                    });
                }
                _ => {
                    version = Version::new(version.value() + 1);
                }
            }
        };

        // Concatenate all segments to create the data bit string
        let mut bb = BitBuffer::default();
        for seg in segs {
            bb.append_bits(seg.mode.mode_bits(), 4);
            bb.append_bits(seg.numchars as u32, seg.mode.num_char_count_bits(version));
            bb.0.extend_from_slice(&seg.data);
        }
        debug_assert_eq!(bb.len(), datausedbits);

        // Add terminator and pad up to a byte if applicable
        let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
        let numzerobits: usize = core::cmp::min(4, datacapacitybits - bb.len());
        bb.append_bits(0, numzerobits as u8);
        let numzerobits: usize = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xec, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }

        let mut datacodewords = vec![0u8; bb.len() / 8];
        for (i, &bit) in bb.0.iter().enumerate() {
            datacodewords[i >> 3] |= u8::from(bit) << (7 - (i & 7));
        }
        Ok(QrCode::encode_codewords(version, ecl, &datacodewords, mask))
    }

    /// Builds the symbol from finished data codewords: computes error correction,
    /// draws every pattern and applies the mask.
    fn encode_codewords(
        version: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        mask: Option<Mask>
    ) -> Self {
        let size = i32::from(version.value()) * 4 + 17;
        let cells = (size * size) as usize;
        let mut result = Self {
            version,
            size,
            ecl,
            mask: Mask::new(0),
            modules: vec![false; cells],
            isfunction: vec![false; cells],
        };

        result.draw_function_patterns();
        let allcodewords: Vec<u8> = result.add_ecc_and_interleave(datacodewords);
        result.draw_codewords(&allcodewords);

        let mask: Mask = match mask {
            Some(m) => m,
            None => result.choose_mask(),
        };
        result.mask = mask;
        result.apply_mask(mask);
        result.draw_format_bits(mask);
        result.isfunction = Vec::new();
        result
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the
    /// symbol return `false`, which is what the quiet zone needs.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.module(x, y)
    }

    fn module(&self, x: i32, y: i32) -> bool {
        self.modules[(y * self.size + x) as usize]
    }

    fn module_mut(&mut self, x: i32, y: i32) -> &mut bool {
        &mut self.modules[(y * self.size + x) as usize]
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        *self.module_mut(x, y) = isdark;
        self.isfunction[(y * self.size + x) as usize] = true;
    }

    fn is_function(&self, x: i32, y: i32) -> bool {
        self.isfunction[(y * self.size + x) as usize]
    }

    fn draw_function_patterns(&mut self) {
        let size: i32 = self.size;
        for i in 0..size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(size - 4, 3);
        self.draw_finder_pattern(3, size - 4);

        // Alignment patterns, skipping the three corners taken by finder patterns
        let alignpatpos: Vec<i32> = self.get_alignment_pattern_positions();
        let last: usize = alignpatpos.len().saturating_sub(1);
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
                if !corner {
                    self.draw_alignment_pattern(pos0, pos1);
                }
            }
        }

        // Reserve the format area; the real bits are drawn after masking
        self.draw_format_bits(Mask::new(0));
        self.draw_version();
    }

    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx: i32 = x + dx;
                let yy: i32 = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist: i32 = dx.abs().max(dy.abs());
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn draw_format_bits(&mut self, mask: Mask) {
        let bits: u32 = {
            let data = (self.ecl.format_bits() << 3) | u32::from(mask.value());
            let mut rem: u32 = data;
            for _ in 0..10 {
                rem = (rem << 1) ^ ((rem >> 9) * 0x537);
            }
            ((data << 10) | rem) ^ 0x5412
        };

        // First copy, around the top-left finder
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        // Second copy, split between the other two finders
        let size: i32 = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    fn draw_version(&mut self) {
        let ver = u32::from(self.version.value());
        if ver < 7 {
            return;
        }
        let bits: u32 = {
            let mut rem: u32 = ver;
            for _ in 0..12 {
                rem = (rem << 1) ^ ((rem >> 11) * 0x1f25);
            }
            (ver << 12) | rem
        };
        for i in 0..18 {
            let bit: bool = get_bit(bits, i);
            let a: i32 = self.size - 11 + (i % 3);
            let b: i32 = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    fn add_ecc_and_interleave(&self, data: &[u8]) -> Vec<u8> {
        let ver: Version = self.version;
        let ecl: QrCodeEcc = self.ecl;
        debug_assert_eq!(data.len(), QrCode::get_num_data_codewords(ver, ecl));

        let numblocks: usize = QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let blockecclen: usize = QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords: usize = QrCode::get_num_raw_data_modules(ver) / 8;
        let numshortblocks: usize = numblocks - (rawcodewords % numblocks);
        let shortblocklen: usize = rawcodewords / numblocks;

        // Split into blocks; short blocks get a placeholder byte so all blocks align
        let rs = ReedSolomonGenerator::new(blockecclen);
        let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(numblocks);
        let mut rest: &[u8] = data;
        for i in 0..numblocks {
            let datlen: usize = shortblocklen - blockecclen + usize::from(i >= numshortblocks);
            let (dat, tail) = rest.split_at(datlen);
            rest = tail;
            let mut block: Vec<u8> = dat.to_vec();
            if i < numshortblocks {
                block.push(0);
            }
            block.extend(rs.compute_remainder(dat));
            blocks.push(block);
        }
        debug_assert!(rest.is_empty());

        let mut result: Vec<u8> = Vec::with_capacity(rawcodewords);
        for i in 0..=shortblocklen {
            for (j, block) in blocks.iter().enumerate() {
                if i != shortblocklen - blockecclen || j >= numshortblocks {
                    result.push(block[i]);
                }
            }
        }
        debug_assert_eq!(result.len(), rawcodewords);
        result
    }

    fn draw_codewords(&mut self, data: &[u8]) {
        debug_assert_eq!(data.len(), QrCode::get_num_raw_data_modules(self.version) / 8);
        let size: i32 = self.size;
        let mut i: usize = 0;
        let mut right: i32 = size - 1;
        // Zigzag over column pairs, skipping the vertical timing pattern
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            for vert in 0..size {
                for j in 0..2 {
                    let x: i32 = right - j;
                    let upward: bool = ((right + 1) & 2) == 0;
                    let y: i32 = if upward { size - 1 - vert } else { vert };
                    if !self.is_function(x, y) && i < data.len() * 8 {
                        *self.module_mut(x, y) = get_bit(
                            u32::from(data[i >> 3]),
                            7 - ((i as i32) & 7)
                        );
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, data.len() * 8);
    }

    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                if self.is_function(x, y) {
                    continue;
                }
                let invert: bool = match mask.value() {
                    0 => (x + y) % 2 == 0,
                    1 => y % 2 == 0,
                    2 => x % 3 == 0,
                    3 => (x + y) % 3 == 0,
                    4 => (x / 3 + y / 2) % 2 == 0,
                    5 => ((x * y) % 2) + ((x * y) % 3) == 0,
                    6 => (((x * y) % 2) + ((x * y) % 3)) % 2 == 0,
                    7 => (((x + y) % 2) + ((x * y) % 3)) % 2 == 0,
                    _ => unreachable!(),
                };
                *self.module_mut(x, y) ^= invert;
            }
        }
    }

    /// Tries all eight masks and keeps the one with the lowest penalty. Leaves the
    /// symbol unmasked on return.
    fn choose_mask(&mut self) -> Mask {
        let mut best = Mask::new(0);
        let mut minpenalty = i32::MAX;
        for i in 0u8..8 {
            let candidate = Mask::new(i);
            self.apply_mask(candidate);
            self.draw_format_bits(candidate);
            let penalty: i32 = self.get_penalty_score();
            if penalty < minpenalty {
                best = candidate;
                minpenalty = penalty;
            }
            self.apply_mask(candidate); // XOR undoes it
        }
        best
    }

    fn get_penalty_score(&self) -> i32 {
        let mut result: i32 = 0;
        let size: i32 = self.size;

        // Runs and finder-like patterns, rows then columns
        for transpose in [false, true] {
            for a in 0..size {
                let mut runcolor = false;
                let mut runlen: i32 = 0;
                let mut runhistory = FinderPenalty::new(size);
                for b in 0..size {
                    let color = if transpose { self.module(a, b) } else { self.module(b, a) };
                    if color == runcolor {
                        runlen += 1;
                        if runlen == 5 {
                            result += PENALTY_N1;
                        } else if runlen > 5 {
                            result += 1;
                        }
                    } else {
                        runhistory.add_history(runlen);
                        if !runcolor {
                            result += runhistory.count_patterns() * PENALTY_N3;
                        }
                        runcolor = color;
                        runlen = 1;
                    }
                }
                result += runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3;
            }
        }

        // 2x2 blocks of one color
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color: bool = self.module(x, y);
                if
                    color == self.module(x + 1, y) &&
                    color == self.module(x, y + 1) &&
                    color == self.module(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Dark/light balance
        let dark = self.modules.iter().filter(|&&m| m).count() as i32;
        let total = size * size;
        let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        result += k * PENALTY_N4;
        result
    }

    fn get_alignment_pattern_positions(&self) -> Vec<i32> {
        let ver = i32::from(self.version.value());
        if ver == 1 {
            return Vec::new();
        }
        let numalign: i32 = ver / 7 + 2;
        let step: i32 = if ver == 32 {
            26
        } else {
            ((ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2)) * 2
        };
        let mut result: Vec<i32> = (0..numalign - 1).map(|i| self.size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }

    fn get_num_raw_data_modules(ver: Version) -> usize {
        let ver = usize::from(ver.value());
        let mut result: usize = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign: usize = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        result
    }

    fn get_num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
        QrCode::get_num_raw_data_modules(ver) / 8 -
            QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl) *
                QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
    }

    fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
        table[ecl.ordinal()][usize::from(ver.value())] as usize
    }
}

struct ReedSolomonGenerator {
    divisor: Vec<u8>,
}

impl ReedSolomonGenerator {
    fn new(degree: usize) -> Self {
        assert!((1..=30).contains(&degree), "Degree out of range");
        // Monomial x^0, then multiply by (x - r^i) for each root
        let mut divisor: Vec<u8> = vec![0u8; degree];
        divisor[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Self::multiply(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Self::multiply(root, 0x02);
        }
        Self { divisor }
    }

    fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result: Vec<u8> = vec![0u8; self.divisor.len()];
        for b in data {
            let factor: u8 = b ^ result[0];
            result.copy_within(1.., 0);
            let last = result.len() - 1;
            result[last] = 0;
            for (x, &y) in result.iter_mut().zip(self.divisor.iter()) {
                *x ^= Self::multiply(y, factor);
            }
        }
        result
    }

    // GF(2^8) with modulus 0x11D
    fn multiply(x: u8, y: u8) -> u8 {
        let mut z: u8 = 0;
        for i in (0..8).rev() {
            z = (z << 1) ^ ((z >> 7) * 0x1d);
            z ^= ((y >> i) & 1) * x;
        }
        z
    }
}

struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // light border
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) +
            i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// The 2-bit value stored in the format information.
    fn format_bits(self) -> u32 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

/// A segment of data in a QR code, already converted to its bit representation.
#[derive(Clone, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: Vec<bool>,
}

impl QrSegment {
    /// Picks the most compact mode able to hold all of `text` and builds the segment.
    pub fn make_segment(text: &str) -> Self {
        QrSegment::make_numeric(text)
            .or_else(|| QrSegment::make_alphanumeric(text))
            .unwrap_or_else(|| QrSegment::make_bytes(text.as_bytes()))
    }

    /// Creates a byte mode segment.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer(Vec::with_capacity(data.len() * 8));
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        QrSegment { mode: QrSegmentMode::Byte, numchars: data.len(), data: bb.0 }
    }

    /// Creates a numeric mode segment, or `None` if `text` holds anything but `0`-`9`.
    pub fn make_numeric(text: &str) -> Option<Self> {
        if !QrSegment::is_numeric(text) {
            return None;
        }
        let mut bb = BitBuffer::default();
        for chunk in text.as_bytes().chunks(3) {
            let value = chunk.iter().fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
            bb.append_bits(value, (chunk.len() * 3 + 1) as u8);
        }
        Some(QrSegment { mode: QrSegmentMode::Numeric, numchars: text.len(), data: bb.0 })
    }

    /// Creates an alphanumeric mode segment, or `None` if `text` has characters outside
    /// `0`-`9`, `A`-`Z` (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    pub fn make_alphanumeric(text: &str) -> Option<Self> {
        let values: Vec<u32> = text
            .chars()
            .map(|c| ALPHANUMERIC_CHARSET.find(c).and_then(|i| u32::try_from(i).ok()))
            .collect::<Option<_>>()?;
        let mut bb = BitBuffer::default();
        for pair in values.chunks(2) {
            match pair {
                &[a, b] => bb.append_bits(a * 45 + b, 11),
                &[a] => bb.append_bits(a, 6),
                _ => unreachable!(),
            }
        }
        Some(QrSegment { mode: QrSegmentMode::Alphanumeric, numchars: values.len(), data: bb.0 })
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if seg.numchars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl QrSegmentMode {
    fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (
            match self {
                Numeric => [10, 12, 14],
                Alphanumeric => [9, 11, 13],
                Byte => [8, 16, 16],
            }
        )[usize::from((ver.value() + 7) / 17)]
    }
}

/// Growable bit sequence, most significant bit first.
#[derive(Default)]
struct BitBuffer(Vec<bool>);

impl BitBuffer {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        self.0.extend((0..len).rev().map(|i| get_bit(val, i32::from(i))));
    }
}

/// The text does not fit in any QR code version at the requested error correction level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataTooLong {
    /// A segment has more characters than its count field can express.
    #[error("Segment too long")]
    SegmentTooLong,
    /// Data length exceeds capacity.
    #[error("Data length = {0} bits, Max capacity = {1} bits")]
    DataOverCapacity(usize, usize),
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length in modules, without any quiet zone.
    pub const fn size(self) -> i32 {
        (self.0 as i32) * 4 + 17
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }
}

fn get_bit(x: u32, i: i32) -> bool {
    ((x >> i) & 1) != 0
}
