//! 1-bit page codec.
//!
//! Pixels are packed eight to a byte, most significant bit first: the first
//! pixel of a group lands in bit 7 and the eighth in bit 0. Which bit value
//! means "black" depends on the panel driver the output is meant for, so the
//! packer takes an explicit [`Polarity`]:
//!
//! - [`Polarity::SetOnBlack`] starts every byte at `0x00` and sets a bit for each
//!   black pixel. Raw `.ebm` files use this.
//! - [`Polarity::ClearOnBlack`] starts every byte at `0xFF` and clears a bit for
//!   each black pixel. Header arrays use this.
//!
//! For the same pixels, the two encodings are bitwise complements of each other.

use serde::Serialize;

use crate::error::CoreError;

/// A single binarized sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Black,
    White,
}

impl Pixel {
    /// Classify a binarized luminance value: only pure black counts as black.
    pub fn from_luma(luma: u8) -> Self {
        if luma == 0 {
            Pixel::Black
        } else {
            Pixel::White
        }
    }

    pub fn is_black(&self) -> bool {
        matches!(self, Pixel::Black)
    }
}

/// Meaning of a set bit in a packed byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Polarity {
    /// `1` is black. Accumulator starts at `0x00`.
    SetOnBlack,
    /// `0` is black. Accumulator starts at `0xFF`.
    ClearOnBlack,
}

impl Polarity {
    /// Value of a byte before any pixel has been written to it.
    pub fn initial(&self) -> u8 {
        match self {
            Polarity::SetOnBlack => 0x00,
            Polarity::ClearOnBlack => 0xFF,
        }
    }

    fn apply(&self, byte: u8, bit: u8, pixel: Pixel) -> u8 {
        match (self, pixel) {
            (_, Pixel::White) => byte,
            (Polarity::SetOnBlack, Pixel::Black) => byte | (1 << bit),
            (Polarity::ClearOnBlack, Pixel::Black) => byte & !(1 << bit),
        }
    }

    fn read(&self, byte: u8, bit: u8) -> Pixel {
        let set = byte & (1 << bit) != 0;
        match (self, set) {
            (Polarity::SetOnBlack, true) | (Polarity::ClearOnBlack, false) => Pixel::Black,
            _ => Pixel::White,
        }
    }
}

/// Number of bytes needed to hold `pixels` packed samples.
pub fn bytes_for_pixels(pixels: usize) -> usize {
    pixels.div_ceil(8)
}

/// Accumulator for one page record.
///
/// A packer is created per page and consumed by [`BitPacker::finish`], so no
/// bit position or partial byte can leak from one page into the next.
#[derive(Debug)]
pub struct BitPacker {
    polarity: Polarity,
    expected: usize,
    written: usize,
    current: u8,
    bit: u8,
    out: Vec<u8>,
}

impl BitPacker {
    pub fn new(polarity: Polarity, pixel_count: usize) -> Self {
        Self {
            polarity,
            expected: pixel_count,
            written: 0,
            current: polarity.initial(),
            bit: 7,
            out: Vec::with_capacity(bytes_for_pixels(pixel_count)),
        }
    }

    /// Whether every expected pixel has been pushed.
    pub fn is_full(&self) -> bool {
        self.written >= self.expected
    }

    /// Add the next pixel. Pixels past the expected count are ignored.
    pub fn push(&mut self, pixel: Pixel) {
        if self.is_full() {
            return;
        }

        self.current = self.polarity.apply(self.current, self.bit, pixel);
        self.written += 1;

        if self.bit == 0 {
            self.out.push(self.current);
            self.current = self.polarity.initial();
            self.bit = 7;
        } else {
            self.bit -= 1;
        }
    }

    /// Close the record, flushing a trailing partial byte if there is one.
    pub fn finish(mut self) -> Result<Vec<u8>, CoreError> {
        if self.written < self.expected {
            return Err(CoreError::ShortPage {
                expected: self.expected,
                actual: self.written,
            });
        }
        if self.bit != 7 {
            self.out.push(self.current);
        }
        Ok(self.out)
    }
}

/// Pack exactly `pixel_count` samples into a page record.
///
/// The iterator is only advanced `pixel_count` times. Running out early is an
/// error rather than a short record.
pub fn pack_page<I>(samples: I, pixel_count: usize, polarity: Polarity) -> Result<Vec<u8>, CoreError>
where
    I: IntoIterator<Item = Pixel>,
{
    let mut packer = BitPacker::new(polarity, pixel_count);
    for pixel in samples.into_iter().take(pixel_count) {
        packer.push(pixel);
    }
    packer.finish()
}

/// Read `pixel_count` samples back out of a page record.
pub fn unpack(record: &[u8], pixel_count: usize, polarity: Polarity) -> Vec<Pixel> {
    record
        .iter()
        .flat_map(|&byte| (0..8u8).rev().map(move |bit| polarity.read(byte, bit)))
        .take(pixel_count)
        .collect()
}
