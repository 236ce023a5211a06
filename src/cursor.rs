// Copyright (c) 2024, The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use snafu::prelude::*;

/// A deterministic decoder that carves typed values out of a raw fuzzer input.
///
/// The cursor borrows the input buffer and keeps a single read offset.
/// Every extraction either consumes exactly the requested number of bytes or fails with
/// [`CursorError::Exhausted`] and leaves the offset untouched, so a failed read never partially consumes input.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

/// Errors that can arise relating to [`ByteCursor`].
#[derive(Debug, Eq, PartialEq, Snafu)]
pub enum CursorError {
    /// Fewer bytes remain than were requested.
    #[snafu(display("Requested {requested} bytes but only {remaining} remain"))]
    Exhausted { requested: usize, remaining: usize },
}

impl<'a> ByteCursor<'a> {
    /// Wrap an input buffer with the offset at its start.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Get the current read offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the number of unread bytes.
    pub fn remaining(&self) -> usize {
        // The offset never exceeds the buffer length
        self.data.len() - self.offset
    }

    /// Get the entire underlying buffer, independent of the offset.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Take the next `n` bytes.
    ///
    /// If fewer than `n` bytes remain, returns a [`CursorError`] and does not advance.
    pub fn take_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        let remaining = self.remaining();
        ensure!(n <= remaining, ExhaustedSnafu { requested: n, remaining });

        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;

        Ok(bytes)
    }

    /// Take the next `N` bytes as a fixed-size array.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take_bytes(N)?);

        Ok(array)
    }

    /// Take a single byte.
    pub fn take_u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.take_array::<1>()?[0])
    }

    /// Take a boolean from the low bit of a single byte.
    pub fn take_bool(&mut self) -> Result<bool, CursorError> {
        Ok(self.take_u8()? & 1 == 1)
    }

    /// Take a little-endian `u32`.
    pub fn take_u32(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Take a little-endian `u64`.
    pub fn take_u64(&mut self) -> Result<u64, CursorError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Take a little-endian `i64`.
    pub fn take_i64(&mut self) -> Result<i64, CursorError> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }
}
