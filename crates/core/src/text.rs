//! Text marshalling across the packet boundary.
//!
//! Text crosses the boundary as a pointer and an explicit length over memory
//! the receiver does not own. Nothing guarantees a terminator on the other
//! side, and the buffer is only valid for the duration of the call that
//! carries it.
//!
//! - [`TextValue`] is a borrowed view. Its lifetime ties the view to the
//!   buffer, so a handler cannot keep inbound text past its return.
//! - [`RawText`] is the `(pointer, length)` handle itself.
//! - [`InspectionBuffer`] is a locally owned, NUL-terminated copy bounded by
//!   a fixed capacity. Inbound text is always bounded this way before it is
//!   searched.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Capacity of the buffer used to inspect inbound text, terminator included.
pub const DEFAULT_INSPECTION_CAPACITY: usize = 1024;

/// Largest inspection capacity a content table may configure.
pub const MAX_INSPECTION_CAPACITY: usize = 64 * 1024;

/// Borrowed view over a byte sequence with an explicit length.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextValue<'a> {
    bytes: &'a [u8],
}

impl<'a> TextValue<'a> {
    /// Creates a view over a string slice.
    pub const fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
        }
    }

    /// Creates a view over raw bytes. No encoding validation is performed.
    pub const fn from_bytes(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Reconstructs a view from a boundary handle.
    ///
    /// A null pointer decodes to the empty text regardless of `len`.
    ///
    /// # Safety
    ///
    /// Unless null, `raw.ptr` must point to `raw.len` initialized bytes that
    /// stay valid and unmodified for `'a`. Callers pick `'a` no longer than
    /// the call that handed them the handle.
    pub unsafe fn from_raw(raw: RawText<'a>) -> Self {
        if raw.ptr.is_null() {
            return Self::default();
        }
        // SAFETY: upheld by the caller per the contract above.
        let bytes = unsafe { std::slice::from_raw_parts(raw.ptr, raw.len) };
        Self { bytes }
    }

    /// Encodes the view as a `(pointer, length)` handle. No copy is made.
    ///
    /// The handle borrows the same memory as `self`, so it cannot outlive
    /// the buffer it points into.
    pub fn encode(&self) -> RawText<'a> {
        RawText {
            ptr: self.bytes.as_ptr(),
            len: self.bytes.len(),
            _marker: PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the text as UTF-8, replacing invalid sequences.
    pub fn to_str_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }

    /// Copies at most `max_capacity - 1` bytes into a NUL-terminated buffer.
    pub fn decode_for_inspection(&self, max_capacity: usize) -> InspectionBuffer {
        InspectionBuffer::decode(*self, max_capacity)
    }
}

impl<'a> From<&'a str> for TextValue<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

impl<'a> From<&'a String> for TextValue<'a> {
    fn from(text: &'a String) -> Self {
        Self::new(text.as_str())
    }
}

impl<'a> From<&'a [u8]> for TextValue<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Debug for TextValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_str_lossy(), f)
    }
}

impl fmt::Display for TextValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

/// A `(pointer, length)` handle as it travels across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawText<'a> {
    pub ptr: *const u8,
    pub len: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl RawText<'_> {
    /// The handle for empty text.
    pub const fn null() -> Self {
        Self {
            ptr: std::ptr::null(),
            len: 0,
            _marker: PhantomData,
        }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

/// Locally owned, NUL-terminated copy of inbound text.
///
/// Holds at most `capacity - 1` bytes of the source followed by a `0`
/// terminator. A zero capacity holds nothing, not even the terminator.
/// Storage is sized to the copy, not to the capacity.
#[derive(Clone, PartialEq, Eq)]
pub struct InspectionBuffer {
    buf: Box<[u8]>,
    len: usize,
    capacity: usize,
    truncated: bool,
}

impl InspectionBuffer {
    /// Copies a bounded prefix of `text`.
    ///
    /// Reads at most `text.len()` bytes and writes at most `max_capacity`.
    pub fn decode(text: TextValue<'_>, max_capacity: usize) -> Self {
        let len = text.len().min(max_capacity.saturating_sub(1));
        let mut buf = if max_capacity == 0 {
            Vec::new()
        } else {
            Vec::with_capacity(len + 1)
        };
        buf.extend_from_slice(&text.as_bytes()[..len]);
        if max_capacity > 0 {
            buf.push(0);
        }

        Self {
            buf: buf.into_boxed_slice(),
            len,
            capacity: max_capacity,
            truncated: text.len() > len,
        }
    }

    /// The inspected bytes, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The inspected bytes with their terminator. Empty for zero capacity.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        if self.buf.is_empty() {
            &[]
        } else {
            &self.buf[..=self.len]
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The configured bound, terminator included.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether part of the source did not fit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Plain, case-sensitive substring containment over the inspected bytes.
    pub fn contains(&self, needle: &[u8]) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.as_bytes()
            .windows(needle.len())
            .any(|window| window == needle)
    }

    pub fn as_text(&self) -> TextValue<'_> {
        TextValue::from_bytes(self.as_bytes())
    }
}

impl fmt::Debug for InspectionBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectionBuffer")
            .field("text", &self.as_text())
            .field("capacity", &self.capacity())
            .field("truncated", &self.truncated)
            .finish()
    }
}
