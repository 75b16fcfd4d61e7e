//! All-or-nothing vectored write
//!
//! A single scatter-gather send may accept any prefix of the offered bytes.
//! `write_all_vectored` keeps resubmitting the unsent tail until every byte
//! of every segment is accepted, or fails. Callers never see a partial count.

use crate::constants::MAX_IOV_SEGMENTS;
use crate::socket::StreamSocket;
use std::io::{self, IoSlice};
use tracing::trace;

/// Position inside a segment list
///
/// `index` is the first segment with unsent bytes, `offset` the number of
/// bytes of that segment already sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentCursor {
    index: usize,
    offset: usize,
}

impl SegmentCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Move past `consumed` bytes, skipping any segment left empty
    pub fn advance(&mut self, segments: &[IoSlice<'_>], mut consumed: usize) {
        while let Some(segment) = segments.get(self.index) {
            let remaining = segment.len() - self.offset;
            if consumed < remaining {
                self.offset += consumed;
                return;
            }
            consumed -= remaining;
            self.index += 1;
            self.offset = 0;
        }
    }

    /// True once every segment has been fully consumed
    pub fn is_done(&self, segments: &[IoSlice<'_>]) -> bool {
        self.index >= segments.len()
    }

    /// Refill `out` with the unsent tail, at most `MAX_IOV_SEGMENTS` entries
    pub fn fill_pending<'s>(&self, segments: &'s [IoSlice<'_>], out: &mut Vec<IoSlice<'s>>) {
        out.clear();
        let tail = segments.get(self.index..).unwrap_or_default();
        for (i, segment) in tail.iter().take(MAX_IOV_SEGMENTS).enumerate() {
            let bytes: &'s [u8] = segment;
            let start = if i == 0 { self.offset } else { 0 };
            out.push(IoSlice::new(&bytes[start..]));
        }
    }
}

/// Total byte count across `segments`
pub fn total_len(segments: &[IoSlice<'_>]) -> usize {
    segments.iter().map(|s| s.len()).sum()
}

/// Send every byte of `segments` through `socket`, in order
///
/// Interrupted sends are retried. Any other error, or a send accepting zero
/// bytes while data remains, fails the whole write.
pub fn write_all_vectored<S: StreamSocket>(socket: &S, segments: &[IoSlice<'_>]) -> io::Result<()> {
    let total = total_len(segments);
    if total == 0 {
        return Ok(());
    }

    let mut cursor = SegmentCursor::default();
    let mut pending = Vec::with_capacity(segments.len().min(MAX_IOV_SEGMENTS));

    loop {
        cursor.fill_pending(segments, &mut pending);

        let written = match socket.send_vectored(&pending) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        // Common case: one call drained everything
        if cursor == SegmentCursor::default() && written == total {
            return Ok(());
        }

        if written == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "socket accepted no bytes",
            ));
        }

        cursor.advance(segments, written);
        trace!(
            written,
            index = cursor.index,
            offset = cursor.offset,
            "partial vectored send"
        );

        if cursor.is_done(segments) {
            return Ok(());
        }
    }
}
