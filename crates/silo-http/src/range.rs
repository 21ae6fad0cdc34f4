//! `Range` header handling for GET requests.
//!
//! Three forms are honored: `bytes=N-`, `bytes=N-M`, and the suffix form
//! `bytes=-N` (last N bytes). Anything else - other units, multiple ranges,
//! unparseable numbers - is ignored and the full body is served, matching
//! how S3 treats unsupported range syntax. A syntactically valid range that
//! cannot be satisfied (start at or past the end, start after end, suffix of
//! zero, any range against an empty object) yields 416.

/// The outcome of resolving a `Range` header against an object size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No range, or unsupported syntax: serve the whole object with 200.
    Full,
    /// Serve `start..=end` with 206.
    Partial {
        /// First byte offset, inclusive.
        start: u64,
        /// Last byte offset, inclusive.
        end: u64,
    },
    /// Respond 416 with `Content-Range: bytes */<size>`.
    Unsatisfiable,
}

/// Resolve a `Range` header value against the object size.
#[must_use]
pub fn resolve_range(header: Option<&str>, size: u64) -> RangeOutcome {
    let Some(value) = header else {
        return RangeOutcome::Full;
    };
    let Some(spec) = value.trim().strip_prefix("bytes=") else {
        return RangeOutcome::Full;
    };
    // Multiple ranges are not supported; treat as unsupported syntax.
    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((start_raw, end_raw)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };

    if start_raw.is_empty() {
        // Suffix form: last N bytes.
        let Ok(suffix) = end_raw.parse::<u64>() else {
            return RangeOutcome::Full;
        };
        if suffix == 0 || size == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Partial {
            start: size.saturating_sub(suffix),
            end: size - 1,
        };
    }

    let Ok(start) = start_raw.parse::<u64>() else {
        return RangeOutcome::Full;
    };

    let end = if end_raw.is_empty() {
        None
    } else {
        match end_raw.parse::<u64>() {
            Ok(end) => Some(end),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if start >= size {
        return RangeOutcome::Unsatisfiable;
    }
    if let Some(end) = end {
        if start > end {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Partial {
            start,
            end: end.min(size - 1),
        };
    }

    RangeOutcome::Partial {
        start,
        end: size - 1,
    }
}
