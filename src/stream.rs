// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Token streams.
//!
//! Splits raw input into whitespace-separated byte tokens, line by line, and feeds
//! them to any number of estimators. Tokens are never decoded, so input that is not
//! valid UTF-8 is counted like any other bytes. A failed open behaves like an empty
//! source.

use crate::traits::CardinalityEstimator;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Token separators: ASCII space, `\t`, `\n`, `\v`, `\f` and `\r`.
fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}

/// Iterates over the raw lines of `reader`, without their `\n` terminator.
///
/// An I/O error ends the iteration.
pub fn lines<R: BufRead>(reader: R) -> impl Iterator<Item = Vec<u8>> {
    reader.split(b'\n').map_while(|line| match line {
        Ok(line) => Some(line),
        Err(e) => {
            warn!(error = %e, "read failed; ending token stream");
            None
        }
    })
}

/// Splits one line into its non-empty tokens.
///
/// ```
/// use fm_cardinality::stream::split_tokens;
///
/// let line = b"  a b\tc\xff  \r";
/// let tokens: Vec<&[u8]> = split_tokens(line).collect();
/// assert_eq!(tokens, [&b"a"[..], &b"b"[..], &b"c\xff"[..]]);
/// ```
pub fn split_tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|&b| is_separator(b)).filter(|t| !t.is_empty())
}

/// Feeds every token of `reader` to every estimator. Returns the token count.
pub fn feed_reader<R: BufRead>(
    reader: R,
    estimators: &mut [&mut dyn CardinalityEstimator<[u8]>],
) -> u64 {
    let mut fed = 0u64;
    for line in lines(reader) {
        for token in split_tokens(&line) {
            for estimator in estimators.iter_mut() {
                estimator.add(token);
            }
            fed += 1;
        }
    }
    debug!(tokens = fed, "token stream exhausted");
    fed
}

/// Feeds every token of the file at `path` to every estimator.
///
/// A file that cannot be opened is treated as an empty stream: a warning is
/// logged and `0` is returned.
pub fn feed_path<P: AsRef<Path>>(
    path: P,
    estimators: &mut [&mut dyn CardinalityEstimator<[u8]>],
) -> u64 {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => feed_reader(BufReader::new(file), estimators),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot open input; using empty stream");
            0
        }
    }
}
