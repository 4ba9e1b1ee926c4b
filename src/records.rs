use std::io::{self, BufRead};

/// Iterator over the raw line records of a reader. Each item is one record with its `\n`
/// removed. A final record without a trailing `\n` is yielded as well.
#[derive(Debug)]
pub struct LineRecords<R: BufRead> {
    reader: R,
    strip_cr: bool,
}

impl<R: BufRead> LineRecords<R> {
    #[inline]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            strip_cr: false,
        }
    }

    /// Also drop a `\r` right before the line end.
    #[inline]
    pub fn strip_carriage_return(mut self, strip: bool) -> Self {
        self.strip_cr = strip;
        self
    }
}

impl<R: BufRead> Iterator for LineRecords<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                strip_line_end(&mut buf, self.strip_cr);
                Some(Ok(buf))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Pop the `\n` (and optionally a preceding `\r`) off a record read by `read_until`.
#[inline]
pub(crate) fn strip_line_end(buf: &mut Vec<u8>, strip_cr: bool) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }

    if strip_cr && buf.last() == Some(&b'\r') {
        buf.pop();
    }
}

/// Decodes a record permissively. Invalid UTF-8 sequences become U+FFFD.
#[inline]
pub(crate) fn decode(raw: Vec<u8>) -> String {
    match String::from_utf8(raw) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Skips up to `n` records. Returns how many were actually skipped, which is less than `n` only
/// if the reader hit EOF first.
pub fn skip_records<R: BufRead>(reader: &mut R, n: usize) -> io::Result<usize> {
    let mut buf = Vec::with_capacity(256);
    let mut skipped = 0;

    while skipped < n {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        skipped += 1;
    }

    Ok(skipped)
}

/// Counts all records until EOF. Also returns the amount of bytes consumed.
pub fn count_records<R: BufRead>(reader: &mut R) -> io::Result<(usize, u64)> {
    let mut buf = Vec::with_capacity(1000);
    let mut lines = 0;
    let mut bytes: u64 = 0;

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }

        lines += 1;
        bytes += n as u64;
    }

    Ok((lines, bytes))
}
