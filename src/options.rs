/// Default size of the read buffer used for scans and window reads
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Settings for how a `LineFile` reads its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub(crate) buffer_capacity: usize,
    pub(crate) strip_carriage_return: bool,
}

impl Options {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity of the `BufReader` each operation reads through. Zero falls back to the default.
    #[inline]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = if capacity == 0 {
            DEFAULT_BUFFER_CAPACITY
        } else {
            capacity
        };
        self
    }

    /// Also remove a `\r` directly in front of the stripped `\n`, so CRLF files read cleanly.
    /// Does not change how lines are counted.
    #[inline]
    pub fn strip_carriage_return(mut self, strip: bool) -> Self {
        self.strip_carriage_return = strip;
        self
    }
}

impl Default for Options {
    #[inline]
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            strip_carriage_return: false,
        }
    }
}
