use crate::error::RawDataError;

/// Cursor-based lexer for the line-oriented SWC format.
///
/// Advances across comments and blank lines and yields signed integer and
/// floating-point literals. Tracks 1-based line numbers for diagnostics.
pub(crate) struct Tokenizer<'a> {
    contents: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(contents: &'a str) -> Self {
        Self {
            contents: contents.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Whether the cursor is past the end of the input.
    pub(crate) fn done(&self) -> bool {
        self.pos >= self.contents.len()
    }

    /// Current 1-based line number.
    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    /// Advances the cursor to the next occurrence of `byte`, or to the end.
    /// Does not consume the occurrence.
    fn skip_to(&mut self, byte: u8) {
        while self.pos < self.contents.len() && self.contents[self.pos] != byte {
            self.pos += 1;
        }
    }

    /// Advances past spaces, tabs and carriage returns.
    fn advance_to_non_whitespace(&mut self) {
        while let Some(&c) = self.contents.get(self.pos) {
            if matches!(c, b' ' | b'\t' | b'\r') {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Consumes line ends and `#` comments after skipping intra-line
    /// whitespace, advancing the line counter per newline.
    ///
    /// Returns `true` if at least one newline was consumed or the end of
    /// the input was reached. This is the only operation that advances the
    /// line counter.
    pub(crate) fn consume_line_and_trailing_comments(&mut self) -> bool {
        let mut found_newline = false;
        self.advance_to_non_whitespace();
        while let Some(&c) = self.contents.get(self.pos) {
            match c {
                b'#' => self.skip_to(b'\n'),
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                    found_newline = true;
                }
                _ => break,
            }
            self.advance_to_non_whitespace();
        }
        found_newline || self.done()
    }

    /// Positions the cursor on the first byte of the next numeric literal,
    /// consuming any run of whitespace, comments and blank lines.
    fn advance_to_number(&mut self) -> Result<(), RawDataError> {
        while !self.done() && self.consume_line_and_trailing_comments() {}

        let Some(&c) = self.contents.get(self.pos) else {
            return Err(RawDataError::EarlyEndOfFile { line: self.line });
        };
        if c.is_ascii_digit() || matches!(c, b'+' | b'-' | b'.') {
            Ok(())
        } else {
            Err(RawDataError::NonParsableLine { line: self.line })
        }
    }

    /// Takes the maximal numeric-literal run at the cursor. The slice is
    /// ASCII, so re-borrowing it as UTF-8 cannot fail.
    fn take_number_run(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(&c) = self.contents.get(self.pos) {
            if c.is_ascii_digit() || matches!(c, b'+' | b'-' | b'.' | b'e' | b'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        std::str::from_utf8(&self.contents[start..self.pos]).unwrap_or("")
    }

    /// Reads a signed integer literal.
    pub(crate) fn read_int(&mut self) -> Result<i64, RawDataError> {
        self.advance_to_number()?;
        let line = self.line;
        self.take_number_run()
            .parse()
            .map_err(|_| RawDataError::NonParsableLine { line })
    }

    /// Reads a floating-point literal. Scientific notation is accepted.
    pub(crate) fn read_float(&mut self) -> Result<f64, RawDataError> {
        self.advance_to_number()?;
        let line = self.line;
        self.take_number_run()
            .parse()
            .map_err(|_| RawDataError::NonParsableLine { line })
    }
}
