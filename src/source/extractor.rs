//! Chapter extraction from hand-authored manuscript files.
//!
//! Manuscripts keep their chapters as a list of object-like records:
//!
//! ```text
//! { num: 1, title: 'Don\'t Go There', content: `<p>...</p>` },
//! ```
//!
//! The scanner walks the text from one `{` to the next. A brace whose first
//! token is a number key followed by `:` starts a record; anything else is
//! skipped, so surrounding code and other object literals are ignored. Once a
//! record has started every field must be present, and any deviation is
//! reported with the line and column where it happened instead of silently
//! dropping the rest of the book.

use super::chapter::Chapter;
use thiserror::Error;

const NUMBER_KEYS: &[&str] = &["num", "number"];
const TITLE_KEYS: &[&str] = &["title"];
const BODY_KEYS: &[&str] = &["content", "body"];

const RAW_DELIMITER: char = '`';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("line {line}, column {column}: expected {expected}")]
    Expected {
        expected: &'static str,
        line: usize,
        column: usize,
    },

    #[error("line {line}, column {column}: chapter {field} is never closed")]
    UnterminatedString {
        field: &'static str,
        line: usize,
        column: usize,
    },

    #[error("line {line}, column {column}: chapter body is never closed (missing `)")]
    UnterminatedBody { line: usize, column: usize },

    #[error("line {line}, column {column}: chapter {field} is empty")]
    Empty {
        field: &'static str,
        line: usize,
        column: usize,
    },
}

/// Extract every chapter record from `text`, in the order they appear.
///
/// Finding no records at all is not an error here; callers decide what an
/// empty book means.
pub fn extract_chapters(text: &str) -> Result<Vec<Chapter>, ExtractError> {
    let mut scanner = Scanner { src: text, pos: 0 };
    let mut chapters = Vec::new();

    while let Some(open) = scanner.find_next('{') {
        scanner.pos = open + 1;
        let resume = scanner.pos;

        if !scanner.starts_record() {
            scanner.pos = resume;
            continue;
        }

        chapters.push(scanner.record()?);
    }

    Ok(chapters)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn find_next(&self, c: char) -> Option<usize> {
        self.src[self.pos..].find(c).map(|i| self.pos + i)
    }

    /// 1-based line and column of a byte offset
    fn location(&self, offset: usize) -> (usize, usize) {
        let before = &self.src[..offset];
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0)
            + 1;
        (line, column)
    }

    fn expected(&self, expected: &'static str) -> ExtractError {
        let (line, column) = self.location(self.pos);
        ExtractError::Expected {
            expected,
            line,
            column,
        }
    }

    fn empty(&self, field: &'static str, at: usize) -> ExtractError {
        let (line, column) = self.location(at);
        ExtractError::Empty {
            field,
            line,
            column,
        }
    }

    /// A number key followed by `:`. Consumes both when it matches.
    fn starts_record(&mut self) -> bool {
        self.skip_ws();
        if !self.eat_key(NUMBER_KEYS) {
            return false;
        }
        self.skip_ws();
        if self.peek() == Some(':') {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume a bare or quoted identifier if it is one of `keys`.
    fn eat_key(&mut self, keys: &[&str]) -> bool {
        let start = self.pos;
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => {
                self.bump();
                Some(q)
            }
            _ => None,
        };

        let ident_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        let ident = &self.src[ident_start..self.pos];

        let closed = match quote {
            Some(q) => self.bump() == Some(q),
            None => true,
        };

        if closed && keys.contains(&ident) {
            true
        } else {
            self.pos = start;
            false
        }
    }

    fn expect_key(&mut self, keys: &[&str], expected: &'static str) -> Result<(), ExtractError> {
        self.skip_ws();
        if self.eat_key(keys) {
            Ok(())
        } else {
            Err(self.expected(expected))
        }
    }

    fn expect_char(&mut self, c: char, expected: &'static str) -> Result<(), ExtractError> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.bump();
            Ok(())
        } else {
            Err(self.expected(expected))
        }
    }

    /// Everything after the opening `num:` of a record
    fn record(&mut self) -> Result<Chapter, ExtractError> {
        let number = self.number()?;
        self.expect_char(',', "`,` after the chapter number")?;

        self.expect_key(TITLE_KEYS, "the `title` key")?;
        self.expect_char(':', "`:` after the title key")?;
        self.skip_ws();
        let title_at = self.pos;
        let title = match self.peek() {
            Some('\'' | '"') => self.quoted("title")?,
            _ => return Err(self.expected("a quoted chapter title")),
        };
        if title.trim().is_empty() {
            return Err(self.empty("title", title_at));
        }
        self.expect_char(',', "`,` after the chapter title")?;

        self.expect_key(BODY_KEYS, "the `content` key")?;
        self.expect_char(':', "`:` after the content key")?;
        self.skip_ws();
        let body_at = self.pos;
        let body = self.raw()?;
        let body = body.trim();
        if body.is_empty() {
            return Err(self.empty("body", body_at));
        }

        Ok(Chapter::new(number, title, body))
    }

    fn number(&mut self) -> Result<String, ExtractError> {
        self.skip_ws();
        let at = self.pos;
        let number = match self.peek() {
            Some('\'' | '"') => self.quoted("number")?,
            _ => {
                while self
                    .peek()
                    .is_some_and(|c| !(c == ',' || c == '}' || c.is_whitespace()))
                {
                    self.bump();
                }
                self.src[at..self.pos].to_string()
            }
        };

        if number.trim().is_empty() {
            return Err(self.empty("number", at));
        }
        Ok(number)
    }

    /// A single- or double-quoted string on one line, with `\'`, `\"` and
    /// `\\` unescaped. Other escapes are kept as written.
    fn quoted(&mut self, field: &'static str) -> Result<String, ExtractError> {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return Err(self.unterminated(field, start));
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.unterminated(field, start)),
                Some('\\') => match self.bump() {
                    Some(c @ ('\'' | '"' | '\\')) => out.push(c),
                    Some('\n') | None => return Err(self.unterminated(field, start)),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn unterminated(&self, field: &'static str, start: usize) -> ExtractError {
        let (line, column) = self.location(start);
        ExtractError::UnterminatedString {
            field,
            line,
            column,
        }
    }

    /// A backtick-delimited raw block, with `` \` `` and `\\` unescaped.
    fn raw(&mut self) -> Result<String, ExtractError> {
        if self.peek() != Some(RAW_DELIMITER) {
            return Err(self.expected("` to open the chapter body"));
        }
        let start = self.pos;
        self.bump();

        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    let (line, column) = self.location(start);
                    return Err(ExtractError::UnterminatedBody { line, column });
                }
                Some('\\') => match self.peek() {
                    Some(c @ (RAW_DELIMITER | '\\')) => {
                        self.bump();
                        out.push(c);
                    }
                    _ => out.push('\\'),
                },
                Some(RAW_DELIMITER) => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }
}
