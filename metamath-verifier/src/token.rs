//! The tokenizer: whitespace-delimited tokens layered with file-inclusion
//! and comment-skipping transformations.

use crate::error::{mm_err, Kind, Result};
use crate::expr::{intern, Token};
use log::trace;
use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// One open input, whether the top-level source or an included file.
struct Source {
    name: String,
    dir: PathBuf,
    reader: Box<dyn BufRead>,
    line_buf: VecDeque<Token>,
    line_no: usize,
}

impl Source {
    fn new(name: String, reader: Box<dyn BufRead>) -> Self {
        let dir = Path::new(&name)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Source {
            name,
            dir,
            reader,
            line_buf: VecDeque::new(),
            line_no: 0,
        }
    }

    /// Refills `line_buf` from the next non-empty line; returns `false` at EOF.
    fn fill(&mut self) -> std::io::Result<bool> {
        loop {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                return Ok(false);
            }
            self.line_no += 1;
            self.line_buf
                .extend(line.split_whitespace().map(intern));
            if !self.line_buf.is_empty() {
                return Ok(true);
            }
        }
    }
}

/// Single-threaded, strictly sequential token stream over a stack of
/// sources. File inclusions push onto the stack; exhausted sources are
/// popped and closed.
pub struct Tokenizer {
    sources: Vec<Source>,
    included: HashSet<PathBuf>,
}

impl Tokenizer {
    /// Builds a tokenizer reading `source` under the diagnostic name `name`.
    /// `name`, if it names a real path, also anchors relative file
    /// inclusions found within `source`.
    pub fn new(name: impl Into<String>, source: impl Read + 'static) -> Self {
        let name = name.into();
        let src = Source::new(name, Box::new(BufReader::new(source)));
        Tokenizer {
            sources: vec![src],
            included: HashSet::new(),
        }
    }

    /// Current file name and line number, for error reporting.
    #[must_use]
    pub fn position(&self) -> (String, usize) {
        self.sources
            .last()
            .map(|s| (s.name.clone(), s.line_no))
            .unwrap_or_else(|| ("<eof>".to_string(), 0))
    }

    fn err(&self, kind: Kind, message: impl Into<String>) -> crate::error::VerificationError {
        let (file, line) = self.position();
        mm_err!(kind, "{}", message.into()).at(file, line)
    }

    /// `raw`: next token from the current source, closing exhausted sources
    /// and resuming the next outer one. `None` signals end-of-stream.
    fn next_raw(&mut self) -> std::io::Result<Option<Token>> {
        loop {
            let Some(top) = self.sources.last_mut() else {
                return Ok(None);
            };
            if let Some(tok) = top.line_buf.pop_front() {
                return Ok(Some(tok));
            }
            if top.fill()? {
                continue;
            }
            self.sources.pop();
        }
    }

    /// `with-inclusion`: as `raw`, except `$[` begins a file-inclusion
    /// sequence that must terminate with `$]`.
    fn next_included(&mut self) -> Result<Option<Token>> {
        loop {
            let tok = self
                .next_raw()
                .map_err(|e| self.err(Kind::MalformedInclusion, e.to_string()))?;
            let Some(tok) = tok else {
                return Ok(None);
            };
            if &*tok != "$[" {
                return Ok(Some(tok));
            }
            let filename = self
                .next_raw()
                .map_err(|e| self.err(Kind::MalformedInclusion, e.to_string()))?
                .ok_or_else(|| self.err(Kind::MalformedInclusion, "missing filename"))?;
            let endbracket = self
                .next_raw()
                .map_err(|e| self.err(Kind::MalformedInclusion, e.to_string()))?;
            if endbracket.as_deref() != Some("$]") {
                return Err(self.err(Kind::MalformedInclusion, "inclusion not terminated by $]"));
            }
            let base = self
                .sources
                .last()
                .map(|s| s.dir.clone())
                .unwrap_or_default();
            let path = base.join(&*filename);
            let canonical = path
                .canonicalize()
                .map_err(|e| self.err(Kind::MalformedInclusion, format!("{}: {}", path.display(), e)))?;
            if self.included.contains(&canonical) {
                trace!("include-once: skipping already-included {}", canonical.display());
                continue;
            }
            let file = File::open(&canonical)
                .map_err(|e| self.err(Kind::MalformedInclusion, format!("{}: {}", canonical.display(), e)))?;
            self.included.insert(canonical.clone());
            self.sources.push(Source::new(
                canonical.to_string_lossy().into_owned(),
                Box::new(BufReader::new(file)),
            ));
        }
    }

    /// `with-comments`: as `with-inclusion`, except `$( ... $)` is consumed
    /// and discarded. Comments never nest and are read with raw tokenization
    /// (a `$[` inside a comment is just a token, not an inclusion trigger).
    pub fn next(&mut self) -> Result<Option<Token>> {
        loop {
            let Some(tok) = self.next_included()? else {
                return Ok(None);
            };
            if &*tok != "$(" {
                return Ok(Some(tok));
            }
            loop {
                let inner = self
                    .next_raw()
                    .map_err(|e| self.err(Kind::MalformedStatement, e.to_string()))?;
                match inner {
                    None => return Err(self.err(Kind::MalformedStatement, "EOF inside comment")),
                    Some(t) if &*t == "$)" => break,
                    Some(_) => continue,
                }
            }
        }
    }

    /// `readstat`: accumulates tokens until the `$.` terminator.
    pub fn read_statement(&mut self) -> Result<Vec<Token>> {
        let mut stat = Vec::new();
        loop {
            let tok = self.next()?;
            match tok {
                None => return Err(self.err(Kind::MalformedStatement, "EOF before $.")),
                Some(t) if &*t == "$." => return Ok(stat),
                Some(t) => stat.push(t),
            }
        }
    }
}
