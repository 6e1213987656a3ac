//! Reassembles decoded fragments into lines.
//!
//! Chunk boundaries fall anywhere, so a line may span several fragments and
//! a fragment may hold several lines.

use crate::error::Result;
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Iterator adapter turning text fragments into lines.
///
/// Lines end at `\n`; a trailing `\r` is removed. A final line without a
/// terminator is still emitted. An error from the inner iterator is passed
/// through and ends iteration.
#[derive(Debug)]
pub struct Lines<I> {
    fragments: I,
    partial: String,
    ready: VecDeque<String>,
    done: bool,
}

impl<I> Lines<I>
where
    I: Iterator<Item = Result<String>>,
{
    pub fn new(fragments: I) -> Self {
        Lines {
            fragments,
            partial: String::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    /// Splits complete lines out of `fragment`, keeping the remainder.
    fn absorb(&mut self, fragment: &str) {
        let mut rest = fragment;
        while let Some(pos) = rest.find('\n') {
            self.partial.push_str(&rest[..pos]);
            let mut line = std::mem::take(&mut self.partial);
            if line.ends_with('\r') {
                line.pop();
            }
            self.ready.push_back(line);
            rest = &rest[pos + 1..];
        }
        self.partial.push_str(rest);
    }
}

impl<I> Iterator for Lines<I>
where
    I: Iterator<Item = Result<String>>,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Some(Ok(line));
            }
            if self.done {
                return None;
            }

            match self.fragments.next() {
                Some(Ok(fragment)) => self.absorb(&fragment),
                Some(Err(e)) => {
                    self.done = true;
                    self.partial.clear();
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if !self.partial.is_empty() {
                        let mut line = std::mem::take(&mut self.partial);
                        if line.ends_with('\r') {
                            line.pop();
                        }
                        return Some(Ok(line));
                    }
                }
            }
        }
    }
}

impl<I> FusedIterator for Lines<I> where I: Iterator<Item = Result<String>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BankIoError;

    fn lines_of(fragments: &[&str]) -> Vec<String> {
        Lines::new(fragments.iter().map(|f| Ok(f.to_string())))
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_line_split_across_fragments() {
        assert_eq!(
            lines_of(&["1,2,3.0,A", "na\n4,5", ",6.0,Bia\n"]),
            vec!["1,2,3.0,Ana", "4,5,6.0,Bia"]
        );
    }

    #[test]
    fn test_final_line_without_newline() {
        assert_eq!(lines_of(&["first\nsec", "ond"]), vec!["first", "second"]);
    }

    #[test]
    fn test_trailing_newline_adds_no_empty_line() {
        assert_eq!(lines_of(&["a\nb\n"]), vec!["a", "b"]);
    }

    #[test]
    fn test_interior_blank_line_is_kept() {
        assert_eq!(lines_of(&["a\n\nb"]), vec!["a", "", "b"]);
    }

    #[test]
    fn test_crlf_split_between_fragments() {
        assert_eq!(lines_of(&["a\r", "\nb\r\n"]), vec!["a", "b"]);
    }

    #[test]
    fn test_no_fragments() {
        assert!(lines_of(&[]).is_empty());
    }

    #[test]
    fn test_error_passes_through_and_ends() {
        let fragments = vec![
            Ok("a\nb".to_string()),
            Err(BankIoError::EncodingError { offset: 3 }),
            Ok("never\n".to_string()),
        ];
        let mut lines = Lines::new(fragments.into_iter());
        assert_eq!(lines.next().unwrap().unwrap(), "a");
        assert!(matches!(
            lines.next(),
            Some(Err(BankIoError::EncodingError { offset: 3 }))
        ));
        assert!(lines.next().is_none());
    }
}
