//! Block splitting for task documents.
//!
//! A document is cut wherever a line holds nothing but three or more `-`
//! characters (a Markdown horizontal rule). Blocks are yielded trimmed and
//! borrowed from the input; empty blocks are dropped.

/// Lazy iterator over the task blocks of one document.
///
/// Cloning the iterator restarts iteration from the clone point; calling
/// [`split_blocks`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    rest: &'a str,
}

/// Splits `input` into separator-delimited blocks.
///
/// Input without any separator line is a single block. Empty or
/// whitespace-only input yields nothing.
pub fn split_blocks(input: &str) -> Blocks<'_> {
    Blocks { rest: input }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let (block, rest) = take_until_separator(self.rest);
            self.rest = rest;

            let block = block.trim();
            if !block.is_empty() {
                return Some(block);
            }
        }
        None
    }
}

/// Returns whether `line` is a block separator (`---`, `-----`, ` --- `).
pub fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.bytes().all(|byte| byte == b'-')
}

fn take_until_separator(input: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        if is_separator_line(line) {
            return (&input[..offset], &input[offset + line.len()..]);
        }
        offset += line.len();
    }
    (input, "")
}
