use super::tree::{PhyloNode, PhyloTree};
use crate::error::{EvoError, EvoResult};

/// Output options for [`to_newick_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewickFormat {
    /// Digits after the decimal point for branch lengths.
    pub precision: usize,
    pub internal_labels: bool,
}

impl Default for NewickFormat {
    fn default() -> Self {
        Self {
            precision: 5,
            internal_labels: true,
        }
    }
}

impl NewickFormat {
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn without_internal_labels(mut self) -> Self {
        self.internal_labels = false;
        self
    }
}

pub fn to_newick(tree: &PhyloTree) -> String {
    to_newick_with(tree, &NewickFormat::default())
}

/// Walks the tree with an explicit stack; depth is not limited by recursion.
pub fn to_newick_with(tree: &PhyloTree, format: &NewickFormat) -> String {
    let mut out = String::new();
    // (node, children written so far)
    let mut stack = vec![(tree.root(), 0usize)];

    while let Some((idx, written)) = stack.pop() {
        let node = tree.node(idx);
        if node.is_leaf() {
            if let Some(ref label) = node.label {
                write_label(&mut out, label);
            }
            write_branch_length(&mut out, node, format);
            continue;
        }

        if written < node.children.len() {
            out.push(if written == 0 { '(' } else { ',' });
            stack.push((idx, written + 1));
            stack.push((node.children[written], 0));
            continue;
        }

        out.push(')');
        if format.internal_labels {
            if let Some(ref label) = node.label {
                write_label(&mut out, label);
            }
        }
        write_branch_length(&mut out, node, format);
    }

    out.push(';');
    out
}

fn needs_quoting(label: &str) -> bool {
    label.chars().any(|ch| {
        ch.is_whitespace() || matches!(ch, ':' | ',' | '(' | ')' | ';' | '[' | ']' | '\'')
    })
}

fn write_label(out: &mut String, label: &str) {
    if label.is_empty() {
        return;
    }
    if needs_quoting(label) {
        out.push('\'');
        for ch in label.chars() {
            if ch == '\'' {
                out.push_str("''");
            } else {
                out.push(ch);
            }
        }
        out.push('\'');
    } else {
        out.push_str(label);
    }
}

fn write_branch_length(out: &mut String, node: &PhyloNode, format: &NewickFormat) {
    if let Some(bl) = node.branch_length {
        out.push_str(&format!(":{:.*}", format.precision, bl));
    }
}

/// Parse a single Newick tree. Bracketed comments are skipped. The tree is
/// marked rooted when its root has exactly two children.
pub fn parse_newick(text: &str) -> EvoResult<PhyloTree> {
    let mut parser = NewickReader {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        nodes: Vec::new(),
    };
    let root = parser.parse_tree()?;
    parser.parse_branch_length(root)?;
    parser.skip_ws()?;
    if parser.peek() != Some(b';') {
        return Err(parser.error("expected ';'"));
    }
    parser.pos += 1;
    parser.skip_ws()?;
    if parser.pos != parser.bytes.len() {
        return Err(parser.error("unexpected characters after ';'"));
    }

    let rooted = parser.nodes[root].children.len() == 2;
    Ok(PhyloTree::from_parts(parser.nodes, root, rooted))
}

struct NewickReader<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    nodes: Vec<PhyloNode>,
}

impl NewickReader<'_> {
    fn error(&self, msg: &'static str) -> EvoError {
        EvoError::NewickFormat { msg, pos: self.pos }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) -> EvoResult<()> {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if b == b'[' {
                match self.bytes[self.pos..].iter().position(|&c| c == b']') {
                    Some(end) => self.pos += end + 1,
                    None => return Err(self.error("unterminated comment")),
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn push_node(&mut self, label: Option<Box<str>>, children: Vec<usize>) -> usize {
        let idx = self.nodes.len();
        for &child in &children {
            self.nodes[child].parent = Some(idx);
        }
        self.nodes.push(PhyloNode {
            label,
            branch_length: None,
            parent: None,
            children,
        });
        idx
    }

    /// One subtree, tracked with an explicit stack of open clades.
    fn parse_tree(&mut self) -> EvoResult<usize> {
        let mut open: Vec<Vec<usize>> = Vec::new();
        loop {
            self.skip_ws()?;
            if self.peek() == Some(b'(') {
                self.pos += 1;
                open.push(Vec::new());
                continue;
            }

            let label = self.parse_label()?;
            let mut node = self.push_node(label, Vec::new());

            // Attach `node` to its clade, closing clades until a sibling follows.
            loop {
                let Some(mut children) = open.pop() else {
                    return Ok(node);
                };
                self.parse_branch_length(node)?;
                children.push(node);
                self.skip_ws()?;
                match self.peek() {
                    Some(b',') => {
                        self.pos += 1;
                        open.push(children);
                        break;
                    }
                    Some(b')') => {
                        self.pos += 1;
                        let label = self.parse_label()?;
                        node = self.push_node(label, children);
                    }
                    _ => return Err(self.error("expected ',' or ')'")),
                }
            }
        }
    }

    fn parse_label(&mut self) -> EvoResult<Option<Box<str>>> {
        self.skip_ws()?;
        match self.peek() {
            Some(b'\'') => self.parse_quoted_label().map(Some),
            _ => {
                let start = self.pos;
                while let Some(b) = self.peek() {
                    if b.is_ascii_whitespace()
                        || matches!(b, b'(' | b')' | b',' | b':' | b';' | b'[' | b']' | b'\'')
                    {
                        break;
                    }
                    self.pos += 1;
                }
                if self.pos == start {
                    Ok(None)
                } else {
                    Ok(Some(self.text[start..self.pos].into()))
                }
            }
        }
    }

    fn parse_quoted_label(&mut self) -> EvoResult<Box<str>> {
        let open = self.pos;
        self.pos += 1;
        let mut label = String::new();
        loop {
            let rest = &self.bytes[self.pos..];
            let Some(q) = rest.iter().position(|&c| c == b'\'') else {
                self.pos = open;
                return Err(self.error("unterminated quoted label"));
            };
            label.push_str(&self.text[self.pos..self.pos + q]);
            self.pos += q + 1;
            if self.peek() == Some(b'\'') {
                label.push('\'');
                self.pos += 1;
            } else {
                return Ok(label.into());
            }
        }
    }

    fn parse_branch_length(&mut self, node: usize) -> EvoResult<()> {
        self.skip_ws()?;
        if self.peek() != Some(b':') {
            return Ok(());
        }
        self.pos += 1;
        self.skip_ws()?;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let value = self.text[start..self.pos]
            .parse::<f64>()
            .map_err(|_| EvoError::NewickFormat {
                msg: "invalid branch length",
                pos: start,
            })?;
        self.nodes[node].branch_length = Some(value);
        Ok(())
    }
}
