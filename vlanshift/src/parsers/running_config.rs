//! `show running-config` as an indentation tree.

pub const COMMAND: &str = "show running-config";

/// Banner types IOS accepts between `banner` and the delimiter.
const BANNER_KINDS: &[&str] = &[
    "config-save",
    "exec",
    "incoming",
    "login",
    "motd",
    "prompt-timeout",
    "slip-ppp",
];

/// Ordered configuration tree.
///
/// Every line is a node; lines indented under it are its children. The
/// root has no line of its own. Repeated sibling lines are kept as
/// separate nodes. A banner keeps its body lines, verbatim, as children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTree {
    children: Vec<(String, ConfigTree)>,
}

impl ConfigTree {
    /// Build the tree from running-config text.
    pub fn parse(output: &str) -> Self {
        let mut root = ConfigTree::default();
        let mut indents: Vec<usize> = Vec::new();
        let mut lines = output.lines();

        while let Some(line) = lines.next() {
            let line = line.trim_end();
            let text = line.trim_start();
            if is_noise(text) {
                continue;
            }
            let indent = line.len() - text.len();

            while indents.last().is_some_and(|depth| *depth >= indent) {
                indents.pop();
            }

            let mut node = ConfigTree::default();
            if let Some((delimiter, rest)) = banner_delimiter(text) {
                node.children = banner_body(delimiter, rest, &mut lines)
                    .into_iter()
                    .map(|body| (body, ConfigTree::default()))
                    .collect();
            }
            root.last_at_depth_mut(indents.len())
                .children
                .push((text.to_string(), node));
            indents.push(indent);
        }

        root
    }

    /// Follow the last child `depth` times.
    fn last_at_depth_mut(&mut self, depth: usize) -> &mut ConfigTree {
        let mut node = self;
        for _ in 0..depth {
            let len = node.children.len();
            if len == 0 {
                break;
            }
            node = &mut node.children[len - 1].1;
        }
        node
    }

    fn child(&self, line: &str) -> Option<&ConfigTree> {
        self.children
            .iter()
            .find(|(key, _)| key == line)
            .map(|(_, node)| node)
    }

    /// Node reached by following `path` from this one. Where a line
    /// repeats, the first occurrence is followed.
    pub fn get(&self, path: &[&str]) -> Option<&ConfigTree> {
        path.iter().try_fold(self, |node, key| node.child(key))
    }

    /// Whether this node has `line` as a direct child.
    pub fn contains(&self, line: &str) -> bool {
        self.child(line).is_some()
    }

    /// Sub-commands of `interface <name>`.
    pub fn interface(&self, name: &str) -> Option<&ConfigTree> {
        self.child(&format!("interface {name}"))
    }

    /// Body of `banner <kind>`, lines joined with `\n`.
    pub fn banner(&self, kind: &str) -> Option<String> {
        self.children
            .iter()
            .find(|(key, _)| banner_kind(key) == Some(kind))
            .map(|(_, node)| node.lines().collect::<Vec<_>>().join("\n"))
    }

    /// Direct children in configuration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &ConfigTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Direct child lines in configuration order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn is_noise(text: &str) -> bool {
    text.is_empty()
        || text.starts_with('!')
        || text == "end"
        || text.starts_with("Building configuration")
        || text.starts_with("Current configuration")
}

fn banner_kind(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("banner ")?;
    let kind = rest.split_whitespace().next()?;
    Some(if BANNER_KINDS.contains(&kind) { kind } else { "motd" })
}

/// `banner motd ^C...` → (`^C`, `...`). IOS prints control characters as
/// a caret pair; any other delimiter is a single character.
fn banner_delimiter(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("banner ")?;
    let rest = match rest.split_once(' ') {
        Some((kind, tail)) if BANNER_KINDS.contains(&kind) => tail.trim_start(),
        None if BANNER_KINDS.contains(&rest) => return None,
        _ => rest,
    };
    let width = if rest.starts_with('^') && rest.len() >= 2 && rest.is_char_boundary(2) {
        2
    } else {
        rest.chars().next()?.len_utf8()
    };
    Some(rest.split_at(width))
}

/// Lines up to the closing delimiter, which may sit on the opening line.
fn banner_body<'a>(
    delimiter: &str,
    rest: &str,
    lines: &mut impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let mut body = Vec::new();
    if let Some((inline, _)) = rest.split_once(delimiter) {
        if !inline.is_empty() {
            body.push(inline.to_string());
        }
        return body;
    }
    if !rest.is_empty() {
        body.push(rest.to_string());
    }
    for line in lines.by_ref() {
        let line = line.trim_end();
        if let Some((last, _)) = line.split_once(delimiter) {
            if !last.is_empty() {
                body.push(last.to_string());
            }
            break;
        }
        body.push(line.to_string());
    }
    body
}
