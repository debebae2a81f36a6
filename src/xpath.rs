//! Minimal XPath engine over the dom_query node tree.
//!
//! Parser configs mix CSS selectors and XPath expressions in one fallback
//! chain, and both must run against the same parsed document so cleanup
//! deletions stay visible to every query. CSS is handled natively by
//! dom_query; this module evaluates the XPath subset those configs actually
//! use, walking the same node tree instead of re-parsing the HTML.
//!
//! Supported grammar:
//! - absolute `/a/b` and `//a` paths, relative `.//a` and `./a`
//! - name tests and `*`, child and descendant-or-self axes
//! - predicates: `[@attr]`, `[@attr='v']`, `[contains(@attr,'v')]`,
//!   `[contains(text(),'v')]`, `[text()='v']`, `[N]`, `[last()]`,
//!   `[position()<=N]`, and conjunction with `and`
//! - trailing `/@attr` and `/text()` value steps
//!
//! Anything outside this subset is rejected at parse time, which feeds the
//! config loader's `SelectorSyntax` reporting.

use std::collections::HashSet;

use dom_query::{NodeRef, Selection};

use crate::dom::node_attr;

/// Result of evaluating an expression: a node set, or a string set when the
/// expression ends in a value step (`/@attr`, `/text()`).
#[derive(Debug)]
pub enum XPathValue<'a> {
    /// Matched element nodes, document order, deduplicated.
    Nodes(Vec<NodeRef<'a>>),
    /// Extracted attribute values or text nodes.
    Strings(Vec<String>),
}

impl XPathValue<'_> {
    /// True when no node or string matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            XPathValue::Nodes(nodes) => nodes.is_empty(),
            XPathValue::Strings(strings) => strings.is_empty(),
        }
    }
}

/// A parsed, reusable XPath expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPath {
    steps: Vec<Step>,
    tail: Option<Tail>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NameTest,
    predicates: Vec<Predicate>,
}

/// Trailing value step producing strings instead of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Tail {
    Attribute(String),
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    Last,
    PositionLe(usize),
    PositionLt(usize),
    HasAttr(String),
    AttrEquals(String, String),
    AttrContains(String, String),
    TextEquals(String),
    TextContains(String),
    And(Vec<Predicate>),
}

impl XPath {
    /// Parse an expression, rejecting anything outside the supported subset.
    pub fn parse(expr: &str) -> Result<Self, String> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err("empty expression".to_string());
        }
        if trimmed == "." {
            return Ok(Self { steps: Vec::new(), tail: None });
        }

        let (rest, first_axis) = if let Some(r) = trimmed.strip_prefix(".//") {
            (r, Axis::Descendant)
        } else if let Some(r) = trimmed.strip_prefix("./") {
            (r, Axis::Child)
        } else if let Some(r) = trimmed.strip_prefix("//") {
            (r, Axis::Descendant)
        } else if let Some(r) = trimmed.strip_prefix('/') {
            (r, Axis::Child)
        } else {
            // bare relative step, e.g. `div[@id='x']`
            (trimmed, Axis::Child)
        };
        if rest.is_empty() {
            return Err(format!("`{expr}`: expected a step after the leading slash"));
        }

        let mut steps = Vec::new();
        let mut tail = None;
        let raw_steps = split_steps(rest)?;
        let last_index = raw_steps.len() - 1;

        for (i, (raw, axis)) in raw_steps.into_iter().enumerate() {
            let axis = if i == 0 { first_axis } else { axis };

            if let Some(attr) = raw.strip_prefix('@') {
                if i != last_index {
                    return Err(format!("`{expr}`: attribute step `@{attr}` must be last"));
                }
                if attr.is_empty() || !is_name(attr) {
                    return Err(format!("`{expr}`: invalid attribute name `{attr}`"));
                }
                if axis != Axis::Child {
                    return Err(format!("`{expr}`: `//@{attr}` is not supported"));
                }
                tail = Some(Tail::Attribute(attr.to_string()));
            } else if raw == "text()" {
                if i != last_index {
                    return Err(format!("`{expr}`: text() step must be last"));
                }
                tail = Some(Tail::Text);
            } else {
                steps.push(parse_step(expr, &raw, axis)?);
            }
        }

        Ok(Self { steps, tail })
    }

    /// Evaluate against a context node (document root, or a parent-scope
    /// node). Absolute and relative expressions are both resolved against
    /// the given context, so a scoped query can never escape its subtree.
    #[must_use]
    pub fn evaluate<'a>(&self, context: NodeRef<'a>) -> XPathValue<'a> {
        let mut current = vec![context];

        for step in &self.steps {
            let mut next: Vec<NodeRef<'a>> = Vec::new();
            let mut seen = HashSet::new();

            for ctx in &current {
                let mut candidates: Vec<NodeRef<'a>> = Vec::new();
                match step.axis {
                    Axis::Child => {
                        for child in ctx.children() {
                            if child.is_element() {
                                candidates.push(child);
                            }
                        }
                    }
                    Axis::Descendant => {
                        for node in ctx.descendants() {
                            if node.is_element() {
                                candidates.push(node);
                            }
                        }
                    }
                }
                candidates.retain(|node| step.test.matches(node));

                let total = candidates.len();
                for (index, node) in candidates.into_iter().enumerate() {
                    let position = index + 1;
                    if step.predicates.iter().all(|p| p.holds(&node, position, total))
                        && seen.insert(node.id)
                    {
                        next.push(node);
                    }
                }
            }

            current = next;
            if current.is_empty() {
                break;
            }
        }

        match &self.tail {
            None => XPathValue::Nodes(current),
            Some(Tail::Attribute(name)) => XPathValue::Strings(
                current.iter().filter_map(|node| node_attr(node, name)).collect(),
            ),
            Some(Tail::Text) => XPathValue::Strings(
                current
                    .iter()
                    .map(direct_text)
                    .filter(|text| !text.trim().is_empty())
                    .collect(),
            ),
        }
    }
}

impl NameTest {
    fn matches(&self, node: &NodeRef<'_>) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Name(name) => node
                .node_name()
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name)),
        }
    }
}

impl Predicate {
    fn holds(&self, node: &NodeRef<'_>, position: usize, total: usize) -> bool {
        match self {
            Predicate::Position(n) => position == *n,
            Predicate::Last => position == total,
            Predicate::PositionLe(n) => position <= *n,
            Predicate::PositionLt(n) => position < *n,
            Predicate::HasAttr(name) => node_attr(node, name).is_some(),
            Predicate::AttrEquals(name, value) => {
                node_attr(node, name).is_some_and(|v| v == *value)
            }
            Predicate::AttrContains(name, value) => {
                node_attr(node, name).is_some_and(|v| v.contains(value.as_str()))
            }
            Predicate::TextEquals(value) => subtree_text(node).trim() == value,
            Predicate::TextContains(value) => subtree_text(node).contains(value.as_str()),
            Predicate::And(parts) => parts.iter().all(|p| p.holds(node, position, total)),
        }
    }
}

/// Text content of the whole subtree, as used by text predicates.
fn subtree_text(node: &NodeRef<'_>) -> String {
    Selection::from(*node).text().to_string()
}

/// Concatenated direct text children, as produced by a `/text()` step.
fn direct_text(node: &NodeRef<'_>) -> String {
    let mut out = String::new();
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        }
    }
    out
}

/// Split a path body into `(step, axis-to-next)` pairs, respecting brackets
/// and quotes.
fn split_steps(body: &str) -> Result<Vec<(String, Axis)>, String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut axis = Axis::Child;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                current.push(c);
            }
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.checked_sub(1).ok_or("unbalanced `]`")?;
                current.push(c);
            }
            '/' if depth == 0 => {
                if current.is_empty() {
                    return Err("empty step".to_string());
                }
                steps.push((std::mem::take(&mut current), axis));
                axis = if chars.peek() == Some(&'/') {
                    chars.next();
                    Axis::Descendant
                } else {
                    Axis::Child
                };
            }
            _ => current.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string literal".to_string());
    }
    if depth != 0 {
        return Err("unbalanced `[`".to_string());
    }
    if current.is_empty() {
        return Err("empty trailing step".to_string());
    }
    steps.push((current, axis));

    // the stored axis describes the separator BEFORE the next step; shift so
    // each step carries its own leading axis
    let mut shifted = Vec::with_capacity(steps.len());
    let mut incoming = Axis::Child;
    for (raw, outgoing) in steps {
        shifted.push((raw, incoming));
        incoming = outgoing;
    }
    Ok(shifted)
}

fn parse_step(expr: &str, raw: &str, axis: Axis) -> Result<Step, String> {
    let bracket = raw.find('[');
    let (name_part, pred_part) = match bracket {
        Some(at) => (&raw[..at], &raw[at..]),
        None => (raw, ""),
    };

    let test = if name_part == "*" {
        NameTest::Any
    } else if is_name(name_part) {
        NameTest::Name(name_part.to_ascii_lowercase())
    } else {
        return Err(format!("`{expr}`: unsupported step `{name_part}`"));
    };

    let mut predicates = Vec::new();
    let mut rest = pred_part;
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return Err(format!("`{expr}`: malformed predicate list near `{rest}`"));
        }
        let close = find_matching_bracket(rest)?;
        predicates.push(parse_predicate(expr, &rest[1..close])?);
        rest = &rest[close + 1..];
    }

    Ok(Step { axis, test, predicates })
}

fn find_matching_bracket(s: &str) -> Result<usize, String> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err("unbalanced `[`".to_string())
}

fn parse_predicate(expr: &str, raw: &str) -> Result<Predicate, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("`{expr}`: empty predicate"));
    }

    // conjunction first so each side parses independently
    if let Some(parts) = split_top_level(raw, " and ") {
        let parsed = parts
            .into_iter()
            .map(|part| parse_predicate(expr, part))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Predicate::And(parsed));
    }

    if raw.chars().all(|c| c.is_ascii_digit()) {
        let n: usize = raw.parse().map_err(|_| format!("`{expr}`: bad position `{raw}`"))?;
        if n == 0 {
            return Err(format!("`{expr}`: positions are 1-based"));
        }
        return Ok(Predicate::Position(n));
    }
    if raw == "last()" {
        return Ok(Predicate::Last);
    }
    if let Some(rest) = raw.strip_prefix("position()") {
        let rest = rest.trim_start();
        let (op, num) = if let Some(n) = rest.strip_prefix("<=") {
            ("<=", n)
        } else if let Some(n) = rest.strip_prefix('<') {
            ("<", n)
        } else if let Some(n) = rest.strip_prefix('=') {
            ("=", n)
        } else {
            return Err(format!("`{expr}`: unsupported position() comparison"));
        };
        let n: usize = num
            .trim()
            .parse()
            .map_err(|_| format!("`{expr}`: bad position() operand"))?;
        return Ok(match op {
            "<=" => Predicate::PositionLe(n),
            "<" => Predicate::PositionLt(n),
            _ => Predicate::Position(n),
        });
    }

    if let Some(inner) = raw.strip_prefix("contains(").and_then(|r| r.strip_suffix(')')) {
        let args = split_top_level(inner, ",").unwrap_or_else(|| vec![inner]);
        if args.len() != 2 {
            return Err(format!("`{expr}`: contains() takes two arguments"));
        }
        let target = args[0].trim();
        let value = parse_literal(expr, args[1].trim())?;
        return match target {
            "text()" | "." => Ok(Predicate::TextContains(value)),
            attr if attr.starts_with('@') && is_name(&attr[1..]) => {
                Ok(Predicate::AttrContains(attr[1..].to_string(), value))
            }
            other => Err(format!("`{expr}`: unsupported contains() target `{other}`")),
        };
    }

    if let Some(rest) = raw.strip_prefix('@') {
        if let Some(eq) = find_top_level(rest, '=') {
            let name = rest[..eq].trim();
            if !is_name(name) {
                return Err(format!("`{expr}`: invalid attribute name `{name}`"));
            }
            let value = parse_literal(expr, rest[eq + 1..].trim())?;
            return Ok(Predicate::AttrEquals(name.to_string(), value));
        }
        if !is_name(rest) {
            return Err(format!("`{expr}`: invalid attribute name `{rest}`"));
        }
        return Ok(Predicate::HasAttr(rest.to_string()));
    }

    for prefix in ["text()", "."] {
        if let Some(rest) = raw.strip_prefix(prefix) {
            if let Some(value) = rest.trim_start().strip_prefix('=') {
                return Ok(Predicate::TextEquals(parse_literal(expr, value.trim())?));
            }
        }
    }

    Err(format!("`{expr}`: unsupported predicate `{raw}`"))
}

/// Parse a quoted string literal.
fn parse_literal(expr: &str, raw: &str) -> Result<String, String> {
    let mut chars = raw.chars();
    match (chars.next(), raw.len() >= 2) {
        (Some(q @ ('\'' | '"')), true) if raw.ends_with(q) => {
            Ok(raw[1..raw.len() - 1].to_string())
        }
        _ => Err(format!("`{expr}`: expected quoted literal, found `{raw}`")),
    }
}

/// Split on a separator occurring outside quotes; `None` if absent.
fn split_top_level<'a>(s: &'a str, sep: &str) -> Option<Vec<&'a str>> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = s[i..].chars().next().unwrap_or('\0');
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += c.len_utf8();
            continue;
        }
        if c == '\'' || c == '"' {
            quote = Some(c);
            i += c.len_utf8();
            continue;
        }
        if s[i..].starts_with(sep) {
            parts.push(&s[start..i]);
            i += sep.len();
            start = i;
            continue;
        }
        i += c.len_utf8();
    }
    if parts.is_empty() {
        return None;
    }
    parts.push(&s[start..]);
    Some(parts)
}

fn find_top_level(s: &str, target: char) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            c if c == target => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        && s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
}
