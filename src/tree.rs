//! Expectation trees - the structured trace of what a validator expected.
//!
//! Every validator run accumulates a [`Node`]: leaves record individual
//! expectations ("a string", "greater than 0"), branches record how they
//! combine (and / or and their negations). The tree is immutable; every
//! operation builds a new node. After a failed run the tree is trimmed down
//! to the relevant part and rendered either as a single line of prose or as
//! a checkmarked tree.
//!
//! # Examples
//!
//! ```rust,ignore
//! let a = Node::leaf("a string", true, path.clone(), None);
//! let b = Node::leaf("matching /x/", false, path, None);
//! assert_eq!(a.and(b).render_text(), "a string and matching /x/");
//! ```

use crate::path::Path;

/// One-line renders abort once the accumulated text outgrows this.
const ONELINE_FOLD_LIMIT: usize = 48;

/// A finished one-line render longer than this falls back to multi-line.
const ONELINE_LIMIT: usize = 64;

// ============================================================================
// KIND
// ============================================================================

/// Identifies which type validator produced a node, so renders can merge
/// adjacent expectations of the same type ("a number greater than 0") and
/// their restriction-negated forms ("a number not greater than 0").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kind {
    name: &'static str,
    negated: bool,
}

impl Kind {
    /// Creates the kind tag for a type validator.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            negated: false,
        }
    }

    /// The restriction-negated counterpart of this kind.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self {
            name: self.name,
            negated: !self.negated,
        }
    }
}

// ============================================================================
// NODES
// ============================================================================

/// How a branch combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// All children must hold.
    And,
    /// At least one child must hold.
    Or,
    /// Negated conjunction.
    Nand,
    /// Negated disjunction.
    Nor,
    /// A display-only grouping, usually carrying a `where ... is` heading.
    Plain,
}

/// A single expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    content: String,
    ok: bool,
    path: Path,
    kind: Option<Kind>,
    negated: bool,
}

/// A combination of expectations.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    children: Vec<Node>,
    content: Option<String>,
    ok: bool,
    path: Path,
    kind: Option<Kind>,
    form: Form,
    branch_prefix: Option<&'static str>,
    branch_separator: Option<&'static str>,
}

/// An immutable expectation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The identity element: `and`/`or` with an empty tree return the other
    /// operand unchanged.
    Empty {
        /// Location the (absent) expectation refers to.
        path: Path,
    },
    /// A single expectation.
    Leaf(Leaf),
    /// A combination of expectations.
    Branch(Branch),
}

impl Node {
    /// Creates the identity tree at `path`.
    #[must_use]
    pub fn empty(path: Path) -> Self {
        Node::Empty { path }
    }

    /// Creates a single expectation.
    #[must_use]
    pub fn leaf(content: impl Into<String>, ok: bool, path: Path, kind: Option<Kind>) -> Self {
        Node::Leaf(Leaf {
            content: content.into(),
            ok,
            path,
            kind,
            negated: false,
        })
    }

    fn branch(
        form: Form,
        children: Vec<Node>,
        ok: bool,
        path: Path,
        kind: Option<Kind>,
    ) -> Self {
        let (branch_prefix, branch_separator) = match form {
            Form::And => (None, Some("and")),
            Form::Or => (Some("either"), Some("or")),
            Form::Nand => (Some("not"), Some("and")),
            Form::Nor => (Some("neither"), Some("nor")),
            Form::Plain => (None, None),
        };
        Node::Branch(Branch {
            children,
            content: None,
            ok,
            path,
            kind,
            form,
            branch_prefix,
            branch_separator,
        })
    }

    /// Whether this expectation held.
    #[must_use]
    pub fn ok(&self) -> bool {
        match self {
            Node::Empty { .. } => false,
            Node::Leaf(leaf) => leaf.ok,
            Node::Branch(branch) => branch.ok,
        }
    }

    /// The location this expectation refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Node::Empty { path } => path,
            Node::Leaf(leaf) => &leaf.path,
            Node::Branch(branch) => &branch.path,
        }
    }

    fn kind(&self) -> Option<Kind> {
        match self {
            Node::Empty { .. } => None,
            Node::Leaf(leaf) => leaf.kind,
            Node::Branch(branch) => branch.kind,
        }
    }

    fn checkmark(&self) -> &'static str {
        if self.ok() { "✔" } else { "✘" }
    }

    // ========================================================================
    // ALGEBRA
    // ========================================================================

    /// Conjunction. `Empty` is the identity; adjacent `and` branches are
    /// flattened into one. Path and kind are taken from the left operand.
    #[must_use]
    pub fn and(self, other: Node) -> Node {
        if matches!(self, Node::Empty { .. }) {
            return other;
        }
        if matches!(other, Node::Empty { .. }) {
            return self;
        }

        let ok = self.ok() && other.ok();
        let path = self.path().clone();
        let kind = self.kind();

        let mut children = match self {
            Node::Branch(b) if b.form == Form::And => b.children,
            node => vec![node],
        };
        match other {
            Node::Branch(b) if b.form == Form::And => children.extend(b.children),
            node => children.push(node),
        }

        Node::branch(Form::And, children, ok, path, kind)
    }

    /// Disjunction. `Empty` is the identity; adjacent `or` branches are
    /// flattened into one. Path and kind are taken from the left operand.
    #[must_use]
    pub fn or(self, other: Node) -> Node {
        if matches!(self, Node::Empty { .. }) {
            return other;
        }
        if matches!(other, Node::Empty { .. }) {
            return self;
        }

        let ok = self.ok() || other.ok();
        let path = self.path().clone();
        let kind = self.kind();

        let mut children = match self {
            Node::Branch(b) if b.form == Form::Or => b.children,
            node => vec![node],
        };
        match other {
            Node::Branch(b) if b.form == Form::Or => children.extend(b.children),
            node => children.push(node),
        }

        Node::branch(Form::Or, children, ok, path, kind)
    }

    /// Negation. An involution: `n.not().not()` renders the same as `n`.
    ///
    /// Children are never rewritten; negation flips the node itself. Leaves
    /// toggle a "not" prefix, `and`/`or` swap with `nand`/`nor`. A grouping
    /// whose prefix and separator both have negated forms flips them in
    /// place; any other grouping is wrapped in a `nand`, which a second
    /// negation unwraps again.
    #[must_use]
    pub fn not(self) -> Node {
        match self {
            Node::Empty { .. } => self,
            Node::Leaf(mut leaf) => {
                leaf.ok = !leaf.ok;
                leaf.negated = !leaf.negated;
                Node::Leaf(leaf)
            }
            Node::Branch(mut b) => match b.form {
                Form::And => Node::branch(Form::Nand, b.children, !b.ok, b.path, b.kind),
                Form::Or => Node::branch(Form::Nor, b.children, !b.ok, b.path, b.kind),
                Form::Nor => Node::branch(Form::Or, b.children, !b.ok, b.path, b.kind),
                Form::Nand => {
                    // a single-child nand is just a wrapper around the child
                    if b.children.len() == 1 {
                        if let Some(child) = b.children.pop() {
                            return child;
                        }
                    }
                    Node::branch(Form::And, b.children, !b.ok, b.path, b.kind)
                }
                Form::Plain => {
                    let prefix = match b.branch_prefix {
                        None => Some(Some("not")),
                        Some("either") => Some(Some("neither")),
                        Some("not") => Some(None),
                        Some("neither") => Some(Some("either")),
                        Some(_) => None,
                    };
                    let separator = match b.branch_separator {
                        Some("and") => Some(Some("and")),
                        Some("or") => Some(Some("nor")),
                        Some("nor") => Some(Some("or")),
                        _ => None,
                    };
                    match (prefix, separator) {
                        (Some(branch_prefix), Some(branch_separator)) => Node::Branch(Branch {
                            ok: !b.ok,
                            branch_prefix,
                            branch_separator,
                            ..b
                        }),
                        _ => {
                            let ok = !b.ok;
                            let path = b.path.clone();
                            let kind = b.kind;
                            Node::branch(Form::Nand, vec![Node::Branch(b)], ok, path, kind)
                        }
                    }
                }
            },
        }
    }

    /// Attaches a heading, e.g. `where 'length' is`. A leaf is wrapped in a
    /// plain branch; a branch has its heading replaced (losing its flatten
    /// form but keeping its display prefix and separator).
    #[must_use]
    pub fn prefix(self, text: &str) -> Node {
        match self {
            Node::Empty { .. } => self,
            Node::Leaf(leaf) => {
                let ok = leaf.ok;
                let path = leaf.path.clone();
                let kind = leaf.kind;
                Node::Branch(Branch {
                    children: vec![Node::Leaf(leaf)],
                    content: Some(text.to_owned()),
                    ok,
                    path,
                    kind,
                    form: Form::Plain,
                    branch_prefix: None,
                    branch_separator: None,
                })
            }
            Node::Branch(b) => Node::Branch(Branch {
                content: Some(text.to_owned()),
                form: Form::Plain,
                ..b
            }),
        }
    }

    // ========================================================================
    // TRIMMING
    // ========================================================================

    /// Narrows the tree down to the part relevant for an error report.
    ///
    /// If a child documents a failure at a deeper, addressable path (no
    /// quantified `[*]` segment), the report descends into it. Otherwise
    /// children are kept only when they share the node's path or failed,
    /// and the root heading is dropped.
    #[must_use]
    pub fn trim(self) -> Node {
        self.trim_level(0)
    }

    fn trim_level(self, level: usize) -> Node {
        let Node::Branch(mut b) = self else {
            return self;
        };

        if level == 0 {
            let failed_sub = b
                .children
                .iter()
                .position(|c| !c.ok() && c.path() != &b.path);
            if let Some(i) = failed_sub {
                if !b.children[i].path().contains_dynamic() {
                    return b.children.swap_remove(i).trim_level(0);
                }
            }
        }

        let path = b.path.clone();
        let children: Vec<Node> = b
            .children
            .into_iter()
            .filter(|c| c.path() == &path || !c.ok())
            .map(|c| c.trim_level(level + 1))
            .collect();

        Node::Branch(Branch {
            children,
            content: if level == 0 { None } else { b.content },
            ok: b.ok,
            path: b.path,
            kind: b.kind,
            form: b.form,
            branch_prefix: b.branch_prefix,
            branch_separator: b.branch_separator,
        })
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    /// Renders the tree as prose, on one line when it fits.
    #[must_use]
    pub fn render_text(&self) -> String {
        match self {
            Node::Empty { .. } => String::new(),
            Node::Leaf(leaf) => {
                if leaf.negated {
                    format!("not {}", leaf.content)
                } else {
                    leaf.content.clone()
                }
            }
            Node::Branch(b) => b.render_text(),
        }
    }

    /// Renders the tree with checkmarks and box-drawing connectors, one
    /// node per line.
    #[must_use]
    pub fn render_tree(&self) -> String {
        match self {
            Node::Empty { .. } => String::new(),
            Node::Leaf(leaf) => {
                let negated = if leaf.negated { "not" } else { "" };
                join(&[self.checkmark(), negated, &leaf.content])
            }
            Node::Branch(b) => b.render_tree(self.checkmark()),
        }
    }
}

impl Branch {
    /// True when the branch renders its own heading line.
    fn headed(&self) -> bool {
        self.content.is_some()
            || self.branch_prefix.is_some()
            || matches!(
                self.children.first(),
                Some(Node::Branch(c)) if c.content.is_some() || c.branch_prefix.is_some()
            )
    }

    fn render_text(&self) -> String {
        let n = self.children.len();

        // First try to fold the children onto a single line. Two children
        // of the same kind (or a kind and its restriction-negated twin, or
        // two different paths) join with a bare space: "a number greater
        // than 0" instead of "a number and greater than 0".
        let mut oneline: Option<String> = Some(String::new());
        for (i, child) in self.children.iter().enumerate() {
            let Some(acc) = oneline.take() else { break };

            let mut text = child.render_text();
            if text.contains('\n')
                || acc.chars().count() + text.chars().count() > ONELINE_FOLD_LIMIT
            {
                break;
            }

            if i == 1 && n == 2 {
                let kinds_match =
                    matches!((self.kind, child.kind()), (Some(a), Some(b)) if a == b);
                let kinds_negate =
                    matches!((self.kind, child.kind()), (Some(a), Some(b)) if a.negate() == b);
                let paths_differ = self.children[0].path() != child.path();
                if kinds_match || kinds_negate || paths_differ {
                    oneline = Some(format!("{acc} {text}"));
                    continue;
                }
            }

            if matches!(child, Node::Branch(_)) {
                text = format!("({text})");
            }

            oneline = Some(if i == 0 {
                text
            } else if i == n - 1 {
                format!("{acc} {} {text}", self.branch_separator.unwrap_or("and"))
            } else {
                format!("{acc}, {text}")
            });
        }

        if let Some(line) = &oneline {
            if !line.is_empty() && line.chars().count() <= ONELINE_LIMIT {
                let content = self.content.as_deref().unwrap_or("");
                let prefix = self.branch_prefix.unwrap_or("");
                if self.form == Form::Nand && n > 1 {
                    return join(&[content, prefix, &format!("({line})")]);
                }
                return join(&[content, prefix, line]);
            }
        }

        let children: Vec<String> = self.children.iter().map(Node::render_text).collect();
        let mut lines = Vec::with_capacity(children.len() + 1);

        if self.headed() {
            lines.push(join(&[
                self.content.as_deref().unwrap_or(""),
                self.branch_prefix.unwrap_or(""),
            ]));
            for text in &children {
                lines.push(indent("    ", "    ", text));
            }
        } else {
            for (i, text) in children.iter().enumerate() {
                if i == 0 {
                    lines.push(text.clone());
                } else {
                    lines.push(indent("    ", "    ", text));
                }
            }
        }

        lines.join("\n")
    }

    fn render_tree(&self, checkmark: &str) -> String {
        let children: Vec<String> = self.children.iter().map(Node::render_tree).collect();
        let n = children.len();
        let mut lines = Vec::with_capacity(n + 1);

        if self.headed() {
            lines.push(join(&[
                checkmark,
                self.content.as_deref().unwrap_or(""),
                self.branch_prefix.unwrap_or(""),
            ]));
            for (i, text) in children.iter().enumerate() {
                if i == n - 1 {
                    lines.push(indent("└─ ", "   ", text));
                } else {
                    lines.push(indent("├─ ", "│  ", text));
                }
            }
        } else {
            for (i, text) in children.iter().enumerate() {
                if i == 0 {
                    lines.push(text.clone());
                } else if i == n - 1 {
                    lines.push(indent("└─ ", "   ", text));
                } else {
                    lines.push(indent("├─ ", "│  ", text));
                }
            }
        }

        lines.join("\n")
    }
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn indent(leading: &str, trailing: &str, text: &str) -> String {
    format!("{leading}{}", text.replace('\n', &format!("\n{trailing}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p() -> Path {
        Path::root("input")
    }

    fn leaf(content: &str, ok: bool) -> Node {
        Node::leaf(content, ok, p(), None)
    }

    #[test]
    fn empty_is_identity_for_and_and_or() {
        let a = leaf("a string", true);
        assert_eq!(Node::empty(p()).and(a.clone()), a);
        assert_eq!(a.clone().and(Node::empty(p())), a);
        assert_eq!(Node::empty(p()).or(a.clone()), a);
        assert_eq!(a.clone().or(Node::empty(p())), a);
    }

    #[test]
    fn and_flattens_nested_ands() {
        let a = leaf("a", true);
        let b = leaf("b", true);
        let c = leaf("c", false);
        let left = a.clone().and(b.clone()).and(c.clone());
        let right = a.and(b.and(c));
        assert_eq!(left.render_text(), right.render_text());
        assert_eq!(left.render_text(), "a, b and c");
        assert!(!left.ok());
    }

    #[test]
    fn or_carries_either_prefix() {
        let n = leaf("a string", false)
            .or(leaf("a number", false))
            .or(leaf("an array", false));
        assert_eq!(n.render_text(), "either a string, a number or an array");
    }

    #[test]
    fn negating_a_leaf_toggles_a_not_prefix() {
        let n = leaf("a number", true).not();
        assert_eq!(n.render_text(), "not a number");
        assert!(!n.ok());
        assert_eq!(n.not().render_text(), "a number");
    }

    #[test]
    fn negating_an_or_reads_neither_nor() {
        let n = leaf("a string", false).or(leaf("a number", false)).not();
        assert_eq!(n.render_text(), "neither a string nor a number");
        assert!(n.ok());
    }

    #[test]
    fn negating_a_prefixed_group_wraps_it_whole() {
        let n = leaf("a number", true).prefix("where 'x' is");
        let negated = n.clone().not();
        assert_eq!(negated.render_text(), "not (where 'x' is a number)");
        assert!(!negated.ok());
        assert_eq!(negated.not(), n);
    }

    #[test]
    fn negating_a_prefixed_or_flips_in_place() {
        let n = leaf("a string", false)
            .or(leaf("a number", false))
            .prefix("where 'x' is");
        assert_eq!(n.render_text(), "where 'x' is either a string or a number");
        assert_eq!(
            n.not().render_text(),
            "where 'x' is neither a string nor a number"
        );
    }

    #[test]
    fn single_child_nand_unwraps_on_negation() {
        let wrapped = leaf("a", true).and(leaf("b", true)).not();
        assert_eq!(wrapped.render_text(), "not (a and b)");
        assert_eq!(wrapped.not().render_text(), "a and b");
    }

    #[test]
    fn two_same_kind_children_join_without_separator() {
        let kind = Kind::new("a number");
        let a = Node::leaf("a number", true, p(), Some(kind));
        let b = Node::leaf("greater than 0", false, p(), Some(kind));
        assert_eq!(a.and(b).render_text(), "a number greater than 0");
    }

    #[test]
    fn restriction_negated_kind_joins_without_separator() {
        let kind = Kind::new("a number");
        let a = Node::leaf("a number", true, p(), Some(kind));
        let b = Node::leaf("greater than 0", false, p(), Some(kind.negate())).not();
        assert_eq!(a.and(b).render_text(), "a number not greater than 0");
    }

    #[test]
    fn trim_descends_into_a_failed_sub_property() {
        let sub = p().child("x".into());
        let outer = Node::leaf("an object", true, p(), None);
        let inner = Node::leaf("a number", false, sub, None).prefix("where 'x' is");
        let trimmed = outer.and(inner).trim();
        assert_eq!(trimmed.path(), &p().child("x".into()));
        assert_eq!(trimmed.render_text(), "a number");
    }

    #[test]
    fn trim_keeps_dynamic_failures_at_the_collection() {
        let sub = p().child(crate::path::Accessor::Dynamic);
        let outer = Node::leaf("an array", true, p(), None);
        let inner =
            Node::leaf("a number", false, sub, None).prefix("where some element is");
        let trimmed = outer.and(inner).trim();
        assert_eq!(trimmed.path(), &p());
        assert_eq!(
            trimmed.render_text(),
            "an array where some element is a number"
        );
    }
}
