//! Raw query text plus parameter bindings, and the text transformations the
//! DAO applies before execution: sort injection, count-query derivation and
//! backend-aware placeholder rendering.
//!
//! Rendering is a single pass over the text. Single-quoted string literals
//! are copied verbatim (with `''` escapes honored), `?` consumes the next
//! positional value, `:name` looks up the named map and expands bound lists
//! into an in-place placeholder group, and `::` is left alone so Postgres
//! casts keep working.

use std::collections::BTreeMap;

use pager_core::PageRequest;
use sea_orm::{DbBackend, Statement, Value};

use crate::{DaoError, Result};

#[derive(Clone, Debug)]
enum Bound {
    One(Value),
    Many(Vec<Value>),
}

/// A SQL query with positional (`?`) and named (`:name`) parameter
/// bindings. Both kinds may appear in the same query.
///
/// Positional values bind in declaration order: the first `?` takes the
/// value bound first. Surplus positional values are tolerated because the
/// derived count query shares this parameter set while dropping the select
/// head; for the same reason, positional parameters placed *before* the
/// `from` keyword would desynchronize count bindings and must be avoided.
#[derive(Clone, Debug)]
pub struct RawQuery {
    text: String,
    positional: Vec<Value>,
    named: BTreeMap<String, Bound>,
}

impl RawQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            positional: Vec::new(),
            named: BTreeMap::new(),
        }
    }

    /// Bind the next positional (`?`) value.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Bind a named (`:name`) scalar value.
    pub fn bind_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), Bound::One(value.into()));
        self
    }

    /// Bind a named (`:name`) list for a membership test. The placeholder
    /// expands to `?, ?, …` in place, so write the query as `id in (:ids)`.
    /// Binding an empty list is a rendering error.
    pub fn bind_named_list<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = values.into_iter().map(Into::into).collect();
        self.named.insert(name.into(), Bound::Many(list));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Statement for the query text as-is (scalar queries, DML).
    pub(crate) fn statement(&self, backend: DbBackend) -> Result<Statement> {
        self.render(&self.text, backend)
    }

    /// Statement for the data query: sort applied, optionally limited to
    /// the page window.
    pub(crate) fn data_statement(
        &self,
        backend: DbBackend,
        page: &PageRequest,
        paged: bool,
    ) -> Result<Statement> {
        let mut text = sorted_text(&self.text, page);
        if paged {
            // LIMIT/OFFSET is understood by all supported backends; the
            // operands are unsigned integers, not user text.
            text.push_str(&format!(
                " limit {} offset {}",
                page.size_or_default(),
                page.offset_or_default()
            ));
        }
        self.render(&text, backend)
    }

    /// Statement for the derived count query. Derivation uses the unsorted
    /// base text; sort and limits never apply to the count.
    pub(crate) fn count_statement(&self, backend: DbBackend) -> Result<Statement> {
        let text = count_text(&self.text)?;
        self.render(&text, backend)
    }

    fn render(&self, text: &str, backend: DbBackend) -> Result<Statement> {
        let mut out = String::with_capacity(text.len() + 16);
        let mut values: Vec<Value> = Vec::with_capacity(self.positional.len());
        let mut chars = text.chars().peekable();
        let mut pos_idx = 0usize;
        let mut nth = 0usize;

        while let Some(ch) = chars.next() {
            match ch {
                '\'' => {
                    out.push(ch);
                    while let Some(c) = chars.next() {
                        out.push(c);
                        if c == '\'' {
                            // '' inside a literal is an escaped quote
                            if matches!(chars.peek(), Some('\'')) {
                                out.push(chars.next().unwrap_or('\''));
                            } else {
                                break;
                            }
                        }
                    }
                }
                '?' => {
                    let value = self
                        .positional
                        .get(pos_idx)
                        .cloned()
                        .ok_or(DaoError::MissingPositional { index: pos_idx })?;
                    pos_idx += 1;
                    push_placeholder(&mut out, backend, &mut nth);
                    values.push(value);
                }
                ':' => {
                    if matches!(chars.peek(), Some(':')) {
                        // Postgres cast syntax, not a parameter
                        out.push(':');
                        out.push(chars.next().unwrap_or(':'));
                    } else if matches!(chars.peek(), Some(c) if c.is_ascii_alphabetic() || *c == '_')
                    {
                        let mut name = String::new();
                        while let Some(&c) = chars.peek() {
                            if c.is_ascii_alphanumeric() || c == '_' {
                                name.push(c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        match self.named.get(&name) {
                            Some(Bound::One(v)) => {
                                push_placeholder(&mut out, backend, &mut nth);
                                values.push(v.clone());
                            }
                            Some(Bound::Many(list)) => {
                                if list.is_empty() {
                                    return Err(DaoError::EmptyParamList(name));
                                }
                                for (i, v) in list.iter().enumerate() {
                                    if i > 0 {
                                        out.push_str(", ");
                                    }
                                    push_placeholder(&mut out, backend, &mut nth);
                                    values.push(v.clone());
                                }
                            }
                            None => return Err(DaoError::MissingNamed(name)),
                        }
                    } else {
                        out.push(':');
                    }
                }
                _ => out.push(ch),
            }
        }

        Ok(Statement::from_sql_and_values(backend, out, values))
    }
}

fn push_placeholder(out: &mut String, backend: DbBackend, nth: &mut usize) {
    *nth += 1;
    match backend {
        DbBackend::Postgres => {
            out.push('$');
            out.push_str(&nth.to_string());
        }
        _ => out.push('?'),
    }
}

/// Append `order by <field> <asc|desc>` when the request carries a sort
/// field. The field is spliced verbatim (trusted input only).
pub(crate) fn sorted_text(text: &str, page: &PageRequest) -> String {
    match page.sort.as_deref().filter(|f| !f.is_empty()) {
        Some(field) => format!("{text} order by {field} {}", page.dir.as_sql()),
        None => text.to_owned(),
    }
}

/// Derive `select count(*) <from the first top-level "from" onward>`.
///
/// "Top level" means outside string literals and parentheses, so a subquery
/// in the select head is skipped. Identifiers are never rewritten; a query
/// with no top-level `from` is a syntax error.
pub(crate) fn count_text(text: &str) -> Result<String> {
    let bytes = text.as_bytes();
    let mut depth = 0i32;
    let mut in_str = false;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if in_str {
            if b == b'\'' {
                // A doubled quote toggles twice; still fine for scanning.
                in_str = false;
            }
            i += 1;
            continue;
        }
        match b {
            b'\'' => in_str = true,
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'f' | b'F'
                if depth == 0
                    && i + 4 <= bytes.len()
                    && bytes[i..i + 4].eq_ignore_ascii_case(b"from")
                    && word_boundary_before(bytes, i)
                    && word_boundary_after(bytes, i + 4) =>
            {
                return Ok(format!("select count(*) {}", &text[i..]));
            }
            _ => {}
        }
        i += 1;
    }
    Err(DaoError::NoFromClause(text.to_owned()))
}

fn word_boundary_before(bytes: &[u8], i: usize) -> bool {
    i == 0 || !is_ident_byte(bytes[i - 1])
}

fn word_boundary_after(bytes: &[u8], i: usize) -> bool {
    i >= bytes.len() || !is_ident_byte(bytes[i])
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
