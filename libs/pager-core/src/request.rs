use serde::{Deserialize, Serialize};

/// Page size applied when the caller gives none (or a negative one).
pub const DEFAULT_PAGE_SIZE: u64 = 15;

/// Ordering direction for sorted queries.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortDir {
    /// SQL keyword for this direction.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    /// Parse a direction string: exactly `"desc"` is descending,
    /// anything else (including empty) is ascending.
    pub fn parse(s: &str) -> Self {
        if s == "desc" {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }
}

/// Explicit sort/paging parameters, passed into every query-building call.
///
/// `None` and negative values for `offset`/`size` fall back to `0` and
/// [`DEFAULT_PAGE_SIZE`] respectively. An unset `sort` means "no ordering".
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Column to order by; spliced into SQL verbatim, so it must come from
    /// a trusted source (never from raw user input).
    pub sort: Option<String>,
    pub dir: SortDir,
    pub offset: Option<i64>,
    pub size: Option<i64>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    pub fn dir(mut self, dir: SortDir) -> Self {
        self.dir = dir;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Effective page offset: `None` or negative becomes `0`.
    pub fn offset_or_default(&self) -> u64 {
        match self.offset {
            Some(v) if v >= 0 => v as u64,
            _ => 0,
        }
    }

    /// Effective page size: `None` or negative becomes [`DEFAULT_PAGE_SIZE`].
    pub fn size_or_default(&self) -> u64 {
        match self.size {
            Some(v) if v >= 0 => v as u64,
            _ => DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let req = PageRequest::new();
        assert_eq!(req.offset_or_default(), 0);
        assert_eq!(req.size_or_default(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn defaults_when_negative() {
        let req = PageRequest::new().offset(-1).size(-1);
        assert_eq!(req.offset_or_default(), 0);
        assert_eq!(req.size_or_default(), 15);
    }

    #[test]
    fn explicit_values_pass_through() {
        let req = PageRequest::new().offset(30).size(10);
        assert_eq!(req.offset_or_default(), 30);
        assert_eq!(req.size_or_default(), 10);
    }

    #[test]
    fn size_zero_is_respected() {
        // Zero is a valid (if unusual) page size, only negatives fall back.
        let req = PageRequest::new().size(0);
        assert_eq!(req.size_or_default(), 0);
    }

    #[test]
    fn sort_dir_parse() {
        assert_eq!(SortDir::parse("desc"), SortDir::Desc);
        assert_eq!(SortDir::parse("asc"), SortDir::Asc);
        assert_eq!(SortDir::parse("DESC"), SortDir::Asc);
        assert_eq!(SortDir::parse(""), SortDir::Asc);
    }

    #[test]
    fn sort_dir_sql_keywords() {
        assert_eq!(SortDir::Asc.as_sql(), "asc");
        assert_eq!(SortDir::Desc.as_sql(), "desc");
    }
}
