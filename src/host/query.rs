use serde_json::Value;

/// Sort direction for record queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Comparison operator for a meta filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compare {
    #[default]
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    /// Substring match on the string form of the stored value.
    Like,
}

/// One custom-field constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaFilter {
    pub key: String,
    pub value: Value,
    pub compare: Compare,
}

impl MetaFilter {
    pub fn new(key: impl Into<String>, value: Value, compare: Compare) -> Self {
        Self {
            key: key.into(),
            value,
            compare,
        }
    }

    pub fn equals(key: impl Into<String>, value: Value) -> Self {
        Self::new(key, value, Compare::Equal)
    }
}

/// One taxonomy constraint: the record must carry at least one of `terms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFilter {
    pub taxonomy: String,
    pub terms: Vec<i64>,
}

impl TermFilter {
    pub fn new(taxonomy: impl Into<String>, terms: Vec<i64>) -> Self {
        Self {
            taxonomy: taxonomy.into(),
            terms,
        }
    }
}

/// A typed record query: post type plus pagination, ordering and filters.
///
/// `per_page: None` means unpaged (every match), the equivalent of the host
/// platform's "-1 posts per page" convention.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    pub post_type: String,
    pub status: Option<String>,
    pub per_page: Option<u32>,
    pub page: u32,
    pub order_by: String,
    pub order: SortOrder,
    pub meta: Vec<MetaFilter>,
    pub terms: Vec<TermFilter>,
}

impl RecordQuery {
    pub fn new(post_type: impl Into<String>) -> Self {
        Self {
            post_type: post_type.into(),
            status: None,
            per_page: Some(10),
            page: 1,
            order_by: "date".to_string(),
            order: SortOrder::Desc,
            meta: Vec::new(),
            terms: Vec::new(),
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn unpaged(mut self) -> Self {
        self.per_page = None;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = field.into();
        self.order = order;
        self
    }

    pub fn meta(mut self, filter: MetaFilter) -> Self {
        self.meta.push(filter);
        self
    }

    pub fn term(mut self, filter: TermFilter) -> Self {
        self.terms.push(filter);
        self
    }
}
