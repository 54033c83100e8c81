//! Paging and sorting of entity collections

use super::entity::{Entity, SortField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: &'static SortField,
    pub direction: Direction,
}

/// Zero-based page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }

    /// Offset of the first row, when it fits a signed 64-bit SQL `OFFSET`
    pub fn checked_offset(&self) -> Option<i64> {
        self.page
            .checked_mul(self.size)
            .and_then(|offset| i64::try_from(offset).ok())
    }

    /// Parses `sort` parameters (`field`, `field,desc`, `a,b,asc`) against the
    /// sortable fields of `E`. Returns the unknown field name on failure.
    pub fn parse_sort<E: Entity>(params: &[String]) -> Result<Vec<SortOrder>, String> {
        let mut orders = Vec::new();

        for param in params {
            let mut tokens: Vec<&str> = param
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .collect();

            let direction = match tokens.last().map(|t| t.to_ascii_lowercase()) {
                Some(last) if last == "desc" => {
                    tokens.pop();
                    Direction::Desc
                }
                Some(last) if last == "asc" => {
                    tokens.pop();
                    Direction::Asc
                }
                _ => Direction::Asc,
            };

            for token in tokens {
                let field = E::sort_field(token).ok_or_else(|| token.to_string())?;
                orders.push(SortOrder { field, direction });
            }
        }

        Ok(orders)
    }
}

/// One page of results with the total element count
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            1
        } else {
            self.total_elements.div_ceil(self.size)
        }
    }

    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }
}
