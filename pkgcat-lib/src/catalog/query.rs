//! Filtering, searching, sorting and paging over enriched records.

use super::{ConfigError, PackageRecord};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// Number of records per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Field to order results by, always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, VariantNames, Deserialize, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Stars,
    Downloads,
}

impl SortField {
    const fn key(self, record: &PackageRecord) -> u64 {
        match self {
            Self::Stars => record.stars,
            Self::Downloads => record.downloads,
        }
    }
}

/// The four recognized query options. Anything else is rejected when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryOptions {
    /// Keep only records whose category equals this label exactly.
    pub category: Option<String>,

    /// Keep only records whose name contains this substring.
    pub search: Option<String>,

    pub sort: Option<SortField>,

    /// 1-based page number; values below 1 are treated as 1.
    pub page: Option<usize>,
}

impl QueryOptions {
    /// The requested page, clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Parse `key=value` pairs such as `category=Database` or `page=2`.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| ConfigError::MalformedOption(pair.to_string()))?;
            options.set(key.trim(), value.trim())?;
        }
        Ok(options)
    }

    /// Parse a JSON object such as `{"sort": "stars", "page": 2}`. `null` values are ignored.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;

        let mut options = Self::default();
        for (key, value) in map {
            match value {
                serde_json::Value::Null => {
                    if !matches!(key.as_str(), "category" | "search" | "sort" | "page") {
                        return Err(ConfigError::UnknownOption(key));
                    }
                }
                serde_json::Value::String(s) => options.set(&key, &s)?,
                other => options.set(&key, &other.to_string())?,
            }
        }
        Ok(options)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "category" => self.category = Some(value.to_string()),
            "search" => self.search = Some(value.to_string()),
            "sort" => {
                let Ok(sort) = SortField::from_str(value) else {
                    return Err(ConfigError::UnsupportedSort(value.to_string()));
                };
                self.sort = Some(sort);
            }
            "page" => {
                // Accept zero and negative numbers; they clamp to the first page
                let page: i64 = value.parse().map_err(|source| ConfigError::InvalidPage {
                    value: value.to_string(),
                    source,
                })?;
                self.page = Some(usize::try_from(page.max(1)).unwrap_or(usize::MAX));
            }
            _ => return Err(ConfigError::UnknownOption(key.to_string())),
        }
        Ok(())
    }
}

/// Pagination metadata for a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: usize,

    /// Matches after filter and search, before paging.
    pub total: usize,

    /// Zero when nothing matched.
    pub pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub packages: Vec<PackageRecord>,
    pub meta: PageMeta,
}

/// Applies category filter, name search, sort and paging, in that order.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine {
    page_size: usize,
    case_insensitive: bool,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            case_insensitive: false,
        }
    }
}

impl QueryEngine {
    pub const fn new(page_size: usize, case_insensitive: bool) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self {
            page_size,
            case_insensitive,
        })
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn query(&self, records: &[PackageRecord], options: &QueryOptions) -> QueryResult {
        let needle = options.search.as_deref().map(|s| self.fold(s));

        let mut matches: Vec<&PackageRecord> = records
            .iter()
            .filter(|r| options.category.as_deref().is_none_or(|c| r.category == c))
            .filter(|r| needle.as_deref().is_none_or(|n| self.fold(&r.name).contains(n)))
            .collect();

        if let Some(field) = options.sort {
            // stable, so ties keep their filtered order
            matches.sort_by(|a, b| field.key(b).cmp(&field.key(a)));
        }

        let total = matches.len();
        let current_page = options.page();
        let start = (current_page - 1).saturating_mul(self.page_size);
        let packages = matches
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        QueryResult {
            packages,
            meta: PageMeta {
                current_page,
                total,
                pages: total.div_ceil(self.page_size),
            },
        }
    }

    fn fold(&self, s: &str) -> String {
        if self.case_insensitive { s.to_lowercase() } else { s.to_string() }
    }
}
