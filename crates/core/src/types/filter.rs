//! Facet filters and the Retail filter expression they compile to.
//!
//! Each supplied facet becomes one `(<field>: ANY("<value>"))` clause and the
//! clauses are joined with `AND`. No facets means an empty expression, which
//! the search service treats as unfiltered.

use serde::{Deserialize, Serialize};

/// A filterable product field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Brand,
    ColorFamilies,
    Category,
    Size,
}

impl Facet {
    /// All facets, in the order their clauses appear in an expression.
    pub const ALL: [Self; 4] = [Self::Brand, Self::ColorFamilies, Self::Category, Self::Size];

    /// Product field name used in the filter syntax.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Brand => "brands",
            Self::ColorFamilies => "colorFamilies",
            Self::Category => "categories",
            Self::Size => "sizes",
        }
    }
}

/// Optional exact-match constraints narrowing a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilters {
    pub brand: Option<String>,
    pub color_families: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
}

impl FacetFilters {
    /// Value supplied for `facet`, if any. Empty strings count as absent.
    #[must_use]
    pub fn value(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Brand => self.brand.as_deref(),
            Facet::ColorFamilies => self.color_families.as_deref(),
            Facet::Category => self.category.as_deref(),
            Facet::Size => self.size.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Compile the filters into a Retail filter expression.
    ///
    /// ```
    /// use vertex_retail_core::FacetFilters;
    ///
    /// let filters = FacetFilters {
    ///     brand: Some("Levi's".to_owned()),
    ///     size: Some("32".to_owned()),
    ///     ..FacetFilters::default()
    /// };
    /// assert_eq!(
    ///     filters.to_expression(),
    ///     r#"(brands: ANY("Levi's")) AND (sizes: ANY("32"))"#
    /// );
    /// assert_eq!(FacetFilters::default().to_expression(), "");
    /// ```
    #[must_use]
    pub fn to_expression(&self) -> String {
        Facet::ALL
            .iter()
            .filter_map(|facet| {
                self.value(*facet)
                    .map(|value| clause(facet.field(), value))
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// Render one `(<field>: ANY("<value>"))` clause.
fn clause(field: &str, value: &str) -> String {
    format!("({field}: ANY(\"{}\"))", escape(value))
}

/// Escape characters that would terminate the quoted literal.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
