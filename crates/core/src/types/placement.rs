//! Serving placement for Retail search requests.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Placement`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// A path segment is empty.
    #[error("{segment} cannot be empty")]
    EmptySegment {
        /// Which identifier was empty.
        segment: &'static str,
    },
    /// A path segment contains a `/`, which would change the resource path.
    #[error("{segment} must not contain '/' (got {value:?})")]
    InvalidSegment {
        /// Which identifier was invalid.
        segment: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// The fully-qualified serving config a search is scoped to.
///
/// Rendered as
/// `projects/{project}/locations/{location}/catalogs/{catalog}/servingConfigs/{serving_config}`.
///
/// ## Examples
///
/// ```
/// use vertex_retail_core::Placement;
///
/// let placement = Placement::new("p", "l", "c", "s").unwrap();
/// assert_eq!(
///     placement.as_str(),
///     "projects/p/locations/l/catalogs/c/servingConfigs/s"
/// );
///
/// assert!(Placement::new("", "global", "c", "s").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Placement(String);

impl Placement {
    /// Build a placement from its four identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if any identifier is empty or contains a `/`.
    pub fn new(
        project_id: &str,
        location: &str,
        catalog_id: &str,
        serving_config_id: &str,
    ) -> Result<Self, PlacementError> {
        let project_id = check_segment("project id", project_id)?;
        let location = check_segment("location", location)?;
        let catalog_id = check_segment("catalog id", catalog_id)?;
        let serving_config_id = check_segment("serving config id", serving_config_id)?;

        Ok(Self(format!(
            "projects/{project_id}/locations/{location}/catalogs/{catalog_id}/servingConfigs/{serving_config_id}"
        )))
    }

    /// Returns the placement as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn check_segment<'a>(segment: &'static str, value: &'a str) -> Result<&'a str, PlacementError> {
    if value.is_empty() {
        return Err(PlacementError::EmptySegment { segment });
    }
    if value.contains('/') {
        return Err(PlacementError::InvalidSegment {
            segment,
            value: value.to_owned(),
        });
    }
    Ok(value)
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Placement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
