//! Catalog search: one search call, then one detail fetch per match.
//!
//! [`ProductSearch::stream`] yields product mappings lazily, fetching one
//! product per poll. The first failure is yielded as an error and ends the
//! stream. [`ProductSearch::search`] collects the stream and is all-or-nothing.

use std::sync::Arc;

use async_stream::stream;
use futures::{Stream, TryStreamExt};
use thiserror::Error;
use vertex_retail_core::{ErrorRecord, Placement, ProductMapping, SearchRequest};

use crate::retail::{RetailApi, RetailError};

/// Errors that end a catalog search.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The search endpoint rejected the request.
    #[error("search rejected: {0}")]
    Rejected(#[source] RetailError),

    /// The search call failed for any other reason.
    #[error("search failed: {0}")]
    Search(#[source] RetailError),

    /// Fetching one matched product failed.
    #[error("failed to fetch product {name}: {source}")]
    Detail {
        /// Resource name of the product.
        name: String,
        /// Underlying error.
        #[source]
        source: RetailError,
    },
}

impl CatalogError {
    fn from_search(error: RetailError) -> Self {
        if error.is_invalid_argument() {
            Self::Rejected(error)
        } else {
            Self::Search(error)
        }
    }

    /// The `{"error", "details"}` record reported to the caller.
    #[must_use]
    pub fn to_record(&self) -> ErrorRecord {
        match self {
            Self::Rejected(source) => ErrorRecord::invalid_argument(source.to_string()),
            Self::Search(source) | Self::Detail { source, .. } => {
                ErrorRecord::search_failed(source.to_string())
            }
        }
    }
}

/// Product search scoped to one placement.
#[derive(Clone)]
pub struct ProductSearch {
    api: Arc<dyn RetailApi>,
    placement: Placement,
}

impl ProductSearch {
    /// Create a search over `placement` using `api` for remote calls.
    #[must_use]
    pub fn new(api: Arc<dyn RetailApi>, placement: Placement) -> Self {
        Self { api, placement }
    }

    /// Search, then stream one product mapping per match in ranking order.
    ///
    /// Each call performs exactly one search request. Product details are
    /// fetched one at a time as the stream is polled.
    pub fn stream(
        &self,
        request: SearchRequest,
    ) -> impl Stream<Item = Result<ProductMapping, CatalogError>> + Send + 'static {
        let api = Arc::clone(&self.api);
        let placement = self.placement.clone();

        stream! {
            let references = match api.search(&placement, &request).await {
                Ok(references) => references,
                Err(e) => {
                    tracing::error!(error = %e, query = %request.query, "Retail search failed");
                    yield Err(CatalogError::from_search(e));
                    return;
                }
            };

            tracing::info!(
                query = %request.query,
                filter = %request.filter,
                matches = references.len(),
                "Retail search completed"
            );

            for reference in references {
                tracing::info!(product = %reference.name, "Fetching product details");

                match api.get_product(&reference.name).await {
                    Ok(product) => yield Ok(product.into_mapping()),
                    Err(source) => {
                        tracing::error!(
                            error = %source,
                            product = %reference.name,
                            "Product detail fetch failed"
                        );
                        yield Err(CatalogError::Detail {
                            name: reference.name,
                            source,
                        });
                        return;
                    }
                }
            }
        }
    }

    /// Search and collect every product.
    ///
    /// # Errors
    ///
    /// Returns the first failure; products fetched before it are discarded.
    pub async fn search(&self, request: SearchRequest) -> Result<Vec<ProductMapping>, CatalogError> {
        self.stream(request).try_collect().await
    }
}

impl std::fmt::Debug for ProductSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductSearch")
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use vertex_retail_core::{
        FacetFilters, INVALID_ARGUMENT_MESSAGE, SEARCH_FAILED_MESSAGE, SearchResultReference,
    };

    use super::*;
    use crate::retail::Product;

    /// In-memory Retail API that records every call.
    #[derive(Default)]
    pub(crate) struct FakeRetail {
        pub matches: Vec<String>,
        pub search_error: Option<fn() -> RetailError>,
        pub failing_products: HashSet<String>,
        pub searches: Mutex<Vec<SearchRequest>>,
        pub fetches: Mutex<Vec<String>>,
    }

    impl FakeRetail {
        pub(crate) fn with_matches(names: &[&str]) -> Self {
            Self {
                matches: names.iter().map(|n| (*n).to_string()).collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl RetailApi for FakeRetail {
        async fn search(
            &self,
            _placement: &Placement,
            request: &SearchRequest,
        ) -> Result<Vec<SearchResultReference>, RetailError> {
            self.searches.lock().unwrap().push(request.clone());
            if let Some(error) = self.search_error {
                return Err(error());
            }
            Ok(self
                .matches
                .iter()
                .map(|name| SearchResultReference {
                    id: product_id(name).to_string(),
                    name: name.clone(),
                })
                .collect())
        }

        async fn get_product(&self, name: &str) -> Result<Product, RetailError> {
            self.fetches.lock().unwrap().push(name.to_string());
            if self.failing_products.contains(name) {
                return Err(RetailError::Api {
                    status: 503,
                    code: "UNAVAILABLE".to_string(),
                    message: "backend unavailable".to_string(),
                });
            }
            let id = product_id(name);
            Ok(serde_json::from_value(json!({
                "name": name,
                "id": id,
                "title": format!("Product {id}"),
                "priceInfo": {"currencyCode": "USD", "price": 10.5},
                "uri": format!("https://shop.example.com/p/{id}")
            }))
            .unwrap())
        }
    }

    fn product_id(name: &str) -> &str {
        name.rsplit('/').next().unwrap_or(name)
    }

    fn name(id: &str) -> String {
        format!("projects/p/locations/global/catalogs/c/branches/0/products/{id}")
    }

    fn search_over(fake: Arc<FakeRetail>) -> ProductSearch {
        ProductSearch::new(fake, Placement::new("p", "global", "c", "s").unwrap())
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest::new(query, "guest-user", &FacetFilters::default(), 5)
    }

    #[tokio::test]
    async fn test_two_matches_fetch_two_details_in_order() {
        let (a, b) = (name("a"), name("b"));
        let fake = Arc::new(FakeRetail::with_matches(&[a.as_str(), b.as_str()]));
        let search = search_over(Arc::clone(&fake));

        let products = search.search(request("jeans")).await.unwrap();

        assert_eq!(fake.searches.lock().unwrap().len(), 1);
        assert_eq!(*fake.fetches.lock().unwrap(), vec![a, b]);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id(), Some("a"));
        assert_eq!(products[0].title(), Some("Product a"));
        assert_eq!(products[0].price(), Some(10.5));
        assert_eq!(products[0].uri(), Some("https://shop.example.com/p/a"));
        assert_eq!(products[1].id(), Some("b"));
    }

    #[tokio::test]
    async fn test_no_matches() {
        let fake = Arc::new(FakeRetail::default());
        let search = search_over(Arc::clone(&fake));

        let products = search.search(request("")).await.unwrap();
        assert!(products.is_empty());
        assert!(fake.fetches.lock().unwrap().is_empty());
        assert_eq!(fake.searches.lock().unwrap()[0].query, "");
    }

    #[tokio::test]
    async fn test_repeated_names_are_not_deduplicated() {
        let a = name("a");
        let fake = Arc::new(FakeRetail::with_matches(&[a.as_str(), a.as_str()]));
        let search = search_over(Arc::clone(&fake));

        let products = search.search(request("jeans")).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(fake.fetches.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_search_yields_invalid_argument_record() {
        let fake = Arc::new(FakeRetail {
            search_error: Some(|| RetailError::InvalidArgument("bad serving config".to_string())),
            ..FakeRetail::default()
        });
        let search = search_over(Arc::clone(&fake));

        let items: Vec<_> = search.stream(request("jeans")).collect().await;
        assert_eq!(items.len(), 1);

        let record = items[0].as_ref().unwrap_err().to_record();
        assert_eq!(record.error, INVALID_ARGUMENT_MESSAGE);
        assert!(record.details.contains("bad serving config"));
        assert!(fake.fetches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_search_yields_generic_record() {
        let fake = Arc::new(FakeRetail {
            search_error: Some(|| RetailError::Auth("no credentials".to_string())),
            ..FakeRetail::default()
        });
        let search = search_over(fake);

        let err = search.search(request("jeans")).await.unwrap_err();
        let record = err.to_record();
        assert_eq!(record.error, SEARCH_FAILED_MESSAGE);
        assert_eq!(record.details, "authentication error: no credentials");
    }

    #[tokio::test]
    async fn test_detail_failure_stops_the_stream() {
        let (a, b, c) = (name("a"), name("b"), name("c"));
        let fake = Arc::new(FakeRetail {
            failing_products: HashSet::from([b.clone()]),
            ..FakeRetail::with_matches(&[a.as_str(), b.as_str(), c.as_str()])
        });
        let search = search_over(Arc::clone(&fake));

        let items: Vec<_> = search.stream(request("jeans")).collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        let record = items[1].as_ref().unwrap_err().to_record();
        assert_eq!(record.error, SEARCH_FAILED_MESSAGE);
        assert_eq!(*fake.fetches.lock().unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_collected_search_discards_partial_results() {
        let (a, b) = (name("a"), name("b"));
        let fake = Arc::new(FakeRetail {
            failing_products: HashSet::from([b.clone()]),
            ..FakeRetail::with_matches(&[a.as_str(), b.as_str()])
        });
        let search = search_over(fake);

        let err = search.search(request("jeans")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Detail { ref name, .. } if *name == b));
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let (a, b) = (name("a"), name("b"));
        let fake = Arc::new(FakeRetail::with_matches(&[a.as_str(), b.as_str()]));
        let search = search_over(Arc::clone(&fake));

        let stream = search.stream(request("jeans"));
        assert!(fake.searches.lock().unwrap().is_empty());

        let mut stream = std::pin::pin!(stream);
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id(), Some("a"));
        assert_eq!(fake.fetches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filters_reach_the_search_call() {
        let fake = Arc::new(FakeRetail::default());
        let search = search_over(Arc::clone(&fake));
        let filters = FacetFilters {
            brand: Some("Acme".to_string()),
            size: Some("M".to_string()),
            ..FacetFilters::default()
        };

        search
            .search(SearchRequest::new("shirt", "visitor-7", &filters, 12))
            .await
            .unwrap();

        let searches = fake.searches.lock().unwrap();
        assert_eq!(searches[0].visitor_id, "visitor-7");
        assert_eq!(searches[0].page_size, 12);
        assert_eq!(
            searches[0].filter,
            r#"(brands: ANY("Acme")) AND (sizes: ANY("M"))"#
        );
    }
}
