// Collection query description
//   An immutable, validated description of the remote image collection:
//   which catalog, which bands, when, where, which scenes to keep, how they
//   are ordered and whether the QA60 cloud mask runs on every scene.
//   Filtering, masking and mosaicking are executed by the imagery service.

use crate::error::{CloudMaskError, CloudMaskResult};
use crate::geo::Polygon;
use crate::mask::DEFAULT_QUALITY_BAND;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const SENTINEL2_SR: &str = "COPERNICUS/S2_SR";
pub const CLOUDY_PIXEL_PERCENTAGE: &str = "CLOUDY_PIXEL_PERCENTAGE";
pub const SYSTEM_INDEX: &str = "system:index";

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> CloudMaskResult<Self> {
        if start >= end {
            return Err(CloudMaskError::InvalidDateRange(format!(
                "start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse ISO `YYYY-MM-DD` dates.
    pub fn parse(start: &str, end: &str) -> CloudMaskResult<Self> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| CloudMaskError::InvalidDateRange(format!("`{s}`: {e}")))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Equal,
}

/// Scalar threshold on a scene metadata property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataFilter {
    pub property: String,
    pub comparison: Comparison,
    pub value: f64,
}

impl MetadataFilter {
    pub fn new<S: Into<String>>(property: S, comparison: Comparison, value: f64) -> Self {
        Self {
            property: property.into(),
            comparison,
            value,
        }
    }

    pub fn less_than<S: Into<String>>(property: S, value: f64) -> Self {
        Self::new(property, Comparison::LessThan, value)
    }

    pub fn matches(&self, candidate: f64) -> bool {
        match self.comparison {
            Comparison::LessThan => candidate < self.value,
            Comparison::LessOrEqual => candidate <= self.value,
            Comparison::GreaterThan => candidate > self.value,
            Comparison::GreaterOrEqual => candidate >= self.value,
            Comparison::Equal => candidate == self.value,
        }
    }
}

impl fmt::Display for MetadataFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.comparison {
            Comparison::LessThan => "<",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterOrEqual => ">=",
            Comparison::Equal => "==",
        };
        write!(f, "{} {op} {}", self.property, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOrder {
    pub property: String,
    pub ascending: bool,
}

impl Default for SortOrder {
    // Newest scenes first so the mosaic keeps the latest clear sample.
    fn default() -> Self {
        Self {
            property: SYSTEM_INDEX.to_string(),
            ascending: false,
        }
    }
}

/// How the sorted, masked collection is reduced to one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Composite {
    /// Per pixel, the first scene in sort order with a valid sample wins.
    Mosaic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionQuery {
    pub catalog: String,
    pub bands: Vec<String>,
    pub dates: DateRange,
    pub region: Polygon,
    pub filters: Vec<MetadataFilter>,
    pub sort: SortOrder,
    pub cloud_mask: Option<String>,
    pub composite: Composite,
}

impl CollectionQuery {
    pub fn builder<S: Into<String>>(catalog: S, region: Polygon, dates: DateRange) -> QueryBuilder {
        QueryBuilder {
            catalog: catalog.into(),
            bands: vec![],
            dates,
            region,
            filters: vec![],
            sort: SortOrder::default(),
            cloud_mask: Some(DEFAULT_QUALITY_BAND.to_string()),
        }
    }

    /// Sentinel-2 surface reflectance RGB plus QA60, scenes under 20% cloud.
    pub fn sentinel2_surface_reflectance(
        region: Polygon,
        dates: DateRange,
    ) -> CloudMaskResult<Self> {
        Self::builder(SENTINEL2_SR, region, dates)
            .with_bands(["B4", "B3", "B2", DEFAULT_QUALITY_BAND])
            .with_filter(MetadataFilter::less_than(CLOUDY_PIXEL_PERCENTAGE, 20.0))
            .build()
    }

    pub fn quality_band(&self) -> Option<&str> {
        self.cloud_mask.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    catalog: String,
    bands: Vec<String>,
    dates: DateRange,
    region: Polygon,
    filters: Vec<MetadataFilter>,
    sort: SortOrder,
    cloud_mask: Option<String>,
}

impl QueryBuilder {
    pub fn with_bands<I, S>(mut self, bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bands = bands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, filter: MetadataFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort<S: Into<String>>(mut self, property: S, ascending: bool) -> Self {
        self.sort = SortOrder {
            property: property.into(),
            ascending,
        };
        self
    }

    pub fn with_cloud_mask<S: Into<String>>(mut self, quality_band: S) -> Self {
        self.cloud_mask = Some(quality_band.into());
        self
    }

    pub fn without_cloud_mask(mut self) -> Self {
        self.cloud_mask = None;
        self
    }

    pub fn build(self) -> CloudMaskResult<CollectionQuery> {
        let QueryBuilder {
            catalog,
            bands,
            dates,
            region,
            filters,
            sort,
            cloud_mask,
        } = self;

        if catalog.trim().is_empty() {
            return Err(CloudMaskError::InvalidQuery("catalog id is empty".into()));
        }
        if bands.is_empty() {
            return Err(CloudMaskError::InvalidQuery("no bands selected".into()));
        }
        if let Some(qa) = &cloud_mask {
            if !bands.contains(qa) {
                return Err(CloudMaskError::MissingBand(qa.clone()));
            }
        }
        if let Some(filter) = filters.iter().find(|f| !f.value.is_finite()) {
            return Err(CloudMaskError::InvalidQuery(format!(
                "non-finite threshold in `{filter}`"
            )));
        }

        Ok(CollectionQuery {
            catalog,
            bands,
            dates,
            region,
            filters,
            sort,
            cloud_mask,
            composite: Composite::Mosaic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> Polygon {
        Polygon::rectangle(34.8777, -13.4055, 34.9701, -13.3157).unwrap()
    }

    fn winter() -> DateRange {
        DateRange::parse("2017-01-01", "2017-03-31").unwrap()
    }

    #[test]
    fn date_range_is_half_open() {
        let dates = winter();
        assert!(dates.contains(NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()));
        assert!(dates.contains(NaiveDate::from_ymd_opt(2017, 3, 30).unwrap()));
        assert!(!dates.contains(NaiveDate::from_ymd_opt(2017, 3, 31).unwrap()));
        assert!(!dates.contains(NaiveDate::from_ymd_opt(2016, 12, 31).unwrap()));
        assert_eq!(dates.days(), 89);
    }

    #[test]
    fn date_range_rejects_empty_or_reversed() {
        assert!(matches!(
            DateRange::parse("2017-03-31", "2017-01-01"),
            Err(CloudMaskError::InvalidDateRange(_))
        ));
        assert!(DateRange::parse("2017-01-01", "2017-01-01").is_err());
        assert!(DateRange::parse("2017-13-01", "2018-01-01").is_err());
    }

    #[test]
    fn metadata_filter_comparisons() {
        let lt = MetadataFilter::less_than(CLOUDY_PIXEL_PERCENTAGE, 20.0);
        assert!(lt.matches(19.9));
        assert!(!lt.matches(20.0));
        assert!(MetadataFilter::new("x", Comparison::LessOrEqual, 20.0).matches(20.0));
        assert!(MetadataFilter::new("x", Comparison::GreaterThan, 1.0).matches(1.5));
        assert!(!MetadataFilter::new("x", Comparison::GreaterOrEqual, 1.0).matches(0.5));
        assert!(MetadataFilter::new("x", Comparison::Equal, 3.0).matches(3.0));
        assert_eq!(lt.to_string(), "CLOUDY_PIXEL_PERCENTAGE < 20");
    }

    #[test]
    fn sentinel2_defaults() {
        let query = CollectionQuery::sentinel2_surface_reflectance(region(), winter()).unwrap();
        assert_eq!(query.catalog, SENTINEL2_SR);
        assert_eq!(query.bands, vec!["B4", "B3", "B2", "QA60"]);
        assert_eq!(query.quality_band(), Some("QA60"));
        assert_eq!(query.sort, SortOrder::default());
        assert!(!query.sort.ascending);
        assert_eq!(query.composite, Composite::Mosaic);
        assert_eq!(query.filters.len(), 1);
    }

    #[test]
    fn masking_requires_quality_band_in_selection() {
        let result = CollectionQuery::builder(SENTINEL2_SR, region(), winter())
            .with_bands(["B4", "B3", "B2"])
            .build();
        assert!(matches!(result, Err(CloudMaskError::MissingBand(b)) if b == "QA60"));

        let query = CollectionQuery::builder(SENTINEL2_SR, region(), winter())
            .with_bands(["B4", "B3", "B2"])
            .without_cloud_mask()
            .build()
            .unwrap();
        assert_eq!(query.quality_band(), None);
    }

    #[test]
    fn rejects_empty_selection_and_catalog() {
        assert!(matches!(
            CollectionQuery::builder(SENTINEL2_SR, region(), winter()).build(),
            Err(CloudMaskError::InvalidQuery(_))
        ));
        assert!(matches!(
            CollectionQuery::builder(" ", region(), winter())
                .with_bands(["QA60"])
                .build(),
            Err(CloudMaskError::InvalidQuery(_))
        ));
    }

    #[test]
    fn rejects_non_finite_threshold() {
        let result = CollectionQuery::builder(SENTINEL2_SR, region(), winter())
            .with_bands(["QA60"])
            .with_filter(MetadataFilter::less_than(CLOUDY_PIXEL_PERCENTAGE, f64::NAN))
            .build();
        assert!(matches!(result, Err(CloudMaskError::InvalidQuery(_))));
    }
}
