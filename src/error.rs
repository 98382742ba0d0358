use crate::geo::ProjectionError;
use crate::raster::RasterError;
use crate::service::ServiceError;
use std::fmt;

pub type CloudMaskResult<T> = Result<T, CloudMaskError>;

#[derive(Debug)]
pub enum CloudMaskError {
    MissingBand(String),
    InvalidQualityValue { index: usize, value: f64 },
    InvalidVisualization(String),
    InvalidDateRange(String),
    InvalidQuery(String),
    InvalidExport(String),
    BadPolygon(String),
    RasterError(RasterError),
    ProjectionError(ProjectionError),
    ServiceError(ServiceError),
}

impl fmt::Display for CloudMaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudMaskError::MissingBand(name) => write!(f, "missing required band `{name}`"),
            e => write!(f, "{:?}", e),
        }
    }
}

impl std::error::Error for CloudMaskError {}

impl From<RasterError> for CloudMaskError {
    fn from(e: RasterError) -> Self {
        CloudMaskError::RasterError(e)
    }
}

impl From<ProjectionError> for CloudMaskError {
    fn from(e: ProjectionError) -> Self {
        CloudMaskError::ProjectionError(e)
    }
}

impl From<ServiceError> for CloudMaskError {
    fn from(e: ServiceError) -> Self {
        CloudMaskError::ServiceError(e)
    }
}
