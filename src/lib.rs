mod error;
pub mod export;
pub mod geo;
pub mod mask;
pub mod query;
pub mod raster;
pub mod service;
pub mod visualize;

pub use error::{CloudMaskError, CloudMaskResult};
pub use export::{ExportConfig, ExportRequest, ExportTask, TaskState};
pub use geo::{Crs, Interval, Polygon, Region};
pub use mask::{CloudMaskFilter, QualityBitfield};
pub use query::{CollectionQuery, DateRange, MetadataFilter};
pub use raster::{Band, Endian, MaskedBand, MaskedTile, RasterTile, SampleFormat};
pub use service::{Credentials, ServiceError, Session};
pub use visualize::{Preview, Visualization};

#[cfg(feature = "async")]
pub use service::{submit_export, ImageryService};

#[cfg(feature = "http")]
pub use service::http::HttpService;
