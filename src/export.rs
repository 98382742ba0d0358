use crate::error::{CloudMaskError, CloudMaskResult};
use crate::geo::{Crs, Polygon};
use crate::query::CollectionQuery;
use crate::visualize::Visualization;
use serde::Serialize;
use std::fmt::Display;

pub const DEFAULT_FOLDER: &str = "new";
pub const DEFAULT_SCALE: f64 = 100.0;
const MAX_DESCRIPTION_LEN: usize = 100;

/// Where and how the composite is written by the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportConfig {
    pub region: Polygon,
    pub folder: String,
    /// Ground resolution in metres per pixel.
    pub scale: f64,
    pub crs: Crs,
    pub description: String,
}

impl ExportConfig {
    pub fn builder(region: Polygon) -> ExportBuilder {
        ExportBuilder {
            region,
            folder: DEFAULT_FOLDER.to_string(),
            scale: DEFAULT_SCALE,
            crs: Crs::WGS84,
            description: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportBuilder {
    region: Polygon,
    folder: String,
    scale: f64,
    crs: Crs,
    description: Option<String>,
}

impl ExportBuilder {
    pub fn with_folder<S: Into<String>>(mut self, folder: S) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_scale(mut self, metres_per_pixel: f64) -> Self {
        self.scale = metres_per_pixel;
        self
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> CloudMaskResult<ExportConfig> {
        let ExportBuilder {
            region,
            folder,
            scale,
            crs,
            description,
        } = self;

        if !scale.is_finite() || scale <= 0.0 {
            return Err(CloudMaskError::InvalidExport(format!(
                "scale must be positive, got {scale}"
            )));
        }
        if folder.trim().is_empty() {
            return Err(CloudMaskError::InvalidExport("folder is empty".into()));
        }
        let description =
            description.ok_or(CloudMaskError::InvalidExport("description is missing".into()))?;
        validate_description(&description)?;

        Ok(ExportConfig {
            region,
            folder,
            scale,
            crs,
            description,
        })
    }
}

fn validate_description(description: &str) -> CloudMaskResult<()> {
    let len = description.chars().count();
    if len == 0 || len > MAX_DESCRIPTION_LEN {
        return Err(CloudMaskError::InvalidExport(format!(
            "description must be 1..={MAX_DESCRIPTION_LEN} characters, got {len}"
        )));
    }
    if let Some(c) = description
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || ".,:;_-".contains(*c)))
    {
        return Err(CloudMaskError::InvalidExport(format!(
            "description contains invalid character `{c}`"
        )));
    }
    Ok(())
}

/// Complete job handed to the imagery service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
    pub query: CollectionQuery,
    pub visualization: Visualization,
    pub export: ExportConfig,
}

impl ExportRequest {
    pub fn new(
        query: CollectionQuery,
        visualization: Visualization,
        export: ExportConfig,
    ) -> CloudMaskResult<Self> {
        visualization.validate()?;
        if let Some(band) = visualization
            .bands
            .iter()
            .find(|band| !query.bands.contains(band))
        {
            return Err(CloudMaskError::MissingBand(band.clone()));
        }
        Ok(Self {
            query,
            visualization,
            export,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Unsubmitted,
    Ready,
    Running,
    Completed,
    Failed,
    Cancelled,
    Unknown,
}

impl TaskState {
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "UNSUBMITTED" => TaskState::Unsubmitted,
            "READY" | "PENDING" => TaskState::Ready,
            "RUNNING" => TaskState::Running,
            "COMPLETED" | "SUCCEEDED" => TaskState::Completed,
            "FAILED" => TaskState::Failed,
            "CANCELLED" | "CANCEL_REQUESTED" => TaskState::Cancelled,
            _ => TaskState::Unknown,
        }
    }
}

/// Handle to a started export. Nothing polls it; the service runs the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTask {
    pub id: String,
    pub state: TaskState,
}

impl Display for ExportTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExportTask({}, {:?})", self.id, self.state)
    }
}
