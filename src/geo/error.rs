use proj4rs::errors::Error as Proj4Error;

#[derive(Debug)]
pub enum ProjectionError {
    BadCrs(String),
    Proj4Error(Proj4Error),
    NonFinite((f64, f64)),
}

impl From<Proj4Error> for ProjectionError {
    fn from(e: Proj4Error) -> Self {
        ProjectionError::Proj4Error(e)
    }
}
