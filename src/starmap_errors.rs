use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarMapError {
    #[error("Star catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Ephemeris error: {0}")]
    EphemerisError(String),

    #[error("Projection domain error: {0}")]
    ProjectionDomainError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Invalid observer location: {0}")]
    InvalidObserverLocation(String),

    #[error("Invalid chart parameter: {0}")]
    InvalidChartParameter(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Time conversion error: {0}")]
    TimeError(#[from] hifitime::HifitimeError),
}

impl StarMapError {
    /// Short, stable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        use StarMapError::*;
        match self {
            CatalogUnavailable(_) => "CatalogUnavailable",
            EphemerisError(_) => "EphemerisError",
            ProjectionDomainError(_) => "ProjectionDomainError",
            RenderError(_) => "RenderError",
            InvalidObserverLocation(_) => "InvalidObserverLocation",
            InvalidChartParameter(_) => "InvalidChartParameter",
            InvalidConfiguration(_) => "InvalidConfiguration",
            TimeError(_) => "TimeError",
        }
    }
}

impl PartialEq for StarMapError {
    fn eq(&self, other: &Self) -> bool {
        use StarMapError::*;
        match (self, other) {
            (CatalogUnavailable(a), CatalogUnavailable(b)) => a == b,
            (EphemerisError(a), EphemerisError(b)) => a == b,
            (ProjectionDomainError(a), ProjectionDomainError(b)) => a == b,
            (RenderError(a), RenderError(b)) => a == b,
            (InvalidObserverLocation(a), InvalidObserverLocation(b)) => a == b,
            (InvalidChartParameter(a), InvalidChartParameter(b)) => a == b,
            (InvalidConfiguration(a), InvalidConfiguration(b)) => a == b,

            // hifitime errors are not comparable: same variant is enough
            (TimeError(_), TimeError(_)) => true,

            _ => false,
        }
    }
}
