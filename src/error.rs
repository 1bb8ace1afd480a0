use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("data provider failed: {0}")]
    Provider(String),

    #[error("highlight mesh too large: {vertices} vertices exceed the u16 index space")]
    MeshTooLarge { vertices: usize },

    #[error("data fetch worker is no longer reachable")]
    FetcherDisconnected,
}
