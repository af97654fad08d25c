mod errors;

pub use errors::Error;

pub type MovieReorgResult<T> = Result<T, Error>;
